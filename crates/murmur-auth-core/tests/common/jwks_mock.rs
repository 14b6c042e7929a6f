//! Mock Google JWKS endpoint for integration testing
//!
//! Provides a wiremock-based key set endpoint and helpers for signing identity
//! assertions with test keys.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockGuard, MockServer, ResponseTemplate};

// Test-only 2048-bit RSA keys (generated with `openssl genpkey`)
const PROVIDER_KEY_PEM: &str = include_str!("../fixtures/provider_signing_key.pem");
const ROGUE_KEY_PEM: &str = include_str!("../fixtures/rogue_signing_key.pem");

// Base64url modulus of the provider key above; exponent is 65537
pub const PROVIDER_KEY_N: &str = "5WMFqdLxOHpOvDjprk3XUd303s7N19HalM6E4drCRsptXshPlGAOwXe92iovJmMHYCYUqhAQ3NTlE566YObizIfe41ZoJRto0wnT67cdGUN__aJRXuOqexTkL02HQEWd1YQ0PXgNU8iklfNiGOfiGlZhFPJ4WKuItcg24giDl6LqV27LjjSl1bbQKPMDg09YDo9jE0fY5IP1hvzuWm0MsEipC9FUrII8TZi27KPYTTD_wLfyJ6HagHmC4q_SULwW_dwPU_nDOQN2EJgUAgpukBYN5eKK8MZ_4sACz8S8P_l9aH-WwbCnJR1WOFJ0CezmTzoQshui7jAd_JepHf61RQ";
pub const PROVIDER_KEY_E: &str = "AQAB";

// Modulus of the rogue key, for key sets that rotate to a different key
#[allow(dead_code)]
pub const ROGUE_KEY_N: &str = "qQa53rUAsxOqJlKmoBGIwPUezNspuxYVR96vr-ZEzYhilD7lYR0BjyAV2lpzTf5GmNaZiJ_5Eg8szUC8knoE3vAJbd1HnpHg0LZFRLsXfunzY3E_-yRiRUG6cbQiXVgxTeXzLX6LXhS46s-AUzJoIaeK5xqQieeVO0ve_KgZnXPdI_cxogI9e8x2MQBvfyUOZ6B9Eqz_J6xElZsNwqshpkPw4FPGTZY78FydvhnrsxYJ9w1yJXINk5mxuoD1OJDV9VxHVbMTlwzaYM1LCoCwTb1UCMSwbUFjzMJjsl8-jjnWfbXanWCeD3U8JltXx1lftdtL2DI6ZiThcADUru4TUQ";

pub const PROVIDER_KEY_ID: &str = "murmur-test-kid-1";

pub const JWKS_PATH: &str = "/oauth2/v3/certs";

/// Identity assertion claims builder, shaped like a Google ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestIdentityClaims {
    pub sub: String,
    pub email: String,
    pub email_verified: serde_json::Value,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl TestIdentityClaims {
    /// Claims that pass every check for `client_id`
    pub fn valid(email: &str, client_id: &str) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: "108234567890123456789".to_string(),
            email: email.to_string(),
            email_verified: serde_json::Value::Bool(true),
            iss: "https://accounts.google.com".to_string(),
            aud: client_id.to_string(),
            iat: now,
            exp: now + 3600,
        }
    }

    #[allow(dead_code)]
    pub fn expired(mut self) -> Self {
        let now = chrono::Utc::now().timestamp();
        self.iat = now - 7200;
        self.exp = now - 3600;
        self
    }

    #[allow(dead_code)]
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.iss = issuer.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.aud = audience.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn with_email_verified(mut self, verified: serde_json::Value) -> Self {
        self.email_verified = verified;
        self
    }
}

/// Test keypair for signing assertions
pub struct TestKeyPair {
    encoding_key: EncodingKey,
    kid: String,
}

impl TestKeyPair {
    /// The key the mock provider publishes
    pub fn provider() -> Self {
        Self {
            encoding_key: EncodingKey::from_rsa_pem(PROVIDER_KEY_PEM.as_bytes())
                .expect("Failed to load provider test key"),
            kid: PROVIDER_KEY_ID.to_string(),
        }
    }

    /// A key the provider never published, presented under the provider's kid
    #[allow(dead_code)]
    pub fn rogue() -> Self {
        Self {
            encoding_key: EncodingKey::from_rsa_pem(ROGUE_KEY_PEM.as_bytes())
                .expect("Failed to load rogue test key"),
            kid: PROVIDER_KEY_ID.to_string(),
        }
    }

    /// Sign claims into an RS256 JWT
    pub fn sign(&self, claims: &TestIdentityClaims) -> String {
        self.sign_with_kid(claims, &self.kid)
    }

    /// Sign claims under a different key ID
    pub fn sign_with_kid(&self, claims: &TestIdentityClaims, kid: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        encode(&header, claims, &self.encoding_key).expect("Failed to sign JWT")
    }
}

fn provider_jwks() -> serde_json::Value {
    serde_json::json!({
        "keys": [
            {
                "kid": PROVIDER_KEY_ID,
                "kty": "RSA",
                "alg": "RS256",
                "use": "sig",
                "n": PROVIDER_KEY_N,
                "e": PROVIDER_KEY_E
            },
            {
                "kid": "ec-key-ignored",
                "kty": "EC",
                "crv": "P-256",
                "x": "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU",
                "y": "x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0"
            }
        ]
    })
}

/// JWKS mock server
pub struct JwksMockServer {
    server: MockServer,
}

impl JwksMockServer {
    /// Start a mock server publishing the provider key
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("cache-control", "public, max-age=21600")
                    .set_body_json(provider_jwks()),
            )
            .mount(&server)
            .await;

        Self { server }
    }

    /// Start a bare mock server without JWKS mounted (for custom setups)
    #[allow(dead_code)]
    pub async fn start_bare() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Full JWKS URL on the mock server
    pub fn jwks_url(&self) -> String {
        format!("{}{}", self.server.uri(), JWKS_PATH)
    }

    /// Mount the key set with an exact call count expectation
    #[allow(dead_code)]
    pub async fn expect_jwks_calls(&self, expected_calls: u64) -> MockGuard {
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(provider_jwks()))
            .expect(expected_calls)
            .mount_as_scoped(&self.server)
            .await
    }

    /// Mount a key set response with a specific `max-age`
    #[allow(dead_code)]
    pub async fn mount_with_max_age(&self, max_age_secs: u64, keys: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("cache-control", format!("public, max-age={max_age_secs}").as_str())
                    .set_body_json(keys),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a failing JWKS endpoint
    #[allow(dead_code)]
    pub async fn mount_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Drop every mounted mock
    #[allow(dead_code)]
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}

/// The JWKS body the mock provider serves by default
#[allow(dead_code)]
pub fn provider_key_set() -> serde_json::Value {
    provider_jwks()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_jwt() {
        let keypair = TestKeyPair::provider();
        let claims = TestIdentityClaims::valid("alice@example.com", "client");
        assert_eq!(keypair.sign(&claims).split('.').count(), 3);
    }
}
