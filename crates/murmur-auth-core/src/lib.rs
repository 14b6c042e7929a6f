//! Murmur Auth Core - Authentication business logic
//!
//! Verifies Google identity assertions, mints first-party session tokens for
//! allow-listed identities, and validates those tokens on later requests.

pub mod assertion;
pub mod config;
pub mod error;
pub mod keys;
pub mod policy;
pub mod secret;
pub mod service;
pub mod session;

pub use assertion::{IdentityAssertionVerifier, IdentityClaims, VerifiedIdentityClaims};
pub use config::{AuthConfig, GOOGLE_ISSUERS, GOOGLE_JWKS_URL};
pub use error::{AuthError, KeyFetchError};
pub use keys::{Jwk, Jwks, JwksKeyFetcher, KeyFetcher, MAX_JWKS_CACHE_DURATION};
pub use policy::AllowList;
pub use secret::{SecretError, SigningSecret};
pub use service::AuthService;
pub use session::{extract_bearer, IssuedToken, SessionClaims, SessionTokenService};
