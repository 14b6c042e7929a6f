//! Common test utilities for murmur-auth-core integration tests

pub mod jwks_mock;

#[allow(unused_imports)]
pub use jwks_mock::{JwksMockServer, TestIdentityClaims, TestKeyPair};
