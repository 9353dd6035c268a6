//! Fixtures with a fixed 48-byte test key.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use secrecy::SecretString;
use time::OffsetDateTime;

use super::FixedClock;
use crate::{
    application::jwt::TokenSigner, infra::key_derivation::SigningKey,
    use_cases::token::TokenService,
};

/// Raw bytes behind [`test_secret`].
pub fn test_key_bytes() -> Vec<u8> {
    (0u8..48).map(|b| b.wrapping_mul(37).wrapping_add(11)).collect()
}

/// Base64 form of [`test_key_bytes`], as it would appear in `JWT_SECRET`.
pub fn test_secret() -> SecretString {
    SecretString::new(general_purpose::STANDARD.encode(test_key_bytes()).into())
}

pub fn test_signing_key() -> SigningKey {
    SigningKey::from_base64(&test_secret()).unwrap()
}

pub fn test_signer() -> Arc<TokenSigner> {
    Arc::new(TokenSigner::new(test_signing_key()))
}

/// Token service on the test key with a clock pinned at `at`.
pub fn test_service(at: OffsetDateTime) -> (TokenService, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(at));
    let service = TokenService::new(test_signer(), clock.clone());
    (service, clock)
}
