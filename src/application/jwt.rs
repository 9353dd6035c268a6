use std::collections::HashSet;
use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::claims::Claims;
use crate::infra::key_derivation::SigningKey;

/// The only algorithm tokens are signed and accepted with.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signs and verifies compact HS256 tokens with a single symmetric key.
///
/// `verify` does not look at `exp`; freshness is decided by the token service
/// against its clock.
pub struct TokenSigner {
    key: SigningKey,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(key: SigningKey) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(key.expose()),
            decoding: DecodingKey::from_secret(key.expose()),
            key,
            validation,
        }
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }

    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        let header = Header::new(ALGORITHM);
        encode(&header, claims, &self.encoding)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        check_algorithm(token)?;
        let data = decode::<Map<String, Value>>(token, &self.decoding, &self.validation)?;
        Claims::from_payload(data.claims)
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Rejects anything that is not three segments with an HS256 header.
///
/// Runs before the library decode so `alg: none` and other names the library
/// cannot even parse still surface as an algorithm error.
fn check_algorithm(token: &str) -> AppResult<()> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AppError::MalformedToken);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AppError::MalformedToken)?;
    let header: RawHeader =
        serde_json::from_slice(&bytes).map_err(|_| AppError::MalformedToken)?;

    match header.alg.parse::<Algorithm>() {
        Ok(alg) if alg == ALGORITHM => Ok(()),
        _ => Err(AppError::UnsupportedAlgorithm),
    }
}
