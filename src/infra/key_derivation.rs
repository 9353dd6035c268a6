use base64::{Engine as _, engine::general_purpose};
use secrecy::{ExposeSecret, SecretSlice, SecretString};

use crate::app_error::{AppError, AppResult};

/// Smallest accepted key, in bytes. HS256 needs at least 256 bits.
pub const MIN_KEY_LEN: usize = 32;

/// HMAC key material decoded from the shared secret.
///
/// The bytes stay wrapped in a `SecretSlice` so they are zeroized on drop and
/// never show up in `Debug` output.
#[derive(Debug)]
pub struct SigningKey(SecretSlice<u8>);

impl SigningKey {
    /// Decodes a standard-alphabet base64 secret into key bytes.
    ///
    /// The same secret always yields the same key. Secrets that are not base64
    /// or decode to fewer than [`MIN_KEY_LEN`] bytes are rejected.
    pub fn from_base64(secret: &SecretString) -> AppResult<Self> {
        let raw = general_purpose::STANDARD
            .decode(secret.expose_secret().trim().as_bytes())
            .map_err(|_| AppError::InvalidInput("JWT_SECRET is not valid base64".into()))?;
        if raw.len() < MIN_KEY_LEN {
            return Err(AppError::InvalidInput(format!(
                "JWT_SECRET must decode to at least {MIN_KEY_LEN} bytes, got {}",
                raw.len()
            )));
        }
        Ok(Self(SecretSlice::from(raw)))
    }

    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}
