use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use super::{config::AppConfig, error::InfraError, key_derivation::SigningKey};
use crate::application::jwt::TokenSigner;

static SIGNER: OnceCell<Arc<TokenSigner>> = OnceCell::new();

/// Initializes the process-wide signer from `config`, once.
///
/// Later calls return the signer built by the first successful call and do not
/// re-read the secret. A bad secret fails here, at startup, and leaves the cell
/// empty.
pub fn init(config: &AppConfig) -> Result<Arc<TokenSigner>, InfraError> {
    let signer = SIGNER.get_or_try_init(|| {
        let key = SigningKey::from_base64(&config.jwt_secret)
            .map_err(InfraError::InvalidSecret)?;
        info!(key_bytes = key.expose().len(), "signing key initialized");
        Ok::<_, InfraError>(Arc::new(TokenSigner::new(key)))
    })?;
    Ok(signer.clone())
}
