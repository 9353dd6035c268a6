use env_helpers::get_env_default;
use secrecy::SecretString;

use super::error::InfraError;

pub struct AppConfig {
    /// Base64 HMAC secret shared by every host that issues or verifies tokens.
    pub jwt_secret: SecretString,
    /// Emit JSON logs instead of the pretty console format.
    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let jwt_secret = std::env::var("JWT_SECRET").ok();
        let log_json: bool = get_env_default("LOG_JSON", false);

        Self::from_parts(jwt_secret, log_json)
    }

    /// Builds the config from already-read values; a missing secret is an error.
    pub fn from_parts(jwt_secret: Option<String>, log_json: bool) -> Result<Self, InfraError> {
        let jwt_secret = jwt_secret.ok_or(InfraError::ConfigMissing { var: "JWT_SECRET" })?;
        Ok(Self::new(SecretString::new(jwt_secret.into()), log_json))
    }

    pub fn new(jwt_secret: SecretString, log_json: bool) -> Self {
        Self {
            jwt_secret,
            log_json,
        }
    }
}
