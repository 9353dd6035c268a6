use thiserror::Error;

use crate::app_error::AppError;

/// Infrastructure errors that can occur during application startup.
///
/// SECURITY: Display messages never include the secret itself.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Configuration error: environment variable {var} not set")]
    ConfigMissing { var: &'static str },

    #[error("Signing key initialization failed")]
    InvalidSecret(#[source] AppError),
}
