use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    infra::{clock::SystemClock, config::AppConfig, error::InfraError, signing_key},
    use_cases::token::TokenService,
};

/// Builds the token service on the process-wide signer and the system clock.
pub fn init_token_service(config: &AppConfig) -> Result<TokenService, InfraError> {
    let signer = signing_key::init(config)?;
    Ok(TokenService::new(signer, Arc::new(SystemClock)))
}

pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "token_auth=info".into());

    // Console (pretty logs). stdout is reserved for command output.
    let console_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .pretty()
    });

    // Structured JSON logs
    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
