use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde_json::{Map, Value};

use token_auth::{
    domain::entities::claims::TokenState,
    infra::{
        config::AppConfig,
        setup::{init_token_service, init_tracing},
    },
};

#[derive(Parser)]
#[command(name = "token-auth")]
#[command(author, version, about = "Issue and verify HS256 bearer tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a token for a subject
    Issue {
        subject: String,

        /// Extra claim as key=value; value is parsed as JSON, falling back to a string
        #[arg(long = "claim", value_parser = parse_claim)]
        claims: Vec<(String, Value)>,
    },

    /// Print the verified claims of a token (expiry is not checked)
    Inspect { token: String },

    /// Check a token for a subject; exits non-zero unless valid
    Check { token: String, subject: String },
}

fn parse_claim(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err("claim name must not be empty".to_string());
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_json);

    let tokens = init_token_service(&config)?;

    match cli.command {
        Commands::Issue { subject, claims } => {
            let extra: Map<String, Value> = claims.into_iter().collect();
            println!("{}", tokens.issue_with_claims(&subject, extra)?);
        }
        Commands::Inspect { token } => {
            let claims = tokens.extract_all(&token)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
        Commands::Check { token, subject } => {
            let state = tokens.state(&token);
            let valid = tokens.is_valid(&token, &subject);
            println!("{state}");
            if !valid {
                if state == TokenState::Valid {
                    tracing::info!("token is valid but issued to another subject");
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
