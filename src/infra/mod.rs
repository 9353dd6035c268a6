pub mod clock;
pub mod config;
pub mod error;
pub mod key_derivation;
pub mod setup;
pub mod signing_key;

pub use error::InfraError;
