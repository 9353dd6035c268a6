//! Test utilities.
//!
//! This module provides:
//! - A controllable clock for expiry tests
//! - Fixtures for the signing secret, signer and token service

mod clock;
mod factories;

pub use clock::*;
pub use factories::*;
