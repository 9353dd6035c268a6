pub mod application;
pub mod domain;
pub mod infra;

// Test utilities (fixtures and a controllable clock)
#[cfg(test)]
pub mod test_utils;

// Re-exports for shorter use statements.
pub use application::*;
pub use domain::*;
