//! Configuration module for Slipbox
//!
//! Editor preferences, their JSON form and persistent storage in the
//! platform-specific config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
