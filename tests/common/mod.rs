//! Common test utilities and helpers
//!
//! - Store fixtures with a manual clock
//! - Scripted remote authority that records every call
//! - Custom assertion macros

pub mod assertions;
pub mod database;

// Re-export commonly used utilities
pub use database::*;
pub use remote::*;
