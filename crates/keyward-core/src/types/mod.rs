//! Core types for Keyward.

mod audit;

pub use audit::*;
