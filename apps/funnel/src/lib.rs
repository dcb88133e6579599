//! # Funnel Library
//!
//! This library exposes the CLI modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;

// Re-export funnel_core for convenience
pub use funnel_core;
