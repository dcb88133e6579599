//! # Formats Module
//!
//! Serialization of rule tables.
//!
//! This module contains:
//! - JSON loading with validation
//! - JSON rendering for inspection
//!
//! Note: File I/O stays in the app layer (apps/funnel).
//! This module only handles format conversion (pure transformations).

mod json;

pub use json::*;
