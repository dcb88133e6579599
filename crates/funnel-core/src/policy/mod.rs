//! # Policy Module
//!
//! Board rules that sit next to the resolver.
//!
//! This module contains:
//! - Manual moves (drag and drop between board columns)
//! - The callback limit that archives leads nobody can reach
//!
//! Both are pure decisions. Applying them (saving the lead, writing history)
//! stays with the calling application.

mod callback;
mod manual;

pub use callback::*;
pub use manual::*;
