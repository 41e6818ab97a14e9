//! URL handling module for Sumi-Branch
//!
//! This module provides link resolution, seed parsing and the host-scope
//! rule that decides which discovered pages may be fetched.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{host_key, is_fetchable_scheme, same_host};
pub use normalize::{normalize_link, parse_seed};
