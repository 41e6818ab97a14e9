//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the three-step lifecycle of a page (pending, claimed, scanned)
//! - `SkipReason`: why a page was made non-claimable at discovery time

mod page_state;

// Re-export main types
pub use page_state::{PageState, SkipReason};
