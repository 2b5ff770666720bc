//! Crawl state tracking
//!
//! Defines the per-URL state machine and the visited set that records it.

mod page_state;
mod visited;

pub use page_state::PageState;
pub use visited::VisitedSet;
