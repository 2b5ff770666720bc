/// Page state definitions for tracking crawl progress
///
/// Every canonical URL moves through `Pending -> Fetching -> terminal`, or
/// straight from `Pending` to `Disallowed` when robots.txt forbids it.
use std::fmt;

/// Represents the current state of a URL in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Active States =====
    /// Discovered and enqueued, not yet dequeued
    Pending,

    /// Dequeued; the request is in flight
    Fetching,

    // ===== Terminal Success States =====
    /// Fetched and at least one keyword matched
    Matched,

    /// Fetched and no keyword matched
    Unmatched,

    // ===== Terminal Error States =====
    /// The fetch failed; a broken link was recorded
    Failed,

    // ===== Terminal Skip States =====
    /// Never fetched because robots.txt disallows it
    Disallowed,
}

impl PageState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true while the URL may still be processed
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Fetching)
    }

    /// Returns true if the fetch succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Matched | Self::Unmatched)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// There are no retries: once terminal, a state never changes again.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Pending, Self::Disallowed)
                | (Self::Fetching, Self::Matched)
                | (Self::Fetching, Self::Unmatched)
                | (Self::Fetching, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Matched => "matched",
            Self::Unmatched => "unmatched",
            Self::Failed => "failed",
            Self::Disallowed => "disallowed",
        }
    }

    /// Returns all terminal states, in display order
    pub fn terminal_states() -> [Self; 4] {
        [Self::Matched, Self::Unmatched, Self::Failed, Self::Disallowed]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
