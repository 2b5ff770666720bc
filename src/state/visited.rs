use crate::state::PageState;
use crate::CrawlError;
use std::collections::HashMap;

/// Canonical URLs seen during a crawl, with the state each one reached
///
/// A URL is inserted when it is enqueued, not when it is fetched, so the
/// frontier never holds the same URL twice. Insert is check-and-insert in
/// one step.
#[derive(Debug, Default)]
pub struct VisitedSet {
    states: HashMap<String, PageState>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as seen in the `Pending` state
    ///
    /// Returns `false` if the URL was already present, in which case its
    /// state is left untouched.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.states.contains_key(url) {
            return false;
        }
        self.states.insert(url.to_string(), PageState::Pending);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.states.contains_key(url)
    }

    /// Current state of a URL, if it has been seen
    pub fn state(&self, url: &str) -> Option<PageState> {
        self.states.get(url).copied()
    }

    /// Moves a URL to its next state
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidTransition` if the URL was never inserted
    /// or the move is not a legal transition.
    pub fn advance(&mut self, url: &str, to: PageState) -> Result<(), CrawlError> {
        let Some(current) = self.states.get_mut(url) else {
            return Err(CrawlError::InvalidTransition {
                url: url.to_string(),
                from: PageState::Pending,
                to,
            });
        };

        if !current.can_transition_to(to) {
            return Err(CrawlError::InvalidTransition {
                url: url.to_string(),
                from: *current,
                to,
            });
        }

        *current = to;
        Ok(())
    }

    /// Number of URLs currently in `state`
    pub fn count(&self, state: PageState) -> usize {
        self.states.values().filter(|s| **s == state).count()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_check_and_insert() {
        let mut visited = VisitedSet::new();
        assert!(visited.insert("https://ex.test/"));
        assert!(!visited.insert("https://ex.test/"));
        assert_eq!(visited.len(), 1);
        assert_eq!(visited.state("https://ex.test/"), Some(PageState::Pending));
    }

    #[test]
    fn test_reinsert_keeps_state() {
        let mut visited = VisitedSet::new();
        visited.insert("https://ex.test/");
        visited.advance("https://ex.test/", PageState::Fetching).unwrap();
        assert!(!visited.insert("https://ex.test/"));
        assert_eq!(visited.state("https://ex.test/"), Some(PageState::Fetching));
    }

    #[test]
    fn test_advance_through_lifecycle() {
        let mut visited = VisitedSet::new();
        visited.insert("https://ex.test/a");
        visited.advance("https://ex.test/a", PageState::Fetching).unwrap();
        visited.advance("https://ex.test/a", PageState::Failed).unwrap();
        assert_eq!(visited.state("https://ex.test/a"), Some(PageState::Failed));
        assert_eq!(visited.count(PageState::Failed), 1);
    }

    #[test]
    fn test_advance_rejects_illegal_transition() {
        let mut visited = VisitedSet::new();
        visited.insert("https://ex.test/a");
        let err = visited
            .advance("https://ex.test/a", PageState::Matched)
            .unwrap_err();
        assert!(matches!(
            err,
            CrawlError::InvalidTransition {
                from: PageState::Pending,
                to: PageState::Matched,
                ..
            }
        ));
    }

    #[test]
    fn test_advance_unknown_url() {
        let mut visited = VisitedSet::new();
        assert!(visited.advance("https://ex.test/x", PageState::Fetching).is_err());
        assert!(visited.is_empty());
        assert!(!visited.contains("https://ex.test/x"));
    }
}
