//! Search overlay lifecycle
//!
//! A session exists from the moment a pull activates until the user submits
//! or cancels. What a search does with the query is the search
//! collaborator's concern; this controller only hands it over.

/// The open overlay's editable state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOverlaySession {
    query_text: String,
}

impl SearchOverlaySession {
    pub fn query(&self) -> &str {
        &self.query_text
    }
}

/// How a session ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Committed(String),
    Cancelled,
}

#[derive(Debug, Default)]
pub struct SearchOverlayController {
    session: Option<SearchOverlaySession>,
}

impl SearchOverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session with an empty query; false if one is already open
    pub fn open(&mut self) -> bool {
        if self.session.is_some() {
            return false;
        }
        tracing::debug!("search overlay opened");
        self.session = Some(SearchOverlaySession::default());
        true
    }

    pub fn session(&self) -> Option<&SearchOverlaySession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Replace the live query text; false without a session
    pub fn set_query(&mut self, text: impl Into<String>) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.query_text = text.into();
                true
            }
            None => false,
        }
    }

    /// Commit `query` and close the session
    pub fn submit(&mut self, query: impl Into<String>) -> Option<SearchOutcome> {
        self.session.take()?;
        let query = query.into();
        tracing::debug!("search submitted: {:?}", query);
        Some(SearchOutcome::Committed(query))
    }

    /// Commit the session's own query text and close it
    pub fn submit_current(&mut self) -> Option<SearchOutcome> {
        let session = self.session.take()?;
        Some(SearchOutcome::Committed(session.query_text))
    }

    /// Close the session without searching
    pub fn cancel(&mut self) -> Option<SearchOutcome> {
        self.session.take()?;
        tracing::debug!("search cancelled");
        Some(SearchOutcome::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut search = SearchOverlayController::new();
        assert!(!search.is_open());

        assert!(search.open());
        assert!(!search.open());
        assert_eq!(search.session().map(|s| s.query()), Some(""));

        assert!(search.set_query("lofi"));
        assert_eq!(search.session().unwrap().query(), "lofi");

        assert_eq!(
            search.submit("lofi beats"),
            Some(SearchOutcome::Committed("lofi beats".to_string()))
        );
        assert!(!search.is_open());
    }

    #[test]
    fn test_submit_current_uses_session_text() {
        let mut search = SearchOverlayController::new();
        search.open();
        search.set_query("cats");
        assert_eq!(
            search.submit_current(),
            Some(SearchOutcome::Committed("cats".to_string()))
        );
    }

    #[test]
    fn test_terminal_actions_without_session_are_noops() {
        let mut search = SearchOverlayController::new();
        assert!(!search.set_query("x"));
        assert_eq!(search.submit("x"), None);
        assert_eq!(search.submit_current(), None);
        assert_eq!(search.cancel(), None);

        search.open();
        assert_eq!(search.cancel(), Some(SearchOutcome::Cancelled));
        assert_eq!(search.cancel(), None);
    }
}
