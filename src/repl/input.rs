//! # Input Controller
//!
//! Holds the raw URL text and guards submission: an empty query never
//! reaches the network, everything else goes straight to the session.

use crate::repl::models::Query;
use crate::repl::services::RequestSeq;
use crate::repl::session::AnalysisSession;

/// Rejection raised by `submit` before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a URL.")]
    EmptyUrl,
}

/// Guarded trigger sitting in front of the analysis session.
#[derive(Debug, Default)]
pub struct InputController {
    query: Query,
}

impl InputController {
    pub fn new() -> Self {
        Self {
            query: Query::new(),
        }
    }

    /// Replace the query text. No validation happens here.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.query.set_url(url);
    }

    /// Current query text, preserved across failed analyses so a retry
    /// needs no retyping.
    pub fn url(&self) -> &str {
        self.query.url()
    }

    /// Clear the query text.
    pub fn clear(&mut self) {
        self.query.clear();
    }

    /// Validate the query and trigger an analysis.
    ///
    /// An empty query fails with `ValidationError` and leaves the session
    /// untouched. The check applies no trimming, so whitespace submits.
    pub fn submit(&mut self, session: &mut AnalysisSession) -> Result<RequestSeq, ValidationError> {
        if self.query.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        Ok(session.run(self.query.url()))
    }
}
