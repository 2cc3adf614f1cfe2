//! # Analysis Session
//!
//! View model owning the request lifecycle: the exclusive session state,
//! the request sequence, and the guarantee that a stale response never
//! overwrites the outcome of a newer request.

use crate::repl::models::SessionState;
use crate::repl::services::{AnalysisService, ClassifierOutcome, RequestSeq};

/// Tracks one analysis at a time from `run` to its settled outcome.
///
/// Each `run` issues a fresh sequence number. Outcomes carry the number of
/// the request that produced them; only the outcome matching the newest
/// issued number may change the state, so rapid resubmissions settle on the
/// last request no matter how the responses interleave.
pub struct AnalysisSession {
    service: AnalysisService,
    state: SessionState,
    /// Sequence number of the most recently issued request; 0 before any.
    issued_seq: RequestSeq,
}

impl AnalysisSession {
    pub fn new(service: AnalysisService) -> Self {
        Self {
            service,
            state: SessionState::Idle,
            issued_seq: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Full URL of the classification operation this session talks to.
    pub fn endpoint(&self) -> String {
        self.service.client().predict_url()
    }

    /// Issue a new analysis for `url`.
    ///
    /// The state moves to `Loading` before the request is dispatched,
    /// dropping any previous report or failure. A call made while another
    /// request is in flight supersedes it: the older outcome will be
    /// discarded on arrival.
    pub fn run(&mut self, url: &str) -> RequestSeq {
        self.issued_seq += 1;
        let seq = self.issued_seq;
        self.state = SessionState::Loading;
        tracing::debug!("analysis {seq} started for {url:?}");
        self.service.dispatch(seq, url.to_string());
        seq
    }

    /// Apply pending outcomes without blocking.
    ///
    /// Drains the outcome channel, discarding stale entries. Returns true
    /// when the state changed.
    pub fn poll_outcome(&mut self) -> bool {
        while let Some(outcome) = self.service.poll_outcome() {
            if self.apply(outcome) {
                return true;
            }
        }
        false
    }

    /// Wait for the outcome of the newest request and apply it.
    ///
    /// Stale outcomes are discarded along the way. Returns false only if
    /// the outcome channel closed. Safe to race against other futures in a
    /// select loop; no outcome is lost when the wait is abandoned between
    /// messages.
    pub async fn wait_outcome(&mut self) -> bool {
        loop {
            match self.service.recv_outcome().await {
                Some(outcome) => {
                    if self.apply(outcome) {
                        return true;
                    }
                }
                None => return false,
            }
        }
    }

    /// Return to `Idle`, dropping any result and invalidating every
    /// outstanding request.
    pub fn reset(&mut self) {
        // Burning a sequence number makes in-flight outcomes stale.
        self.issued_seq += 1;
        self.state = SessionState::Idle;
        tracing::debug!("session reset, outstanding requests invalidated");
    }

    fn apply(&mut self, outcome: ClassifierOutcome) -> bool {
        let seq = outcome.seq();
        if seq != self.issued_seq {
            tracing::debug!(
                "discarding stale outcome of analysis {seq}, newest is {}",
                self.issued_seq
            );
            return false;
        }

        self.state = match outcome {
            ClassifierOutcome::Success { report, .. } => {
                tracing::debug!("analysis {seq} succeeded: {}", report.final_verdict());
                SessionState::Succeeded(report)
            }
            ClassifierOutcome::Failure { error, .. } => {
                tracing::warn!("analysis {seq} failed: {error}");
                SessionState::Failed(error.user_message().to_string())
            }
        };
        true
    }
}
