//! # Classifier Service
//!
//! Wire client for the remote classification endpoint plus the async
//! dispatch layer. Requests run on spawned tasks; outcomes come back
//! through an internal channel so callers stay on their event loop.

use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::repl::models::AnalysisReport;

/// Path of the classification operation on the service.
pub const PREDICT_PATH: &str = "/predict-url";

/// Connection timeout for the classifier endpoint.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall per-request timeout. Model inference on a cold service can take
/// several seconds, so this stays generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffered outcome messages. One analysis is in flight at a time; the
/// slack only absorbs superseded stragglers.
const OUTCOME_CHANNEL_CAPACITY: usize = 8;

/// Monotonically increasing number identifying one issued analysis request.
pub type RequestSeq = u64;

/// Failure taxonomy for one classification attempt.
///
/// Every variant maps to the same stable user-facing message; the variants
/// exist so logs can tell transport, status and decode problems apart.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response status: {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed classifier response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Stable single-line message shown to the user for any failure.
    pub fn user_message(&self) -> &'static str {
        "Backend not reachable."
    }
}

/// Message type carrying the outcome of one dispatched analysis.
#[derive(Debug)]
pub enum ClassifierOutcome {
    Success {
        seq: RequestSeq,
        report: AnalysisReport,
    },
    Failure {
        seq: RequestSeq,
        error: AnalysisError,
    },
}

impl ClassifierOutcome {
    /// Sequence number of the request this outcome belongs to.
    pub fn seq(&self) -> RequestSeq {
        match self {
            ClassifierOutcome::Success { seq, .. } | ClassifierOutcome::Failure { seq, .. } => *seq,
        }
    }
}

/// HTTP client bound to one classifier base URL.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    http: reqwest::Client,
    base_url: String,
}

impl ClassifierClient {
    /// Create a client for the given base URL (scheme and host, no path).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the classification operation.
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }

    /// Submit one URL for classification and decode the report.
    ///
    /// The query value is percent-encoded by the request builder; the URL
    /// text itself is passed through untouched.
    pub async fn predict(&self, url: &str) -> Result<AnalysisReport, AnalysisError> {
        let response = self
            .http
            .get(self.predict_url())
            .query(&[("url", url)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status(status));
        }

        let body = response.text().await?;
        let report = serde_json::from_str::<AnalysisReport>(&body)?;
        Ok(report)
    }
}

/// Service owning the async execution of classification requests.
///
/// `dispatch` spawns a task per request; the task reports back through the
/// outcome channel tagged with the request's sequence number. The service
/// holds both channel ends, so the channel stays open for its lifetime.
#[derive(Debug)]
pub struct AnalysisService {
    client: ClassifierClient,
    outcome_tx: mpsc::Sender<ClassifierOutcome>,
    outcome_rx: mpsc::Receiver<ClassifierOutcome>,
}

impl AnalysisService {
    pub fn new(client: ClassifierClient) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        Self {
            client,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn client(&self) -> &ClassifierClient {
        &self.client
    }

    /// Execute one classification asynchronously.
    pub fn dispatch(&self, seq: RequestSeq, url: String) {
        let client = self.client.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = match client.predict(&url).await {
                Ok(report) => ClassifierOutcome::Success { seq, report },
                Err(error) => ClassifierOutcome::Failure { seq, error },
            };
            // Receiver may be gone during shutdown.
            let _ = outcome_tx.send(outcome).await;
        });
    }

    /// Check for a pending outcome without blocking.
    pub fn poll_outcome(&mut self) -> Option<ClassifierOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    /// Wait for the next outcome. `None` only when every sender is gone.
    pub async fn recv_outcome(&mut self) -> Option<ClassifierOutcome> {
        self.outcome_rx.recv().await
    }

    #[cfg(test)]
    pub(crate) async fn push_outcome(&self, outcome: ClassifierOutcome) {
        self.outcome_tx
            .send(outcome)
            .await
            .expect("outcome channel open");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_should_build_predict_url_without_double_slash() {
        let client = ClassifierClient::new("http://localhost:9000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(client.predict_url(), "http://localhost:9000/predict-url");
    }

    #[test]
    fn every_error_variant_should_share_the_user_message() {
        let status = AnalysisError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let decode =
            AnalysisError::Decode(serde_json::from_str::<AnalysisReport>("not json").unwrap_err());
        assert_eq!(status.user_message(), "Backend not reachable.");
        assert_eq!(decode.user_message(), "Backend not reachable.");
    }

    #[test]
    fn error_display_should_distinguish_variants() {
        let status = AnalysisError::Status(reqwest::StatusCode::BAD_GATEWAY);
        let decode =
            AnalysisError::Decode(serde_json::from_str::<AnalysisReport>("{}").unwrap_err());
        assert!(status.to_string().contains("status"));
        assert!(decode.to_string().contains("malformed"));
    }

    #[tokio::test]
    async fn dispatch_should_deliver_outcomes_through_the_channel() {
        // Nothing listens on port 1, so the request fails fast with a
        // transport error carrying the dispatched sequence number.
        let client = ClassifierClient::new("http://127.0.0.1:1").unwrap();
        let mut service = AnalysisService::new(client);

        service.dispatch(7, "https://example.com".to_string());

        let outcome = service.recv_outcome().await.expect("channel open");
        assert_eq!(outcome.seq(), 7);
        match outcome {
            ClassifierOutcome::Failure { error, .. } => {
                assert!(matches!(error, AnalysisError::Transport(_)));
            }
            ClassifierOutcome::Success { .. } => panic!("request cannot succeed"),
        }
    }

    #[tokio::test]
    async fn poll_outcome_should_return_none_when_nothing_arrived() {
        let client = ClassifierClient::new("http://127.0.0.1:1").unwrap();
        let mut service = AnalysisService::new(client);
        assert!(service.poll_outcome().is_none());
    }
}
