//! # Data Models
//!
//! Pure data types for the analysis lifecycle: the query text under edit,
//! the decoded classifier report, and the exclusive session state. Nothing
//! in this module touches the network or the terminal.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;

/// The raw URL text under analysis. Whatever the user typed is carried
/// verbatim; no trimming or normalization happens at this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    url: String,
}

impl Query {
    pub fn new() -> Self {
        Self { url: String::new() }
    }

    /// Replace the query text.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Current query text.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// True when the text is empty. Whitespace counts as content.
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }

    /// Clear the query text.
    pub fn clear(&mut self) {
        self.url.clear();
    }
}

/// Overall verdict of the classifier.
///
/// Known labels decode to their own members; anything else is carried
/// verbatim in `Other` so a service-side label change never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Verdict {
    Phishing,
    Legitimate,
    Other(String),
}

impl From<String> for Verdict {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Phishing" => Verdict::Phishing,
            "Legitimate" => Verdict::Legitimate,
            _ => Verdict::Other(label),
        }
    }
}

impl Verdict {
    /// Verdict text as the service spelled it.
    pub fn label(&self) -> &str {
        match self {
            Verdict::Phishing => "Phishing",
            Verdict::Legitimate => "Legitimate",
            Verdict::Other(label) => label,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Raw output of the ML model.
///
/// Some service versions return a text label here, others the numeric class
/// (0 or 1). Both decode; rendering shows whichever form arrived.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MlLabel {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for MlLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlLabel::Text(text) => write!(f, "{text}"),
            MlLabel::Number(number) => write!(f, "{number}"),
        }
    }
}

/// The feature collection the model consumed, kept as opaque JSON.
///
/// The service may send a keyed object or a plain array; entry order is
/// preserved either way so the rendered dump matches the wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(serde_json::Value);

impl FeatureVector {
    /// Number of features in the collection.
    pub fn len(&self) -> usize {
        match &self.0 {
            serde_json::Value::Array(entries) => entries.len(),
            serde_json::Value::Object(map) => map.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Multi-line JSON rendering of the collection.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Ok(Self(value)),
            other => Err(de::Error::custom(format!(
                "features_used must be an array or object, got {other}"
            ))),
        }
    }
}

/// Fully-decoded response of the classification service.
///
/// All four fields are required; a body missing any of them is a decode
/// failure, never a partial report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "final_prediction")]
    final_verdict: Verdict,
    #[serde(rename = "ml_prediction")]
    ml_label: MlLabel,
    ml_probability: f64,
    #[serde(rename = "features_used")]
    features: FeatureVector,
}

impl AnalysisReport {
    /// Overall verdict combining the model output with server-side rules.
    pub fn final_verdict(&self) -> &Verdict {
        &self.final_verdict
    }

    /// Raw model output, text or numeric.
    pub fn ml_label(&self) -> &MlLabel {
        &self.ml_label
    }

    /// Model confidence in the range 0.0 to 1.0.
    pub fn ml_probability(&self) -> f64 {
        self.ml_probability
    }

    /// Confidence as a percentage with two decimals, e.g. "93.00%".
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.ml_probability * 100.0)
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }
}

/// Lifecycle state of the analysis session. Exactly one member is active at
/// a time; entering `Loading` drops any previous report or failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No analysis has run since start or the last reset.
    Idle,
    /// A request is in flight.
    Loading,
    /// The newest request produced a report.
    Succeeded(AnalysisReport),
    /// The newest request failed; the payload is the user-facing reason.
    Failed(String),
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, SessionState::Succeeded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SessionState::Failed(_))
    }

    /// The report, when the state is `Succeeded`.
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            SessionState::Succeeded(report) => Some(report),
            _ => None,
        }
    }

    /// The failure reason, when the state is `Failed`.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            SessionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}
