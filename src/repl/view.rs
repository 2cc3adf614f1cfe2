//! # Report View
//!
//! Plain-text rendering of the session lifecycle onto an injected writer.
//! Pure presentation; every fact shown here comes from the models.

use anyhow::Result;
use std::io::Write;

use crate::repl::models::{AnalysisReport, SessionState};

/// Renders analysis output onto any `Write` implementation, stdout in
/// production and a byte buffer in tests.
pub struct ReportView<W: Write> {
    out: W,
    features_expanded: bool,
}

impl<W: Write> ReportView<W> {
    /// Create a view over the given writer. `features_expanded` controls
    /// whether the full feature collection is printed with each report.
    pub fn with_writer(out: W, features_expanded: bool) -> Self {
        Self {
            out,
            features_expanded,
        }
    }

    pub fn features_expanded(&self) -> bool {
        self.features_expanded
    }

    /// Flip the feature dump setting; returns the new value.
    pub fn toggle_features(&mut self) -> bool {
        self.features_expanded = !self.features_expanded;
        self.features_expanded
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Banner and key hints for the interactive prompt.
    pub fn render_banner(&mut self) -> Result<()> {
        writeln!(self.out, "phishline URL analyzer")?;
        writeln!(self.out, "Type a URL and press Enter to analyze it.")?;
        writeln!(
            self.out,
            "Commands: :q quit, :reset clear session, :features toggle feature dump, :profile show profile"
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Prompt for the next URL.
    pub fn render_prompt(&mut self) -> Result<()> {
        write!(self.out, "url> ")?;
        self.out.flush()?;
        Ok(())
    }

    /// Pending indicator shown as soon as an analysis starts.
    pub fn render_loading(&mut self) -> Result<()> {
        writeln!(self.out, "Running model analysis...")?;
        self.out.flush()?;
        Ok(())
    }

    /// Message for a submission rejected before reaching the network.
    pub fn render_validation_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Single-line failure reason replacing the result area.
    pub fn render_failure(&mut self, reason: &str) -> Result<()> {
        writeln!(self.out, "{reason}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Full verdict report. The feature collection is summarized as a count
    /// unless the dump is enabled.
    pub fn render_report(&mut self, report: &AnalysisReport) -> Result<()> {
        writeln!(self.out, "Final:      {}", report.final_verdict())?;
        writeln!(self.out, "ML output:  {}", report.ml_label())?;
        writeln!(self.out, "Confidence: {}", report.confidence_percent())?;

        let count = report.features().len();
        if self.features_expanded {
            writeln!(self.out, "Features ({count}):")?;
            writeln!(self.out, "{}", report.features().to_pretty_json())?;
        } else {
            writeln!(
                self.out,
                "Features: {count} (use --verbose or :features to show)"
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Render whatever the given state calls for; idle renders nothing.
    pub fn render_state(&mut self, state: &SessionState) -> Result<()> {
        match state {
            SessionState::Idle => Ok(()),
            SessionState::Loading => self.render_loading(),
            SessionState::Succeeded(report) => self.render_report(report),
            SessionState::Failed(reason) => self.render_failure(reason),
        }
    }

    /// One-line informational message (profile info, unknown commands).
    pub fn render_message(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Echo of the outgoing request, shown in verbose mode.
    pub fn render_request_echo(&mut self, endpoint: &str, url: &str) -> Result<()> {
        writeln!(self.out, "Request: GET {endpoint}?url={url}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> AnalysisReport {
        serde_json::from_value(json!({
            "final_prediction": "Phishing",
            "ml_prediction": "Phishing",
            "ml_probability": 0.93,
            "features_used": {"length": 57}
        }))
        .unwrap()
    }

    fn rendered(view: &ReportView<Vec<u8>>) -> String {
        String::from_utf8(view.writer().clone()).unwrap()
    }

    #[test]
    fn report_rendering_should_include_verdict_and_confidence() {
        let mut view = ReportView::with_writer(Vec::new(), false);
        view.render_report(&sample_report()).unwrap();

        let output = rendered(&view);
        assert!(output.contains("Final:      Phishing"));
        assert!(output.contains("ML output:  Phishing"));
        assert!(output.contains("Confidence: 93.00%"));
    }

    #[test]
    fn collapsed_view_should_only_count_features() {
        let mut view = ReportView::with_writer(Vec::new(), false);
        view.render_report(&sample_report()).unwrap();

        let output = rendered(&view);
        assert!(output.contains("Features: 1"));
        assert!(!output.contains("\"length\""));
    }

    #[test]
    fn expanded_view_should_dump_the_feature_collection() {
        let mut view = ReportView::with_writer(Vec::new(), true);
        view.render_report(&sample_report()).unwrap();

        let output = rendered(&view);
        assert!(output.contains("Features (1):"));
        assert!(output.contains("\"length\": 57"));
    }

    #[test]
    fn toggle_should_flip_the_feature_dump() {
        let mut view = ReportView::with_writer(Vec::new(), false);
        assert!(!view.features_expanded());
        assert!(view.toggle_features());
        assert!(!view.toggle_features());
    }

    #[test]
    fn state_rendering_should_cover_the_whole_lifecycle() {
        let mut view = ReportView::with_writer(Vec::new(), false);
        view.render_state(&SessionState::Idle).unwrap();
        assert!(rendered(&view).is_empty());

        view.render_state(&SessionState::Loading).unwrap();
        view.render_state(&SessionState::Failed("Backend not reachable.".to_string()))
            .unwrap();

        let output = rendered(&view);
        assert!(output.contains("Running model analysis..."));
        assert!(output.contains("Backend not reachable."));
    }
}
