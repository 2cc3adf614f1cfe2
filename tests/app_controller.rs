//! Controller-level tests covering the one-shot flow, piped input and
//! endpoint resolution.

use anyhow::Result;
use serde_json::json;
use std::collections::VecDeque;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use phishline::cmd_args::CommandLineArgs;
use phishline::config;
use phishline::{AppController, LineSource, ScriptedLineSource};

async fn mock_classifier() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/predict-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "final_prediction": "Phishing",
            "ml_prediction": "Phishing",
            "ml_probability": 0.93,
            "features_used": {"length": 57}
        })))
        .mount(&server)
        .await;
    server
}

fn controller(
    argv: &[&str],
    lines: &[&str],
) -> AppController<ScriptedLineSource, Vec<u8>> {
    let mut full = vec!["phishline"];
    full.extend_from_slice(argv);
    let args = CommandLineArgs::parse_from(full);
    AppController::with_io(
        args,
        ScriptedLineSource::new(lines.iter().copied()),
        Vec::new(),
        false,
    )
    .expect("controller builds")
}

fn output<LS: LineSource>(app: &AppController<LS, Vec<u8>>) -> String {
    String::from_utf8(app.view().writer().clone()).unwrap()
}

/// Line source whose end of input lags behind the scripted lines.
struct TrailingEofSource {
    lines: VecDeque<String>,
    eof_delay: Duration,
}

impl LineSource for TrailingEofSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None => {
                tokio::time::sleep(self.eof_delay).await;
                Ok(None)
            }
        }
    }
}

#[tokio::test]
async fn one_shot_success_should_render_the_report() {
    let server = mock_classifier().await;
    let uri = server.uri();
    let mut app = controller(
        &["--endpoint", uri.as_str(), "https://suspicious.example/login"],
        &[],
    );

    app.run().await.expect("analysis succeeds");

    let rendered = output(&app);
    assert!(rendered.contains("Running model analysis..."));
    assert!(rendered.contains("Final:      Phishing"));
    assert!(rendered.contains("ML output:  Phishing"));
    assert!(rendered.contains("Confidence: 93.00%"));
    assert!(rendered.contains("Features: 1"));
    assert!(!rendered.contains("\"length\""));
}

#[tokio::test]
async fn one_shot_failure_should_report_through_the_exit_status() {
    let mut app = controller(
        &["--endpoint", "http://127.0.0.1:1", "https://example.com"],
        &[],
    );

    let error = app.run().await.expect_err("backend unreachable");
    assert!(error.to_string().contains("Backend not reachable."));
    assert!(output(&app).contains("Backend not reachable."));
}

#[tokio::test]
async fn verbose_one_shot_should_echo_request_and_dump_features() {
    let server = mock_classifier().await;
    let uri = server.uri();
    let mut app = controller(
        &[
            "--verbose",
            "--endpoint",
            uri.as_str(),
            "https://suspicious.example/login",
        ],
        &[],
    );

    app.run().await.expect("analysis succeeds");

    let rendered = output(&app);
    assert!(rendered.contains("Request: GET "));
    assert!(rendered.contains("/predict-url?url=https://suspicious.example/login"));
    assert!(rendered.contains("Features (1):"));
    assert!(rendered.contains("\"length\": 57"));
}

#[tokio::test]
async fn piped_url_should_settle_before_exit() {
    // End of input arrives while the analysis is still in flight; the
    // controller must wait it out and render the report.
    let server = mock_classifier().await;
    let uri = server.uri();
    let mut app = controller(
        &["--endpoint", uri.as_str()],
        &["https://suspicious.example/login"],
    );

    app.run().await.expect("interactive run");

    let rendered = output(&app);
    assert!(rendered.contains("Running model analysis..."));
    assert!(rendered.contains("Final:      Phishing"));
}

#[tokio::test]
async fn piped_failure_should_not_abort_the_run() {
    let mut app = controller(
        &["--endpoint", "http://127.0.0.1:1"],
        &["https://example.com", ":q"],
    );

    // Interactive failures never turn into a non-zero exit.
    app.run().await.expect("interactive runs keep going");
    assert!(output(&app).contains("Running model analysis..."));
}

#[tokio::test]
async fn late_end_of_input_should_render_the_report_exactly_once() {
    // The analysis settles and renders while the line source is still
    // open; the end of input afterwards must exit without another render.
    let server = mock_classifier().await;
    let uri = server.uri();
    let source = TrailingEofSource {
        lines: VecDeque::from(["https://suspicious.example/login".to_string()]),
        eof_delay: Duration::from_millis(500),
    };
    let args = CommandLineArgs::parse_from(["phishline", "--endpoint", uri.as_str()]);
    let mut app =
        AppController::with_io(args, source, Vec::new(), false).expect("controller builds");

    app.run().await.expect("interactive run");

    let rendered = output(&app);
    assert_eq!(rendered.matches("Final:").count(), 1);
    assert_eq!(rendered.matches("Confidence:").count(), 1);
}

#[tokio::test]
async fn endpoint_flag_should_win_over_the_profile_file() {
    let dir = tempfile::tempdir().unwrap();
    let profile_path = dir.path().join("profile");
    std::fs::write(
        &profile_path,
        "[default]\nendpoint = http://profile.internal:9000\n",
    )
    .unwrap();

    let original = std::env::var_os(config::PROFILE_PATH_ENV_VAR);
    std::env::set_var(config::PROFILE_PATH_ENV_VAR, &profile_path);

    let flagged = controller(&["--endpoint", "http://flagged.internal:7000"], &[]);
    let from_profile = controller(&[], &[]);

    match original {
        Some(val) => std::env::set_var(config::PROFILE_PATH_ENV_VAR, val),
        None => std::env::remove_var(config::PROFILE_PATH_ENV_VAR),
    }

    assert_eq!(
        flagged.session().endpoint(),
        "http://flagged.internal:7000/predict-url"
    );
    assert_eq!(
        from_profile.session().endpoint(),
        "http://profile.internal:9000/predict-url"
    );
}
