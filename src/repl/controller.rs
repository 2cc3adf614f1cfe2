//! # Application Controller
//!
//! Orchestrates the components: loads the endpoint profile, owns the input
//! controller, session and view, and runs the event loop that keeps input
//! responsive while an analysis is in flight.

use anyhow::{bail, Result};
use std::collections::VecDeque;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::cmd_args::CommandLineArgs;
use crate::config;
use crate::profile::{EndpointProfile, IniProfileStore};
use crate::repl::input::InputController;
use crate::repl::models::SessionState;
use crate::repl::services::{AnalysisService, ClassifierClient};
use crate::repl::session::AnalysisSession;
use crate::repl::view::ReportView;

/// Source of input lines, abstracted so tests can inject scripted input.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    /// Next line without its terminator; `None` at end of input.
    async fn next_line(&mut self) -> Result<Option<String>>;
}

/// Production line source reading from stdin.
pub struct StdinLineSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinLineSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLineSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}

/// Pre-programmed line source for tests.
pub struct ScriptedLineSource {
    lines: VecDeque<String>,
}

impl ScriptedLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedLineSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Outcome of one select iteration in the interactive loop.
enum LoopEvent {
    Input(Option<String>),
    OutcomeApplied(bool),
}

/// The main application controller wiring input, session and view together.
///
/// With a URL argument it runs one analysis and exits; without one it runs
/// the interactive prompt until `:q` or end of input.
pub struct AppController<LS: LineSource, W: Write> {
    input: InputController,
    session: AnalysisSession,
    view: ReportView<W>,
    line_source: LS,
    profile: EndpointProfile,
    one_shot_url: Option<String>,
    verbose: bool,
    interactive: bool,
    should_quit: bool,
}

impl AppController<StdinLineSource, io::Stdout> {
    /// Create a controller wired to stdin and stdout.
    pub fn new(cmd_args: CommandLineArgs) -> Result<Self> {
        let interactive = atty::is(atty::Stream::Stdin);
        Self::with_io(cmd_args, StdinLineSource::new(), io::stdout(), interactive)
    }
}

impl<LS: LineSource, W: Write> AppController<LS, W> {
    /// Create a controller with injected I/O.
    ///
    /// `interactive` gates the banner and prompt; piped input stays clean.
    pub fn with_io(
        cmd_args: CommandLineArgs,
        line_source: LS,
        out: W,
        interactive: bool,
    ) -> Result<Self> {
        let profile = Self::load_profile(cmd_args.profile())?;
        let endpoint = match cmd_args.endpoint() {
            Some(endpoint) => {
                tracing::debug!("endpoint overridden from the command line: {endpoint}");
                endpoint.to_string()
            }
            None => profile.endpoint().to_string(),
        };

        let client = ClassifierClient::new(endpoint)?;
        let session = AnalysisSession::new(AnalysisService::new(client));
        let view = ReportView::with_writer(out, cmd_args.verbose());

        Ok(Self {
            input: InputController::new(),
            session,
            view,
            line_source,
            profile,
            one_shot_url: cmd_args.url().map(str::to_string),
            verbose: cmd_args.verbose(),
            interactive,
            should_quit: false,
        })
    }

    /// Load the endpoint profile, falling back to the built-in default when
    /// the file or section is missing.
    fn load_profile(profile_name: &str) -> Result<EndpointProfile> {
        let profile_path = config::get_profile_path();
        tracing::debug!("loading profile '{profile_name}' from '{profile_path}'");

        let store = IniProfileStore::new(&profile_path);
        match store.load_profile(profile_name)? {
            Some(profile) => {
                tracing::debug!("profile loaded, endpoint: {}", profile.endpoint());
                Ok(profile)
            }
            None => {
                tracing::debug!("profile '{profile_name}' not found, using the default endpoint");
                Ok(EndpointProfile::fallback(profile_name, profile_path))
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn view(&self) -> &ReportView<W> {
        &self.view
    }

    /// Run until completion (one-shot) or quit (interactive).
    pub async fn run(&mut self) -> Result<()> {
        match self.one_shot_url.take() {
            Some(url) => self.run_once(url).await,
            None => self.run_interactive().await,
        }
    }

    /// Analyze a single URL, render the outcome and report failure through
    /// the exit status.
    async fn run_once(&mut self, url: String) -> Result<()> {
        self.input.set_url(url);
        if !self.submit_current()? {
            bail!("no URL to analyze");
        }
        self.finish_pending().await?;

        if let SessionState::Failed(reason) = self.session.state() {
            bail!("{reason}");
        }
        Ok(())
    }

    /// Prompt loop. Input and in-flight outcomes are raced so a slow
    /// analysis never blocks typing.
    async fn run_interactive(&mut self) -> Result<()> {
        if self.interactive {
            self.view.render_banner()?;
        }

        while !self.should_quit {
            if self.interactive && !self.session.is_loading() {
                self.view.render_prompt()?;
            }

            let loading = self.session.is_loading();
            let event = tokio::select! {
                line = self.line_source.next_line() => LoopEvent::Input(line?),
                applied = self.session.wait_outcome(), if loading => {
                    LoopEvent::OutcomeApplied(applied)
                }
            };

            match event {
                LoopEvent::Input(Some(line)) => self.handle_line(&line)?,
                LoopEvent::Input(None) => {
                    // End of input; settled outcomes were already rendered,
                    // only an in-flight analysis still needs to drain.
                    if self.session.is_loading() {
                        self.finish_pending().await?;
                    }
                    break;
                }
                LoopEvent::OutcomeApplied(true) => self.render_outcome()?,
                LoopEvent::OutcomeApplied(false) => bail!("analysis outcome channel closed"),
            }
        }
        Ok(())
    }

    /// Process one line of user input: an ex-style command or a URL.
    fn handle_line(&mut self, line: &str) -> Result<()> {
        let trimmed = line.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            return self.handle_command(command);
        }

        // The line itself is the query, untrimmed.
        self.input.set_url(line);
        self.submit_current()?;
        Ok(())
    }

    /// Ex-style commands: `:q`, `:reset`, `:features`, `:profile`.
    fn handle_command(&mut self, command: &str) -> Result<()> {
        match command.trim() {
            "q" | "quit" => {
                self.should_quit = true;
            }
            "reset" => {
                self.session.reset();
                self.input.clear();
                self.view.render_message("Session reset.")?;
            }
            "features" => {
                let expanded = self.view.toggle_features();
                self.view.render_message(if expanded {
                    "Feature dump enabled."
                } else {
                    "Feature dump disabled."
                })?;
                if self.session.state().is_succeeded() {
                    self.render_outcome()?;
                }
            }
            "p" | "profile" => {
                let message = format!("[{}] in {}", self.profile.name(), self.profile.path());
                self.view.render_message(&message)?;
            }
            other => {
                self.view.render_message(&format!("Unknown command: :{other}"))?;
            }
        }
        Ok(())
    }

    /// Validate and dispatch the current query, rendering the pending
    /// indicator. Returns true when a request went out.
    fn submit_current(&mut self) -> Result<bool> {
        match self.input.submit(&mut self.session) {
            Ok(_seq) => {
                if self.verbose {
                    let endpoint = self.session.endpoint();
                    self.view.render_request_echo(&endpoint, self.input.url())?;
                }
                self.view.render_loading()?;
                Ok(true)
            }
            Err(error) => {
                tracing::debug!("submission rejected: {error}");
                self.view.render_validation_error(&error.to_string())?;
                Ok(false)
            }
        }
    }

    /// Wait out any in-flight analysis and render its settled state.
    async fn finish_pending(&mut self) -> Result<()> {
        while self.session.is_loading() {
            if !self.session.wait_outcome().await {
                bail!("analysis outcome channel closed");
            }
        }
        self.render_outcome()
    }

    /// Render the settled session state; never called while loading, and
    /// idle renders nothing.
    fn render_outcome(&mut self) -> Result<()> {
        self.view.render_state(self.session.state())
    }
}
