//! Terminal Session State Machine
//!
//! Owns everything the terminal shows and reacts to key presses. The session
//! never awaits: work that needs I/O (portfolio refresh, quote fetch, resume
//! download, exit confirmation) is handed back to the caller as a
//! [`SessionTask`] and finished with [`TerminalSession::complete_task`].

use std::path::PathBuf;

use chrono::Local;
use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::SharedClock;
use crate::error::FolioError;
use crate::portfolio::DataStore;

use super::commands::{CliCommand, CommandRegistry, ResolvedCommand};
use super::config::{CliConfig, TerminalTheme};
use super::easter_eggs::{
    classify, glitch_frames, konami_key_name, not_found_message, random_fortune,
    Classification, KonamiTracker, ASCII_LOGO, KONAMI_REWARD,
};
use super::handlers::{self, OutputLine};
use super::history::CommandHistory;
use super::output::{LineKind, LinkRewriter, OutputRenderer, TerminalLine};
use super::pager::{PageView, Pager, PagerStep};
use super::typing_test::{local_quotes, pick_quote, ActiveTest};

/// What the terminal is doing, as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Normal,
    /// Output is still being revealed
    Animating,
    Paging,
    TypingTest,
}

/// I/O the driver must perform on behalf of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTask {
    Refresh,
    FetchQuotes { url: String },
    DownloadResume { url: String },
    ConfirmExit,
}

/// Result of a [`SessionTask`]
#[derive(Debug)]
pub enum TaskOutcome {
    Refreshed(Result<(), FolioError>),
    Quotes(Vec<String>),
    ResumeDownloaded(Result<PathBuf, FolioError>),
    ExitConfirmed(bool),
    /// The terminal could not ask for confirmation
    ExitUnavailable(String),
}

#[derive(Debug)]
enum ModeState {
    Normal,
    Paging(Pager),
    TypingTest(ActiveTest),
}

pub struct TerminalSession {
    config: CliConfig,
    registry: CommandRegistry,
    history: CommandHistory,
    renderer: OutputRenderer,
    rewriter: LinkRewriter,
    input: String,
    mode: ModeState,
    matrix: bool,
    retro: bool,
    konami: KonamiTracker,
    store: DataStore,
    clock: SharedClock,
    rng: StdRng,
    should_exit: bool,
}

impl TerminalSession {
    pub fn new(config: CliConfig, store: DataStore, clock: SharedClock) -> Self {
        Self::with_rng(config, store, clock, StdRng::from_entropy())
    }

    /// Session with a fixed random source (fortunes, glitch frames, quotes)
    pub fn with_seed(config: CliConfig, store: DataStore, clock: SharedClock, seed: u64) -> Self {
        Self::with_rng(config, store, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CliConfig, store: DataStore, clock: SharedClock, rng: StdRng) -> Self {
        Self {
            registry: CommandRegistry::new(),
            history: CommandHistory::new(config.max_history_size),
            renderer: OutputRenderer::new(config.animate_output, config.glitch_frame_ticks()),
            rewriter: LinkRewriter::new(config.template_dir.clone()),
            konami: KonamiTracker::new(config.konami_sequence.clone()),
            input: String::new(),
            mode: ModeState::Normal,
            matrix: false,
            retro: false,
            store,
            clock,
            rng,
            should_exit: false,
            config,
        }
    }

    /// Banner shown when the terminal opens
    pub fn welcome(&mut self) {
        let name = self
            .store
            .document()
            .and_then(|doc| doc.personal_info.name.clone())
            .unwrap_or_else(|| self.config.user.name.clone());

        self.renderer.begin_batch();
        self.renderer.push(LineKind::Response, ASCII_LOGO.trim_start_matches('\n'));
        self.renderer.push(
            LineKind::Info,
            format!("Terminal Portfolio - {}", self.config.site_title),
        );
        self.renderer.push(
            LineKind::Response,
            format!(
                "Welcome to {}'s terminal portfolio. Type 'help' to see available commands.",
                name
            ),
        );
        self.renderer.push(
            LineKind::Info,
            format!("Current date: {}", Local::now().format("%A, %B %-d, %Y")),
        );
        if let Some(updated) = handlers::last_updated(self.store.document()) {
            self.renderer
                .push(LineKind::Info, format!("Portfolio last updated: {}", updated));
        }
    }

    pub fn mode(&self) -> SessionMode {
        match self.mode {
            ModeState::Paging(_) => SessionMode::Paging,
            ModeState::TypingTest(_) => SessionMode::TypingTest,
            ModeState::Normal if self.renderer.is_animating() => SessionMode::Animating,
            ModeState::Normal => SessionMode::Normal,
        }
    }

    /// Advance the reveal animation by one step; true when a redraw is due
    pub fn tick(&mut self) -> bool {
        self.renderer.tick()
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Option<SessionTask> {
        self.track_konami(code);

        if let ModeState::Paging(pager) = &mut self.mode {
            let step = match code {
                KeyCode::Char(' ') => pager.page_down(),
                KeyCode::Enter => pager.line_down(),
                KeyCode::Char('q') | KeyCode::Char('Q') => pager.quit(),
                _ => return None,
            };
            if step == PagerStep::Closed {
                self.close_pager();
            }
            return None;
        }

        if code == KeyCode::Enter && self.renderer.is_animating() {
            log::debug!("Fast-forwarding output");
            self.renderer.fast_forward();
            return None;
        }

        let typing = matches!(self.mode, ModeState::TypingTest(_));
        match code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.input.clear(),
            KeyCode::Enter => return self.submit(),
            KeyCode::Up if !typing => {
                if let Some(cmd) = self.history.previous() {
                    self.input = cmd;
                }
            }
            KeyCode::Down if !typing => {
                let navigating = self.history.is_navigating();
                match self.history.next() {
                    Some(cmd) => self.input = cmd,
                    None if navigating => self.input.clear(),
                    None => {}
                }
            }
            KeyCode::Tab if !typing => self.complete_input(),
            _ => {}
        }
        None
    }

    fn track_konami(&mut self, code: KeyCode) {
        let Some(name) = konami_key_name(code) else {
            return;
        };
        if self.konami.record(&name) {
            self.retro = !self.retro;
            log::info!("Konami code entered, retro mode {}", self.retro);
            self.emit(vec![OutputLine::success(KONAMI_REWARD)]);
        }
    }

    fn complete_input(&mut self) {
        let matches = self.registry.completions(&self.input);
        match matches.len() {
            0 => {}
            1 => self.input = matches[0].clone(),
            _ => {
                self.renderer.begin_batch();
                self.renderer
                    .push(LineKind::Command, format!("> {}", self.input));
                self.emit(vec![OutputLine::response(format!(
                    "Possible commands: {}",
                    matches.join(", ")
                ))]);
            }
        }
    }

    /// Submit the input buffer
    pub fn submit(&mut self) -> Option<SessionTask> {
        let line = std::mem::take(&mut self.input);
        self.history.reset_navigation();

        // Whatever is submitted during a typing test is the transcription, even nothing.
        if let ModeState::TypingTest(test) = std::mem::replace(&mut self.mode, ModeState::Normal) {
            self.renderer.begin_batch();
            self.renderer.push(LineKind::Command, format!("> {}", line));
            let elapsed = self.clock.since(test.started);
            let result = test.score(&line, elapsed);
            log::info!("Typing test finished: {} wpm, {}% accuracy", result.wpm, result.accuracy);
            self.emit(vec![OutputLine::success(result.report())]);
            return None;
        }

        if line.trim().is_empty() {
            return None;
        }

        self.renderer.begin_batch();
        self.renderer.push(LineKind::Command, format!("> {}", line));

        match self.registry.resolve(&line) {
            Some(resolved) => {
                let command = resolved.command;
                let task = self.run_command(resolved);
                if command != CliCommand::ClearHistory {
                    self.history.add_command(&line);
                }
                task
            }
            None => {
                self.answer_unresolved(&line);
                self.history.add_command(&line);
                None
            }
        }
    }

    fn answer_unresolved(&mut self, line: &str) {
        let token = line
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let valid = self.registry.canonical_names();

        match classify(&token, &valid) {
            Classification::Literal(text) => self.emit(vec![OutputLine::response(text)]),
            Classification::Typo => {
                log::debug!("Treating '{}' as a typo", token);
                let frames = glitch_frames(&token, &mut self.rng);
                self.renderer.push_glitch(frames);
            }
            Classification::Unknown => {
                self.emit(vec![OutputLine::error(not_found_message(&token))]);
            }
        }
    }

    fn run_command(&mut self, resolved: ResolvedCommand) -> Option<SessionTask> {
        log::debug!("Running {} {:?}", resolved.command, resolved.args);
        let doc = self.store.document();

        let lines = match resolved.command {
            CliCommand::Help => vec![OutputLine::response(self.registry.help_text())],
            CliCommand::Clear => {
                self.renderer.clear();
                Vec::new()
            }
            CliCommand::About => handlers::about(doc),
            CliCommand::Projects => handlers::projects(doc),
            CliCommand::Skills => handlers::skills(doc),
            CliCommand::Experience => handlers::experience(doc),
            CliCommand::Education => handlers::education(doc),
            CliCommand::Contact => handlers::contact(doc),
            CliCommand::Social => handlers::social(doc),
            CliCommand::Github => handlers::github(doc),
            CliCommand::Matrix => {
                self.matrix = !self.matrix;
                vec![OutputLine::response(if self.matrix {
                    "Matrix effect enabled. May the force be with you."
                } else {
                    "Matrix effect disabled."
                })]
            }
            CliCommand::Download => return self.download(&resolved),
            CliCommand::Reload => {
                self.emit(vec![OutputLine::response("Reloading portfolio data with AI...")]);
                return Some(SessionTask::Refresh);
            }
            CliCommand::Ascii => vec![OutputLine::response(ASCII_LOGO.trim_start_matches('\n'))],
            CliCommand::Exit => return Some(SessionTask::ConfirmExit),
            CliCommand::Fortune => vec![OutputLine::response(random_fortune(&mut self.rng))],
            CliCommand::TypingTest => {
                if let Some(url) = self.config.quote_endpoint.clone() {
                    return Some(SessionTask::FetchQuotes { url });
                }
                self.start_typing_test(local_quotes());
                Vec::new()
            }
            CliCommand::Theme => self.theme(resolved.args.first().map(String::as_str)),
            CliCommand::History => {
                let text = self.history.listing(resolved.args.first().map(String::as_str));
                if self.history.is_empty() {
                    vec![OutputLine::info(text)]
                } else {
                    vec![OutputLine::response(text)]
                }
            }
            CliCommand::ClearHistory => {
                self.history.clear();
                vec![OutputLine::success("Command history cleared.")]
            }
        };

        self.emit(lines);
        None
    }

    fn theme(&mut self, requested: Option<&str>) -> Vec<OutputLine> {
        let Some(requested) = requested else {
            let current = self.config.theme().key;
            let list: Vec<String> = TerminalTheme::all()
                .iter()
                .map(|theme| {
                    let marker = if theme.key == current { " (current)" } else { "" };
                    format!("{}: {}{}", theme.key, theme.name, marker)
                })
                .collect();
            return vec![OutputLine::response(format!(
                "Available themes:\n{}\n\nUsage: theme <name>",
                list.join("\n")
            ))];
        };

        if self.config.apply_theme(requested) {
            log::info!("Theme changed to {}", requested);
            vec![OutputLine::success(format!(
                "Theme set to {}.",
                self.config.theme().name
            ))]
        } else {
            vec![OutputLine::error(format!(
                "Unknown theme: {}. Type 'theme' to see available options.",
                requested
            ))]
        }
    }

    fn download(&mut self, resolved: &ResolvedCommand) -> Option<SessionTask> {
        let portfolio = resolved.args.is_empty() || resolved.has_flag("-p");
        let resume = resolved.has_flag("-r");

        if !portfolio && !resume {
            self.emit(vec![OutputLine::error(
                "Invalid download flag. Use \"download -p\" for portfolio or \"download -r\" for resume.",
            )]);
            return None;
        }

        if portfolio {
            let lines = match self.store.export_to(&self.config.download_dir) {
                Ok(path) => vec![
                    OutputLine::success("Downloading portfolio.json file..."),
                    OutputLine::response(
                        "After downloading, place the file in the data/ folder to use your custom portfolio data.",
                    ),
                    OutputLine::info(format!("Saved to {}", path.display())),
                ],
                Err(FolioError::NoDocument) => {
                    vec![OutputLine::error("No portfolio data available to download.")]
                }
                Err(e) => {
                    log::warn!("Portfolio export failed: {}", e);
                    vec![OutputLine::error(format!("Failed to download portfolio data: {}", e))]
                }
            };
            self.emit(lines);
        }

        if resume {
            let url = self
                .store
                .document()
                .and_then(|doc| doc.resume_url.clone())
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| self.config.resume_url.clone());
            self.emit(vec![OutputLine::success(format!(
                "Downloading resume from {}...",
                url
            ))]);
            return Some(SessionTask::DownloadResume { url });
        }
        None
    }

    fn start_typing_test(&mut self, quotes: Vec<String>) {
        let quote = pick_quote(&quotes, &mut self.rng);
        let test = ActiveTest::new(quote, self.clock.now());
        log::info!("Typing test started");
        self.emit(vec![OutputLine::info(test.prompt())]);
        self.mode = ModeState::TypingTest(test);
    }

    /// Feed back the result of a task returned by `handle_key`
    pub fn complete_task(&mut self, outcome: TaskOutcome) {
        let lines = match outcome {
            TaskOutcome::Refreshed(Ok(())) => {
                vec![OutputLine::success("Portfolio data successfully reloaded!")]
            }
            TaskOutcome::Refreshed(Err(e)) => {
                log::warn!("Portfolio refresh failed: {}", e);
                vec![OutputLine::error(format!("Error reloading data: {}", e))]
            }
            TaskOutcome::Quotes(quotes) => {
                if matches!(self.mode, ModeState::Normal) {
                    self.start_typing_test(quotes);
                }
                Vec::new()
            }
            TaskOutcome::ResumeDownloaded(Ok(path)) => {
                vec![OutputLine::info(format!("Resume saved to {}", path.display()))]
            }
            TaskOutcome::ResumeDownloaded(Err(e)) => {
                log::warn!("Resume download failed: {}", e);
                vec![OutputLine::error(format!("Failed to download resume: {}", e))]
            }
            TaskOutcome::ExitConfirmed(true) => {
                self.should_exit = true;
                Vec::new()
            }
            TaskOutcome::ExitConfirmed(false) => vec![OutputLine::info(
                "Exit canceled. You can continue using the terminal.",
            )],
            TaskOutcome::ExitUnavailable(reason) => {
                log::warn!("Exit confirmation unavailable: {}", reason);
                vec![OutputLine::info(
                    "Unable to close the terminal automatically. Press Ctrl+C to exit.",
                )]
            }
        };
        self.emit(lines);
    }

    /// Send command output to the renderer, diverting long responses to the pager
    fn emit(&mut self, lines: Vec<OutputLine>) {
        for line in lines {
            if let ModeState::Paging(pager) = &mut self.mode {
                pager.park(TerminalLine::done(line.kind, line.text));
                continue;
            }

            let line_count = line.text.lines().count();
            if line.kind == LineKind::Response && line_count > self.config.page_size {
                self.open_pager(line.text);
            } else {
                self.renderer.push(line.kind, line.text);
            }
        }
    }

    fn open_pager(&mut self, text: String) {
        log::debug!("Paging {} lines", text.lines().count());
        self.renderer.push(LineKind::Info, "--- Entering pager mode ---");
        let saved = self.renderer.take_lines();
        let lines = text.lines().map(str::to_string).collect();
        let pager = Pager::new(lines, self.config.page_size).with_saved(saved);
        self.mode = ModeState::Paging(pager);
    }

    fn close_pager(&mut self) {
        if let ModeState::Paging(pager) = std::mem::replace(&mut self.mode, ModeState::Normal) {
            let (saved, shown) = pager.close();
            self.renderer.replace_lines(saved);
            self.renderer.begin_batch();
            self.renderer.fast_forward();
            self.renderer.push(LineKind::Response, shown);
            self.renderer.push(LineKind::Info, "--- Pager closed ---");
        }
    }

    pub fn lines(&self) -> &[TerminalLine] {
        self.renderer.lines()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn page_view(&self) -> Option<PageView> {
        match &self.mode {
            ModeState::Paging(pager) => Some(pager.view()),
            _ => None,
        }
    }

    pub fn typing_quote(&self) -> Option<&str> {
        match &self.mode {
            ModeState::TypingTest(test) => Some(&test.quote),
            _ => None,
        }
    }

    pub fn theme_colors(&self) -> &'static TerminalTheme {
        self.config.theme()
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn rewriter(&self) -> &LinkRewriter {
        &self.rewriter
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DataStore {
        &mut self.store
    }

    pub fn is_matrix(&self) -> bool {
        self.matrix
    }

    pub fn is_retro(&self) -> bool {
        self.retro
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Finish all pending output immediately
    pub fn fast_forward(&mut self) {
        self.renderer.fast_forward();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::portfolio::PortfolioDocument;
    use std::sync::Arc;
    use std::time::Duration;

    fn session_with(config: CliConfig, doc: Option<PortfolioDocument>) -> (TerminalSession, Arc<ManualClock>) {
        let clock = ManualClock::shared();
        let session = TerminalSession::with_seed(config, DataStore::in_memory(doc), clock.clone(), 11);
        (session, clock)
    }

    fn session() -> TerminalSession {
        let config = CliConfig {
            animate_output: false,
            quote_endpoint: None,
            ..CliConfig::default()
        };
        session_with(config, Some(PortfolioDocument::default())).0
    }

    fn type_line(session: &mut TerminalSession, line: &str) -> Option<SessionTask> {
        for c in line.chars() {
            session.handle_key(KeyCode::Char(c));
        }
        session.handle_key(KeyCode::Enter)
    }

    fn texts(session: &TerminalSession) -> Vec<String> {
        session.lines().iter().map(|l| l.full_text().to_string()).collect()
    }

    #[test]
    fn test_command_echo_and_response() {
        let mut s = session();
        type_line(&mut s, "matrix");
        assert_eq!(
            texts(&s),
            vec!["> matrix", "Matrix effect enabled. May the force be with you."]
        );
        assert!(s.is_matrix());
        assert_eq!(s.mode(), SessionMode::Normal);
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let mut s = session();
        type_line(&mut s, "   ");
        assert!(s.lines().is_empty());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_history_recall() {
        let mut s = session();
        type_line(&mut s, "about");
        type_line(&mut s, "projects");

        s.handle_key(KeyCode::Up);
        s.handle_key(KeyCode::Up);
        s.handle_key(KeyCode::Down);
        assert_eq!(s.input(), "projects");

        s.handle_key(KeyCode::Down);
        assert_eq!(s.input(), "");
    }

    #[test]
    fn test_unknown_and_typo_and_literal() {
        let mut s = session();
        type_line(&mut s, "xyzxyz");
        assert_eq!(
            texts(&s).last().unwrap(),
            "Command not found: xyzxyz. Type 'help' to see available commands."
        );

        type_line(&mut s, "hepl");
        let last = s.lines().last().unwrap();
        assert_eq!(last.kind(), LineKind::Error);
        assert_eq!(
            last.full_text(),
            "Command not found: hepl. Type 'help' to see available commands."
        );

        type_line(&mut s, "42");
        assert_eq!(
            texts(&s).last().unwrap(),
            "The Answer to the Ultimate Question of Life, the Universe, and Everything."
        );
    }

    #[test]
    fn test_fast_forward_while_animating() {
        let config = CliConfig {
            quote_endpoint: None,
            ..CliConfig::default()
        };
        let (mut s, _) = session_with(config, Some(PortfolioDocument::default()));
        type_line(&mut s, "fortune");
        assert_eq!(s.mode(), SessionMode::Animating);
        s.tick();

        s.handle_key(KeyCode::Enter);
        assert_eq!(s.mode(), SessionMode::Normal);
        let last = s.lines().last().unwrap();
        assert_eq!(last.visible_text(), last.full_text());
    }

    #[test]
    fn test_glitch_animation_runs_on_ticks() {
        let config = CliConfig {
            quote_endpoint: None,
            ..CliConfig::default()
        };
        let (mut s, _) = session_with(config, None);
        type_line(&mut s, "skils");
        assert!(s.lines().last().unwrap().is_glitch());
        assert_eq!(s.lines().last().unwrap().full_text(), "Command not found: skils");

        let mut ticks = 0;
        while s.mode() == SessionMode::Animating {
            s.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 7 * 7);
        assert_eq!(
            s.lines().last().unwrap().full_text(),
            "Command not found: skils. Type 'help' to see available commands."
        );
    }

    #[test]
    fn test_tab_completion() {
        let mut s = session();
        s.set_input("proje");
        s.handle_key(KeyCode::Tab);
        assert_eq!(s.input(), "projects");

        s.set_input("ty");
        s.handle_key(KeyCode::Tab);
        assert_eq!(s.input(), "ty");
        assert_eq!(
            texts(&s),
            vec!["> ty", "Possible commands: type, typingtest"]
        );

        s.set_input("zz");
        s.handle_key(KeyCode::Tab);
        assert_eq!(s.input(), "zz");
    }

    #[test]
    fn test_typing_test_scoring() {
        let config = CliConfig {
            animate_output: false,
            quote_endpoint: None,
            ..CliConfig::default()
        };
        let (mut s, clock) = session_with(config, None);
        assert_eq!(type_line(&mut s, "typingtest"), None);
        assert_eq!(s.mode(), SessionMode::TypingTest);

        let quote = s.typing_quote().unwrap().to_string();
        clock.advance(Duration::from_secs(60));
        type_line(&mut s, &quote);

        assert_eq!(s.mode(), SessionMode::Normal);
        let words = quote.split_whitespace().count();
        let report = texts(&s).last().unwrap().clone();
        assert_eq!(
            report,
            format!("Typing test results:\nWPM: {}\nAccuracy: 100%\nTime: 60.00 seconds", words)
        );
        // The transcription is not a command.
        assert_eq!(s.history().get_chronological(), vec!["typingtest"]);
    }

    #[test]
    fn test_typing_test_scores_empty_submission() {
        let config = CliConfig {
            animate_output: false,
            quote_endpoint: None,
            ..CliConfig::default()
        };
        let (mut s, clock) = session_with(config, None);
        type_line(&mut s, "typingtest");
        assert_eq!(s.mode(), SessionMode::TypingTest);

        clock.advance(Duration::from_secs(6));
        s.handle_key(KeyCode::Enter);

        assert_eq!(s.mode(), SessionMode::Normal);
        let report = texts(&s).last().unwrap().clone();
        assert!(report.starts_with("Typing test results:\n"));
        assert!(report.contains("Accuracy: 0%"));
        assert!(report.ends_with("Time: 6.00 seconds"));
    }

    #[test]
    fn test_typing_test_with_endpoint_requests_quotes() {
        let (mut s, _) = session_with(CliConfig::default(), None);
        let task = type_line(&mut s, "type");
        assert_eq!(
            task,
            Some(SessionTask::FetchQuotes {
                url: "https://type.fit/api/quotes".to_string()
            })
        );
        s.complete_task(TaskOutcome::Quotes(vec!["only quote here".to_string()]));
        assert_eq!(s.typing_quote(), Some("only quote here"));
    }

    #[test]
    fn test_pager_flow() {
        let mut s = session();
        type_line(&mut s, "help");
        assert_eq!(s.mode(), SessionMode::Paging);
        assert_eq!(s.lines().len(), 0);

        let view = s.page_view().unwrap();
        assert_eq!(view.lines.len(), 20);
        assert!(view.status.starts_with("--- page 1/"));

        // Ordinary typing is suppressed while paging.
        s.handle_key(KeyCode::Char('x'));
        assert_eq!(s.input(), "");

        s.handle_key(KeyCode::Enter);
        assert!(s.page_view().unwrap().status.contains("(lines 2-21 of"));

        s.handle_key(KeyCode::Char('q'));
        assert_eq!(s.mode(), SessionMode::Normal);
        let all = texts(&s);
        assert_eq!(all[0], "> help");
        assert_eq!(all[1], "--- Entering pager mode ---");
        assert_eq!(all[2].lines().count(), 21);
        assert_eq!(all.last().unwrap(), "--- Pager closed ---");
    }

    #[test]
    fn test_theme_command() {
        let mut s = session();
        type_line(&mut s, "theme");
        assert!(texts(&s).last().unwrap().contains("classic: Classic Green (current)"));

        type_line(&mut s, "theme midnight");
        assert_eq!(texts(&s).last().unwrap(), "Theme set to Midnight Blue.");
        assert_eq!(s.theme_colors().key, "midnight");

        type_line(&mut s, "theme neon");
        assert_eq!(
            texts(&s).last().unwrap(),
            "Unknown theme: neon. Type 'theme' to see available options."
        );
    }

    #[test]
    fn test_history_commands() {
        let mut s = session();
        type_line(&mut s, "history");
        assert_eq!(texts(&s).last().unwrap(), "No command history available.");

        type_line(&mut s, "about");
        type_line(&mut s, "history");
        assert_eq!(
            texts(&s).last().unwrap(),
            "Command history:\n1. history\n2. about"
        );

        type_line(&mut s, "clear-history");
        assert_eq!(texts(&s).last().unwrap(), "Command history cleared.");
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut s = session();
        type_line(&mut s, "about");
        type_line(&mut s, "cls");
        assert!(s.lines().is_empty());
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_missing_document_degrades() {
        let config = CliConfig {
            animate_output: false,
            ..CliConfig::default()
        };
        let (mut s, _) = session_with(config, None);
        type_line(&mut s, "projects");
        assert_eq!(texts(&s).last().unwrap(), handlers::NO_DOCUMENT);

        type_line(&mut s, "dlp");
        assert_eq!(
            texts(&s).last().unwrap(),
            "No portfolio data available to download."
        );
    }

    #[test]
    fn test_download_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            animate_output: false,
            download_dir: dir.path().to_path_buf(),
            resume_url: "https://example.com/cv.pdf".to_string(),
            ..CliConfig::default()
        };
        let (mut s, _) = session_with(config, Some(PortfolioDocument::default()));

        assert_eq!(type_line(&mut s, "download"), None);
        assert!(dir.path().join("portfolio.json").exists());

        let task = type_line(&mut s, "dlr");
        assert_eq!(
            task,
            Some(SessionTask::DownloadResume {
                url: "https://example.com/cv.pdf".to_string()
            })
        );

        type_line(&mut s, "download -x");
        assert!(texts(&s).last().unwrap().starts_with("Invalid download flag."));
    }

    #[test]
    fn test_reload_reports_outcome() {
        let mut s = session();
        assert_eq!(type_line(&mut s, "reload"), Some(SessionTask::Refresh));
        assert_eq!(texts(&s).last().unwrap(), "Reloading portfolio data with AI...");

        s.complete_task(TaskOutcome::Refreshed(Err(FolioError::Api { status: 500 })));
        let last = s.lines().last().unwrap();
        assert_eq!(last.kind(), LineKind::Error);
        assert_eq!(
            last.full_text(),
            "Error reloading data: API request failed with status 500"
        );

        s.complete_task(TaskOutcome::Refreshed(Ok(())));
        assert_eq!(texts(&s).last().unwrap(), "Portfolio data successfully reloaded!");
    }

    #[test]
    fn test_exit_flow() {
        let mut s = session();
        assert_eq!(type_line(&mut s, "q"), Some(SessionTask::ConfirmExit));
        s.complete_task(TaskOutcome::ExitConfirmed(false));
        assert!(!s.should_exit());

        s.complete_task(TaskOutcome::ExitUnavailable("not a tty".into()));
        assert!(texts(&s).last().unwrap().contains("Ctrl+C"));

        type_line(&mut s, "exit");
        s.complete_task(TaskOutcome::ExitConfirmed(true));
        assert!(s.should_exit());
    }

    #[test]
    fn test_konami_toggles_retro() {
        let mut s = session();
        let keys = [
            KeyCode::Up,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Char('b'),
            KeyCode::Char('a'),
        ];
        for key in keys {
            s.handle_key(key);
        }
        assert!(s.is_retro());
        assert!(texts(&s).last().unwrap().contains("KONAMI CODE ACTIVATED"));
    }

    #[test]
    fn test_konami_tracked_during_typing_test() {
        let mut s = session();
        type_line(&mut s, "typingtest");
        assert_eq!(s.mode(), SessionMode::TypingTest);

        for key in [
            KeyCode::Up,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Char('b'),
            KeyCode::Char('a'),
        ] {
            s.handle_key(key);
        }
        assert!(s.is_retro());
        // The test keeps running and the letters stay in the transcription.
        assert_eq!(s.mode(), SessionMode::TypingTest);
        assert_eq!(s.input(), "ba");
    }
}
