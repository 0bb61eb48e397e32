//! Terminal Prompter
//!
//! Drives a [`TerminalSession`]: owns the real terminal, feeds key presses
//! into the session, ticks the reveal animation and performs the I/O tasks
//! the session asks for.
//!
//! Network tasks run on the runtime while the loop keeps ticking and reading
//! keys; their results come back over a channel.

use std::future::Future;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, terminal,
};
use inquire::{Confirm, InquireError};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::MissedTickBehavior;

use super::session::{SessionTask, TaskOutcome, TerminalSession};
use super::typing_test::fetch_quotes;
use super::view;
use crate::error::Result as FolioResult;
use crate::portfolio::store::fetch_resume;
use crate::portfolio::PortfolioDocument;

/// A background task that has finished
#[derive(Debug)]
enum Finished {
    /// Refreshed documents are installed in the store before the session hears about them
    Refresh(FolioResult<PortfolioDocument>),
    Outcome(TaskOutcome),
}

/// Interactive terminal front end
pub struct TerminalPrompter {
    session: TerminalSession,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    tick_interval: Duration,
    should_exit: bool,
}

impl TerminalPrompter {
    /// Take over the terminal (raw mode, alternate screen)
    pub fn new(session: TerminalSession) -> io::Result<Self> {
        let tick_interval = Duration::from_millis(session.config().reveal_interval_ms.max(1));

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            session,
            terminal,
            tick_interval,
            should_exit: false,
        })
    }

    pub async fn run(&mut self) -> io::Result<()> {
        self.session.welcome();
        let result = self.run_loop().await;
        self.cleanup()?;
        result
    }

    async fn run_loop(&mut self) -> io::Result<()> {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut dirty = true;

        while !self.should_exit && !self.session.should_exit() {
            if dirty {
                self.render()?;
                dirty = false;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    if self.session.tick() {
                        dirty = true;
                    }

                    // Drain everything that arrived since the last tick.
                    while event::poll(Duration::ZERO)? {
                        match event::read()? {
                            Event::Key(key) if key.kind != KeyEventKind::Release => {
                                self.handle_key_event(key, &done_tx)?;
                                dirty = true;
                            }
                            Event::Resize(_, _) => dirty = true,
                            _ => {}
                        }
                    }
                }
                Some(finished) = done_rx.recv() => {
                    self.finish(finished);
                    dirty = true;
                }
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent, done_tx: &UnboundedSender<Finished>) -> io::Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            log::info!("Ctrl+C received, exiting");
            self.should_exit = true;
            return Ok(());
        }

        if let Some(task) = self.session.handle_key(key.code) {
            self.start(task, done_tx)?;
        }
        Ok(())
    }

    fn start(&mut self, task: SessionTask, done_tx: &UnboundedSender<Finished>) -> io::Result<()> {
        log::debug!("Starting {:?}", task);
        match task {
            SessionTask::Refresh => {
                let request = self.session.store().refresh_request();
                spawn_task(done_tx, async move { Finished::Refresh(request.send().await) });
            }
            SessionTask::FetchQuotes { url } => {
                let client = self.session.store().client();
                spawn_task(done_tx, async move {
                    Finished::Outcome(TaskOutcome::Quotes(fetch_quotes(&client, &url).await))
                });
            }
            SessionTask::DownloadResume { url } => {
                let client = self.session.store().client();
                let dir = self.session.config().download_dir.clone();
                spawn_task(done_tx, async move {
                    Finished::Outcome(TaskOutcome::ResumeDownloaded(
                        fetch_resume(client, url, dir).await,
                    ))
                });
            }
            SessionTask::ConfirmExit => {
                // The prompt blocks; show the echo first.
                self.render()?;
                let outcome = self.confirm_exit()?;
                self.session.complete_task(outcome);
            }
        }
        Ok(())
    }

    fn finish(&mut self, finished: Finished) {
        let outcome = match finished {
            Finished::Refresh(Ok(doc)) => {
                self.session.store_mut().install_refreshed(doc);
                TaskOutcome::Refreshed(Ok(()))
            }
            Finished::Refresh(Err(e)) => TaskOutcome::Refreshed(Err(e)),
            Finished::Outcome(outcome) => outcome,
        };
        self.session.complete_task(outcome);
    }

    /// Ask for exit confirmation with the normal screen restored
    fn confirm_exit(&mut self) -> io::Result<TaskOutcome> {
        self.suspend()?;
        let answer = Confirm::new("This will close the terminal. Are you sure you want to exit?")
            .with_default(false)
            .prompt();
        self.resume()?;

        Ok(match answer {
            Ok(confirmed) => TaskOutcome::ExitConfirmed(confirmed),
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                TaskOutcome::ExitConfirmed(false)
            }
            Err(e) => TaskOutcome::ExitUnavailable(e.to_string()),
        })
    }

    fn suspend(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            terminal::LeaveAlternateScreen,
            cursor::Show
        )
    }

    fn resume(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            terminal::EnterAlternateScreen,
            cursor::Hide
        )?;
        self.terminal.clear()
    }

    fn render(&mut self) -> io::Result<()> {
        let session = &self.session;
        self.terminal.draw(|f| view::draw(f, session))?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }
}

fn spawn_task<F>(done_tx: &UnboundedSender<Finished>, task: F)
where
    F: Future<Output = Finished> + Send + 'static,
{
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        if done_tx.send(task.await).is_err() {
            log::debug!("Terminal closed before a background task finished");
        }
    });
}
