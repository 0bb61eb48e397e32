//! Terminal Interface Module
//!
//! The command interpreter behind the portfolio terminal: command registry,
//! easter eggs, animated output, pager, history and the session state
//! machine, plus the crossterm/ratatui front end that drives them.
//!
//! ## Module Structure
//!
//! - `config` - Configuration and theme management
//! - `commands` - Command definitions, aliases and resolution
//! - `easter_eggs` - Typo detection, hidden commands and the konami code
//! - `output` - Transcript lines, reveal animation and link parsing
//! - `pager` - Paging of long responses
//! - `history` - Command history with up/down recall
//! - `typing_test` - Typing speed test
//! - `handlers` - Commands that read the portfolio document
//! - `session` - Terminal session state machine
//! - `view` - ratatui rendering of a session
//! - `prompter` - Event loop driving the session

pub mod commands;
pub mod config;
pub mod easter_eggs;
pub mod handlers;
pub mod history;
pub mod output;
pub mod pager;
pub mod prompter;
pub mod session;
pub mod view;

// Re-export main types for convenience
pub use commands::{CliCommand, CommandRegistry, ResolvedCommand};
pub use config::{CliConfig, TerminalTheme};
pub use easter_eggs::{classify, Classification, KonamiTracker};
pub use history::CommandHistory;
pub use output::{LineKind, OutputRenderer, RevealState, Segment, TerminalLine};
pub use pager::{PageView, Pager, PagerStep};
pub use prompter::TerminalPrompter;
pub use session::{SessionMode, SessionTask, TaskOutcome, TerminalSession};
