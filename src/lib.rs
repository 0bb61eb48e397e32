//! folio - a terminal portfolio
//!
//! A command interpreter that presents a developer portfolio as an
//! interactive terminal: typed commands with short aliases, typo-tolerant
//! feedback, character-by-character output, a pager for long responses, a
//! typing test and a few hidden extras.
//!
//! # Features
//!
//! - **Command Registry**: canonical commands, aliases and Tab completion
//! - **Easter Eggs**: literal hidden commands, glitching typo feedback, konami code
//! - **Output Rendering**: tick-driven reveal animation with fast-forward and link detection
//! - **Pager**: long responses shown a page at a time
//! - **Data Store**: portfolio document loaded from disk, cached, refreshed from the API
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use folio::cli::{CliConfig, TerminalSession};
//! use folio::clock::SystemClock;
//! use folio::portfolio::DataStore;
//! use crossterm::event::KeyCode;
//!
//! let config = CliConfig::default();
//! let mut store = DataStore::from_config(&config);
//! store.load();
//!
//! let mut session = TerminalSession::new(config, store, SystemClock::shared());
//! for c in "about".chars() {
//!     session.handle_key(KeyCode::Char(c));
//! }
//! session.handle_key(KeyCode::Enter);
//! session.fast_forward();
//! for line in session.lines() {
//!     println!("{}", line.full_text());
//! }
//! ```

pub mod cli;
pub mod clock;
pub mod error;
pub mod portfolio;

// Re-export commonly used types for convenience
pub use cli::{CliConfig, TerminalPrompter, TerminalSession};
pub use error::{FolioError, Result};
pub use portfolio::{DataStore, PortfolioDocument};
