//! Command History Module
//!
//! Bounded command history with up/down recall and substring search.

use std::collections::VecDeque;

/// Command history with a navigation cursor
#[derive(Debug, Clone)]
pub struct CommandHistory {
    commands: VecDeque<String>,
    max_size: usize,
    current_index: Option<usize>,
}

impl CommandHistory {
    /// Create a new command history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            max_size: max_size.max(1),
            current_index: None,
        }
    }

    /// Add a command to the history
    /// Duplicates of the most recent command are ignored
    pub fn add_command(&mut self, cmd: &str) {
        let cmd = cmd.trim();

        if !cmd.is_empty() && self.commands.back().map_or(true, |last| last != cmd) {
            if self.commands.len() >= self.max_size {
                self.commands.pop_front();
            }
            self.commands.push_back(cmd.to_string());
        }

        self.current_index = None;
    }

    /// Step to an older entry (up arrow); stays on the oldest entry
    pub fn previous(&mut self) -> Option<String> {
        if self.commands.is_empty() {
            return None;
        }

        let idx = match self.current_index {
            None => self.commands.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.current_index = Some(idx);
        self.commands.get(idx).cloned()
    }

    /// Step to a newer entry (down arrow)
    ///
    /// Moving past the newest entry leaves navigation and yields `None`; the
    /// caller shows an empty buffer.
    pub fn next(&mut self) -> Option<String> {
        match self.current_index {
            Some(idx) if idx + 1 < self.commands.len() => {
                self.current_index = Some(idx + 1);
                self.commands.get(idx + 1).cloned()
            }
            _ => {
                self.current_index = None;
                None
            }
        }
    }

    /// Whether up/down navigation is in progress
    pub fn is_navigating(&self) -> bool {
        self.current_index.is_some()
    }

    /// All commands in chronological order (oldest first)
    pub fn get_chronological(&self) -> Vec<String> {
        self.commands.iter().cloned().collect()
    }

    /// Commands containing the pattern (case-insensitive), oldest first
    pub fn search(&self, pattern: &str) -> Vec<String> {
        let pattern = pattern.to_lowercase();
        self.commands
            .iter()
            .filter(|cmd| cmd.to_lowercase().contains(&pattern))
            .cloned()
            .collect()
    }

    pub fn last_command(&self) -> Option<&String> {
        self.commands.back()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = None;
    }

    pub fn reset_navigation(&mut self) {
        self.current_index = None;
    }

    /// Numbered listing for the `history` command
    pub fn listing(&self, filter: Option<&str>) -> String {
        let entries = match filter {
            Some(term) => self.search(term),
            None => self.get_chronological(),
        };

        if entries.is_empty() {
            return match filter {
                Some(term) => format!("No commands matching '{}' found in history.", term),
                None => "No command history available.".to_string(),
            };
        }

        let mut lines = vec![match filter {
            Some(term) => format!("Command history matching '{}':", term),
            None => "Command history:".to_string(),
        }];
        lines.extend(
            entries
                .iter()
                .enumerate()
                .map(|(i, cmd)| format!("{}. {}", i + 1, cmd)),
        );
        lines.join("\n")
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(1000)
    }
}
