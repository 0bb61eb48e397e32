//! Pager for long command output
//!
//! Shows a long response one page at a time. The transcript that was on
//! screen when paging started is parked in the pager and handed back when
//! it closes.

use super::output::TerminalLine;

/// Visible window of the paged text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub lines: Vec<String>,
    pub status: String,
}

/// Result of a pager key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerStep {
    Page(PageView),
    Closed,
}

#[derive(Debug, Clone)]
pub struct Pager {
    lines: Vec<String>,
    page_size: usize,
    /// Index of the first line of the current window
    cursor: usize,
    /// Exclusive end of everything shown so far
    shown: usize,
    saved: Vec<TerminalLine>,
}

impl Pager {
    pub fn new(lines: Vec<String>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let shown = page_size.min(lines.len());
        Self {
            lines,
            page_size,
            cursor: 0,
            shown,
            saved: Vec::new(),
        }
    }

    /// Park the transcript to restore on close
    pub fn with_saved(mut self, saved: Vec<TerminalLine>) -> Self {
        self.saved = saved;
        self
    }

    /// Append a line to the parked transcript
    pub fn park(&mut self, line: TerminalLine) {
        self.saved.push(line);
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.lines.len().div_ceil(self.page_size).max(1)
    }

    /// One-based page number of the current window
    pub fn current_page(&self) -> usize {
        self.cursor / self.page_size + 1
    }

    fn window_end(&self) -> usize {
        (self.cursor + self.page_size).min(self.lines.len())
    }

    pub fn view(&self) -> PageView {
        let end = self.window_end();
        PageView {
            lines: self.lines[self.cursor..end].to_vec(),
            status: format!(
                "--- page {}/{} (lines {}-{} of {}) | SPACE: next page | ENTER: next line | q: quit ---",
                self.current_page(),
                self.total_pages(),
                self.cursor + 1,
                end,
                self.lines.len()
            ),
        }
    }

    pub fn page_down(&mut self) -> PagerStep {
        self.advance(self.page_size)
    }

    pub fn line_down(&mut self) -> PagerStep {
        self.advance(1)
    }

    pub fn quit(&mut self) -> PagerStep {
        PagerStep::Closed
    }

    fn advance(&mut self, by: usize) -> PagerStep {
        let next = (self.cursor + by).min(self.lines.len());
        if next >= self.lines.len() {
            return PagerStep::Closed;
        }
        self.cursor = next;
        self.shown = self.shown.max(self.window_end());
        PagerStep::Page(self.view())
    }

    /// Everything the user has paged through
    pub fn shown_text(&self) -> String {
        self.lines[..self.shown].join("\n")
    }

    /// Consume the pager, returning the parked transcript and the shown text
    pub fn close(self) -> (Vec<TerminalLine>, String) {
        let shown = self.shown_text();
        (self.saved, shown)
    }
}
