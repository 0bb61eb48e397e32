//! Output Rendering Module
//!
//! Transcript lines with a character-by-character reveal, the glitch
//! animation for mistyped commands and link detection for display.
//!
//! The renderer owns no timer. The event loop calls [`OutputRenderer::tick`]
//! at the configured reveal interval and redraws.

use std::cell::OnceCell;
use std::sync::OnceLock;

use regex::Regex;

/// Role of a transcript line, used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Echo of a submitted command
    Command,
    Response,
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    NotStarted,
    Revealing,
    Done,
}

/// A piece of a rendered line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { url: String, text: String },
    LineBreak,
}

#[derive(Debug, Clone)]
struct GlitchAnimation {
    frames: Vec<String>,
    frame: usize,
    ticks_per_frame: u32,
    ticks: u32,
}

/// One entry of the terminal transcript
#[derive(Debug, Clone)]
pub struct TerminalLine {
    kind: LineKind,
    full_text: String,
    revealed: usize,
    state: RevealState,
    glitch: Option<GlitchAnimation>,
    segments: OnceCell<Vec<Segment>>,
}

impl TerminalLine {
    /// A line that is shown in full immediately
    pub fn done(kind: LineKind, text: impl Into<String>) -> Self {
        let full_text = text.into();
        Self {
            kind,
            revealed: full_text.len(),
            full_text,
            state: RevealState::Done,
            glitch: None,
            segments: OnceCell::new(),
        }
    }

    fn pending(kind: LineKind, text: String) -> Self {
        if text.is_empty() {
            return Self::done(kind, text);
        }
        Self {
            kind,
            full_text: text,
            revealed: 0,
            state: RevealState::NotStarted,
            glitch: None,
            segments: OnceCell::new(),
        }
    }

    fn glitching(frames: Vec<String>, ticks_per_frame: u32) -> Self {
        let first = frames.first().cloned().unwrap_or_default();
        let mut line = Self::done(LineKind::Error, first);
        if frames.len() > 1 {
            line.state = RevealState::Revealing;
            line.glitch = Some(GlitchAnimation {
                frames,
                frame: 0,
                ticks_per_frame: ticks_per_frame.max(1),
                ticks: 0,
            });
        }
        line
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// The part of the text currently on screen; always a prefix of the full text
    pub fn visible_text(&self) -> &str {
        &self.full_text[..self.revealed]
    }

    pub fn is_done(&self) -> bool {
        self.state == RevealState::Done
    }

    pub fn is_glitch(&self) -> bool {
        self.glitch.is_some()
    }

    /// Segments of the visible text; cached once the line has finished
    pub fn segments(&self, rewriter: &LinkRewriter) -> Vec<Segment> {
        if self.is_done() {
            self.segments
                .get_or_init(|| parse_links(&self.full_text, rewriter))
                .clone()
        } else {
            parse_links(self.visible_text(), rewriter)
        }
    }

    /// Advance by one tick; returns true if anything changed
    fn advance(&mut self) -> bool {
        if let Some(glitch) = self.glitch.as_mut() {
            glitch.ticks += 1;
            if glitch.ticks < glitch.ticks_per_frame {
                return false;
            }
            glitch.ticks = 0;
            glitch.frame += 1;
            let last = glitch.frame + 1 >= glitch.frames.len();
            self.full_text = glitch.frames[glitch.frame.min(glitch.frames.len() - 1)].clone();
            self.revealed = self.full_text.len();
            if last {
                self.glitch = None;
                self.state = RevealState::Done;
            }
            return true;
        }

        match self.state {
            RevealState::Done => false,
            RevealState::NotStarted | RevealState::Revealing => {
                let step = self.full_text[self.revealed..]
                    .chars()
                    .next()
                    .map_or(0, char::len_utf8);
                self.revealed += step;
                self.state = if self.revealed >= self.full_text.len() {
                    RevealState::Done
                } else {
                    RevealState::Revealing
                };
                true
            }
        }
    }

    fn finish(&mut self) {
        if let Some(glitch) = self.glitch.take() {
            if let Some(last) = glitch.frames.into_iter().last() {
                self.full_text = last;
            }
        }
        self.revealed = self.full_text.len();
        self.state = RevealState::Done;
    }
}

/// Rewrites links that point into the source tree to the template directory
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    template_dir: String,
}

impl LinkRewriter {
    pub fn new(template_dir: impl Into<String>) -> Self {
        Self {
            template_dir: template_dir.into().trim_matches('/').to_string(),
        }
    }

    pub fn rewrite(&self, url: &str) -> String {
        if self.template_dir.is_empty() {
            return url.to_string();
        }
        let target = format!("/{}/", self.template_dir);
        for internal in ["/src/", "/public/"] {
            if url.contains(internal) {
                return url.replacen(internal, &target, 1);
            }
        }
        url.to_string()
    }
}

impl Default for LinkRewriter {
    fn default() -> Self {
        Self::new("")
    }
}

fn url_pattern() -> Option<&'static Regex> {
    static URL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    URL_RE
        .get_or_init(|| Regex::new(r"(https?|ftp)://\S+").ok())
        .as_ref()
}

/// Split text into plain runs, links and line breaks
pub fn parse_links(text: &str, rewriter: &LinkRewriter) -> Vec<Segment> {
    let mut segments = Vec::new();

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            segments.push(Segment::LineBreak);
        }

        let mut last = 0;
        let matches = url_pattern().into_iter().flat_map(|re| re.find_iter(line));
        for m in matches {
            if m.start() > last {
                segments.push(Segment::Text(line[last..m.start()].to_string()));
            }
            segments.push(Segment::Link {
                url: rewriter.rewrite(m.as_str()),
                text: m.as_str().to_string(),
            });
            last = m.end();
        }
        if last < line.len() {
            segments.push(Segment::Text(line[last..].to_string()));
        }
    }

    segments
}

/// Transcript plus the reveal animation state
#[derive(Debug, Clone)]
pub struct OutputRenderer {
    lines: Vec<TerminalLine>,
    animate: bool,
    fast_forward: bool,
    glitch_frame_ticks: u32,
}

impl OutputRenderer {
    pub fn new(animate: bool, glitch_frame_ticks: u32) -> Self {
        Self {
            lines: Vec::new(),
            animate,
            fast_forward: false,
            glitch_frame_ticks: glitch_frame_ticks.max(1),
        }
    }

    /// Start the output of a new command; clears any fast-forward
    pub fn begin_batch(&mut self) {
        self.fast_forward = false;
    }

    pub fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        let text = text.into();
        let line = if kind == LineKind::Command || !self.animate || self.fast_forward {
            TerminalLine::done(kind, text)
        } else {
            TerminalLine::pending(kind, text)
        };
        self.lines.push(line);
    }

    /// Push the glitch animation for a mistyped command
    pub fn push_glitch(&mut self, frames: Vec<String>) {
        let mut line = TerminalLine::glitching(frames, self.glitch_frame_ticks);
        if !self.animate || self.fast_forward {
            line.finish();
        }
        self.lines.push(line);
    }

    /// Advance the first unfinished line; returns true if a redraw is needed
    pub fn tick(&mut self) -> bool {
        match self.lines.iter_mut().find(|line| !line.is_done()) {
            Some(line) => line.advance(),
            None => false,
        }
    }

    /// Finish every pending line of the current batch at once
    pub fn fast_forward(&mut self) {
        for line in self.lines.iter_mut().filter(|line| !line.is_done()) {
            line.finish();
        }
        self.fast_forward = true;
    }

    pub fn is_animating(&self) -> bool {
        self.lines.iter().any(|line| !line.is_done())
    }

    pub fn is_fast_forwarding(&self) -> bool {
        self.fast_forward
    }

    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    pub fn lines(&self) -> &[TerminalLine] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Swap in a saved transcript, returning the current one
    pub fn replace_lines(&mut self, lines: Vec<TerminalLine>) -> Vec<TerminalLine> {
        std::mem::replace(&mut self.lines, lines)
    }

    /// Remove and return the transcript with every line finished
    pub fn take_lines(&mut self) -> Vec<TerminalLine> {
        self.fast_forward();
        std::mem::take(&mut self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_until_idle(renderer: &mut OutputRenderer) -> usize {
        let mut ticks = 0;
        while renderer.is_animating() {
            renderer.tick();
            ticks += 1;
            assert!(ticks < 10_000, "animation never finished");
        }
        ticks
    }

    #[test]
    fn test_reveal_is_monotonic_prefix() {
        let mut renderer = OutputRenderer::new(true, 1);
        renderer.push(LineKind::Response, "héllo");

        let mut previous = String::new();
        while renderer.is_animating() {
            renderer.tick();
            let line = &renderer.lines()[0];
            let visible = line.visible_text();
            assert!(line.full_text().starts_with(visible));
            assert!(visible.len() > previous.len());
            previous = visible.to_string();
        }
        assert_eq!(previous, "héllo");
        assert_eq!(renderer.lines()[0].state(), RevealState::Done);
    }

    #[test]
    fn test_lines_reveal_in_order() {
        let mut renderer = OutputRenderer::new(true, 1);
        renderer.push(LineKind::Response, "ab");
        renderer.push(LineKind::Success, "cd");

        renderer.tick();
        assert_eq!(renderer.lines()[0].visible_text(), "a");
        assert_eq!(renderer.lines()[1].state(), RevealState::NotStarted);
        renderer.tick();
        renderer.tick();
        assert_eq!(renderer.lines()[1].visible_text(), "c");
    }

    #[test]
    fn test_command_echo_is_immediate() {
        let mut renderer = OutputRenderer::new(true, 1);
        renderer.push(LineKind::Command, "> help");
        assert!(!renderer.is_animating());
        assert_eq!(renderer.lines()[0].visible_text(), "> help");
    }

    #[test]
    fn test_fast_forward_applies_to_batch() {
        let mut renderer = OutputRenderer::new(true, 1);
        renderer.begin_batch();
        renderer.push(LineKind::Response, "first response");
        renderer.tick();
        renderer.fast_forward();
        assert!(!renderer.is_animating());
        assert_eq!(renderer.lines()[0].visible_text(), "first response");

        // Late lines of the same batch arrive finished.
        renderer.push(LineKind::Success, "late");
        assert!(!renderer.is_animating());

        renderer.begin_batch();
        renderer.push(LineKind::Response, "next command");
        assert!(renderer.is_animating());
    }

    #[test]
    fn test_animation_disabled() {
        let mut renderer = OutputRenderer::new(false, 1);
        renderer.push(LineKind::Response, "instant");
        renderer.push_glitch(vec!["a".into(), "b".into(), "final".into()]);
        assert!(!renderer.is_animating());
        assert_eq!(renderer.lines()[1].full_text(), "final");
    }

    #[test]
    fn test_glitch_settles_on_last_frame() {
        let mut renderer = OutputRenderer::new(true, 2);
        renderer.push_glitch(vec!["one".into(), "two".into(), "three".into()]);
        assert!(renderer.lines()[0].is_glitch());
        assert_eq!(renderer.lines()[0].visible_text(), "one");

        renderer.tick();
        assert_eq!(renderer.lines()[0].visible_text(), "one");
        renderer.tick();
        assert_eq!(renderer.lines()[0].visible_text(), "two");

        assert_eq!(tick_until_idle(&mut renderer), 2);
        assert_eq!(renderer.lines()[0].visible_text(), "three");
        assert!(!renderer.lines()[0].is_glitch());
    }

    #[test]
    fn test_empty_line_is_done() {
        let mut renderer = OutputRenderer::new(true, 1);
        renderer.push(LineKind::Response, "");
        assert!(!renderer.is_animating());
    }

    #[test]
    fn test_parse_links() {
        let segments = parse_links(
            "See https://example.com/a for more and http://example.com/b too",
            &LinkRewriter::default(),
        );
        assert_eq!(
            segments,
            vec![
                Segment::Text("See ".into()),
                Segment::Link {
                    url: "https://example.com/a".into(),
                    text: "https://example.com/a".into(),
                },
                Segment::Text(" for more and ".into()),
                Segment::Link {
                    url: "http://example.com/b".into(),
                    text: "http://example.com/b".into(),
                },
                Segment::Text(" too".into()),
            ]
        );
    }

    #[test]
    fn test_parse_links_line_breaks() {
        let segments = parse_links("a\nftp://host/file", &LinkRewriter::default());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], Segment::LineBreak);
        assert!(matches!(segments[2], Segment::Link { .. }));
    }

    #[test]
    fn test_link_rewrite() {
        let rewriter = LinkRewriter::new("src3");
        assert_eq!(
            rewriter.rewrite("https://site.dev/src/assets/cv.pdf"),
            "https://site.dev/src3/assets/cv.pdf"
        );
        assert_eq!(
            rewriter.rewrite("https://site.dev/public/me.png"),
            "https://site.dev/src3/me.png"
        );
        assert_eq!(rewriter.rewrite("https://github.com/me"), "https://github.com/me");

        let segments = parse_links("cv: https://site.dev/src/cv.pdf", &rewriter);
        assert_eq!(
            segments[1],
            Segment::Link {
                url: "https://site.dev/src3/cv.pdf".into(),
                text: "https://site.dev/src/cv.pdf".into(),
            }
        );
    }

    #[test]
    fn test_segments_cached_when_done() {
        let line = TerminalLine::done(LineKind::Response, "go to https://a.dev");
        let rewriter = LinkRewriter::default();
        let first = line.segments(&rewriter);
        assert!(line.segments.get().is_some());
        assert_eq!(line.segments(&rewriter), first);
    }

    #[test]
    fn test_take_lines_finishes_pending() {
        let mut renderer = OutputRenderer::new(true, 1);
        renderer.push(LineKind::Response, "pending");
        let lines = renderer.take_lines();
        assert!(lines.iter().all(TerminalLine::is_done));
        assert!(renderer.lines().is_empty());
    }
}
