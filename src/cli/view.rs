//! Terminal view
//!
//! Draws a session snapshot with ratatui: a header, the transcript (or the
//! current pager window) and the input line.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::config::{TerminalTheme, RETRO_BG, RETRO_TEXT};
use super::output::{LineKind, Segment, TerminalLine};
use super::session::{SessionMode, TerminalSession};

/// Colours actually used for a frame
#[derive(Debug, Clone, Copy)]
struct Palette {
    bg: Color,
    text: Color,
    prompt: Color,
    success: Color,
    error: Color,
}

impl Palette {
    fn for_session(session: &TerminalSession) -> Self {
        if session.is_retro() {
            return Self {
                bg: RETRO_BG,
                text: RETRO_TEXT,
                prompt: RETRO_TEXT,
                success: RETRO_TEXT,
                error: RETRO_TEXT,
            };
        }
        let theme: &TerminalTheme = session.theme_colors();
        Self {
            bg: theme.bg,
            text: theme.text,
            prompt: theme.prompt,
            success: theme.success,
            error: theme.error,
        }
    }

    fn line_style(&self, kind: LineKind) -> Style {
        let style = Style::default().bg(self.bg);
        match kind {
            LineKind::Command => style.fg(self.prompt).add_modifier(Modifier::BOLD),
            LineKind::Response => style.fg(self.text),
            LineKind::Success => style.fg(self.success),
            LineKind::Error => style.fg(self.error),
            LineKind::Info => style.fg(self.text).add_modifier(Modifier::DIM),
        }
    }
}

pub fn draw(f: &mut Frame, session: &TerminalSession) {
    let palette = Palette::for_session(session);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_header(f, chunks[0], session, &palette);
    draw_body(f, chunks[1], session, &palette);
    draw_footer(f, chunks[2], session, &palette);
}

fn draw_header(f: &mut Frame, area: Rect, session: &TerminalSession, palette: &Palette) {
    let mut spans = vec![Span::styled(
        format!(" {} ", session.config().site_title),
        Style::default()
            .fg(palette.bg)
            .bg(palette.prompt)
            .add_modifier(Modifier::BOLD),
    )];
    let mut flags = vec![format!("theme: {}", session.theme_colors().key)];
    if session.is_matrix() {
        flags.push("matrix".to_string());
    }
    if session.is_retro() {
        flags.push("retro".to_string());
    }
    spans.push(Span::styled(
        format!(" [{}]", flags.join(" | ")),
        Style::default().fg(palette.text).bg(palette.bg),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg));
    f.render_widget(header, area);
}

fn draw_body(f: &mut Frame, area: Rect, session: &TerminalSession, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(palette.prompt).bg(palette.bg));
    let inner = block.inner(area);

    let lines: Vec<Line> = match session.page_view() {
        Some(view) => {
            let style = palette.line_style(LineKind::Response);
            let mut lines: Vec<Line> = view
                .lines
                .into_iter()
                .map(|text| Line::from(Span::styled(text, style)))
                .collect();
            lines.push(Line::from(Span::styled(
                view.status,
                palette.line_style(LineKind::Info),
            )));
            lines
        }
        None => session
            .lines()
            .iter()
            .flat_map(|line| render_line(line, session, palette))
            .collect(),
    };

    // Keep the newest output in view.
    let rows = wrapped_rows(&lines, inner.width);
    let scroll = rows.saturating_sub(inner.height as usize) as u16;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_line<'a>(line: &TerminalLine, session: &TerminalSession, palette: &Palette) -> Vec<Line<'a>> {
    let style = palette.line_style(line.kind());
    let link_style = style.add_modifier(Modifier::UNDERLINED);

    let mut lines = Vec::new();
    let mut current: Vec<Span<'a>> = Vec::new();
    for segment in line.segments(session.rewriter()) {
        match segment {
            Segment::Text(text) => current.push(Span::styled(text, style)),
            Segment::Link { text, .. } => current.push(Span::styled(text, link_style)),
            Segment::LineBreak => lines.push(Line::from(std::mem::take(&mut current))),
        }
    }
    if !line.is_done() {
        current.push(Span::styled("█", style));
    }
    lines.push(Line::from(current));
    lines
}

fn wrapped_rows(lines: &[Line], width: u16) -> usize {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum()
}

fn draw_footer(f: &mut Frame, area: Rect, session: &TerminalSession, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(palette.prompt).bg(palette.bg));

    let prompt_style = Style::default()
        .fg(palette.prompt)
        .bg(palette.bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(palette.text).bg(palette.bg);

    let line = match session.mode() {
        // The input prompt is hidden while paging.
        SessionMode::Paging => Line::from(Span::styled(
            "SPACE: next page | ENTER: next line | q: quit",
            text_style.add_modifier(Modifier::DIM),
        )),
        SessionMode::Animating => Line::from(Span::styled(
            "Press ENTER to fast-forward...",
            text_style.add_modifier(Modifier::DIM),
        )),
        SessionMode::TypingTest => Line::from(vec![
            Span::styled("typing> ", prompt_style),
            Span::styled(session.input().to_string(), text_style),
            Span::styled("█", text_style),
        ]),
        SessionMode::Normal => Line::from(vec![
            Span::styled("$ ", prompt_style),
            Span::styled(session.input().to_string(), text_style),
            Span::styled("█", text_style),
        ]),
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}
