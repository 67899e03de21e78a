//! Live rebuild screen and the crossterm glue behind `--progress`.

use crate::input::{handle_key, Action};
use crate::live::{LiveFrame, Screen, Waiter, MIN_UNIT};
use crate::ui::theme::Theme;
use crate::util::report::{disk_fields, DiskView};
use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::time::{Duration, Instant};

pub fn render(f: &mut Frame, frame: &LiveFrame, theme: &Theme) {
    let area = f.area();

    // ── Root: header | body | footer ───────────────────────────────
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, root[0], frame, theme);
    render_body(f, root[1], frame, theme);
    render_footer(f, root[2], frame, theme);
}

fn render_header(f: &mut Frame, area: Rect, frame: &LiveFrame, theme: &Theme) {
    let left  = format!(" Server: {} ", frame.host);
    let right = format!(" {} ({}) ", frame.taken_at.format("%H:%M:%S"), frame.counter);
    let pad   = (area.width as usize).saturating_sub(left.len() + right.len());

    let line = Line::from(vec![
        Span::styled(left, theme.header),
        Span::styled(" ".repeat(pad), theme.header),
        Span::styled(right, theme.header),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_body(f: &mut Frame, area: Rect, frame: &LiveFrame, theme: &Theme) {
    let result = &frame.result;
    let mut lines: Vec<Line> = Vec::new();

    if !result.reachable {
        lines.push(Line::from(Span::styled(
            format!(
                "The server may be offline! Cannot get rebuilding information, retrying every {}s.",
                frame.refresh_secs()
            ),
            theme.crit,
        )));
        lines.push(Line::from(""));
    }

    let count_style = if result.rebuilding.is_empty() { theme.ok } else { theme.warn };
    lines.push(Line::from(vec![
        Span::styled("Rebuilding: ", theme.title),
        Span::styled(result.rebuilding.len().to_string(), count_style),
    ]));

    for disk in &result.rebuilding {
        lines.push(Line::from(""));
        for (label, value) in disk_fields(disk, DiskView::Live) {
            let style = if label == "State" { theme.state_style(&disk.state) } else { theme.text };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<20} ", format!("{}:", label)), theme.text_dim),
                Span::styled(value, style),
            ]));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(" Disk(s) rebuilding ", theme.title));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, frame: &LiveFrame, theme: &Theme) {
    let spans = vec![
        Span::styled(" ", theme.footer_bg),
        Span::styled(" q ", theme.footer_key),
        Span::styled("Quit  ", theme.footer_text),
        Span::styled("\u{2502}  ", theme.footer_text),
        Span::styled(
            format!("The screen will refresh every {}s.", frame.refresh_secs()),
            theme.footer_text,
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)).style(theme.footer_bg), area);
}

/// Draws live frames onto a ratatui terminal.
pub struct TerminalScreen<B: Backend> {
    term:  Terminal<B>,
    theme: Theme,
}

impl<B: Backend> TerminalScreen<B> {
    pub fn new(term: Terminal<B>, theme: Theme) -> Self {
        Self { term, theme }
    }
}

impl<B: Backend> Screen for TerminalScreen<B> {
    fn draw(&mut self, frame: &LiveFrame) -> Result<()> {
        let theme = &self.theme;
        self.term.draw(|f| render(f, frame, theme))?;
        Ok(())
    }
}

/// Waits one unit on the crossterm event queue; a quit key ends the wait early.
pub struct KeyWaiter {
    unit: Duration,
}

impl KeyWaiter {
    pub fn new(unit: Duration) -> Self {
        Self { unit: unit.max(MIN_UNIT) }
    }
}

impl Waiter for KeyWaiter {
    fn wait_unit(&mut self) -> Result<bool> {
        let deadline = Instant::now() + self.unit;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return Ok(false);
            }
            if event::poll(left)? {
                if let Event::Key(key) = event::read()? {
                    if handle_key(key) == Action::Quit {
                        return Ok(true);
                    }
                }
            }
        }
    }
}
