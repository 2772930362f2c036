//! Screen layout and drawing.
//!
//! [`View::render`] is pure: it turns session state into styled lines sized to
//! the terminal. [`draw`] paints those lines with crossterm.

use std::io::{self, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use wsecho_client::{Connector, Direction, Phase, SessionManager, TranscriptEntry};

const TITLE: &str = "WebSocket Echo Demo";
const FOOTER: &str = "Enter send · Ctrl+T connect/disconnect · Esc quit";
const PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Plain,
    Hint,
    Button(Phase),
    Status(Phase),
    Input,
    Entry(Direction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: LineStyle,
}

impl Line {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank() -> Self {
        Self::new("", LineStyle::Plain)
    }
}

/// A rendered frame: one entry per terminal row, plus where the cursor goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub lines: Vec<Line>,
    pub cursor: Option<(u16, u16)>,
}

/// Borrowed snapshot of everything the UI shows.
pub struct View<'a> {
    pub phase: Phase,
    pub endpoint: &'a str,
    pub input: &'a str,
    pub entries: &'a [TranscriptEntry],
}

impl<'a> View<'a> {
    pub fn of<C: Connector>(session: &'a SessionManager<C>) -> Self {
        Self {
            phase: session.phase(),
            endpoint: session.endpoint(),
            input: session.input(),
            entries: session.transcript().entries(),
        }
    }

    pub fn render(&self, cols: u16, rows: u16) -> Screen {
        let width = usize::from(cols.max(1));
        let rows = usize::from(rows);

        let button = match self.phase {
            Phase::Connected => "[Ctrl+T] Disconnect",
            Phase::Connecting => "[Ctrl+T] Cancel",
            Phase::Disconnected => "[Ctrl+T] Connect to WebSocket",
        };
        let status = match self.phase {
            Phase::Connected => "Connected",
            Phase::Connecting => "Connecting…",
            Phase::Disconnected => "Disconnected",
        };

        let mut lines = vec![
            Line::new(TITLE, LineStyle::Title),
            Line::new(format!("Endpoint: {}", self.endpoint), LineStyle::Hint),
            Line::new(button, LineStyle::Button(self.phase)),
            Line::new(format!("Status: {status}"), LineStyle::Status(self.phase)),
            Line::blank(),
        ];

        let mut cursor = None;
        if self.phase == Phase::Connected {
            let room = width.saturating_sub(PROMPT.len() + 1);
            let visible = tail_chars(self.input, room);
            let col = PROMPT.len() + visible.chars().count();
            cursor = Some((col as u16, lines.len() as u16));
            lines.push(Line::new(format!("{PROMPT}{visible}"), LineStyle::Input));
            lines.push(Line::blank());
        }

        // Everything below the header except the footer row.
        let body = rows.saturating_sub(lines.len() + 1);
        if !self.entries.is_empty() && body > 1 {
            lines.push(Line::new("Messages:", LineStyle::Plain));
            let shown = body - 1;
            let start = self.entries.len().saturating_sub(shown);
            for entry in &self.entries[start..] {
                lines.push(Line::new(
                    sanitize(&entry.to_string()),
                    LineStyle::Entry(entry.direction()),
                ));
            }
        }

        if rows > lines.len() {
            lines.resize(rows - 1, Line::blank());
            lines.push(Line::new(FOOTER, LineStyle::Hint));
        } else {
            lines.truncate(rows);
        }

        for line in &mut lines {
            line.text = line.text.chars().take(width).collect();
        }
        if cursor.is_some_and(|(_, row)| usize::from(row) >= lines.len()) {
            cursor = None;
        }

        Screen { lines, cursor }
    }
}

/// Last `n` characters of `s`.
fn tail_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    let skip = count - n;
    match s.char_indices().nth(skip) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

/// Control characters would break the row layout.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn color_for(style: LineStyle) -> Option<Color> {
    match style {
        LineStyle::Title => Some(Color::White),
        LineStyle::Hint => Some(Color::DarkGrey),
        LineStyle::Button(Phase::Connected) => Some(Color::Red),
        LineStyle::Button(_) => Some(Color::Blue),
        LineStyle::Status(Phase::Connected) => Some(Color::Green),
        LineStyle::Status(Phase::Connecting) => Some(Color::Yellow),
        LineStyle::Status(Phase::Disconnected) => Some(Color::Grey),
        LineStyle::Entry(Direction::Sent) => Some(Color::Blue),
        LineStyle::Entry(Direction::Received) => Some(Color::Reset),
        LineStyle::Plain | LineStyle::Input => None,
    }
}

/// Paint `screen` onto `out`.
pub fn draw(out: &mut impl Write, screen: &Screen) -> io::Result<()> {
    queue!(out, cursor::Hide)?;
    for (row, line) in screen.lines.iter().enumerate() {
        queue!(
            out,
            cursor::MoveTo(0, row as u16),
            Clear(ClearType::CurrentLine)
        )?;
        match color_for(line.style) {
            Some(color) => queue!(
                out,
                SetForegroundColor(color),
                Print(&line.text),
                ResetColor
            )?,
            None => queue!(out, Print(&line.text))?,
        }
    }
    queue!(
        out,
        cursor::MoveTo(0, screen.lines.len() as u16),
        Clear(ClearType::FromCursorDown)
    )?;
    if let Some((col, row)) = screen.cursor {
        queue!(out, cursor::MoveTo(col, row), cursor::Show)?;
    }
    out.flush()
}
