use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::cursor::{MoveLeft, MoveTo};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use unicode_width::UnicodeWidthChar;

/// Screen output used by the navigator.
pub trait Display {
    fn clear(&mut self) -> Result<()>;

    /// Clears the screen and draws `lines` from the top.
    fn render(&mut self, lines: &[String]) -> Result<()>;

    /// One-line message below whatever is on screen.
    fn notice(&mut self, message: &str) -> Result<()>;

    fn echo(&mut self, ch: char) -> Result<()>;

    /// Visually removes a previously echoed character.
    fn erase(&mut self, ch: char) -> Result<()>;

    fn newline(&mut self) -> Result<()>;
}

pub struct TerminalDisplay<W: Write> {
    out: W,
}

impl TerminalDisplay<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn clear(&mut self) -> Result<()> {
        execute!(self.out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0))
            .context("display: clear screen")
    }

    fn render(&mut self, lines: &[String]) -> Result<()> {
        queue!(self.out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0))
            .context("display: clear screen")?;
        for line in lines {
            queue!(self.out, Print(line), Print("\r\n")).context("display: draw line")?;
        }
        self.out.flush().context("display: flush")
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        execute!(self.out, Print(message), Print("\r\n")).context("display: print notice")
    }

    fn echo(&mut self, ch: char) -> Result<()> {
        execute!(self.out, Print(ch)).context("display: echo")
    }

    fn erase(&mut self, ch: char) -> Result<()> {
        let width = ch.width().unwrap_or(1).max(1) as u16;
        execute!(
            self.out,
            MoveLeft(width),
            Print(" ".repeat(width as usize)),
            MoveLeft(width)
        )
        .context("display: erase")
    }

    fn newline(&mut self) -> Result<()> {
        execute!(self.out, Print("\r\n")).context("display: newline")
    }
}
