use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Interrupt,
    Eof,
}

/// Blocking source of keystrokes.
pub trait InputDriver {
    fn read_key(&mut self) -> Result<Key>;

    /// Whether the terminal already shows typed characters, so the
    /// navigator must not echo them again.
    fn echoes(&self) -> bool;
}

/// Single keystrokes from a terminal. Raw mode is held only while a read is
/// pending, so everything printed between reads behaves as usual.
pub struct RawInput {
    _private: (),
}

impl RawInput {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("input: enable raw mode")?;
        disable_raw_mode().context("input: disable raw mode")?;
        Ok(Self { _private: () })
    }
}

impl InputDriver for RawInput {
    fn read_key(&mut self) -> Result<Key> {
        enable_raw_mode().context("input: enable raw mode")?;
        let key = read_raw_key();
        disable_raw_mode().context("input: disable raw mode")?;
        key
    }

    fn echoes(&self) -> bool {
        false
    }
}

fn read_raw_key() -> Result<Key> {
    loop {
        if let Event::Key(key) = event::read().context("input: read terminal event")? {
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if let Some(key) = map_key(key) {
                return Ok(key);
            }
        }
    }
}

pub fn map_key(key: KeyEvent) -> Option<Key> {
    // AltGr arrives as CONTROL | ALT on Windows.
    let control = key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('c' | 'C') if control => Some(Key::Interrupt),
        KeyCode::Char(_) if control => None,
        KeyCode::Char(ch) => Some(Key::Char(ch)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Line-buffered fallback used when stdin is not a terminal or raw mode is
/// unavailable. Each line is replayed as characters followed by `Enter`.
pub struct LineInput<R> {
    reader: R,
    pending: VecDeque<Key>,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn fill(&mut self) -> Result<bool> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("input: read line")?;
        if read == 0 {
            return Ok(false);
        }

        for ch in line.chars() {
            let key = match ch {
                '\n' => Key::Enter,
                '\r' => continue,
                '\x03' => Key::Interrupt,
                '\x08' | '\x7f' => Key::Backspace,
                other => Key::Char(other),
            };
            self.pending.push_back(key);
        }
        if !line.ends_with('\n') {
            self.pending.push_back(Key::Enter);
        }
        Ok(true)
    }
}

impl<R: BufRead> InputDriver for LineInput<R> {
    fn read_key(&mut self) -> Result<Key> {
        if self.pending.is_empty() && !self.fill()? {
            return Ok(Key::Eof);
        }
        Ok(self.pending.pop_front().unwrap_or(Key::Eof))
    }

    fn echoes(&self) -> bool {
        true
    }
}

/// Raw keystrokes when stdin is a terminal that supports raw mode, line
/// input otherwise.
pub fn open_stdin() -> Box<dyn InputDriver> {
    if io::stdin().is_terminal() {
        match RawInput::new() {
            Ok(raw) => return Box::new(raw),
            Err(err) => tracing::warn!("raw input unavailable, using line input: {err:#}"),
        }
    }
    Box::new(LineInput::new(io::stdin().lock()))
}
