use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};
use crossterm::style::Attribute;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::error::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Char(char),
    Resize,
    /// Ctrl+C; raw mode delivers it as a key instead of a signal.
    Interrupt,
    Other,
}

/// Outcome of a single draw. Cells off the surface are skipped, not errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Draw {
    Drawn,
    Clipped,
}

/// The surface the game renders to and reads keys from.
pub trait Screen {
    fn size(&self) -> (u16, u16);

    fn clear(&mut self) -> Result<()>;

    fn draw_char(&mut self, x: i32, y: i32, glyph: char, reverse: bool) -> Draw;

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;

    /// Returns `None` when nothing is pending and `blocking` is false.
    fn read_key(&mut self, blocking: bool) -> Result<Option<Key>>;

    fn flush(&mut self) -> Result<()>;

    /// Draws `text` left to right from `(x, y)`; returns how many cells landed
    /// on the surface.
    fn draw_str(&mut self, x: i32, y: i32, text: &str, reverse: bool) -> usize {
        text.chars()
            .enumerate()
            .filter(|&(i, ch)| self.draw_char(x + i as i32, y, ch, reverse) == Draw::Drawn)
            .count()
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        let (w, h) = self.size();
        x >= 0 && y >= 0 && x < w as i32 && y < h as i32
    }
}

impl<T: Screen + ?Sized> Screen for &mut T {
    fn size(&self) -> (u16, u16) {
        (**self).size()
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn draw_char(&mut self, x: i32, y: i32, glyph: char, reverse: bool) -> Draw {
        (**self).draw_char(x, y, glyph, reverse)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        (**self).set_cursor_visible(visible)
    }

    fn read_key(&mut self, blocking: bool) -> Result<Option<Key>> {
        (**self).read_key(blocking)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager { width, height, stdout: stdout() })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.set_cursor_visible(false)?;
        execute!(self.stdout, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        self.set_cursor_visible(true)?;
        execute!(self.stdout, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Screen for TermManager {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn draw_char(&mut self, x: i32, y: i32, glyph: char, reverse: bool) -> Draw {
        if !self.in_bounds(x, y) {
            return Draw::Clipped;
        }

        let pos = cursor::MoveTo(x as u16, y as u16);
        let res = if reverse {
            queue!(
                self.stdout,
                pos,
                style::SetAttribute(Attribute::Reverse),
                style::Print(glyph),
                style::SetAttribute(Attribute::NoReverse)
            )
        } else {
            queue!(self.stdout, pos, style::Print(glyph))
        };

        match res {
            Ok(()) => Draw::Drawn,
            Err(_) => Draw::Clipped,
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            execute!(self.stdout, cursor::Show)?;
        } else {
            execute!(self.stdout, cursor::Hide)?;
        }
        Ok(())
    }

    fn read_key(&mut self, blocking: bool) -> Result<Option<Key>> {
        loop {
            if !blocking && !poll(Duration::from_millis(0))? {
                return Ok(None);
            }

            match read()? {
                Event::Key(ev) => return Ok(Some(map_key(ev))),
                Event::Resize(_, _) => return Ok(Some(Key::Resize)),
                _ => {}
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().map_err(crossterm::ErrorKind::IoError)?;
        Ok(())
    }
}

fn map_key(ev: KeyEvent) -> Key {
    match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL } => Key::Interrupt,
        KeyEvent { code, modifiers: _ } => match code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent { code, modifiers }
    }

    #[test]
    fn maps_arrows_and_chars() {
        assert_eq!(map_key(key(KeyCode::Up, KeyModifiers::NONE)), Key::Up);
        assert_eq!(map_key(key(KeyCode::Left, KeyModifiers::NONE)), Key::Left);
        assert_eq!(map_key(key(KeyCode::Char('S'), KeyModifiers::SHIFT)), Key::Char('S'));
        assert_eq!(map_key(key(KeyCode::Char(' '), KeyModifiers::NONE)), Key::Char(' '));
        assert_eq!(map_key(key(KeyCode::Esc, KeyModifiers::NONE)), Key::Other);
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        assert_eq!(map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Key::Interrupt);
        assert_eq!(map_key(key(KeyCode::Char('c'), KeyModifiers::NONE)), Key::Char('c'));
    }
}
