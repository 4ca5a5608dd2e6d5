use crate::render::{Frame, Rgb};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input
{
    Up,
    Down,
    Confirm,
    Backspace,
    Cancel,
    Char(char),
    Other,
    Quit,
}

pub struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    pub fn enter() -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    pub fn draw(&mut self, frame: &Frame) -> Result<(), String>
    {
        queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::All))
            .map_err(|err| err.to_string())?;
        for item in &frame.items {
            if item.opacity == 0 || item.row >= frame.height {
                continue;
            }
            let col = item.start_column(frame.width);
            let room = frame.width.saturating_sub(col) as usize;
            let text: String = item.text.chars().take(room).collect();
            queue!(self.stdout, MoveTo(col, item.row)).map_err(|err| err.to_string())?;

            let mut styled = String::with_capacity(text.len() + 24);
            if item.emphasis {
                styled.push_str("\x1b[1m");
            }
            styled.push_str(&ansi_color(item.color.at_opacity(item.opacity)));
            styled.push_str(&text);
            styled.push_str("\x1b[0m");
            self.stdout
                .write_all(styled.as_bytes())
                .map_err(|err| err.to_string())?;
        }
        self.stdout.flush().map_err(|err| err.to_string())?;
        Ok(())
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub fn size() -> (u16, u16)
{
    terminal::size().unwrap_or((80, 24))
}

/// Drains every pending event without blocking.
pub fn read_inputs() -> Result<Vec<Input>, String>
{
    let mut inputs = Vec::new();
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        if let Event::Key(key) = event::read().map_err(|err| err.to_string())? {
            if key.kind != KeyEventKind::Release {
                inputs.push(map_key(key));
            }
        }
    }
    Ok(inputs)
}

pub fn map_key(key: KeyEvent) -> Input
{
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
        KeyCode::Up => Input::Up,
        KeyCode::Down => Input::Down,
        KeyCode::Enter => Input::Confirm,
        KeyCode::Backspace => Input::Backspace,
        KeyCode::Esc => Input::Cancel,
        KeyCode::Char(ch) => Input::Char(ch),
        _ => Input::Other,
    }
}

fn ansi_color(color: Rgb) -> String
{
    format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}
