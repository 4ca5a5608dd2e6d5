//! Builds the draw list for each screen. Nothing here touches the terminal.

use crate::game::round::{Feedback, Phase, RoundState, Verdict};
use crate::game::screen::{MENU, Menu};
use crate::game::Session;
use crate::leaderboard::Entry;
use std::time::Duration;

/// Layout is authored against a 720 px tall canvas and scaled to rows.
const CANVAS_HEIGHT: f32 = 720.0;
const BLINK_SECS: f32 = 0.7;
const LABEL_FADE_MS: f32 = 1000.0;
const SLIDE_FROM: f32 = -100.0;
const SLIDE_TO: f32 = 250.0;
const SLIDE_PER_SEC: f32 = 300.0;
const SCORE_FADE_PER_SEC: f32 = 300.0;

pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
pub const GREY: Rgb = Rgb { r: 190, g: 190, b: 190 };
pub const GOLD: Rgb = Rgb { r: 255, g: 215, b: 0 };
pub const YELLOW: Rgb = Rgb { r: 255, g: 255, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const RED: Rgb = Rgb { r: 255, g: 80, b: 80 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb
{
    /// Blends towards black, which is what the terminal background is assumed to be.
    pub fn at_opacity(self, opacity: u8) -> Rgb
    {
        let scale = |c: u8| ((c as u16 * opacity as u16) / 255) as u8;
        Rgb {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column
{
    Center,
    CenterAt(u16),
    Left(u16),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem
{
    pub text: String,
    pub row: u16,
    pub column: Column,
    pub color: Rgb,
    pub opacity: u8,
    /// Terminal stand-in for drawing the text larger.
    pub emphasis: bool,
}

impl TextItem
{
    fn new(text: impl Into<String>, row: u16, color: Rgb) -> Self
    {
        Self {
            text: text.into(),
            row,
            column: Column::Center,
            color,
            opacity: 255,
            emphasis: false,
        }
    }

    fn at(mut self, column: Column) -> Self
    {
        self.column = column;
        self
    }

    fn opacity(mut self, opacity: u8) -> Self
    {
        self.opacity = opacity;
        self
    }

    fn emphasis(mut self, emphasis: bool) -> Self
    {
        self.emphasis = emphasis;
        self
    }

    /// First column the text starts at, for a screen `width` wide.
    pub fn start_column(&self, width: u16) -> u16
    {
        let len = self.text.chars().count() as u16;
        match self.column {
            Column::Left(col) => col,
            Column::Center => (width / 2).saturating_sub(len / 2),
            Column::CenterAt(col) => col.saturating_sub(len / 2),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Frame
{
    pub width: u16,
    pub height: u16,
    pub items: Vec<TextItem>,
}

impl Frame
{
    pub fn new(width: u16, height: u16) -> Self
    {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    fn row(&self, canvas_y: f32) -> u16
    {
        let row = (canvas_y / CANVAS_HEIGHT * self.height as f32).round();
        (row.max(0.0) as u16).min(self.height.saturating_sub(1))
    }

    fn push(&mut self, item: TextItem)
    {
        self.items.push(item);
    }

    /// Darkens every item by the screen transition's `fade` opacity.
    pub fn apply_fade(&mut self, fade: u8)
    {
        if fade == 0 {
            return;
        }
        let keep = 255 - fade as u16;
        for item in &mut self.items {
            item.opacity = ((item.opacity as u16 * keep) / 255) as u8;
        }
    }

    #[cfg(test)]
    pub fn find(&self, needle: &str) -> Option<&TextItem>
    {
        self.items.iter().find(|item| item.text.contains(needle))
    }
}

fn blink_on(secs: f32) -> bool
{
    (secs / BLINK_SECS) as u32 % 2 == 0
}

pub fn title(frame: &mut Frame, secs: f32, menu: &Menu)
{
    let pulse = (secs * 3.0).sin() > 0.0;
    frame.push(TextItem::new("Memory Typing Game", frame.row(250.0), WHITE).emphasis(pulse));

    for (idx, item) in MENU.iter().enumerate() {
        let selected = idx == menu.selected_index();
        let label = if selected {
            format!("> {} <", item.label())
        } else {
            item.label().to_string()
        };
        let color = if selected { GOLD } else { GREY };
        let row = frame.row(350.0) + idx as u16;
        frame.push(TextItem::new(label, row, color).emphasis(selected));
    }

    if blink_on(secs) {
        let row = frame.row(350.0) + MENU.len() as u16 + 1;
        frame.push(TextItem::new("Up/Down to choose, Enter to start", row, GREY));
    }
}

pub fn name_entry(frame: &mut Frame, name: &str)
{
    frame.push(TextItem::new("Enter Your Name:", frame.row(220.0), WHITE).emphasis(true));
    frame.push(TextItem::new(format!("{name}_"), frame.row(300.0), YELLOW));
    frame.push(TextItem::new("Press Enter to continue", frame.row(380.0), GREY));
}

pub fn playing(
    frame: &mut Frame,
    secs: f32,
    session: &Session,
    state: &RoundState,
    elapsed: Duration,
)
{
    let pulse = (secs * 5.0).sin() > 0.5;
    frame.push(
        TextItem::new(format!("Score: {:.1}", state.score), 1, GOLD)
            .at(Column::Left(2))
            .emphasis(pulse),
    );
    let rounds = match session.max_rounds {
        Some(max) => format!("Round: {}/{}", state.round.min(max), max),
        None => format!("Round: {}/∞", state.round),
    };
    frame.push(TextItem::new(rounds, 2, WHITE).at(Column::Left(2)));

    let in_cycle = state.time_in_cycle(elapsed);
    if state.is_finished() {
        return;
    }
    if state.phase == Phase::Reveal {
        let progress = (in_cycle.as_secs_f32() / state.reveal().as_secs_f32()).clamp(0.0, 1.0);
        let center = (frame.width as f32 * (0.1 + 0.4 * progress)) as u16;
        frame.push(
            TextItem::new(state.word.clone(), frame.row(200.0), WHITE)
                .at(Column::CenterAt(center))
                .emphasis(true),
        );
        frame.push(TextItem::new("Get ready...", frame.row(350.0), GREY));
    } else {
        let since_open = in_cycle.saturating_sub(state.reveal()).as_millis() as f32;
        let label_opacity = (255.0 * since_open / LABEL_FADE_MS).min(255.0) as u8;
        frame.push(
            TextItem::new("Type the word:", frame.row(180.0), WHITE).opacity(label_opacity),
        );
        let cursor = if state.accepts_input() { "_" } else { "" };
        frame.push(TextItem::new(
            format!("{}{cursor}", state.input),
            frame.row(250.0),
            YELLOW,
        ));
    }

    if let Some(feedback) = &state.feedback {
        feedback_overlay(frame, feedback);
    }

    let hint = frame.height.saturating_sub(1);
    frame.push(TextItem::new("Enter submits, Esc leaves the game", hint, GREY).opacity(160));
}

fn feedback_overlay(frame: &mut Frame, feedback: &Feedback)
{
    let opacity = feedback.opacity as u8;
    if opacity == 0 {
        return;
    }
    let color = match feedback.verdict {
        Verdict::Correct => GREEN,
        Verdict::Empty | Verdict::Wrong | Verdict::TimeUp => RED,
    };
    frame.push(TextItem::new(feedback.message(), frame.row(420.0), color).opacity(opacity));
}

/// Score opacity for the game over screen, which starts once the title has
/// slid into place.
fn game_over_reveal(secs: f32) -> (f32, u8)
{
    let y = (SLIDE_FROM + SLIDE_PER_SEC * secs).min(SLIDE_TO);
    let settle = (SLIDE_TO - SLIDE_FROM) / SLIDE_PER_SEC;
    let alpha = ((secs - settle) * SCORE_FADE_PER_SEC).clamp(0.0, 255.0) as u8;
    (y, alpha)
}

pub fn game_over(frame: &mut Frame, secs: f32, score: f64, standings: &[Entry])
{
    let (y, alpha) = game_over_reveal(secs);
    if y >= 0.0 {
        frame.push(TextItem::new("Game Over!", frame.row(y), WHITE).emphasis(true));
    }
    frame.push(
        TextItem::new(format!("Your final score: {score:.1}"), frame.row(320.0), GOLD)
            .opacity(alpha),
    );
    frame.push(TextItem::new("Leaderboard (Top 5):", frame.row(380.0), WHITE).opacity(alpha));

    let first = frame.row(410.0);
    for (idx, entry) in standings.iter().enumerate() {
        let name = if entry.name.is_empty() {
            "anonymous"
        } else {
            entry.name.as_str()
        };
        let line = format!("{}. {} - {:.1}", idx + 1, name, entry.score);
        frame.push(TextItem::new(line, first + idx as u16, GOLD).opacity(alpha));
    }

    if alpha == 255 {
        let row = frame.row(550.0).max(first + standings.len() as u16 + 1);
        frame.push(TextItem::new("Press any key to return to title", row, GREY));
    }
}
