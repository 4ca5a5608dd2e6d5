use crate::config::GameConfig;
use crate::cues::{Cue, Cues};
use crate::game::round::{RoundEvent, RoundState, Verdict};
use crate::game::screen::{Menu, MenuItem, NameEntry, Screen, Screens, Trigger};
use crate::game::{Mode, Session};
use crate::leaderboard::{Entry, Leaderboard};
use crate::render::{self, Frame};
use crate::terminal::{self, Input, TerminalGuard};
use crate::words::Dictionary;
use rand::Rng;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow
{
    Continue,
    Quit,
}

/// Owns every piece of game state. Time is handed in by the frame loop as the
/// duration since the app started.
pub struct App<W: Write, R: Rng>
{
    config: GameConfig,
    dictionary: Dictionary,
    leaderboard: Leaderboard,
    cues: Cues<W>,
    rng: R,
    screens: Screens,
    menu: Menu,
    name: NameEntry,
    pending_mode: Mode,
    session: Option<Session>,
    round: RoundState,
    play_started: Duration,
    screen_started: Duration,
    standings: Vec<Entry>,
    now: Duration,
}

impl<W: Write, R: Rng> App<W, R>
{
    pub fn new(config: GameConfig, dictionary: Dictionary, cues: Cues<W>, rng: R) -> Self
    {
        let leaderboard = Leaderboard::new(config.leaderboard.clone());
        let menu = Menu::new(config.mode);
        Self {
            pending_mode: config.mode,
            config,
            dictionary,
            leaderboard,
            cues,
            rng,
            screens: Screens::new(),
            menu,
            name: NameEntry::default(),
            session: None,
            round: RoundState::new(),
            play_started: Duration::ZERO,
            screen_started: Duration::ZERO,
            standings: Vec::new(),
            now: Duration::ZERO,
        }
    }

    #[cfg(test)]
    pub fn screen(&self) -> Screen
    {
        self.screens.current()
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&Session>
    {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub fn round(&self) -> &RoundState
    {
        &self.round
    }

    #[cfg(test)]
    pub fn standings(&self) -> &[Entry]
    {
        &self.standings
    }

    /// Runs one frame: inputs first, then the fade, then the round clock.
    pub fn frame(&mut self, inputs: &[Input], now: Duration) -> Flow
    {
        self.now = now;
        for input in inputs {
            if self.handle(*input) == Flow::Quit {
                info!("quit requested");
                return Flow::Quit;
            }
        }

        if let Some(entered) = self.screens.step() {
            self.enter(entered);
        }

        if self.screens.current() == Screen::Playing {
            self.tick_round();
        }
        Flow::Continue
    }

    fn handle(&mut self, input: Input) -> Flow
    {
        if input == Input::Quit {
            return Flow::Quit;
        }
        if self.screens.is_fading() {
            return Flow::Continue;
        }

        match self.screens.current() {
            Screen::Title => return self.handle_title(input),
            Screen::Playing => self.handle_playing(input),
            Screen::NameEntry => self.handle_name(input),
            Screen::GameOver => {
                self.fire(Trigger::Dismiss);
            }
        }
        Flow::Continue
    }

    fn handle_title(&mut self, input: Input) -> Flow
    {
        match input {
            Input::Up => self.menu.up(),
            Input::Down => self.menu.down(),
            Input::Cancel => return Flow::Quit,
            Input::Confirm | Input::Char(' ') => match self.menu.selected() {
                MenuItem::Play(mode) => {
                    self.pending_mode = mode;
                    self.fire(Trigger::Start);
                }
                MenuItem::Quit => return Flow::Quit,
            },
            _ => {}
        }
        Flow::Continue
    }

    fn handle_playing(&mut self, input: Input)
    {
        match input {
            Input::Cancel => {
                info!(round = self.round.round, score = self.round.score, "session abandoned");
                self.fire(Trigger::Abandon);
            }
            Input::Char(ch) => {
                if self.round.push_char(ch) {
                    self.cues.play(Cue::Keystroke);
                }
            }
            Input::Backspace => {
                if self.round.pop_char() {
                    self.cues.play(Cue::Keystroke);
                }
            }
            Input::Confirm => {
                let elapsed = self.now.saturating_sub(self.play_started);
                match self.round.submit(elapsed) {
                    Some(Verdict::Correct) => self.cues.play(Cue::Correct),
                    Some(_) => self.cues.play(Cue::Wrong),
                    None => {}
                }
            }
            _ => {}
        }
    }

    fn handle_name(&mut self, input: Input)
    {
        match input {
            Input::Char(ch) => {
                self.name.push(ch);
            }
            Input::Backspace => self.name.pop(),
            Input::Confirm => {
                if let Some(name) = self.name.commit() {
                    self.commit_name(name);
                }
            }
            _ => {}
        }
    }

    fn commit_name(&mut self, name: String)
    {
        let score = self.round.score;
        self.standings = match self.leaderboard.record(Entry::new(&name, score)) {
            Ok(entries) => entries,
            Err((entries, err)) => {
                warn!("score not saved: {err}");
                entries
            }
        };
        if let Some(session) = self.session.as_mut() {
            session.player_name = Some(name);
        }
        self.fire(Trigger::NameCommitted);
    }

    fn fire(&mut self, trigger: Trigger)
    {
        if self.screens.fire(trigger) {
            self.cues.play(Cue::Transition);
        }
    }

    fn enter(&mut self, screen: Screen)
    {
        info!(?screen, "entered screen");
        self.screen_started = self.now;
        match screen {
            Screen::Title => {
                self.session = None;
            }
            Screen::Playing => {
                let session = Session::new(self.pending_mode, self.config.ranked_rounds);
                info!(mode = ?session.mode, max_rounds = ?session.max_rounds, "session started");
                self.session = Some(session);
                self.round = RoundState::new();
                self.play_started = self.now;
            }
            Screen::NameEntry => self.name.clear(),
            Screen::GameOver => {
                if self.session.as_ref().is_some_and(|s| s.player_name.is_none()) {
                    self.standings = self.leaderboard.load();
                }
            }
        }
    }

    fn tick_round(&mut self)
    {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let elapsed = self.now.saturating_sub(self.play_started);
        let events = self
            .round
            .tick(elapsed, &self.dictionary, &mut self.rng, session.max_rounds);

        let mut finished = false;
        for event in events {
            match event {
                RoundEvent::TimedOut => self.cues.play(Cue::Wrong),
                RoundEvent::Finished => {
                    session.score = self.round.score;
                    finished = true;
                }
                RoundEvent::Started { .. } | RoundEvent::TypeOpened => {}
            }
        }

        if finished {
            let named = session.is_ranked();
            info!(score = session.score, "rounds exhausted");
            self.fire(Trigger::RoundsExhausted { named });
        }
    }

    pub fn view(&self, width: u16, height: u16) -> Frame
    {
        let mut frame = Frame::new(width, height);
        let secs = self.now.saturating_sub(self.screen_started).as_secs_f32();
        match self.screens.current() {
            Screen::Title => render::title(&mut frame, secs, &self.menu),
            Screen::NameEntry => render::name_entry(&mut frame, self.name.text()),
            Screen::Playing => {
                if let Some(session) = &self.session {
                    let elapsed = self.now.saturating_sub(self.play_started);
                    render::playing(&mut frame, secs, session, &self.round, elapsed);
                }
            }
            Screen::GameOver => {
                let score = self.session.as_ref().map_or(self.round.score, |s| s.score);
                render::game_over(&mut frame, secs, score, &self.standings);
            }
        }
        frame.apply_fade(self.screens.fade_opacity());
        frame
    }
}

/// The 60 Hz draw/poll loop.
pub fn run<W: Write, R: Rng>(mut app: App<W, R>) -> Result<(), String>
{
    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let clock = Instant::now();

    loop {
        let frame_start = Instant::now();
        let inputs = terminal::read_inputs()?;
        if app.frame(&inputs, clock.elapsed()) == Flow::Quit {
            break;
        }

        let (width, height) = terminal::size();
        term.draw(&app.view(width, height))?;

        let spent = frame_start.elapsed();
        if spent < FRAME {
            std::thread::sleep(FRAME - spent);
        }
    }
    Ok(())
}
