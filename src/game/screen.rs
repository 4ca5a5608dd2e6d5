use super::Mode;
use tracing::debug;

pub const FADE_STEP: u8 = 15;
pub const FADE_MAX: u8 = 255;
pub const NAME_MAX: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen
{
    Title,
    NameEntry,
    Playing,
    GameOver,
}

/// Everything that can move the game from one screen to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger
{
    Start,
    RoundsExhausted
    {
        named: bool,
    },
    NameCommitted,
    Abandon,
    Dismiss,
}

pub fn transition(from: Screen, trigger: Trigger) -> Option<Screen>
{
    match (from, trigger) {
        (Screen::Title, Trigger::Start) => Some(Screen::Playing),
        (Screen::Playing, Trigger::RoundsExhausted { named: true }) => Some(Screen::NameEntry),
        (Screen::Playing, Trigger::RoundsExhausted { named: false }) => Some(Screen::GameOver),
        (Screen::Playing, Trigger::Abandon) => Some(Screen::Title),
        (Screen::NameEntry, Trigger::NameCommitted) => Some(Screen::GameOver),
        (Screen::GameOver, Trigger::Dismiss) => Some(Screen::Title),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FadeDirection
{
    Out,
    In,
}

#[derive(Clone, Copy, Debug)]
struct Fade
{
    opacity: u8,
    direction: FadeDirection,
    target: Screen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem
{
    Play(Mode),
    Quit,
}

impl MenuItem
{
    pub fn label(self) -> &'static str
    {
        match self {
            MenuItem::Play(mode) => mode.descriptor().name,
            MenuItem::Quit => "Quit",
        }
    }
}

pub const MENU: [MenuItem; 3] = [
    MenuItem::Play(Mode::Ranked),
    MenuItem::Play(Mode::Freestyle),
    MenuItem::Quit,
];

pub struct Menu
{
    selected: usize,
}

impl Menu
{
    pub fn new(preselect: Mode) -> Self
    {
        let selected = MENU
            .iter()
            .position(|item| *item == MenuItem::Play(preselect))
            .unwrap_or(0);
        Self { selected }
    }

    pub fn up(&mut self)
    {
        self.selected = (self.selected + MENU.len() - 1) % MENU.len();
    }

    pub fn down(&mut self)
    {
        self.selected = (self.selected + 1) % MENU.len();
    }

    pub fn selected(&self) -> MenuItem
    {
        MENU[self.selected]
    }

    pub fn selected_index(&self) -> usize
    {
        self.selected
    }
}

#[derive(Default)]
pub struct NameEntry
{
    name: String,
}

impl NameEntry
{
    pub fn push(&mut self, ch: char) -> bool
    {
        let printable = !ch.is_control() && (ch == ' ' || !ch.is_whitespace());
        if !printable || self.name.chars().count() >= NAME_MAX {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub fn pop(&mut self)
    {
        self.name.pop();
    }

    pub fn text(&self) -> &str
    {
        &self.name
    }

    /// The trimmed name, or `None` while it is blank.
    pub fn commit(&self) -> Option<String>
    {
        let name = self.name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    pub fn clear(&mut self)
    {
        self.name.clear();
    }
}

/// Which screen is active plus the fade that switches between screens.
pub struct Screens
{
    current: Screen,
    fade: Option<Fade>,
}

impl Screens
{
    pub fn new() -> Self
    {
        Self {
            current: Screen::Title,
            fade: None,
        }
    }

    pub fn current(&self) -> Screen
    {
        self.current
    }

    pub fn is_fading(&self) -> bool
    {
        self.fade.is_some()
    }

    pub fn fade_opacity(&self) -> u8
    {
        self.fade.map_or(0, |fade| fade.opacity)
    }

    /// Starts a fade towards the screen `trigger` leads to. Ignored while a
    /// fade is already running or when the table has no such transition.
    pub fn fire(&mut self, trigger: Trigger) -> bool
    {
        if self.fade.is_some() {
            return false;
        }
        let Some(target) = transition(self.current, trigger) else {
            debug!(screen = ?self.current, ?trigger, "no transition");
            return false;
        };
        debug!(from = ?self.current, to = ?target, "fading");
        self.fade = Some(Fade {
            opacity: 0,
            direction: FadeDirection::Out,
            target,
        });
        true
    }

    /// Advances the fade by one frame. Returns the newly entered screen on
    /// the frame the switch happens, which is when the fade is fully opaque.
    pub fn step(&mut self) -> Option<Screen>
    {
        let fade = self.fade.as_mut()?;
        match fade.direction {
            FadeDirection::Out => {
                fade.opacity = fade.opacity.saturating_add(FADE_STEP);
                if fade.opacity >= FADE_MAX {
                    fade.direction = FadeDirection::In;
                    self.current = fade.target;
                    return Some(self.current);
                }
            }
            FadeDirection::In => {
                fade.opacity = fade.opacity.saturating_sub(FADE_STEP);
                if fade.opacity == 0 {
                    self.fade = None;
                }
            }
        }
        None
    }
}

impl Default for Screens
{
    fn default() -> Self
    {
        Self::new()
    }
}
