pub mod round;
pub mod screen;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode
{
    Ranked,
    Freestyle,
}

pub struct ModeDescriptor
{
    pub mode: Mode,
    pub name: &'static str,
    pub description: &'static str,
}

impl Mode
{
    pub fn descriptor(self) -> &'static ModeDescriptor
    {
        match self {
            Mode::Ranked => &REGISTRY[0],
            Mode::Freestyle => &REGISTRY[1],
        }
    }

    pub fn parse(value: &str) -> Option<Self>
    {
        registry()
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(value))
            .map(|entry| entry.mode)
    }
}

static REGISTRY: [ModeDescriptor; 2] = [
    ModeDescriptor {
        mode: Mode::Ranked,
        name: "Ranked",
        description: "Fixed number of rounds, top scores go on the leaderboard",
    },
    ModeDescriptor {
        mode: Mode::Freestyle,
        name: "Freestyle",
        description: "Endless rounds for practice, nothing is saved",
    },
];

pub fn registry() -> &'static [ModeDescriptor]
{
    &REGISTRY
}

/// Lives from mode selection until the player is back on the title screen.
#[derive(Clone, Debug)]
pub struct Session
{
    pub mode: Mode,
    pub max_rounds: Option<u32>,
    pub score: f64,
    pub player_name: Option<String>,
}

impl Session
{
    pub fn new(mode: Mode, ranked_rounds: u32) -> Self
    {
        let max_rounds = match mode {
            Mode::Ranked => Some(ranked_rounds),
            Mode::Freestyle => None,
        };
        Self {
            mode,
            max_rounds,
            score: 0.0,
            player_name: None,
        }
    }

    pub fn is_ranked(&self) -> bool
    {
        self.mode == Mode::Ranked
    }
}
