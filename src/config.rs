use crate::game::Mode;
use crate::leaderboard::DEFAULT_FILE;
use std::path::PathBuf;

pub const DEFAULT_ROUNDS: u32 = 100;
const MIN_ROUNDS: u32 = 1;
const MAX_ROUNDS: u32 = 999;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig
{
    pub ranked_rounds: u32,
    pub leaderboard: PathBuf,
    pub words: Option<PathBuf>,
    pub mode: Mode,
    pub muted: bool,
    pub key_clicks: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig
{
    fn default() -> Self
    {
        Self {
            ranked_rounds: DEFAULT_ROUNDS,
            leaderboard: PathBuf::from(DEFAULT_FILE),
            words: None,
            mode: Mode::Ranked,
            muted: false,
            key_clicks: false,
            log_file: None,
        }
    }
}

impl GameConfig
{
    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value.to_string())),
                None => (arg.as_str(), None),
            };
            let mut value = |name: &str| -> Result<String, String> {
                match &inline {
                    Some(value) => Ok(value.clone()),
                    None => iter
                        .next()
                        .cloned()
                        .ok_or_else(|| format!("Expected value after {name}")),
                }
            };

            match flag {
                "--rounds" => config.ranked_rounds = parse_rounds(&value("--rounds")?)?,
                "--leaderboard" => config.leaderboard = PathBuf::from(value("--leaderboard")?),
                "--words" => config.words = Some(PathBuf::from(value("--words")?)),
                "--log" => config.log_file = Some(PathBuf::from(value("--log")?)),
                "--mode" => {
                    let name = value("--mode")?;
                    config.mode = Mode::parse(&name)
                        .ok_or_else(|| format!("Unknown mode '{name}' (ranked or freestyle)"))?;
                }
                "--mute" if inline.is_none() => config.muted = true,
                "--key-clicks" if inline.is_none() => config.key_clicks = true,
                _ => return Err(format!("Unknown option '{arg}'")),
            }
        }
        Ok(config)
    }
}

fn parse_rounds(value: &str) -> Result<u32, String>
{
    let parsed = value
        .parse::<u32>()
        .map_err(|_| "Rounds must be a whole number".to_string())?;
    if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&parsed) {
        return Err(format!("Rounds must be between {MIN_ROUNDS} and {MAX_ROUNDS}"));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String>
    {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn defaults()
    {
        let config = GameConfig::from_args(&[]).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.ranked_rounds, 100);
        assert_eq!(config.leaderboard, PathBuf::from("leaderboard.json"));
    }

    #[test]
    fn both_value_styles()
    {
        let config = GameConfig::from_args(&args(&[
            "--rounds=20",
            "--leaderboard",
            "/tmp/scores.json",
            "--mode=freestyle",
            "--words",
            "words.txt",
            "--mute",
        ]))
        .unwrap();
        assert_eq!(config.ranked_rounds, 20);
        assert_eq!(config.leaderboard, PathBuf::from("/tmp/scores.json"));
        assert_eq!(config.mode, Mode::Freestyle);
        assert_eq!(config.words, Some(PathBuf::from("words.txt")));
        assert!(config.muted);
        assert!(!config.key_clicks);
    }

    #[test]
    fn rejects_bad_input()
    {
        assert!(GameConfig::from_args(&args(&["--rounds=0"])).is_err());
        assert!(GameConfig::from_args(&args(&["--rounds=lots"])).is_err());
        assert!(GameConfig::from_args(&args(&["--rounds"])).is_err());
        assert!(GameConfig::from_args(&args(&["--mode=arcade"])).is_err());
        assert!(GameConfig::from_args(&args(&["--mute=yes"])).is_err());
        assert_eq!(
            GameConfig::from_args(&args(&["--speed=3"])).unwrap_err(),
            "Unknown option '--speed=3'"
        );
    }
}
