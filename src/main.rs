mod app;
mod config;
mod cues;
mod game;
mod leaderboard;
mod logging;
mod render;
mod terminal;
mod words;

use config::GameConfig;
use std::env;
use tracing::{info, warn};

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String>
{
    let mut args = env::args().skip(1).peekable();
    let command = if args.peek().is_some_and(|arg| !arg.starts_with("--")) {
        args.next()
    } else {
        None
    };
    let rest: Vec<String> = args.collect();
    match command.as_deref() {
        None | Some("play") => play(&rest),
        Some("list") => {
            list_modes();
            Ok(())
        }
        Some("scores") => {
            let config = GameConfig::from_args(&rest)?;
            print_scores(&config);
            Ok(())
        }
        Some("-h") | Some("help") => {
            print_help();
            Ok(())
        }
        Some(other) => Err(format!("Unknown command '{other}'. Run with --help.")),
    }
}

fn play(args: &[String]) -> Result<(), String>
{
    if args.iter().any(|arg| arg == "--help") {
        print_help();
        return Ok(());
    }
    let config = GameConfig::from_args(args)?;
    let log_path = config.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init_tracing(&log_path);
    info!(?config, "starting");

    let dictionary = match &config.words {
        Some(path) => match words::Dictionary::load(path) {
            Ok(dictionary) => dictionary,
            Err(err) => {
                warn!("{err}, using the built-in word list");
                eprintln!("Warning: {err}. Using the built-in word list.");
                words::Dictionary::builtin()
            }
        },
        None => words::Dictionary::builtin(),
    };
    info!(words = dictionary.len(), "dictionary ready");
    for len in game::round::BASE_WORD_LEN..=words::MAX_WORD_LEN {
        if !dictionary.has_len(len) {
            warn!(len, "no words of this length, rounds will pick from the whole list");
        }
    }

    let cues = cues::Cues::terminal(config.muted, config.key_clicks);
    info!(cues = ?cues.enabled_cues(), "cues ready");
    let game = app::App::new(config, dictionary, cues, rand::thread_rng());
    app::run(game)
}

fn list_modes()
{
    println!("Available modes:");
    for mode in game::registry() {
        println!("  {:<10} - {}", mode.name, mode.description);
    }
}

fn print_scores(config: &GameConfig)
{
    let board = leaderboard::Leaderboard::new(config.leaderboard.clone());
    let entries = board.load();
    if entries.is_empty() {
        println!("No scores yet in {}.", board.path().display());
        return;
    }
    println!("Leaderboard (Top {}, {}):", leaderboard::CAPACITY, board.path().display());
    for (idx, entry) in entries.iter().enumerate() {
        let name = if entry.name.is_empty() {
            "anonymous"
        } else {
            entry.name.as_str()
        };
        println!("  {}. {:<12} {:>6.1}", idx + 1, name, entry.score);
    }
}

fn print_help()
{
    println!("word-flash");
    println!("\nUsage:");
    println!("  word-flash [play] [options]");
    println!("  word-flash list");
    println!("  word-flash scores [--leaderboard=PATH]");
    println!("\nOptions:");
    println!("  --rounds=N            Ranked round count (default {})", config::DEFAULT_ROUNDS);
    println!("  --mode=MODE           Preselect ranked or freestyle");
    println!("  --leaderboard=PATH    Leaderboard file (default {})", leaderboard::DEFAULT_FILE);
    println!("  --words=PATH          Word list, one word per line");
    println!("  --mute                No bell cues");
    println!("  --key-clicks          Bell on every keystroke");
    println!("  --log=PATH            Log file (default {})", logging::default_log_path().display());
    println!("\nNotes:");
    println!("  A word flashes up, then vanishes. Type it back before the round ends.");
    println!("  Set {} to change the log filter, e.g. word_flash=debug.", logging::FILTER_VAR);
}
