//! Terminal front end.
//!
//! Reads one command per line from stdin and prints the board after every
//! render. Saves go to the directory given as the first argument
//! (default `./.tile-merge`).
//!
//! Commands: `w a s d` / `h j k l` move, `z` undo, `r` restart,
//! `p` keep playing, `e` toggle setup, `g` start game from setup,
//! `x` reset to setup, `c` clear board, `t X Y` cycle a cell,
//! `m N` move by direction index (0 up, 1 right, 2 down, 3 left), `q` quit.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use tile_merge::core::{Direction, GameConfig, Position};
use tile_merge::input::{Key, KeyboardInput, Modifiers};
use tile_merge::session::{Intent, IntentHandler, SessionController};
use tile_merge::sinks::{Actuator, FileStorage, Frame, RenderMetadata};

/// Prints frames as a text grid.
struct TextActuator<W: Write> {
    out: W,
}

impl<W: Write> TextActuator<W> {
    fn say(&mut self, message: &str) {
        // A closed stdout only loses output; the session itself is unaffected.
        let _ = writeln!(self.out, "{message}");
    }
}

impl<W: Write> Actuator for TextActuator<W> {
    fn actuate(&mut self, frame: &Frame, metadata: &RenderMetadata) {
        let mut text = String::new();
        for y in 0..frame.size {
            for x in 0..frame.size {
                match frame.value_at(Position::new(x, y)) {
                    Some(value) => text.push_str(&format!("{value:>6}")),
                    None => text.push_str(&format!("{:>6}", ".")),
                }
            }
            text.push('\n');
        }
        text.push_str(&format!("score {}  best {}", metadata.score, metadata.best_score));
        if metadata.over {
            text.push_str("  -- game over --");
        } else if metadata.terminated {
            text.push_str("  -- you win! (p to keep playing) --");
        }
        self.say(&text);
    }

    fn continue_game(&mut self) {
        self.say("");
    }

    fn enter_setup_mode(&mut self) {
        self.say("setup mode: t X Y cycles a cell, c clears, g starts");
    }

    fn exit_setup_mode(&mut self) {
        self.say("setup mode off");
    }

    fn show_reset_setup(&mut self) {
        self.say("x resets to the authored board");
    }
}

fn parse_intent(line: &str, input: &mut KeyboardInput) -> Option<Intent> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;

    match command {
        "t" => {
            let x = parts.next()?.parse().ok()?;
            let y = parts.next()?.parse().ok()?;
            return Some(Intent::CycleTile(Position::new(x, y)));
        }
        "m" => {
            let index = parts.next()?.parse().ok()?;
            return Direction::from_index(index).map(Intent::Move);
        }
        _ => {}
    }

    let mut chars = command.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => input.key(Key::Char(c), Modifiers::NONE),
        _ => None,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".tile-merge"));

    let config = GameConfig::default();
    let mut input = KeyboardInput::new(config.size);
    let actuator = TextActuator { out: io::stdout() };

    let mut session = match SessionController::new(config, actuator, FileStorage::new(dir)) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line == "q" {
            break;
        }
        match parse_intent(line, &mut input) {
            Some(intent) => {
                if !session.handle(intent) {
                    tracing::debug!(?intent, "intent had no effect");
                }
            }
            None if line.is_empty() => {}
            None => eprintln!("unknown command: {line}"),
        }
    }
}
