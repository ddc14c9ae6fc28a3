//! Command surface: the registration catalog exposed to the transport and
//! the option parsing that turns a request into a game.

use std::collections::HashMap;
use std::time::Duration;

use game_core::{GameKind, GameState, HangmanGame, RecallGame, ReflexGame, ScrambleGame};

use crate::error::Rejection;

/// A parsed start (or utility) command as delivered by the transport.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    /// Command name, e.g. `"hangman"`.
    pub command: String,
    pub group_id: String,
    pub channel_id: String,
    pub participant_id: String,
    /// Option name to raw value, exactly as typed.
    pub options: HashMap<String, String>,
}

impl CommandRequest {
    fn option(&self, name: &str) -> Result<&str, Rejection> {
        self.options
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Rejection::MissingOption(name.to_string()))
    }

    /// Parses a duration option given in seconds. Accepts both `2.5` and
    /// `2,5`; the value must be positive.
    fn time_option(&self, name: &str) -> Result<Duration, Rejection> {
        let raw = self.option(name)?;
        let normalized = raw.replace(',', ".");
        let secs: f64 = normalized
            .trim()
            .parse()
            .map_err(|_| Rejection::InvalidNumber {
                option: name.to_string(),
                value: raw.to_string(),
            })?;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(Rejection::NonPositiveTime(name.to_string()));
        }
        Ok(Duration::from_secs_f64(secs))
    }

    fn int_option(&self, name: &str, min: u32) -> Result<u32, Rejection> {
        let raw = self.option(name)?;
        let value: u32 = raw.trim().parse().map_err(|_| Rejection::InvalidNumber {
            option: name.to_string(),
            value: raw.to_string(),
        })?;
        if value < min {
            return Err(Rejection::BelowMinimum {
                option: name.to_string(),
                min,
            });
        }
        Ok(value)
    }
}

/// Builds the concrete game state for a start command, validating its
/// options. Utility commands (`cancel`) are not games and are rejected here.
pub(crate) fn build_game(req: &CommandRequest) -> Result<GameState, Rejection> {
    let (time_limit, kind) = match req.command.as_str() {
        "reflex" => {
            let time = req.time_option("time")?;
            let phrase = req.option("phrase")?.to_string();
            (time, GameKind::Reflex(ReflexGame::new(phrase)))
        }
        "recall" => {
            let hide = req.time_option("hide_time")?;
            let time = req.time_option("time_limit")?;
            let text = req.option("text")?.to_string();
            (time, GameKind::Recall(RecallGame::new(text, hide)))
        }
        "scramble" => {
            let time = req.time_option("time")?;
            let word = req.option("word")?.to_string();
            (time, GameKind::Scramble(ScrambleGame::new(word)))
        }
        "hangman" => {
            let time = req.time_option("time")?;
            let word = req.option("word")?;
            let errors = req.int_option("errors", 1)?;
            (time, GameKind::Hangman(HangmanGame::new(word, errors as usize)))
        }
        other => return Err(Rejection::UnknownCommand(other.to_string())),
    };

    Ok(GameState::new(
        &req.group_id,
        &req.participant_id,
        time_limit,
        kind,
    ))
}

/// Option value shapes a transport needs to know about when registering the
/// commands with the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Free text.
    Text,
    /// Seconds, locale-flexible decimal (`2.5` or `2,5`).
    Decimal,
    Integer,
}

#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub required: bool,
    pub description: &'static str,
}

/// One registrable chat command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [OptionSpec],
}

/// The catalog a transport registers with the chat platform.
pub fn command_specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "reflex",
            description: "Starts a reflex test in the channel.",
            options: &[
                OptionSpec {
                    name: "time",
                    kind: OptionKind::Decimal,
                    required: true,
                    description: "Time limit in seconds (e.g. 2.5 or 2,5).",
                },
                OptionSpec {
                    name: "phrase",
                    kind: OptionKind::Text,
                    required: true,
                    description: "The phrase to type.",
                },
            ],
        },
        CommandSpec {
            name: "recall",
            description: "Starts a memory game.",
            options: &[
                OptionSpec {
                    name: "hide_time",
                    kind: OptionKind::Decimal,
                    required: true,
                    description: "Seconds the text stays visible (e.g. 5).",
                },
                OptionSpec {
                    name: "time_limit",
                    kind: OptionKind::Decimal,
                    required: true,
                    description: "Seconds to answer after the text is hidden (e.g. 10).",
                },
                OptionSpec {
                    name: "text",
                    kind: OptionKind::Text,
                    required: true,
                    description: "The text to memorize.",
                },
            ],
        },
        CommandSpec {
            name: "scramble",
            description: "Starts a word-unscrambling game.",
            options: &[
                OptionSpec {
                    name: "time",
                    kind: OptionKind::Decimal,
                    required: true,
                    description: "Time limit in seconds.",
                },
                OptionSpec {
                    name: "word",
                    kind: OptionKind::Text,
                    required: true,
                    description: "The word to scramble.",
                },
            ],
        },
        CommandSpec {
            name: "hangman",
            description: "Starts a hangman game.",
            options: &[
                OptionSpec {
                    name: "word",
                    kind: OptionKind::Text,
                    required: true,
                    description: "The secret word to guess.",
                },
                OptionSpec {
                    name: "time",
                    kind: OptionKind::Decimal,
                    required: true,
                    description: "Time limit in seconds (e.g. 120).",
                },
                OptionSpec {
                    name: "errors",
                    kind: OptionKind::Integer,
                    required: true,
                    description: "Maximum number of wrong guesses (minimum 1).",
                },
            ],
        },
        CommandSpec {
            name: "cancel",
            description: "Cancels the game active in the channel.",
            options: &[],
        },
    ]
}
