//! The game-state variant family and its evaluate-attempt contract.
//!
//! One `GameState` is the live state of one session. The common fields
//! (time limit, originator, activation instant, board handle) live here;
//! everything variant-specific hangs off the `GameKind` tag.

pub mod hangman;
pub mod recall;
pub mod reflex;
pub mod scramble;

use std::time::{Duration, Instant};

use crate::game::hangman::HangmanGame;
use crate::game::recall::RecallGame;
use crate::game::reflex::ReflexGame;
use crate::game::scramble::ScrambleGame;

/// Opaque handle to a message the transport has already delivered, kept so
/// board-style games can edit their displayed state in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle(pub String);

/// What a single evaluated attempt did to the session.
///
/// `Win` and `Loss` are both terminal: the controller removes the session
/// from the registry and posts the announcement. A `board` payload, when
/// present, is the re-rendered display the stored board message should be
/// edited to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The attempt did not count; nothing changed.
    Ignored,
    /// The session stays open.
    Continue { board: Option<String> },
    /// The attempt resolved the session in the players' favor.
    Win {
        announcement: String,
        board: Option<String>,
    },
    /// The attempt resolved the session against the players.
    Loss {
        announcement: String,
        board: Option<String>,
    },
}

/// Variant payloads, one per game type.
#[derive(Debug, Clone)]
pub enum GameKind {
    /// Type the displayed phrase as fast and as accurately as possible.
    Reflex(ReflexGame),
    /// Memorize a string, then type it back after it is hidden.
    Recall(RecallGame),
    /// Unscramble the displayed word.
    Scramble(ScrambleGame),
    /// Guess the secret word letter by letter within an error budget.
    Hangman(HangmanGame),
}

/// The live state of one session: common attributes plus the variant tag.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Group the originating channel belongs to, for policy lookups.
    pub group_id: String,
    /// Participant who issued the start command.
    pub originator_id: String,
    /// How long the game accepts attempts once active.
    pub time_limit: Duration,
    /// Set when the session is inserted into the registry; attempts are
    /// timed against this instant.
    pub started_at: Option<Instant>,
    /// Board message handle for variants that edit a displayed board.
    pub board: Option<MessageHandle>,
    pub kind: GameKind,
}

impl GameState {
    pub fn new(
        group_id: impl Into<String>,
        originator_id: impl Into<String>,
        time_limit: Duration,
        kind: GameKind,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            originator_id: originator_id.into(),
            time_limit,
            started_at: None,
            board: None,
            kind,
        }
    }

    /// Seconds elapsed since activation, 0.0 if the game never activated.
    pub fn elapsed_secs(&self) -> f64 {
        self.started_at
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or_default()
    }

    pub fn time_limit_secs(&self) -> f64 {
        self.time_limit.as_secs_f64()
    }

    /// Evaluates one attempt from an eligible participant.
    ///
    /// The self-play rule is the controller's job; by the time this runs the
    /// attempt is known to count.
    pub fn evaluate(&mut self, attempt: &str, participant_id: &str) -> Outcome {
        let elapsed = self.elapsed_secs();
        let limit = self.time_limit_secs();
        match &mut self.kind {
            GameKind::Reflex(game) => game.evaluate(attempt, participant_id, elapsed),
            GameKind::Recall(game) => game.evaluate(attempt, participant_id, elapsed),
            GameKind::Scramble(game) => game.evaluate(attempt, participant_id, elapsed),
            GameKind::Hangman(game) => game.evaluate(attempt, participant_id, limit),
        }
    }

    /// The message that opens the active phase: the challenge text, or the
    /// initial board for board variants.
    pub fn start_message(&self) -> String {
        match &self.kind {
            GameKind::Reflex(game) => game.start_message(self.time_limit_secs()),
            GameKind::Recall(game) => game.start_message(),
            GameKind::Scramble(game) => game.start_message(self.time_limit_secs()),
            GameKind::Hangman(game) => game.render_board(self.time_limit_secs()),
        }
    }

    /// What the channel is told when the timeout fires before a win.
    pub fn timeout_message(&self) -> String {
        match &self.kind {
            GameKind::Reflex(game) => game.timeout_message(),
            GameKind::Recall(game) => game.timeout_message(),
            GameKind::Scramble(game) => game.timeout_message(),
            GameKind::Hangman(game) => game.timeout_message(),
        }
    }
}

/// Announcement rendering for a participant. Mention markup belongs to the
/// transport; the engine stays platform-neutral.
pub(crate) fn mention(participant_id: &str) -> String {
    format!("@{participant_id}")
}
