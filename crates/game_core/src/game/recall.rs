//! Recall game: memorize a string while it is on screen, then type it back
//! from memory once it is hidden.

use std::time::Duration;

use crate::game::{mention, Outcome};
use crate::text::normalize_answer;

#[derive(Debug, Clone)]
pub struct RecallGame {
    secret: String,
    hide_delay: Duration,
}

impl RecallGame {
    pub fn new(secret: impl Into<String>, hide_delay: Duration) -> Self {
        Self {
            secret: secret.into(),
            hide_delay,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// How long the secret stays visible before the display is replaced.
    pub fn hide_delay(&self) -> Duration {
        self.hide_delay
    }

    /// Wrong attempts leave the session open for other players; only a
    /// normalized exact match wins.
    pub(crate) fn evaluate(
        &self,
        attempt: &str,
        participant_id: &str,
        elapsed_secs: f64,
    ) -> Outcome {
        if normalize_answer(attempt) == normalize_answer(&self.secret) {
            Outcome::Win {
                announcement: format!(
                    "🧠 **Impressive memory!** {} got it in {:.2} seconds!",
                    mention(participant_id),
                    elapsed_secs
                ),
                board: None,
            }
        } else {
            Outcome::Continue { board: None }
        }
    }

    pub(crate) fn start_message(&self) -> String {
        format!("Memorize the following string:\n`{}`", self.secret)
    }

    /// Replaces the displayed secret once the hide delay elapses.
    pub fn concealed_message(&self, time_limit_secs: f64) -> String {
        format!(
            "**What was the string?** You have {:.1} seconds!",
            time_limit_secs
        )
    }

    pub(crate) fn timeout_message(&self) -> String {
        format!("Time is up! The string was: `{}`.", self.secret)
    }
}
