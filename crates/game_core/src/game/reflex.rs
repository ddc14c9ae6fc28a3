//! Reflex game: type the displayed phrase before the clock runs out.
//!
//! The first attempt that counts ends the game no matter how accurate it
//! was; the player gets a partial-credit score instead of a retry.

use crate::game::{mention, Outcome};
use crate::score::{max_score, score};

#[derive(Debug, Clone)]
pub struct ReflexGame {
    phrase: String,
}

impl ReflexGame {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
        }
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub(crate) fn evaluate(
        &self,
        attempt: &str,
        participant_id: &str,
        elapsed_secs: f64,
    ) -> Outcome {
        let attempt = attempt.trim();
        let points = score(&self.phrase, attempt);
        let max = max_score(&self.phrase);
        let percent = if max > 0 {
            points as f64 / max as f64 * 100.0
        } else {
            0.0
        };
        Outcome::Win {
            announcement: format!(
                "🎉 {} answered in {:.2} seconds!\n\
                 **Expected phrase:** `{}`\n\
                 **Your answer:** `{}`\n\
                 **Score:** {} of {} ({:.2}%)",
                mention(participant_id),
                elapsed_secs,
                self.phrase,
                attempt,
                points,
                max,
                percent
            ),
            board: None,
        }
    }

    pub(crate) fn start_message(&self, time_limit_secs: f64) -> String {
        format!(
            "Time limit: **{:.1} seconds**\n\nGO! Type the phrase: `{}`",
            time_limit_secs, self.phrase
        )
    }

    pub(crate) fn timeout_message(&self) -> String {
        "Time is up and nobody answered!".to_string()
    }
}
