//! Scramble game: unscramble the displayed word.
//!
//! Like reflex, the first attempt that counts resolves the game and is
//! scored for partial credit rather than retried.

use rand::seq::SliceRandom;

use crate::game::{mention, Outcome};
use crate::score::{max_score, score};

#[derive(Debug, Clone)]
pub struct ScrambleGame {
    word: String,
    scrambled: String,
}

impl ScrambleGame {
    /// Builds the game and scrambles the word. Re-rolls while the shuffle
    /// reproduces the original, so a word of two or more characters never
    /// shows up unscrambled.
    pub fn new(word: impl Into<String>) -> Self {
        let word = word.into();
        let scrambled = scramble_word(&word);
        Self { word, scrambled }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn scrambled(&self) -> &str {
        &self.scrambled
    }

    pub(crate) fn evaluate(
        &self,
        attempt: &str,
        participant_id: &str,
        elapsed_secs: f64,
    ) -> Outcome {
        let attempt = attempt.trim();
        let points = score(&self.word, attempt);
        let max = max_score(&self.word);
        let percent = if max > 0 {
            points as f64 / max as f64 * 100.0
        } else {
            0.0
        };
        Outcome::Win {
            announcement: format!(
                "✅ {} answered in {:.2} seconds!\n\
                 **The word was:** `{}`\n\
                 **Your answer:** `{}`\n\
                 **Score:** {} of {} ({:.2}%)",
                mention(participant_id),
                elapsed_secs,
                self.word,
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
            "Time limit: **{:.1} seconds**\n\nUnscramble the following word: `{}`",
            time_limit_secs, self.scrambled
        )
    }

    pub(crate) fn timeout_message(&self) -> String {
        format!("Time is up! The word was: `{}`.", self.word)
    }
}

fn scramble_word(word: &str) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    // A word with fewer than two distinct characters has only one
    // permutation; re-rolling would never terminate.
    let first = chars.first().copied();
    if chars.iter().all(|c| Some(*c) == first) {
        return word.to_string();
    }
    let mut rng = rand::thread_rng();
    loop {
        chars.shuffle(&mut rng);
        let shuffled: String = chars.iter().collect();
        if shuffled != word {
            return shuffled;
        }
    }
}
