//! Hangman: guess the secret word letter by letter, or gamble on the whole
//! word, within a fixed error budget.
//!
//! Two independent terminal conditions: a win the instant every alphabetic
//! character of the secret is revealed (or a whole-word guess matches), and
//! a loss the instant wrong letters plus wrong words reach the budget.

use std::collections::BTreeSet;

use crate::game::{mention, Outcome};
use crate::text::normalize;

#[derive(Debug, Clone)]
pub struct HangmanGame {
    /// Secret word, normalized at construction.
    secret: String,
    max_errors: usize,
    correct_letters: BTreeSet<char>,
    wrong_letters: BTreeSet<char>,
    wrong_words: BTreeSet<String>,
}

impl HangmanGame {
    pub fn new(secret: &str, max_errors: usize) -> Self {
        Self {
            secret: normalize(secret),
            max_errors,
            correct_letters: BTreeSet::new(),
            wrong_letters: BTreeSet::new(),
            wrong_words: BTreeSet::new(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn error_count(&self) -> usize {
        self.wrong_letters.len() + self.wrong_words.len()
    }

    /// Classifies and applies one attempt.
    ///
    /// Length-1 alphabetic input is a letter guess, longer input is a
    /// whole-word guess, anything else is ignored. Every accepted guess
    /// re-renders the board, except a winning whole-word guess, which goes
    /// straight to the victory announcement.
    pub(crate) fn evaluate(
        &mut self,
        attempt: &str,
        participant_id: &str,
        time_limit_secs: f64,
    ) -> Outcome {
        let attempt = normalize(attempt);
        let mut chars = attempt.chars();
        let (first, rest) = (chars.next(), chars.next());

        match (first, rest) {
            (None, _) => return Outcome::Ignored,
            // Whole-word guess.
            (Some(_), Some(_)) => {
                if attempt == self.secret {
                    return Outcome::Win {
                        announcement: format!(
                            "🎉 **VICTORY!** {} guessed the whole word: `{}`!",
                            mention(participant_id),
                            self.secret
                        ),
                        board: None,
                    };
                }
                self.wrong_words.insert(attempt);
            }
            // Letter guess.
            (Some(letter), None) if letter.is_alphabetic() => {
                if self.correct_letters.contains(&letter) || self.wrong_letters.contains(&letter)
                {
                    return Outcome::Ignored;
                }
                if self.secret.contains(letter) {
                    self.correct_letters.insert(letter);
                } else {
                    self.wrong_letters.insert(letter);
                }
            }
            // Digits, symbols and the like are not guesses.
            _ => return Outcome::Ignored,
        }

        let board = Some(self.render_board(time_limit_secs));

        if self.all_letters_revealed() {
            return Outcome::Win {
                announcement: format!(
                    "🎉 **Congratulations!** {} guessed the last letter — you win! \
                     The word was `{}`.",
                    mention(participant_id),
                    self.secret
                ),
                board,
            };
        }

        if self.error_count() >= self.max_errors {
            return Outcome::Loss {
                announcement: format!(
                    "💀 **Game over!** You have been hanged! The word was `{}`.",
                    self.secret
                ),
                board,
            };
        }

        Outcome::Continue { board }
    }

    fn all_letters_revealed(&self) -> bool {
        self.secret
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(|c| self.correct_letters.contains(&c))
    }

    /// Renders the board: the word with unrevealed letters masked,
    /// the wrong guesses so far, and the error budget.
    pub fn render_board(&self, time_limit_secs: f64) -> String {
        let masked: String = self
            .secret
            .chars()
            .map(|c| {
                if !c.is_alphabetic() || self.correct_letters.contains(&c) {
                    c.to_string()
                } else {
                    "_".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        let mut wrong = self
            .wrong_letters
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if wrong.is_empty() {
            wrong = "None yet.".to_string();
        }
        if !self.wrong_words.is_empty() {
            let words = self
                .wrong_words
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            wrong = format!("{wrong}\n**Wrong words:** {words}");
        }

        let errors = self.error_count();
        let budget: String = (0..self.max_errors)
            .map(|i| if i < errors { "❌" } else { "⬜" })
            .collect();

        format!(
            "**Hangman**\n\
             Word: `{}`\n\
             Wrong guesses: {}\n\
             Errors: {} ({}/{})\n\
             Time limit: **{:.1}** seconds\n\
             Type a letter or the whole word in the chat to guess!",
            masked, wrong, budget, errors, self.max_errors, time_limit_secs
        )
    }

    pub(crate) fn timeout_message(&self) -> String {
        format!(
            "Time for the hangman game is up! The word was `{}`.",
            self.secret
        )
    }
}
