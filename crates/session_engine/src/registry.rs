//! The per-channel session registry: at most one live game per channel.

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use tokio::sync::Mutex;

use game_core::GameState;

/// A registered game. The mutex makes guess-set mutation plus the win/loss
/// check one atomic step per channel; the registry itself only owns
/// reachability.
pub type ActiveGame = Arc<Mutex<GameState>>;

/// Maps channel id to the game active in it.
///
/// `try_start` is atomic with respect to the occupied check, and `finish` is
/// the shared tie-break primitive for the win/timeout race: exactly one of
/// two concurrent callers observes the removed game.
pub struct SessionRegistry {
    games: DashMap<String, ActiveGame>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
        }
    }

    /// Registers `game` as the active session for `channel_id`.
    ///
    /// Concurrent calls for the same channel yield exactly one winner; the
    /// loser gets the game back untouched.
    pub fn try_start(&self, channel_id: &str, game: GameState) -> Result<ActiveGame, GameState> {
        match self.games.entry(channel_id.to_string()) {
            Entry::Occupied(_) => Err(game),
            Entry::Vacant(entry) => {
                let active = Arc::new(Mutex::new(game));
                entry.insert(Arc::clone(&active));
                Ok(active)
            }
        }
    }

    /// Removes and returns the active session, if any. Idempotent: whichever
    /// of the win and timeout paths gets here first takes the game, the
    /// other sees `None` and does nothing.
    pub fn finish(&self, channel_id: &str) -> Option<ActiveGame> {
        self.games.remove(channel_id).map(|(_, game)| game)
    }

    /// Looks up the active session without removing it.
    pub fn peek(&self, channel_id: &str) -> Option<ActiveGame> {
        self.games
            .get(channel_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn is_active(&self, channel_id: &str) -> bool {
        self.games.contains_key(channel_id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
