//! The policy questions the session engine asks about a group.

use async_trait::async_trait;

/// Per-group gameplay rules, consulted by the lifecycle controller.
///
/// Implementations must be cheap to call: the engine queries them on every
/// start request and on every inbound message from a game originator.
#[async_trait]
pub trait GroupPolicy: Send + Sync {
    /// Ceiling on a game's requested duration, or `None` when the group has
    /// no limit configured.
    async fn max_game_secs(&self, group_id: &str) -> Option<u64>;

    /// Whether the participant who started a game may also play it.
    async fn allow_originator_play(&self, group_id: &str) -> bool;

    /// Whether games are forbidden in the given channel.
    async fn is_channel_blocked(&self, group_id: &str, channel_id: &str) -> bool;
}
