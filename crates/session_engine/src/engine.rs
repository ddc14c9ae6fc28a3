//! The session lifecycle controller.
//!
//! Drives every game through validate → announce → arm → activate →
//! resolve/timeout. Phase transitions are timer-elapsed or inbound-message
//! events; the suspension points are plain `tokio::time::sleep`s inside one
//! spawned task per session, and the win/timeout race is settled by the
//! registry's `finish`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{debug, info, warn};

use game_core::{GameKind, GameState, Outcome};
use group_config::GroupPolicy;

use crate::command::{build_game, CommandRequest};
use crate::error::{EngineError, Rejection};
use crate::registry::SessionRegistry;
use crate::transport::ChatTransport;

/// Delay between the announcement and the start of every game.
pub const PREPARE_DELAY: Duration = Duration::from_secs(3);

/// The engine: one instance serves every group and channel.
///
/// Cheap to clone; clones share the registry and collaborators.
#[derive(Clone)]
pub struct GameEngine {
    registry: Arc<SessionRegistry>,
    policy: Arc<dyn GroupPolicy>,
    transport: Arc<dyn ChatTransport>,
    prepare_delay: Duration,
}

impl GameEngine {
    pub fn new(policy: Arc<dyn GroupPolicy>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            policy,
            transport,
            prepare_delay: PREPARE_DELAY,
        }
    }

    /// Overrides the announce delay. Intended for tests and small groups
    /// that want snappier starts.
    pub fn with_prepare_delay(mut self, delay: Duration) -> Self {
        self.prepare_delay = delay;
        self
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Entry point for a parsed command request.
    ///
    /// Validation failures are replied to the requester and are not errors;
    /// only transport failures surface to the caller.
    pub async fn on_command(&self, req: CommandRequest) -> Result<(), EngineError> {
        if req.command == "cancel" {
            return self.cancel(&req).await;
        }

        match self.validate(&req).await {
            Ok(game) => self.announce_and_arm(&req, game).await,
            Err(rejection) => {
                debug!(
                    "Rejected '{}' in channel {}: {}",
                    req.command, req.channel_id, rejection
                );
                self.transport
                    .reply(&req.channel_id, &rejection.to_string())
                    .await?;
                Ok(())
            }
        }
    }

    /// Entry point for an inbound chat message. Channels without an active
    /// session are not this engine's business.
    pub async fn on_message(
        &self,
        channel_id: &str,
        author_id: &str,
        text: &str,
    ) -> Result<(), EngineError> {
        let Some(active) = self.registry.peek(channel_id) else {
            return Ok(());
        };

        let (outcome, board_handle) = {
            let mut game = active.lock().await;

            // Originator rule: runs before any variant logic.
            if author_id == game.originator_id
                && !self.policy.allow_originator_play(&game.group_id).await
            {
                debug!("Ignoring originator attempt in channel {channel_id}");
                return Ok(());
            }

            (game.evaluate(text, author_id), game.board.clone())
        };

        match outcome {
            Outcome::Ignored => Ok(()),
            Outcome::Continue { board } => {
                if let (Some(board), Some(handle)) = (board, board_handle) {
                    self.transport.edit(channel_id, &handle, &board).await?;
                }
                Ok(())
            }
            Outcome::Win {
                announcement,
                board,
            }
            | Outcome::Loss {
                announcement,
                board,
            } => {
                if let (Some(board), Some(handle)) = (board, &board_handle) {
                    self.transport.edit(channel_id, handle, &board).await?;
                }
                // Only the caller that wins the removal race announces; a
                // near-simultaneous second winner finds the session gone and
                // stays silent.
                if self.registry.finish(channel_id).is_some() {
                    info!("Game in channel {channel_id} resolved");
                    self.transport.send(channel_id, &announcement).await?;
                }
                Ok(())
            }
        }
    }

    /// The Validating state: policy checks, occupancy, option parsing and
    /// the per-group duration ceiling, in that order.
    async fn validate(&self, req: &CommandRequest) -> Result<GameState, Rejection> {
        if self
            .policy
            .is_channel_blocked(&req.group_id, &req.channel_id)
            .await
        {
            return Err(Rejection::ChannelBlocked);
        }
        if self.registry.is_active(&req.channel_id) {
            return Err(Rejection::GameAlreadyActive);
        }

        let game = build_game(req)?;

        if let Some(max) = self.policy.max_game_secs(&req.group_id).await {
            if game.time_limit.as_secs() > max {
                return Err(Rejection::DurationExceedsLimit(max));
            }
        }

        Ok(game)
    }

    /// The Announcing state, then the armed flow in its own task.
    async fn announce_and_arm(
        &self,
        req: &CommandRequest,
        game: GameState,
    ) -> Result<(), EngineError> {
        self.transport
            .reply(
                &req.channel_id,
                &format!(
                    "The game starts in {} seconds...",
                    self.prepare_delay.as_secs()
                ),
            )
            .await?;

        info!(
            "Announced '{}' in channel {} by {}",
            req.command, req.channel_id, req.participant_id
        );

        let engine = self.clone();
        let channel_id = req.channel_id.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.run_armed_phase(&channel_id, game).await {
                warn!("Game start in channel {channel_id} failed: {e:#}");
            }
        });
        Ok(())
    }

    /// The Armed state: wait out the announce delay, put up the display,
    /// activate, and schedule the timeout.
    async fn run_armed_phase(&self, channel_id: &str, mut game: GameState) -> anyhow::Result<()> {
        tokio::time::sleep(self.prepare_delay).await;

        let start_text = game.start_message();
        match &game.kind {
            // Two-phase variant: show the payload, wait, then conceal it.
            // The game only activates once the text is hidden.
            GameKind::Recall(recall) => {
                let hide_delay = recall.hide_delay();
                let concealed = recall.concealed_message(game.time_limit_secs());
                let handle = self.transport.send(channel_id, &start_text).await?;
                tokio::time::sleep(hide_delay).await;
                self.transport.edit(channel_id, &handle, &concealed).await?;
                game.board = Some(handle);
            }
            // Board variant: the display handle is kept for later edits.
            GameKind::Hangman(_) => {
                let handle = self.transport.send(channel_id, &start_text).await?;
                game.board = Some(handle);
            }
            GameKind::Reflex(_) | GameKind::Scramble(_) => {
                self.transport.send(channel_id, &start_text).await?;
            }
        }

        game.started_at = Some(Instant::now());
        let time_limit = game.time_limit;

        if self.registry.try_start(channel_id, game).is_err() {
            // Another start won the armed-phase race for this channel.
            warn!("Channel {channel_id} was taken while arming; aborting start");
            self.transport
                .reply(channel_id, &Rejection::GameAlreadyActive.to_string())
                .await
                .context("race-loss notice")?;
            return Ok(());
        }

        info!(
            "Game active in channel {channel_id} for {:.1}s",
            time_limit.as_secs_f64()
        );

        let engine = self.clone();
        let channel_id = channel_id.to_string();
        tokio::spawn(async move {
            engine.run_timeout(&channel_id, time_limit).await;
        });
        Ok(())
    }

    /// The timeout task. Whoever loses the `finish` race becomes a no-op.
    async fn run_timeout(&self, channel_id: &str, time_limit: Duration) {
        tokio::time::sleep(time_limit).await;

        let Some(active) = self.registry.finish(channel_id) else {
            debug!("Timeout in channel {channel_id} found no session; already resolved");
            return;
        };

        let message = active.lock().await.timeout_message();
        info!("Game in channel {channel_id} timed out");
        if let Err(e) = self.transport.send(channel_id, &message).await {
            warn!("Failed to send timeout message to channel {channel_id}: {e}");
        }
    }

    /// The cancel utility command: frees the channel if anything is active.
    async fn cancel(&self, req: &CommandRequest) -> Result<(), EngineError> {
        if self.registry.finish(&req.channel_id).is_some() {
            info!(
                "Game in channel {} cancelled by {}",
                req.channel_id, req.participant_id
            );
            self.transport
                .reply(
                    &req.channel_id,
                    "✅ The game active in this channel was cancelled!",
                )
                .await?;
        } else {
            self.transport
                .reply(
                    &req.channel_id,
                    "ℹ️ There is no active game to cancel in this channel.",
                )
                .await?;
        }
        Ok(())
    }
}
