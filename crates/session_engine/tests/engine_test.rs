//! End-to-end tests for the session lifecycle: announce, arm, activate,
//! resolve by win, resolve by timeout, and the utility paths around them.
//!
//! Timers are real but short; assertions leave generous margins.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use game_core::MessageHandle;
use group_config::GroupPolicy;
use session_engine::{ChatTransport, CommandRequest, GameEngine, TransportError};

const PREPARE: Duration = Duration::from_millis(50);
/// Long enough for the armed phase to have completed on a slow machine.
const SETTLE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Reply { channel: String, text: String },
    Send { channel: String, handle: String, text: String },
    Edit { channel: String, handle: String, text: String },
}

#[derive(Default)]
struct FakeTransport {
    counter: AtomicUsize,
    events: Mutex<Vec<Event>>,
}

impl FakeTransport {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn sends_containing(&self, needle: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Send { text, .. } if text.contains(needle)))
            .count()
    }

    fn replies_containing(&self, needle: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Reply { text, .. } if text.contains(needle)))
            .count()
    }

    fn edits_containing(&self, needle: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Edit { text, .. } if text.contains(needle)))
            .count()
    }

    fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn reply(&self, channel_id: &str, text: &str) -> Result<(), TransportError> {
        self.events.lock().unwrap().push(Event::Reply {
            channel: channel_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send(&self, channel_id: &str, text: &str) -> Result<MessageHandle, TransportError> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let handle = format!("m{id}");
        self.events.lock().unwrap().push(Event::Send {
            channel: channel_id.to_string(),
            handle: handle.clone(),
            text: text.to_string(),
        });
        Ok(MessageHandle(handle))
    }

    async fn edit(
        &self,
        channel_id: &str,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), TransportError> {
        self.events.lock().unwrap().push(Event::Edit {
            channel: channel_id.to_string(),
            handle: handle.0.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}

struct StaticPolicy {
    allow_originator_play: bool,
    max_game_secs: Option<u64>,
    blocked_channels: Vec<String>,
}

impl Default for StaticPolicy {
    fn default() -> Self {
        Self {
            allow_originator_play: false,
            max_game_secs: None,
            blocked_channels: Vec::new(),
        }
    }
}

#[async_trait]
impl GroupPolicy for StaticPolicy {
    async fn max_game_secs(&self, _group_id: &str) -> Option<u64> {
        self.max_game_secs
    }

    async fn allow_originator_play(&self, _group_id: &str) -> bool {
        self.allow_originator_play
    }

    async fn is_channel_blocked(&self, _group_id: &str, channel_id: &str) -> bool {
        self.blocked_channels.iter().any(|c| c == channel_id)
    }
}

fn engine_with(policy: StaticPolicy) -> (GameEngine, Arc<FakeTransport>) {
    let transport = Arc::new(FakeTransport::default());
    let transport_dyn: Arc<dyn ChatTransport> = transport.clone();
    let engine = GameEngine::new(Arc::new(policy), transport_dyn)
        .with_prepare_delay(PREPARE);
    (engine, transport)
}

fn request(command: &str, options: &[(&str, &str)]) -> CommandRequest {
    CommandRequest {
        command: command.to_string(),
        group_id: "g1".to_string(),
        channel_id: "c1".to_string(),
        participant_id: "owner".to_string(),
        options: options
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[tokio::test]
async fn reflex_first_attempt_resolves_with_score() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request("reflex", &[("time", "5"), ("phrase", "gato")]))
        .await
        .unwrap();
    assert_eq!(transport.replies_containing("starts in"), 1);

    tokio::time::sleep(SETTLE).await;
    assert!(engine.registry().is_active("c1"));
    assert_eq!(transport.sends_containing("Type the phrase"), 1);

    engine.on_message("c1", "player", "gota").await.unwrap();
    assert_eq!(transport.sends_containing("6 of 8"), 1);
    assert!(!engine.registry().is_active("c1"));

    // The channel is free again; a late message is nobody's business.
    let before = transport.event_count();
    engine.on_message("c1", "player", "gato").await.unwrap();
    assert_eq!(transport.event_count(), before);
}

#[tokio::test]
async fn recall_end_to_end_win_before_timeout() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request(
            "recall",
            &[("hide_time", "0.15"), ("time_limit", "1.5"), ("text", "ouro")],
        ))
        .await
        .unwrap();

    // Not active while the secret is still being shown.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(transport.sends_containing("Memorize"), 1);
    assert!(!engine.registry().is_active("c1"));
    engine.on_message("c1", "player", "ouro").await.unwrap();
    assert_eq!(transport.sends_containing("Impressive memory"), 0);

    // Hidden and active now.
    tokio::time::sleep(SETTLE).await;
    assert_eq!(transport.edits_containing("What was the string?"), 1);
    assert!(engine.registry().is_active("c1"));

    // Wrong answers keep the session open.
    engine.on_message("c1", "player", "prata").await.unwrap();
    assert!(engine.registry().is_active("c1"));

    engine.on_message("c1", "player", " OÚRO ").await.unwrap();
    assert_eq!(transport.sends_containing("Impressive memory"), 1);
    assert!(!engine.registry().is_active("c1"));

    // The timeout fires later and must stay silent.
    tokio::time::sleep(Duration::from_millis(1700)).await;
    assert_eq!(transport.sends_containing("Time is up"), 0);
}

#[tokio::test]
async fn recall_timeout_reveals_secret_and_closes_session() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request(
            "recall",
            &[("hide_time", "0.1"), ("time_limit", "0.4"), ("text", "ouro")],
        ))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(transport.sends_containing("Time is up! The string was: `ouro`"), 1);
    assert!(!engine.registry().is_active("c1"));

    // Messages after the timeout are ignored.
    let before = transport.event_count();
    engine.on_message("c1", "player", "ouro").await.unwrap();
    assert_eq!(transport.event_count(), before);
}

#[tokio::test]
async fn hangman_single_error_budget_loses_and_reveals_secret() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request(
            "hangman",
            &[("word", "sol"), ("time", "10"), ("errors", "1")],
        ))
        .await
        .unwrap();

    tokio::time::sleep(SETTLE).await;
    assert_eq!(transport.sends_containing("Hangman"), 1);
    assert!(engine.registry().is_active("c1"));

    engine.on_message("c1", "player", "z").await.unwrap();
    assert_eq!(transport.edits_containing("❌ (1/1)"), 1);
    assert_eq!(transport.sends_containing("The word was `sol`"), 1);
    assert!(!engine.registry().is_active("c1"));
}

#[tokio::test]
async fn hangman_letter_progress_edits_board_and_word_guess_wins() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request(
            "hangman",
            &[("word", "sol"), ("time", "10"), ("errors", "3")],
        ))
        .await
        .unwrap();
    tokio::time::sleep(SETTLE).await;

    engine.on_message("c1", "player", "s").await.unwrap();
    assert_eq!(transport.edits_containing("`s _ _`"), 1);
    assert!(engine.registry().is_active("c1"));

    // Digits and repeats change nothing.
    let before = transport.event_count();
    engine.on_message("c1", "player", "7").await.unwrap();
    engine.on_message("c1", "player", "s").await.unwrap();
    assert_eq!(transport.event_count(), before);

    engine.on_message("c1", "other", "sol").await.unwrap();
    assert_eq!(transport.sends_containing("VICTORY"), 1);
    assert!(!engine.registry().is_active("c1"));
}

#[tokio::test]
async fn originator_attempts_are_ignored_unless_allowed() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request(
            "recall",
            &[("hide_time", "0.1"), ("time_limit", "5"), ("text", "ouro")],
        ))
        .await
        .unwrap();
    tokio::time::sleep(SETTLE).await;

    engine.on_message("c1", "owner", "ouro").await.unwrap();
    assert_eq!(transport.sends_containing("Impressive memory"), 0);
    assert!(engine.registry().is_active("c1"));

    engine.on_message("c1", "guest", "ouro").await.unwrap();
    assert_eq!(transport.sends_containing("Impressive memory"), 1);
}

#[tokio::test]
async fn originator_may_play_when_policy_allows() {
    let (engine, transport) = engine_with(StaticPolicy {
        allow_originator_play: true,
        ..StaticPolicy::default()
    });

    engine
        .on_command(request(
            "recall",
            &[("hide_time", "0.1"), ("time_limit", "5"), ("text", "ouro")],
        ))
        .await
        .unwrap();
    tokio::time::sleep(SETTLE).await;

    engine.on_message("c1", "owner", "ouro").await.unwrap();
    assert_eq!(transport.sends_containing("Impressive memory"), 1);
}

#[tokio::test]
async fn occupied_channel_rejects_second_start() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request("reflex", &[("time", "10"), ("phrase", "hi")]))
        .await
        .unwrap();
    tokio::time::sleep(SETTLE).await;

    engine
        .on_command(request("scramble", &[("time", "10"), ("word", "gato")]))
        .await
        .unwrap();
    assert_eq!(transport.replies_containing("already an active game"), 1);
    assert_eq!(engine.registry().len(), 1);
}

#[tokio::test]
async fn blocked_channel_is_rejected_before_anything_happens() {
    let (engine, transport) = engine_with(StaticPolicy {
        blocked_channels: vec!["c1".to_string()],
        ..StaticPolicy::default()
    });

    engine
        .on_command(request("reflex", &[("time", "5"), ("phrase", "hi")]))
        .await
        .unwrap();
    assert_eq!(transport.replies_containing("blocked"), 1);
    tokio::time::sleep(SETTLE).await;
    assert!(!engine.registry().is_active("c1"));
}

#[tokio::test]
async fn duration_over_group_ceiling_is_rejected() {
    let (engine, transport) = engine_with(StaticPolicy {
        max_game_secs: Some(60),
        ..StaticPolicy::default()
    });

    engine
        .on_command(request("reflex", &[("time", "120"), ("phrase", "hi")]))
        .await
        .unwrap();
    assert_eq!(transport.replies_containing("maximum of 60 seconds"), 1);

    engine
        .on_command(request("reflex", &[("time", "60"), ("phrase", "hi")]))
        .await
        .unwrap();
    tokio::time::sleep(SETTLE).await;
    assert!(engine.registry().is_active("c1"));
}

#[tokio::test]
async fn malformed_options_are_rejected_with_a_reason() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request("reflex", &[("time", "soon"), ("phrase", "hi")]))
        .await
        .unwrap();
    assert_eq!(transport.replies_containing("not a valid number"), 1);

    engine
        .on_command(request("reflex", &[("phrase", "hi")]))
        .await
        .unwrap();
    assert_eq!(transport.replies_containing("required option 'time' is missing"), 1);

    engine.on_command(request("chess", &[])).await.unwrap();
    assert_eq!(transport.replies_containing("Unknown command"), 1);
}

#[tokio::test]
async fn cancel_frees_the_channel_for_a_new_game() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request("reflex", &[("time", "30"), ("phrase", "hi")]))
        .await
        .unwrap();
    tokio::time::sleep(SETTLE).await;
    assert!(engine.registry().is_active("c1"));

    engine.on_command(request("cancel", &[])).await.unwrap();
    assert_eq!(transport.replies_containing("was cancelled"), 1);
    assert!(!engine.registry().is_active("c1"));

    engine.on_command(request("cancel", &[])).await.unwrap();
    assert_eq!(transport.replies_containing("no active game"), 1);

    engine
        .on_command(request("scramble", &[("time", "10"), ("word", "gato")]))
        .await
        .unwrap();
    tokio::time::sleep(SETTLE).await;
    assert!(engine.registry().is_active("c1"));
}

#[tokio::test]
async fn armed_phase_race_keeps_exactly_one_session() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    // Both requests pass validation before either one activates.
    engine
        .on_command(request("reflex", &[("time", "10"), ("phrase", "first")]))
        .await
        .unwrap();
    engine
        .on_command(request("reflex", &[("time", "10"), ("phrase", "second")]))
        .await
        .unwrap();

    tokio::time::sleep(SETTLE).await;
    assert_eq!(engine.registry().len(), 1);
    assert_eq!(transport.replies_containing("already an active game"), 1);
}

#[tokio::test]
async fn messages_in_unrelated_channels_are_ignored() {
    let (engine, transport) = engine_with(StaticPolicy::default());

    engine
        .on_command(request("reflex", &[("time", "10"), ("phrase", "hi")]))
        .await
        .unwrap();
    tokio::time::sleep(SETTLE).await;

    let before = transport.event_count();
    engine.on_message("c2", "player", "hi").await.unwrap();
    assert_eq!(transport.event_count(), before);
    assert!(engine.registry().is_active("c1"));
}
