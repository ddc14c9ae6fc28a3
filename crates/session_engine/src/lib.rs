//! session_engine - Session lifecycle engine for chat mini-games
//!
//! One active game per channel, driven through timed phases and resolved by
//! the first winning attempt or by timeout:
//! - `registry` - the atomic channel-to-session map
//! - `engine` - the lifecycle controller and its `on_command`/`on_message`
//!   entry points
//! - `command` - command descriptors and option parsing
//! - `transport` - the seam to the chat platform

pub mod command;
pub mod engine;
pub mod error;
pub mod registry;
pub mod transport;

// Re-exports
pub use command::{command_specs, CommandRequest, CommandSpec, OptionKind, OptionSpec};
pub use engine::{GameEngine, PREPARE_DELAY};
pub use error::{EngineError, Rejection};
pub use registry::{ActiveGame, SessionRegistry};
pub use transport::{ChatTransport, TransportError};
