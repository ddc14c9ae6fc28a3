//! Error taxonomy: user-visible rejections versus engine failures.

use thiserror::Error;

/// A user-visible reason a start request was turned down.
///
/// The `Display` text is the reply sent back to the requester; nothing here
/// is fatal, re-issuing the command is always allowed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("This channel is blocked for games.")]
    ChannelBlocked,

    #[error("There is already an active game in this channel!")]
    GameAlreadyActive,

    #[error("The required option '{0}' is missing.")]
    MissingOption(String),

    #[error("The value '{value}' for '{option}' is not a valid number.")]
    InvalidNumber { option: String, value: String },

    #[error("The option '{0}' must be a positive number of seconds.")]
    NonPositiveTime(String),

    #[error("The option '{option}' must be at least {min}.")]
    BelowMinimum { option: String, min: u32 },

    #[error("The requested time exceeds the maximum of {0} seconds configured for this group.")]
    DurationExceedsLimit(u64),

    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),
}

/// Failures the engine itself can surface to its caller. Everything else is
/// either a [`Rejection`] (replied, not raised) or a race no-op.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Transport(#[from] crate::transport::TransportError),
}
