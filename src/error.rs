use std::io;
use thiserror::Error;

/// Errors produced by registration, loading, and playback.
#[derive(Debug, Error)]
pub enum AnimationError {
    /// No character with this name is registered.
    #[error("unknown character '{character}'")]
    UnknownCharacter { character: String },

    /// The character exists but has no bone with this name.
    #[error("character '{character}' has no bone named '{bone}'")]
    UnknownBone { character: String, bone: String },

    /// The character is already registered and replacement was not requested.
    #[error("character '{character}' is already registered")]
    AlreadyRegistered { character: String },

    /// The keyframe document cannot be expanded into a sequence.
    #[error("malformed keyframe set: {reason}")]
    MalformedKeyframeSet { reason: String },

    /// A sequence failed to round-trip through its serialized form.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while reading an animation file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type using AnimationError
pub type Result<T> = std::result::Result<T, AnimationError>;
