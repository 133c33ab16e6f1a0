// Errors raised while parsing chord tokens.

use thiserror::Error;

/// A chord token that the theory layer cannot make sense of.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChordError {
    #[error("empty chord token")]
    Empty,

    #[error("invalid root in chord token '{0}'")]
    InvalidRoot(String),

    #[error("unknown chord quality '{quality}' in token '{token}'")]
    UnknownQuality { token: String, quality: String },

    #[error("invalid bass note in chord token '{0}'")]
    InvalidBass(String),
}
