//! Error types for melody-rnn-rs.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Candle tensor/model error.
    #[error("candle: {0}")]
    Candle(#[from] candle_core::Error),

    /// Vocabulary error (unknown token or code, corrupt mapping).
    #[error("vocab: {0}")]
    Vocab(String),

    /// Time-step encoding/decoding error (invalid duration, malformed stream).
    #[error("encoding: {0}")]
    Encoding(String),

    /// Sequence model returned an unusable distribution.
    #[error("model output: {0}")]
    Model(String),

    /// Model weight loading error.
    #[error("weight loading: {0}")]
    WeightLoad(String),

    /// Invalid configuration or generation parameters.
    #[error("config: {0}")]
    Config(String),

    /// I/O error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
