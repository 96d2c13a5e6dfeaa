// wfst-decoder - WFST token-passing beam search decoder
// Main library entry point

#![warn(clippy::all)]

pub mod config;
pub mod cutoff;
pub mod decoder;
pub mod fst;
pub mod scorer;
pub mod token;

// Re-export commonly used types
pub use config::DecoderConfig;
pub use decoder::Decoder;
pub use fst::{Arc, FstView, StateId};
pub use scorer::{MockScorer, Scorer};
pub use token::{LatticeArc, Token};

/// Result type alias for wfst-decoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wfst-decoder
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("scorer failure: {0}")]
    ScorerFailure(String),

    #[error("no completed hypothesis within max_seq_len/beam")]
    NoCompletion,

    #[error("decode canceled")]
    CancelRequested,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
