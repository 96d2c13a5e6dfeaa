//! Decoder configuration
//!
//! Handles loading, validation, and defaults for decoder parameters.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Decoder configuration, mirroring the recognized options: `fst_path`,
/// `acoustic_scale`, `beam`, `max_active`, `min_active`, `beam_delta`,
/// `sos`, `eos`, `max_seq_len`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Source of the WFST graph. Optional for library use where the
    /// caller constructs or loads the graph itself.
    #[serde(default)]
    pub fst_path: Option<PathBuf>,

    /// Multiplier applied to acoustic log-probabilities.
    #[serde(default = "default_acoustic_scale")]
    pub acoustic_scale: f32,

    /// Base beam width in tropical cost.
    #[serde(default = "default_beam")]
    pub beam: f32,

    /// Upper bound on frontier size; `usize::MAX` disables.
    #[serde(default = "default_max_active")]
    pub max_active: usize,

    /// Lower bound on frontier size; `0` disables.
    #[serde(default)]
    pub min_active: usize,

    /// Slack added when the adaptive beam tightens or loosens.
    #[serde(default = "default_beam_delta")]
    pub beam_delta: f32,

    /// Start-of-sequence symbol id fed as the first prefix token.
    pub sos: i32,

    /// End-of-sequence symbol id triggering completion.
    pub eos: i32,

    /// Hard cap on emitting steps per utterance.
    #[serde(default = "default_max_seq_len")]
    pub max_seq_len: usize,
}

fn default_acoustic_scale() -> f32 {
    30.0
}

fn default_beam() -> f32 {
    50.0
}

fn default_max_active() -> usize {
    usize::MAX
}

fn default_beam_delta() -> f32 {
    0.5
}

fn default_max_seq_len() -> usize {
    200
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            fst_path: None,
            acoustic_scale: default_acoustic_scale(),
            beam: default_beam(),
            max_active: default_max_active(),
            min_active: 0,
            beam_delta: default_beam_delta(),
            sos: 0,
            eos: 0,
            max_seq_len: default_max_seq_len(),
        }
    }
}

impl DecoderConfig {
    /// Load configuration from a TOML file, falling back to documented
    /// defaults for any field the file omits.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Serialize the current configuration back to TOML text.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
