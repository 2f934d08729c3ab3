//! Text-encoding configuration.
//!
//! An explicit value threaded through the orchestrator into text-bearing
//! backend calls. There is no ambient process-wide encoding state; whoever
//! builds the [`EncodingConfig`] decides, once, before any text input is
//! processed.

use serde::{Deserialize, Serialize};

/// Encoding of text read from input files.
pub const DEFAULT_INPUT_ENCODING: &str = "UTF-8";

/// Encoding of string data written into the container. CP932 is the legacy
/// codepage the target runtime expects.
pub const DEFAULT_OUTPUT_ENCODING: &str = "CP932";

/// The input/output text-encoding pair for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingConfig {
  /// Encoding of text-bearing input files.
  pub input: String,
  /// Encoding of the container's string data on output.
  pub output: String,
}

impl Default for EncodingConfig {
  fn default() -> Self {
    EncodingConfig {
      input: DEFAULT_INPUT_ENCODING.to_string(),
      output: DEFAULT_OUTPUT_ENCODING.to_string(),
    }
  }
}

impl EncodingConfig {
  /// The pair used in transcode mode: the container's existing string data
  /// is in the legacy codepage, and the user picks the target.
  pub fn for_transcode(target: &str) -> Self {
    EncodingConfig {
      input: DEFAULT_OUTPUT_ENCODING.to_string(),
      output: target.to_string(),
    }
  }
}
