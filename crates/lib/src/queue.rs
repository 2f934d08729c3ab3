//! The ordered queue of input artifacts.
//!
//! Inputs are appended in command-line order and replayed in that order
//! during orchestration. Later entries may supersede earlier mutations to
//! the same logical section of the container, so the queue is never
//! deduplicated or reordered.

use std::fmt;
use std::path::PathBuf;

/// Maximum number of queued inputs per invocation.
pub const MAX_INPUTS: usize = 256;

/// The kind of source artifact an input carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
  /// Pre-assembled bytecode (.jam) merged into the code section.
  Code,
  /// High-level source compiled and merged into the container.
  Jaf,
  /// Structured declaration data merged into container metadata.
  Declarations,
  /// String/message table updates.
  Text,
}

impl fmt::Display for InputKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      InputKind::Code => "code",
      InputKind::Jaf => "jaf",
      InputKind::Declarations => "json",
      InputKind::Text => "text",
    };
    f.write_str(name)
  }
}

/// One queued input: what it is and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
  pub kind: InputKind,
  pub path: PathBuf,
}

/// Errors from queue construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
  #[error("too many inputs (limit is {MAX_INPUTS})")]
  CapacityExceeded,
}

/// Ordered collection of inputs, capped at [`MAX_INPUTS`] entries.
///
/// The cap is a validated count invariant, not a storage limitation; the
/// backing storage grows as needed up to the cap.
#[derive(Debug, Default)]
pub struct InputQueue {
  entries: Vec<InputDescriptor>,
}

impl InputQueue {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an input. Fails once the queue already holds [`MAX_INPUTS`]
  /// entries; the queued entries are untouched on failure.
  pub fn push(&mut self, kind: InputKind, path: impl Into<PathBuf>) -> Result<(), QueueError> {
    if self.entries.len() >= MAX_INPUTS {
      return Err(QueueError::CapacityExceeded);
    }
    self.entries.push(InputDescriptor { kind, path: path.into() });
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate entries in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &InputDescriptor> {
    self.entries.iter()
  }
}

impl<'a> IntoIterator for &'a InputQueue {
  type Item = &'a InputDescriptor;
  type IntoIter = std::slice::Iter<'a, InputDescriptor>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}
