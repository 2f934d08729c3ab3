//! Container version negotiation.
//!
//! Parses the user-supplied `M` or `M.mm` version string into the
//! `(major, minor)` pair a newly created container targets. Loading an
//! existing container never consults this value.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Major versions the engine understands. Enforced by the caller after
/// parsing; `VersionSpec::parse` itself is range-agnostic.
pub const SUPPORTED_MAJOR: RangeInclusive<u32> = 4..=14;

/// The version a newly created container targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
  pub major: u32,
  pub minor: u32,
}

impl Default for VersionSpec {
  fn default() -> Self {
    VersionSpec { major: 4, minor: 0 }
  }
}

impl fmt::Display for VersionSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

/// Errors from version-string parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionError {
  /// A segment is longer than two characters.
  #[error("invalid version string {0:?}: segments are limited to 2 characters")]
  SegmentTooLong(String),
}

impl VersionSpec {
  /// Parse `"M"` or `"M.mm"` into a `VersionSpec`.
  ///
  /// Segment length is checked *before* any numeric conversion, so `"123"`
  /// and `"1.100"` are rejected rather than truncated. A missing minor
  /// segment defaults to 0.
  ///
  /// Non-numeric segment content converts permissively: leading ASCII
  /// digits parse, anything else yields 0. Existing callers rely on this,
  /// so it is kept rather than tightened into a hard validation error.
  pub fn parse(text: &str) -> Result<VersionSpec, VersionError> {
    let (major_str, minor_str) = match text.split_once('.') {
      Some((major, minor)) => (major, minor),
      None => (text, "0"),
    };
    if major_str.len() > 2 || minor_str.len() > 2 {
      return Err(VersionError::SegmentTooLong(text.to_string()));
    }
    Ok(VersionSpec {
      major: leading_digits(major_str),
      minor: leading_digits(minor_str),
    })
  }
}

/// Convert the leading ASCII digits of `s`, yielding 0 when there are none.
fn leading_digits(s: &str) -> u32 {
  let digits: &str = match s.find(|c: char| !c.is_ascii_digit()) {
    Some(end) => &s[..end],
    None => s,
  };
  digits.parse().unwrap_or(0)
}
