//! Build mode selection.
//!
//! Exactly one of three top-level modes runs per invocation. The mode is
//! chosen once, after all flags have been consumed, with precedence
//! ProjectBuild > Transcode > DirectEdit. Inputs queued for a losing mode
//! are discarded with a warning, never an error.

use std::path::PathBuf;

/// Conventional output path when `-o` is not given in DirectEdit or
/// Transcode mode.
pub const DEFAULT_OUTPUT: &str = "out.ain";

/// The active top-level build mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
  /// Build a container from a project file; the external project builder
  /// owns its own outputs.
  ProjectBuild { project: PathBuf },
  /// Change the text encoding of a container's string data, skipping the
  /// input queue entirely.
  Transcode {
    target_encoding: String,
    container: Option<PathBuf>,
  },
  /// Load (or, absent a path, create) a container and replay the input
  /// queue against it.
  DirectEdit { container: Option<PathBuf> },
}

impl BuildMode {
  fn label(&self) -> &'static str {
    match self {
      BuildMode::ProjectBuild { .. } => "--project",
      BuildMode::Transcode { .. } => "--transcode",
      BuildMode::DirectEdit { .. } => "edit",
    }
  }
}

/// The outcome of mode selection: the chosen mode plus how many queued
/// inputs the choice discards.
#[derive(Debug, PartialEq, Eq)]
pub struct Selection {
  pub mode: BuildMode,
  pub ignored_inputs: usize,
}

impl Selection {
  /// Warning text when queued inputs are discarded by the chosen mode.
  pub fn ignored_inputs_warning(&self) -> Option<String> {
    if self.ignored_inputs == 0 {
      return None;
    }
    Some(format!(
      "input files specified on the command line are ignored in {} mode",
      self.mode.label()
    ))
  }
}

/// Pick the active mode from the flags observed during argument parsing.
///
/// `queued` is the number of inputs already collected; it only matters for
/// the ignored-inputs warning on the ProjectBuild and Transcode paths.
pub fn select(
  project: Option<PathBuf>,
  transcode: Option<String>,
  container: Option<PathBuf>,
  queued: usize,
) -> Selection {
  if let Some(project) = project {
    return Selection {
      mode: BuildMode::ProjectBuild { project },
      ignored_inputs: queued,
    };
  }
  if let Some(target_encoding) = transcode {
    return Selection {
      mode: BuildMode::Transcode { target_encoding, container },
      ignored_inputs: queued,
    };
  }
  Selection {
    mode: BuildMode::DirectEdit { container },
    ignored_inputs: 0,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn project_takes_precedence_over_everything() {
    let selection = select(
      Some(PathBuf::from("game.pje")),
      Some("UTF-8".to_string()),
      Some(PathBuf::from("in.ain")),
      3,
    );
    assert_eq!(
      selection.mode,
      BuildMode::ProjectBuild { project: PathBuf::from("game.pje") }
    );
    assert_eq!(selection.ignored_inputs, 3);
    assert!(selection.ignored_inputs_warning().unwrap().contains("--project"));
  }

  #[test]
  fn transcode_beats_direct_edit() {
    let selection = select(None, Some("UTF-8".to_string()), Some(PathBuf::from("in.ain")), 1);
    assert_eq!(
      selection.mode,
      BuildMode::Transcode {
        target_encoding: "UTF-8".to_string(),
        container: Some(PathBuf::from("in.ain")),
      }
    );
    assert_eq!(selection.ignored_inputs, 1);
  }

  #[test]
  fn direct_edit_keeps_the_queue() {
    let selection = select(None, None, Some(PathBuf::from("in.ain")), 5);
    assert_eq!(
      selection.mode,
      BuildMode::DirectEdit { container: Some(PathBuf::from("in.ain")) }
    );
    assert_eq!(selection.ignored_inputs, 0);
    assert_eq!(selection.ignored_inputs_warning(), None);
  }

  #[test]
  fn no_warning_without_queued_inputs() {
    let selection = select(Some(PathBuf::from("game.pje")), None, None, 0);
    assert_eq!(selection.ignored_inputs_warning(), None);
  }
}
