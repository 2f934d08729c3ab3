//! The edit orchestrator.
//!
//! Replays the input queue, in order, against a loaded or freshly created
//! container, then writes the result exactly once. Any subsystem failure
//! aborts before the write, so a partially mutated container is never
//! persisted. The whole run is synchronous and single-threaded with the
//! container exclusively owned for the duration.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::backend::{AssembleOptions, Backend, BackendError};
use crate::encoding::EncodingConfig;
use crate::mode::BuildMode;
use crate::queue::{InputKind, InputQueue};
use crate::version::VersionSpec;

/// Everything one invocation needs: the chosen mode, the queue, and the
/// negotiated settings.
#[derive(Debug)]
pub struct EditRequest {
  pub mode: BuildMode,
  pub queue: InputQueue,
  /// Version for containers created fresh; ignored when loading.
  pub version: VersionSpec,
  /// Output path for the DirectEdit and Transcode modes.
  pub output: PathBuf,
  pub assemble: AssembleOptions,
  pub encoding: EncodingConfig,
}

/// Fatal orchestration failures.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
  #[error("failed to open container {}: {source}", .path.display())]
  Load { path: PathBuf, source: BackendError },

  #[error("failed to create container: {source}")]
  Create { source: BackendError },

  #[error("{kind} input {} failed: {source}", .path.display())]
  Apply {
    kind: InputKind,
    path: PathBuf,
    source: BackendError,
  },

  #[error("transcode failed: {source}")]
  Transcode { source: BackendError },

  #[error("project build {} failed: {source}", .path.display())]
  Project { path: PathBuf, source: BackendError },

  #[error("failed to write container {}: {source}", .path.display())]
  Write { path: PathBuf, source: BackendError },
}

/// Run one invocation against `backend`.
pub fn run<B: Backend>(backend: &mut B, request: &EditRequest) -> Result<(), BuildError> {
  match &request.mode {
    BuildMode::ProjectBuild { project } => {
      // The project builder owns container construction and outputs.
      backend
        .build_project(project, request.version)
        .map_err(|source| BuildError::Project { path: project.clone(), source })
    }
    BuildMode::Transcode { container: path, .. } => {
      let mut container = load_or_create(backend, path.as_deref(), request)?;
      backend
        .transcode(&mut container, &request.encoding)
        .map_err(|source| BuildError::Transcode { source })?;
      write(backend, &request.output, &container)
    }
    BuildMode::DirectEdit { container: path } => {
      let mut container = load_or_create(backend, path.as_deref(), request)?;
      for input in &request.queue {
        let result = match input.kind {
          InputKind::Code => backend.assemble(&input.path, &mut container, &request.assemble),
          InputKind::Jaf => backend.compile_source(&input.path, &mut container, &request.encoding),
          InputKind::Declarations => backend.load_declarations(&input.path, &mut container),
          InputKind::Text => backend.update_text(&input.path, &mut container, &request.encoding),
        };
        result.map_err(|source| BuildError::Apply {
          kind: input.kind,
          path: input.path.clone(),
          source,
        })?;
      }
      write(backend, &request.output, &container)
    }
  }
}

/// A path means load; no path means create a fresh container targeting the
/// negotiated version.
fn load_or_create<B: Backend>(
  backend: &mut B,
  path: Option<&Path>,
  request: &EditRequest,
) -> Result<B::Container, BuildError> {
  match path {
    Some(path) => backend
      .open(path)
      .map_err(|source| BuildError::Load { path: path.to_path_buf(), source }),
    None => backend
      .create(request.version)
      .map_err(|source| BuildError::Create { source }),
  }
}

fn write<B: Backend>(
  backend: &mut B,
  output: &Path,
  container: &B::Container,
) -> Result<(), BuildError> {
  info!(path = %output.display(), "writing container");
  backend
    .write(output, container)
    .map_err(|source| BuildError::Write { path: output.to_path_buf(), source })
}
