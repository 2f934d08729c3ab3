//! The seam to the external container subsystems.
//!
//! The orchestrator never touches a container's representation directly; it
//! dispatches every operation through this trait. The assembler, compiler,
//! declaration loader, text updater, transcoder, and project builder are
//! all reached through it, so the orchestration core can be exercised
//! against a recording backend in tests and against [`crate::image`] in the
//! shipped binary.

use std::path::Path;

use crate::encoding::EncodingConfig;
use crate::version::VersionSpec;

/// Diagnostic from an external subsystem. The orchestrator treats these as
/// opaque strings and reports them verbatim.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
  message: String,
}

impl BackendError {
  pub fn msg(message: impl Into<String>) -> Self {
    BackendError { message: message.into() }
  }
}

impl From<std::io::Error> for BackendError {
  fn from(err: std::io::Error) -> Self {
    BackendError { message: err.to_string() }
  }
}

/// Options forwarded to the assembler.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions {
  /// Read code in raw mode.
  pub raw: bool,
}

/// External collaborator interface for one container format.
///
/// A container is exclusively owned by the orchestrator for the lifetime of
/// one invocation; the backend mutates it in place and writes it at most
/// once.
pub trait Backend {
  type Container;

  /// Load an existing container.
  fn open(&mut self, path: &Path) -> Result<Self::Container, BackendError>;

  /// Create a fresh container targeting `version`.
  fn create(&mut self, version: VersionSpec) -> Result<Self::Container, BackendError>;

  /// Serialize the container to `path`.
  fn write(&mut self, path: &Path, container: &Self::Container) -> Result<(), BackendError>;

  /// Merge a pre-assembled bytecode file into the code section.
  fn assemble(
    &mut self,
    path: &Path,
    container: &mut Self::Container,
    options: &AssembleOptions,
  ) -> Result<(), BackendError>;

  /// Compile a high-level source file and merge the result.
  fn compile_source(
    &mut self,
    path: &Path,
    container: &mut Self::Container,
    encoding: &EncodingConfig,
  ) -> Result<(), BackendError>;

  /// Merge structured declaration data into the container's metadata.
  fn load_declarations(
    &mut self,
    path: &Path,
    container: &mut Self::Container,
  ) -> Result<(), BackendError>;

  /// Patch the container's string/message tables from a text file.
  fn update_text(
    &mut self,
    path: &Path,
    container: &mut Self::Container,
    encoding: &EncodingConfig,
  ) -> Result<(), BackendError>;

  /// Re-encode the container's string data.
  fn transcode(
    &mut self,
    container: &mut Self::Container,
    encoding: &EncodingConfig,
  ) -> Result<(), BackendError>;

  /// Build a container from a project file. Bypasses container handling in
  /// this core; the project builder owns its outputs.
  fn build_project(&mut self, path: &Path, version: VersionSpec) -> Result<(), BackendError>;
}
