//! ainedit-lib: Orchestration core for editing versioned script containers
//!
//! This crate decides *what* gets built and *how* inputs are sequenced:
//! - `version`: negotiation of the container version for newly created files
//! - `queue`: the ordered queue of input artifacts to apply
//! - `mode`: selection of the active build mode (project/transcode/edit)
//! - `encoding`: the text-encoding pair threaded into text-bearing steps
//! - `backend`: the seam to the external assembler/compiler/writer
//! - `image`: a bundled backend over a JSON-serialized program image
//! - `orchestrate`: the edit loop that replays the queue against a container

pub mod backend;
pub mod encoding;
pub mod image;
pub mod mode;
pub mod orchestrate;
pub mod queue;
pub mod version;
