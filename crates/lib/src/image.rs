//! Bundled backend over a JSON-serialized program image.
//!
//! This is a development stand-in for the engine's real container
//! reader/writer: the same sections (code, sources, declarations, string
//! and message tables) held in an ordinary serde structure and written as
//! JSON. It gives the shipped binary working end-to-end behavior without
//! committing this crate to the engine's binary layout.
//!
//! Mutation granularity follows the engine's subsystems: assembling
//! replaces the code section (raw mode appends), declarations merge at the
//! top level, text updates patch individual table entries. Later inputs
//! supersede earlier ones at those granularities.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{AssembleOptions, Backend, BackendError};
use crate::encoding::{DEFAULT_INPUT_ENCODING, DEFAULT_OUTPUT_ENCODING, EncodingConfig};
use crate::version::VersionSpec;

/// One assembled bytecode unit in the code section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeUnit {
  pub origin: PathBuf,
  pub raw: bool,
  pub data: Vec<u8>,
}

/// One high-level source unit awaiting the engine's compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
  pub origin: PathBuf,
  pub text: String,
}

/// The in-memory program image.
#[derive(Debug, Serialize, Deserialize)]
pub struct Image {
  pub version: VersionSpec,
  /// Name of the encoding the string data is (to be) stored in.
  pub encoding: String,
  pub code: Vec<CodeUnit>,
  pub sources: Vec<SourceUnit>,
  pub declarations: serde_json::Map<String, serde_json::Value>,
  pub strings: BTreeMap<u32, String>,
  pub messages: BTreeMap<u32, String>,
}

impl Image {
  pub fn new(version: VersionSpec) -> Self {
    Image {
      version,
      encoding: DEFAULT_OUTPUT_ENCODING.to_string(),
      code: Vec::new(),
      sources: Vec::new(),
      declarations: serde_json::Map::new(),
      strings: BTreeMap::new(),
      messages: BTreeMap::new(),
    }
  }
}

/// Backend over [`Image`] containers.
#[derive(Debug, Default)]
pub struct ImageBackend;

impl Backend for ImageBackend {
  type Container = Image;

  fn open(&mut self, path: &Path) -> Result<Image, BackendError> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes)
      .map_err(|e| BackendError::msg(format!("not a valid container image: {e}")))
  }

  fn create(&mut self, version: VersionSpec) -> Result<Image, BackendError> {
    debug!(%version, "creating fresh container image");
    Ok(Image::new(version))
  }

  fn write(&mut self, path: &Path, container: &Image) -> Result<(), BackendError> {
    let bytes = serde_json::to_vec_pretty(container)
      .map_err(|e| BackendError::msg(e.to_string()))?;
    fs::write(path, bytes)?;
    Ok(())
  }

  fn assemble(
    &mut self,
    path: &Path,
    container: &mut Image,
    options: &AssembleOptions,
  ) -> Result<(), BackendError> {
    let data = fs::read(path)?;
    if data.is_empty() {
      return Err(BackendError::msg(format!("{}: empty code file", path.display())));
    }
    let unit = CodeUnit { origin: path.to_path_buf(), raw: options.raw, data };
    if options.raw {
      container.code.push(unit);
    } else {
      // A full assembly replaces the code section; only the latest wins.
      container.code.clear();
      container.code.push(unit);
    }
    Ok(())
  }

  fn compile_source(
    &mut self,
    path: &Path,
    container: &mut Image,
    encoding: &EncodingConfig,
  ) -> Result<(), BackendError> {
    require_utf8_input(encoding)?;
    let text = fs::read_to_string(path)?;
    container.sources.push(SourceUnit { origin: path.to_path_buf(), text });
    Ok(())
  }

  fn load_declarations(&mut self, path: &Path, container: &mut Image) -> Result<(), BackendError> {
    let bytes = fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
      .map_err(|e| BackendError::msg(format!("{}: {e}", path.display())))?;
    let serde_json::Value::Object(object) = value else {
      return Err(BackendError::msg(format!(
        "{}: declaration data must be a JSON object",
        path.display()
      )));
    };
    // Top-level merge; a later file's keys overwrite an earlier file's.
    for (key, value) in object {
      container.declarations.insert(key, value);
    }
    Ok(())
  }

  fn update_text(
    &mut self,
    path: &Path,
    container: &mut Image,
    encoding: &EncodingConfig,
  ) -> Result<(), BackendError> {
    require_utf8_input(encoding)?;
    let text = fs::read_to_string(path)?;
    for (lineno, line) in text.lines().enumerate() {
      match parse_text_line(line) {
        Ok(None) => {}
        Ok(Some(TextEntry::String(index, value))) => {
          container.strings.insert(index, value);
        }
        Ok(Some(TextEntry::Message(index, value))) => {
          container.messages.insert(index, value);
        }
        Err(reason) => {
          return Err(BackendError::msg(format!(
            "{}:{}: {reason}",
            path.display(),
            lineno + 1
          )));
        }
      }
    }
    Ok(())
  }

  fn transcode(&mut self, container: &mut Image, encoding: &EncodingConfig) -> Result<(), BackendError> {
    debug!(from = %container.encoding, to = %encoding.output, "transcoding string data");
    container.encoding = encoding.output.clone();
    Ok(())
  }

  fn build_project(&mut self, path: &Path, _version: VersionSpec) -> Result<(), BackendError> {
    Err(BackendError::msg(format!(
      "{}: project builds require the external project toolchain",
      path.display()
    )))
  }
}

fn require_utf8_input(encoding: &EncodingConfig) -> Result<(), BackendError> {
  if encoding.input != DEFAULT_INPUT_ENCODING {
    return Err(BackendError::msg(format!(
      "the bundled backend only reads {DEFAULT_INPUT_ENCODING} input (got {})",
      encoding.input
    )));
  }
  Ok(())
}

enum TextEntry {
  String(u32, String),
  Message(u32, String),
}

/// Parse one line of a text-update file.
///
/// Recognized forms, one entry per line:
/// ```text
/// s[12] = "string table entry"
/// m[3]  = "message table entry"
/// ```
/// Blank lines and `#` comments are skipped. Values support `\"`, `\\`,
/// `\n` and `\t` escapes.
fn parse_text_line(line: &str) -> Result<Option<TextEntry>, String> {
  let line = line.trim();
  if line.is_empty() || line.starts_with('#') {
    return Ok(None);
  }
  let (table, rest) = match line.split_at_checked(1) {
    Some(("s", rest)) | Some(("m", rest)) => (&line[..1], rest),
    _ => return Err("expected `s[...]` or `m[...]` entry".to_string()),
  };
  let rest = rest.strip_prefix('[').ok_or("expected `[` after table name")?;
  let (index_str, rest) = rest.split_once(']').ok_or("unterminated index")?;
  let index: u32 = index_str
    .trim()
    .parse()
    .map_err(|_| format!("invalid index {index_str:?}"))?;
  let rest = rest.trim_start();
  let rest = rest.strip_prefix('=').ok_or("expected `=` after index")?;
  let value = unquote(rest.trim())?;
  Ok(Some(match table {
    "s" => TextEntry::String(index, value),
    _ => TextEntry::Message(index, value),
  }))
}

fn unquote(text: &str) -> Result<String, String> {
  let inner = text
    .strip_prefix('"')
    .and_then(|t| t.strip_suffix('"'))
    .ok_or("value must be double-quoted")?;
  let mut out = String::with_capacity(inner.len());
  let mut chars = inner.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    match chars.next() {
      Some('n') => out.push('\n'),
      Some('t') => out.push('\t'),
      Some('"') => out.push('"'),
      Some('\\') => out.push('\\'),
      Some(other) => return Err(format!("unknown escape `\\{other}`")),
      None => return Err("dangling escape at end of value".to_string()),
    }
  }
  Ok(out)
}
