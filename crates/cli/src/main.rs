//! ainedit - edit a versioned script container.
//!
//! Queues input artifacts in command-line order, picks one of three build
//! modes (project build, transcode, direct edit), and hands the result to
//! the orchestrator in `ainedit-lib`.

mod output;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, ensure};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use tracing_subscriber::EnvFilter;

use ainedit_lib::backend::AssembleOptions;
use ainedit_lib::encoding::EncodingConfig;
use ainedit_lib::image::ImageBackend;
use ainedit_lib::mode::{self, BuildMode};
use ainedit_lib::orchestrate::{self, EditRequest};
use ainedit_lib::queue::{InputKind, InputQueue};
use ainedit_lib::version::{SUPPORTED_MAJOR, VersionSpec};

/// Edit a .ain file
#[derive(Parser)]
#[command(name = "ainedit")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Set the output file path
  #[arg(short, long, value_name = "PATH")]
  output: Option<PathBuf>,

  /// Update the CODE section (assemble .jam file)
  #[arg(short = 'c', long = "code", value_name = "PATH")]
  code: Vec<PathBuf>,

  /// Update the .ain file from .jaf source code
  #[arg(long = "jaf", value_name = "PATH")]
  jaf: Vec<PathBuf>,

  /// Update the .ain file from json data
  #[arg(short = 'j', long = "json", value_name = "PATH")]
  json: Vec<PathBuf>,

  /// Build a .ain file from a project file
  #[arg(short = 'p', long = "project", value_name = "PATH")]
  project: Option<PathBuf>,

  /// Update strings/messages
  #[arg(short = 't', long = "text", value_name = "PATH")]
  text: Vec<PathBuf>,

  /// Specify the .ain version for newly created files
  #[arg(long = "ain-version", value_name = "M[.mm]")]
  ain_version: Option<String>,

  /// Read code in raw mode
  #[arg(long)]
  raw: bool,

  /// Don't write informational messages to stdout
  #[arg(long)]
  silent: bool,

  /// Change the .ain file's text encoding
  #[arg(long = "transcode", value_name = "ENCODING")]
  transcode: Option<String>,

  /// Existing .ain file to edit (omit to create a new one)
  #[arg(value_name = "AIN-FILE")]
  ain_file: Option<PathBuf>,
}

fn main() {
  // Raw matches are kept alongside the parsed struct: the queue's ordering
  // spans several repeated flags, which only the argument indices preserve.
  let matches = Cli::command().get_matches();
  let cli = match Cli::from_arg_matches(&matches) {
    Ok(cli) => cli,
    Err(err) => err.exit(),
  };

  init_logging(cli.silent);

  if let Err(err) = run(cli, &matches) {
    output::print_error(&format!("{err:#}"));
    process::exit(1);
  }
}

fn init_logging(silent: bool) {
  let filter = if silent {
    EnvFilter::new("warn")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .with_writer(std::io::stderr)
    .init();
}

fn run(cli: Cli, matches: &ArgMatches) -> Result<()> {
  let version = negotiate_version(cli.ain_version.as_deref())?;
  let queue = collect_inputs(matches)?;

  let selection = mode::select(cli.project, cli.transcode, cli.ain_file, queue.len());
  if let Some(warning) = selection.ignored_inputs_warning() {
    output::print_warning(&warning);
  }

  let encoding = match &selection.mode {
    BuildMode::Transcode { target_encoding, .. } => EncodingConfig::for_transcode(target_encoding),
    _ => EncodingConfig::default(),
  };

  let request = EditRequest {
    mode: selection.mode,
    queue,
    version,
    output: cli.output.unwrap_or_else(|| PathBuf::from(mode::DEFAULT_OUTPUT)),
    assemble: AssembleOptions { raw: cli.raw },
    encoding,
  };

  let mut backend = ImageBackend;
  orchestrate::run(&mut backend, &request)?;

  if !cli.silent {
    match &request.mode {
      BuildMode::ProjectBuild { project } => {
        output::print_success(&format!("built project {}", project.display()));
      }
      _ => output::print_success(&format!("wrote {}", request.output.display())),
    }
  }
  Ok(())
}

fn negotiate_version(text: Option<&str>) -> Result<VersionSpec> {
  let Some(text) = text else {
    return Ok(VersionSpec::default());
  };
  let version = VersionSpec::parse(text).context("invalid ain version")?;
  ensure!(
    SUPPORTED_MAJOR.contains(&version.major),
    "invalid ain version {version} ({}-{} supported)",
    SUPPORTED_MAJOR.start(),
    SUPPORTED_MAJOR.end()
  );
  Ok(version)
}

/// Rebuild the input queue in command-line order.
///
/// clap collects each repeated flag into its own list, so the interleaving
/// across `--code`/`--jaf`/`--json`/`--text` is recovered from the raw
/// argument indices before pushing onto the queue.
fn collect_inputs(matches: &ArgMatches) -> Result<InputQueue> {
  const SOURCES: [(&str, InputKind); 4] = [
    ("code", InputKind::Code),
    ("jaf", InputKind::Jaf),
    ("json", InputKind::Declarations),
    ("text", InputKind::Text),
  ];

  let mut ordered: Vec<(usize, InputKind, PathBuf)> = Vec::new();
  for (id, kind) in SOURCES {
    let (Some(indices), Some(values)) = (matches.indices_of(id), matches.get_many::<PathBuf>(id))
    else {
      continue;
    };
    for (index, value) in indices.zip(values) {
      ordered.push((index, kind, value.clone()));
    }
  }
  ordered.sort_by_key(|(index, ..)| *index);

  let mut queue = InputQueue::new();
  for (_, kind, path) in ordered {
    queue.push(kind, path)?;
  }
  Ok(queue)
}
