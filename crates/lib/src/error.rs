//! Errors raised while generating machine files and driving Meson.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while translating settings into machine files.
///
/// Every variant is fatal for the configuration pass: nothing is retried and
/// the caller is expected to stop the build.
#[derive(Debug, Error)]
pub enum Error {
  /// A machine file was given both a path and an in-memory config.
  #[error("both `path` and `config` were supplied for machine file `{name}`: only one should be used")]
  ConfigConflict { name: String },

  /// Two machine files with the same name target one directory.
  #[error("machine file `{name}` appears more than once in {}", dir.display())]
  DuplicateName { name: String, dir: PathBuf },

  /// A machine file was constructed without a name.
  #[error("machine file must have a unique, non-empty name")]
  MissingName,

  /// The architecture is not in the architecture table.
  #[error("unknown arch: {0}")]
  UnknownArchitecture(String),

  /// A cross file was requested but neither CC nor CXX is set.
  #[error("CC and CXX are undefined: a C or C++ compiler must be defined when cross-building")]
  MissingCompiler,

  /// A setting required to describe a machine is absent.
  #[error("setting `{0}` is required to describe the host machine")]
  MissingSetting(&'static str),

  /// A `key=value` setting could not be understood.
  #[error("invalid setting `{0}`: expected key=value")]
  InvalidSetting(String),

  /// An ini document could not be parsed.
  #[error("{}:{line}: {message}", path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "<input>".to_string()))]
  Parse {
    path: Option<PathBuf>,
    line: usize,
    message: String,
  },

  /// Reading or writing a file failed.
  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// An external tool could not be started.
  #[error("failed to run `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// An external tool exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {command}")]
  ToolFailed { command: String, code: Option<i32> },
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
