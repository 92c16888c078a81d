//! Meson machine files.
//!
//! A machine file is a named [`Ini`] document describing a toolchain and
//! platform. Values are stored already formatted for Meson: see [`Value`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::ini::Ini;

/// A typed machine file value before it is formatted for Meson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  Str(String),
  Bool(bool),
}

impl Value {
  /// Formats the value the way Meson reads it.
  ///
  /// Booleans become `true`/`false`; strings are single-quoted with `\`, `'`
  /// and line breaks escaped as in a Meson string literal.
  pub fn to_ini(&self) -> String {
    match self {
      Value::Bool(b) => b.to_string(),
      Value::Str(s) => {
        let escaped = s
          .replace('\\', "\\\\")
          .replace('\'', "\\'")
          .replace('\n', "\\n")
          .replace('\r', "\\r");
        format!("'{}'", escaped)
      }
    }
  }

  /// Reads back a value written by [`Value::to_ini`].
  ///
  /// Unquoted text other than a boolean literal is returned verbatim.
  pub fn from_ini(raw: &str) -> Value {
    match raw {
      "true" => return Value::Bool(true),
      "false" => return Value::Bool(false),
      _ => {}
    }

    let Some(inner) = raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) else {
      return Value::Str(raw.to_string());
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
      if c == '\\' {
        if let Some(next) = chars.next() {
          out.push(match next {
            'n' => '\n',
            'r' => '\r',
            other => other,
          });
          continue;
        }
      }
      out.push(c);
    }
    Value::Str(out)
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::Str(s.to_string())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::Str(s)
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}

/// A named Meson machine file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineFile {
  name: String,
  config: Ini,
}

/// Builder for [`MachineFile`]: content comes from a parsed config or a file
/// on disk, never both.
#[derive(Debug, Default)]
pub struct MachineFileBuilder {
  name: String,
  path: Option<PathBuf>,
  config: Option<Ini>,
}

impl MachineFileBuilder {
  pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
    self.path = Some(path.into());
    self
  }

  pub fn config(mut self, config: Ini) -> Self {
    self.config = Some(config);
    self
  }

  /// Validates the inputs and loads the content.
  ///
  /// # Errors
  ///
  /// - [`Error::MissingName`] if the name is blank
  /// - [`Error::ConfigConflict`] if both a path and a config were supplied
  /// - [`Error::Io`] / [`Error::Parse`] if the path cannot be read
  pub fn build(self) -> Result<MachineFile> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingName);
    }

    let config = match (self.path, self.config) {
      (Some(_), Some(_)) => return Err(Error::ConfigConflict { name: self.name }),
      (Some(path), None) => Ini::load(&path)?,
      (None, Some(config)) => config,
      (None, None) => Ini::new(),
    };

    Ok(MachineFile {
      name: self.name,
      config,
    })
  }
}

impl MachineFile {
  pub fn builder(name: impl Into<String>) -> MachineFileBuilder {
    MachineFileBuilder {
      name: name.into(),
      ..Default::default()
    }
  }

  pub fn from_config(name: impl Into<String>, config: Ini) -> Result<Self> {
    Self::builder(name).config(config).build()
  }

  pub fn from_path(name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
    Self::builder(name).path(path).build()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn config(&self) -> &Ini {
    &self.config
  }

  /// Writes the file as `<output>/<name>`, creating `output` if needed.
  ///
  /// An existing file with the same name is overwritten.
  pub fn dump(&self, output: &Path) -> Result<PathBuf> {
    if !output.exists() {
      debug!(dir = %output.display(), "creating machine file directory");
      fs::create_dir_all(output).map_err(|e| Error::io(output, e))?;
    }

    let path = output.join(&self.name);
    fs::write(&path, self.config.to_string()).map_err(|e| Error::io(&path, e))?;
    info!(path = %path.display(), "wrote machine file");

    Ok(path)
  }
}
