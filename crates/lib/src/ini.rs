//! Sectioned key/value documents.
//!
//! Meson machine files and package-manager profiles share the same shape:
//! `[section]` headers followed by `key = value` lines. Section and key order
//! is preserved so that written files are stable between runs.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// A named section holding ordered `key = value` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
  name: String,
  entries: Vec<(String, String)>,
}

impl Section {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      entries: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
  }

  /// Sets `key`, replacing an existing value in place.
  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    let key = key.into();
    let value = value.into();
    match self.entries.iter_mut().find(|(k, _)| *k == key) {
      Some(entry) => entry.1 = value,
      None => self.entries.push((key, value)),
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// An ordered collection of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ini {
  sections: Vec<Section>,
}

impl Ini {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses an ini document.
  ///
  /// Blank lines and lines starting with `#` or `;` are ignored. Entries use
  /// `=` (or `:` when no `=` is present) as the delimiter. A repeated key
  /// keeps its last value; a repeated section header is an error.
  pub fn parse(input: &str) -> Result<Self> {
    parse_document(input).map_err(|(line, message)| Error::Parse {
      path: None,
      line,
      message,
    })
  }

  /// Reads and parses the ini file at `path`.
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_document(&content).map_err(|(line, message)| Error::Parse {
      path: Some(path.to_path_buf()),
      line,
      message,
    })
  }

  pub fn section(&self, name: &str) -> Option<&Section> {
    self.sections.iter().find(|s| s.name == name)
  }

  /// Returns the section called `name`, appending an empty one if needed.
  pub fn section_mut(&mut self, name: &str) -> &mut Section {
    let index = match self.sections.iter().position(|s| s.name == name) {
      Some(index) => index,
      None => {
        self.sections.push(Section::new(name));
        self.sections.len() - 1
      }
    };
    &mut self.sections[index]
  }

  pub fn get(&self, section: &str, key: &str) -> Option<&str> {
    self.section(section)?.get(key)
  }

  pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
    self.section_mut(section).set(key, value);
  }

  pub fn sections(&self) -> impl Iterator<Item = &Section> {
    self.sections.iter()
  }

  pub fn is_empty(&self) -> bool {
    self.sections.is_empty()
  }
}

impl fmt::Display for Ini {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for section in &self.sections {
      writeln!(f, "[{}]", section.name)?;
      for (key, value) in &section.entries {
        writeln!(f, "{} = {}", key, value)?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

fn parse_document(input: &str) -> std::result::Result<Ini, (usize, String)> {
  let mut ini = Ini::new();
  let mut current: Option<usize> = None;

  for (index, raw) in input.lines().enumerate() {
    let line_no = index + 1;
    let line = raw.trim();

    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
      continue;
    }

    if let Some(rest) = line.strip_prefix('[') {
      let name = rest
        .strip_suffix(']')
        .ok_or_else(|| (line_no, format!("unterminated section header `{}`", line)))?
        .trim();
      if name.is_empty() {
        return Err((line_no, "empty section name".to_string()));
      }
      if ini.section(name).is_some() {
        return Err((line_no, format!("duplicate section `{}`", name)));
      }
      ini.sections.push(Section::new(name));
      current = Some(ini.sections.len() - 1);
      continue;
    }

    let Some(section) = current else {
      return Err((line_no, format!("entry `{}` appears before any section header", line)));
    };

    let delimiter = line
      .find('=')
      .or_else(|| line.find(':'))
      .ok_or_else(|| (line_no, format!("expected `key = value`, found `{}`", line)))?;
    let key = line[..delimiter].trim();
    let value = line[delimiter + 1..].trim();
    if key.is_empty() {
      return Err((line_no, "empty key".to_string()));
    }

    ini.sections[section].set(key, value);
  }

  Ok(ini)
}
