//! Native and cross machine files produced for one configuration pass.

mod generator;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::machine_file::MachineFile;

pub use generator::{DEFAULT_FILE_NAME, ToolchainGenerator};

/// Generated machine files, split by role.
///
/// Either list may be empty: a plain native build has no cross files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toolchain {
  pub native_files: Vec<MachineFile>,
  pub cross_files: Vec<MachineFile>,
}

/// Where [`Toolchain::dump`] wrote each file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolchainPaths {
  pub native: Vec<PathBuf>,
  pub cross: Vec<PathBuf>,
}

impl ToolchainPaths {
  /// One `--native-file=` / `--cross-file=` argument per written file.
  pub fn meson_args(&self) -> Vec<String> {
    let native = self
      .native
      .iter()
      .map(|p| format!("--native-file={}", p.display()));
    let cross = self
      .cross
      .iter()
      .map(|p| format!("--cross-file={}", p.display()));
    native.chain(cross).collect()
  }
}

impl Toolchain {
  pub fn new(native_files: Vec<MachineFile>, cross_files: Vec<MachineFile>) -> Self {
    Self {
      native_files,
      cross_files,
    }
  }

  pub fn is_cross(&self) -> bool {
    !self.cross_files.is_empty()
  }

  /// Writes native files under `<output>/native` and cross files under
  /// `<output>/cross`. A subdirectory is created only when it gets files.
  pub fn dump(&self, output: &Path) -> Result<ToolchainPaths> {
    Ok(ToolchainPaths {
      native: dump_all(&self.native_files, &output.join("native"))?,
      cross: dump_all(&self.cross_files, &output.join("cross"))?,
    })
  }
}

fn dump_all(files: &[MachineFile], dir: &Path) -> Result<Vec<PathBuf>> {
  if files.is_empty() {
    return Ok(Vec::new());
  }

  let mut seen = HashSet::new();
  if let Some(file) = files.iter().find(|file| !seen.insert(file.name())) {
    return Err(Error::DuplicateName {
      name: file.name().to_string(),
      dir: dir.to_path_buf(),
    });
  }

  if !dir.exists() {
    debug!(dir = %dir.display(), "creating toolchain directory");
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
  }

  files.iter().map(|file| file.dump(dir)).collect()
}
