//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get a Command for the mesongen binary with no toolchain variables set.
pub fn mesongen_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("mesongen");
  for base in mesongen_lib::env::TOOLCHAIN_VARS {
    cmd.env_remove(base).env_remove(format!("{}_FOR_BUILD", base));
  }
  cmd.env_remove("MESON");
  cmd
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory for profiles and output.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the temp directory and return its path.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Read a file relative to the temp directory.
  pub fn read_file(&self, relative_path: &str) -> String {
    let path = self.temp.path().join(relative_path);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
  }

  /// Output path for generated machine files.
  pub fn output_path(&self) -> PathBuf {
    self.temp.path().join("output")
  }
}
