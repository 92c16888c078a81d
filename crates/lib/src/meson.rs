//! Driving Meson with generated machine files.
//!
//! [`Meson`] wraps the external `meson` executable. [`Recipe`] is the
//! configure/build/install pipeline a package recipe runs: generate the
//! toolchain, write it next to the build folder, then hand it to Meson.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{debug, info};

use crate::env::EnvOverrides;
use crate::error::{Error, Result};
use crate::toolchain::{ToolchainGenerator, ToolchainPaths};

/// Environment variable naming the meson executable.
pub const MESON_ENV: &str = "MESON";

/// Handle on the `meson` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meson {
  program: PathBuf,
}

impl Meson {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
    }
  }

  /// Resolves the executable: `explicit`, then `$MESON`, then `meson` on `PATH`.
  pub fn locate(explicit: Option<PathBuf>) -> Self {
    let program = explicit
      .or_else(|| std::env::var_os(MESON_ENV).map(PathBuf::from))
      .or_else(|| which::which("meson").ok())
      .unwrap_or_else(|| PathBuf::from("meson"));
    debug!(program = %program.display(), "resolved meson");
    Self { program }
  }

  pub fn program(&self) -> &Path {
    &self.program
  }

  /// Runs `meson setup` for `source` into `build_dir`.
  ///
  /// Compiler and flag variables are removed from the environment for the
  /// duration of the call so that only the machine files describe the
  /// toolchain. An already configured `build_dir` is reconfigured.
  pub fn configure(&self, source: &Path, build_dir: &Path, args: &[String]) -> Result<()> {
    let mut command: Vec<OsString> = vec!["setup".into()];
    if build_dir.join("meson-private").is_dir() {
      command.push("--reconfigure".into());
    }
    command.extend(args.iter().map(OsString::from));
    command.push(build_dir.into());
    command.push(source.into());

    EnvOverrides::clear_toolchain().scope(|| self.run(&command))
  }

  /// Runs `meson compile` in `build_dir`.
  pub fn build(&self, build_dir: &Path) -> Result<()> {
    self.run(&["compile".into(), "-C".into(), build_dir.into()])
  }

  /// Runs `meson install` in `build_dir`.
  pub fn install(&self, build_dir: &Path) -> Result<()> {
    self.run(&["install".into(), "-C".into(), build_dir.into()])
  }

  fn run(&self, args: &[OsString]) -> Result<()> {
    let rendered = std::iter::once(self.program.as_os_str())
      .chain(args.iter().map(OsString::as_os_str))
      .map(|a| a.to_string_lossy())
      .collect::<Vec<_>>()
      .join(" ");
    info!(cmd = %rendered, "running meson");

    let status = Command::new(&self.program)
      .args(args)
      .status()
      .map_err(|e| Error::Spawn {
        program: self.program.display().to_string(),
        source: e,
      })?;

    if !status.success() {
      return Err(Error::ToolFailed {
        command: rendered,
        code: status.code(),
      });
    }

    Ok(())
  }
}

/// Outcome of configuring a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfiguredBuild {
  pub build_dir: PathBuf,
  pub machine_files: ToolchainPaths,
}

/// Configure/build/install steps of a Meson-based package.
#[derive(Debug, Clone)]
pub struct Recipe {
  pub source_folder: PathBuf,
  pub build_folder: PathBuf,
  pub package_folder: PathBuf,
  pub meson: Meson,
  pub generator: ToolchainGenerator,
}

impl Recipe {
  /// Directory receiving the `native/` and `cross/` machine files.
  pub fn machine_files_dir(&self) -> PathBuf {
    self.build_folder.join("_meson_machine_files")
  }

  /// Meson's build directory.
  pub fn meson_build_dir(&self) -> PathBuf {
    self.build_folder.join("_meson")
  }

  /// Generates the toolchain and runs `meson setup` with it.
  pub fn configure(&self) -> Result<ConfiguredBuild> {
    let toolchain = self.generator.generate()?;
    let machine_files = toolchain.dump(&self.machine_files_dir())?;

    let mut args = vec![format!("-Dprefix={}", self.package_folder.display())];
    args.extend(machine_files.meson_args());

    let build_dir = self.meson_build_dir();
    self.meson.configure(&self.source_folder, &build_dir, &args)?;

    Ok(ConfiguredBuild {
      build_dir,
      machine_files,
    })
  }

  /// Configures then compiles.
  pub fn build(&self) -> Result<ConfiguredBuild> {
    let configured = self.configure()?;
    self.meson.build(&configured.build_dir)?;
    Ok(configured)
  }

  /// Configures then installs into the package folder.
  pub fn install(&self) -> Result<ConfiguredBuild> {
    let configured = self.configure()?;
    self.meson.install(&configured.build_dir)?;
    Ok(configured)
  }
}
