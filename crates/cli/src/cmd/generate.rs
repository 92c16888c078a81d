//! Implementation of the `mesongen generate` command.

use std::path::Path;

use anyhow::{Context, Result};

use crate::ProfileArgs;
use crate::cmd::profiles::generator;
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

/// Generates the toolchain and writes it under `output`.
///
/// Prints the written paths, or the `ToolchainPaths` as JSON.
pub fn cmd_generate(output: &Path, args: &ProfileArgs, format: OutputFormat) -> Result<()> {
  let toolchain = generator(args)?
    .generate()
    .context("Failed to generate machine files")?;
  let paths = toolchain
    .dump(output)
    .with_context(|| format!("Failed to write machine files to {}", output.display()))?;

  if format.is_json() {
    return print_json(&paths);
  }

  if toolchain.is_cross() {
    print_info("Cross-building: host machine described by a cross file");
  }
  print_success(&format!(
    "Wrote {} machine file(s)",
    paths.native.len() + paths.cross.len()
  ));
  for path in &paths.native {
    print_stat("native", &path.display().to_string());
  }
  for path in &paths.cross {
    print_stat("cross", &path.display().to_string());
  }

  Ok(())
}
