//! Implementation of the `mesongen configure`, `build` and `install` commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use mesongen_lib::meson::{Meson, Recipe};

use crate::RecipeArgs;
use crate::cmd::profiles::generator;
use crate::output::{OutputFormat, print_json, print_stat, print_success};

/// How far the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
  Configure,
  Build,
  Install,
}

impl PipelineStep {
  fn past_tense(self) -> &'static str {
    match self {
      PipelineStep::Configure => "Configured",
      PipelineStep::Build => "Built",
      PipelineStep::Install => "Installed",
    }
  }
}

/// Creates `path` if needed and returns its canonical form.
///
/// Meson rejects relative install prefixes.
fn absolute_dir(path: &Path) -> Result<PathBuf> {
  fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;
  dunce::canonicalize(path).with_context(|| format!("Failed to resolve {}", path.display()))
}

/// Execute the configure/build/install pipeline.
///
/// Machine files land in `<build-folder>/_meson_machine_files`, Meson's build
/// directory is `<build-folder>/_meson`.
pub fn cmd_pipeline(args: &RecipeArgs, step: PipelineStep, format: OutputFormat) -> Result<()> {
  let source_folder = dunce::canonicalize(&args.source)
    .with_context(|| format!("Source directory not found: {}", args.source.display()))?;
  let build_folder = absolute_dir(&args.build_folder)?;
  let package_folder = absolute_dir(
    &args
      .prefix
      .clone()
      .unwrap_or_else(|| build_folder.join("package")),
  )?;

  let recipe = Recipe {
    source_folder,
    build_folder,
    package_folder,
    meson: Meson::locate(args.meson.clone()),
    generator: generator(&args.profiles)?,
  };

  let configured = match step {
    PipelineStep::Configure => recipe.configure(),
    PipelineStep::Build => recipe.build(),
    PipelineStep::Install => recipe.install(),
  }
  .with_context(|| format!("{:?} failed", step))?;

  if format.is_json() {
    return print_json(&configured);
  }

  print_success(&format!("{} {}", step.past_tense(), recipe.source_folder.display()));
  print_stat("build dir", &configured.build_dir.display().to_string());
  print_stat("prefix", &recipe.package_folder.display().to_string());
  for arg in configured.machine_files.meson_args() {
    print_stat("machine file", &arg);
  }

  Ok(())
}
