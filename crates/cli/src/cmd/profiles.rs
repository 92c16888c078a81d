//! Turns profile command-line arguments into a toolchain generator.

use anyhow::{Context, Result};
use tracing::debug;

use mesongen_lib::env::ToolchainEnv;
use mesongen_lib::settings::{Profile, Profiles, Settings};
use mesongen_lib::toolchain::ToolchainGenerator;

use crate::ProfileArgs;

fn load(path: &std::path::Path) -> Result<Profile> {
  Profile::load(path).with_context(|| format!("Failed to load profile {}", path.display()))
}

/// Resolves the profiles and captures the process environment.
///
/// `-s` overrides apply to the unified profile, which defaults to the
/// detected machine when `--profile` is not given.
pub fn generator(args: &ProfileArgs) -> Result<ToolchainGenerator> {
  let mut unified = match &args.profile {
    Some(path) => load(path)?,
    None => Profile::new(Settings::detected()),
  };
  for assignment in &args.settings {
    unified.settings.apply_assignment(assignment)?;
  }

  let build = args.build_profile.as_deref().map(load).transpose()?;
  let target = args.target_profile.as_deref().map(load).transpose()?;

  let profiles = Profiles::from_parts(unified, build, target);
  debug!(?profiles, "resolved profiles");

  Ok(ToolchainGenerator::new(profiles, ToolchainEnv::from_process()).force_cross(args.force_cross))
}
