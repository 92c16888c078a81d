//! Translation of settings and environment into machine files.

use tracing::{debug, info};

use super::Toolchain;
use crate::env::{ToolchainEnv, VarSet};
use crate::error::{Error, Result};
use crate::ini::Ini;
use crate::machine_file::{MachineFile, Value};
use crate::platform::{Platform, arch, os};
use crate::settings::{Profile, Profiles, Settings};

/// File name used for every generated machine file.
pub const DEFAULT_FILE_NAME: &str = "default.ini";

const BUILD_MACHINE: &str = "build_machine";
const HOST_MACHINE: &str = "host_machine";

/// Decides which machine files a configuration pass needs and renders them.
#[derive(Debug, Clone)]
pub struct ToolchainGenerator {
  profiles: Profiles,
  env: ToolchainEnv,
  force_cross: bool,
  detected: Option<Platform>,
}

impl ToolchainGenerator {
  pub fn new(profiles: Profiles, env: ToolchainEnv) -> Self {
    Self {
      profiles,
      env,
      force_cross: false,
      detected: Platform::current(),
    }
  }

  /// Treats a unified profile as cross-building even without any signal.
  pub fn force_cross(mut self, force: bool) -> Self {
    self.force_cross = force;
    self
  }

  /// Overrides the platform used when the build machine is not described
  /// by the settings.
  pub fn detected_platform(mut self, platform: Option<Platform>) -> Self {
    self.detected = platform;
    self
  }

  /// Produces the native and cross machine files.
  ///
  /// # Errors
  ///
  /// - [`Error::UnknownArchitecture`] if a described architecture is not in the table
  /// - [`Error::MissingSetting`] if a cross file lacks `os` or `arch`
  /// - [`Error::MissingCompiler`] if a cross file has neither CC nor CXX
  pub fn generate(&self) -> Result<Toolchain> {
    let toolchain = match &self.profiles {
      Profiles::Separate { build, target } => self.generate_separate(build.as_ref(), target.as_ref())?,
      Profiles::Unified(profile) => self.generate_unified(profile)?,
    };

    info!(
      native = toolchain.native_files.len(),
      cross = toolchain.cross_files.len(),
      "generated toolchain"
    );
    Ok(toolchain)
  }

  fn generate_separate(&self, build: Option<&Profile>, target: Option<&Profile>) -> Result<Toolchain> {
    let mut toolchain = Toolchain::default();

    if let Some(build) = build {
      let env = self.env.with_overlay(&build.env);
      let settings = &build.settings;
      let machine = settings.os().zip(settings.arch());
      toolchain
        .native_files
        .push(native_file(&env, VarSet::Plain, machine)?);
    }

    if let Some(target) = target {
      let env = self.env.with_overlay(&target.env);
      let build_settings = build.map(|b| &b.settings);
      let build_os = build_settings.and_then(Settings::os);
      let build_arch = build_settings.and_then(Settings::arch);
      let (build_os, build_arch) = self.build_platform(build_os, build_arch);
      toolchain
        .cross_files
        .push(cross_file(&env, &target.settings, build_os, build_arch)?);
    }

    Ok(toolchain)
  }

  fn generate_unified(&self, profile: &Profile) -> Result<Toolchain> {
    let env = self.env.with_overlay(&profile.env);
    let settings = &profile.settings;

    let has_build_compiler = !self.force_cross && env.has_build_compiler();
    let is_cross = self.force_cross || has_build_compiler || settings.has_build_settings();
    debug!(
      force_cross = self.force_cross,
      has_build_compiler,
      has_build_settings = settings.has_build_settings(),
      is_cross,
      "resolved cross-building signals"
    );

    let mut toolchain = Toolchain::default();

    if !is_cross {
      toolchain.native_files.push(native_file(&env, VarSet::Plain, None)?);
      return Ok(toolchain);
    }

    if has_build_compiler {
      let machine = settings.os_build().zip(settings.arch_build());
      toolchain
        .native_files
        .push(native_file(&env, VarSet::ForBuild, machine)?);
    }

    let (build_os, build_arch) = self.build_platform(settings.os_build(), settings.arch_build());
    toolchain
      .cross_files
      .push(cross_file(&env, settings, build_os, build_arch)?);

    Ok(toolchain)
  }

  /// Fills in whichever of the build os/arch is missing from the detected platform.
  fn build_platform<'a>(&'a self, os: Option<&'a str>, arch: Option<&'a str>) -> (Option<&'a str>, Option<&'a str>) {
    let detected = self.detected.as_ref();
    (
      os.or(detected.map(|p| p.os.as_str())),
      arch.or(detected.map(|p| p.arch.as_str())),
    )
  }
}

/// Whether binaries built for the host can not run on the build machine.
fn cross_building(host_os: &str, host_arch: &str, build_os: Option<&str>, build_arch: Option<&str>) -> bool {
  build_os != Some(host_os) || build_arch != Some(host_arch)
}

fn native_file(env: &ToolchainEnv, vars: VarSet, machine: Option<(&str, &str)>) -> Result<MachineFile> {
  let mut ini = Ini::new();
  put(&mut ini, "binaries", binaries(env, vars));
  put(&mut ini, "properties", properties(env, vars));

  if let Some((os, arch)) = machine {
    put(&mut ini, BUILD_MACHINE, machine_section(os, arch)?);
  }

  MachineFile::from_config(DEFAULT_FILE_NAME, ini)
}

fn cross_file(
  env: &ToolchainEnv,
  settings: &Settings,
  build_os: Option<&str>,
  build_arch: Option<&str>,
) -> Result<MachineFile> {
  let host_os = settings.os().ok_or(Error::MissingSetting("os"))?;
  let host_arch = settings.arch().ok_or(Error::MissingSetting("arch"))?;
  let machine = machine_section(host_os, host_arch)?;

  if env.var("CC", VarSet::Plain).is_none() && env.var("CXX", VarSet::Plain).is_none() {
    return Err(Error::MissingCompiler);
  }

  let needs_exe_wrapper = cross_building(host_os, host_arch, build_os, build_arch);
  debug!(host_os, host_arch, ?build_os, ?build_arch, needs_exe_wrapper, "describing host machine");

  let mut properties = properties(env, VarSet::Plain);
  properties.push(("needs_exe_wrapper", Some(Value::Bool(needs_exe_wrapper))));

  let mut ini = Ini::new();
  put(&mut ini, "binaries", binaries(env, VarSet::Plain));
  put(&mut ini, "properties", properties);
  put(&mut ini, HOST_MACHINE, machine);

  MachineFile::from_config(DEFAULT_FILE_NAME, ini)
}

type Entries = Vec<(&'static str, Option<Value>)>;

fn binaries(env: &ToolchainEnv, vars: VarSet) -> Entries {
  let var = |base: &str| env.var(base, vars).map(Value::from);
  vec![
    ("c", var("CC")),
    ("cpp", var("CXX")),
    ("ld", var("LD")),
    ("ar", var("AR")),
    ("strip", var("STRIP")),
    ("as", var("AS")),
    ("ranlib", var("RANLIB")),
    (
      "pkgconfig",
      env.pkg_config().map(|p| Value::from(p.display().to_string())),
    ),
  ]
}

fn properties(env: &ToolchainEnv, vars: VarSet) -> Entries {
  let var = |base: &str| env.var(base, vars);
  let link_args = var("LDFLAGS").map(Value::from);
  vec![
    ("c_args", join_flags(var("CPPFLAGS"), var("CFLAGS"))),
    ("cpp_args", join_flags(var("CPPFLAGS"), var("CXXFLAGS"))),
    ("c_link_args", link_args.clone()),
    ("cpp_link_args", link_args),
    ("pkg_config_path", var("PKG_CONFIG_PATH").map(Value::from)),
  ]
}

fn machine_section(os: &str, arch: &str) -> Result<Entries> {
  let info = arch::cpu_family_and_endian(arch)?;
  Ok(vec![
    ("system", Some(Value::from(os::system_from_os(os)))),
    ("cpu", Some(Value::from(arch))),
    ("cpu_family", Some(Value::from(info.cpu_family))),
    ("endian", Some(Value::from(info.endian.as_str()))),
  ])
}

/// Joins preprocessor and compiler flags; nothing to join yields `None`.
fn join_flags(first: Option<&str>, second: Option<&str>) -> Option<Value> {
  let joined = format!("{} {}", first.unwrap_or_default(), second.unwrap_or_default());
  let joined = joined.trim();
  (!joined.is_empty()).then(|| Value::from(joined))
}

/// Creates `section` and sets every entry that has a value.
fn put(ini: &mut Ini, section: &str, entries: Entries) {
  let section = ini.section_mut(section);
  for (key, value) in entries {
    if let Some(value) = value {
      section.set(key, value.to_ini());
    }
  }
}
