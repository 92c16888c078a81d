//! Environment variables consumed by the toolchain generator, and the scoped
//! overrides applied around external tool invocations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Toolchain variables read from the environment. Each one also has a
/// `_FOR_BUILD` variant describing the build machine.
pub const TOOLCHAIN_VARS: &[&str] = &[
  "CC",
  "CXX",
  "LD",
  "AR",
  "STRIP",
  "AS",
  "RANLIB",
  "CFLAGS",
  "CXXFLAGS",
  "CPPFLAGS",
  "LDFLAGS",
  "PKG_CONFIG_PATH",
];

/// Variables hidden from Meson while it configures; flags reach it only
/// through machine files.
pub const CLEARED_VARS: &[&str] = &[
  "CC", "CXX", "CCFLAGS", "CXXFLAGS", "CPPFLAGS", "LDFLAGS", "AR", "AS", "STRIP", "RANLIB",
];

const FOR_BUILD_SUFFIX: &str = "_FOR_BUILD";

/// Which flavour of a toolchain variable to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSet {
  /// `CC`, `CFLAGS`, ...
  Plain,
  /// `CC_FOR_BUILD`, `CFLAGS_FOR_BUILD`, ...
  ForBuild,
}

impl VarSet {
  pub fn name(self, base: &str) -> String {
    match self {
      VarSet::Plain => base.to_string(),
      VarSet::ForBuild => format!("{}{}", base, FOR_BUILD_SUFFIX),
    }
  }
}

/// Snapshot of the toolchain environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
  vars: BTreeMap<String, String>,
  pkg_config: Option<PathBuf>,
}

impl ToolchainEnv {
  /// Captures the toolchain variables of the current process and locates
  /// `pkg-config` on `PATH`.
  pub fn from_process() -> Self {
    let mut vars = BTreeMap::new();
    for base in TOOLCHAIN_VARS {
      for set in [VarSet::Plain, VarSet::ForBuild] {
        let name = set.name(base);
        if let Ok(value) = std::env::var(&name) {
          vars.insert(name, value);
        }
      }
    }

    let pkg_config = which::which("pkg-config").ok();
    debug!(vars = vars.len(), pkg_config = ?pkg_config, "captured toolchain environment");

    Self { vars, pkg_config }
  }

  /// Builds a snapshot from explicit variables, without `pkg-config`.
  pub fn from_vars<I, K, V>(vars: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    Self {
      vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
      pkg_config: None,
    }
  }

  pub fn with_pkg_config(mut self, path: Option<PathBuf>) -> Self {
    self.pkg_config = path;
    self
  }

  /// Returns a copy with `overlay` taking precedence over captured values.
  pub fn with_overlay(&self, overlay: &BTreeMap<String, String>) -> Self {
    let mut env = self.clone();
    env
      .vars
      .extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
  }

  /// Returns the variable `name`; blank values count as unset.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .vars
      .get(name)
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
  }

  pub fn var(&self, base: &str, set: VarSet) -> Option<&str> {
    self.get(&set.name(base))
  }

  pub fn pkg_config(&self) -> Option<&Path> {
    self.pkg_config.as_deref()
  }

  /// Whether a build-machine compiler (`CC_FOR_BUILD` / `CXX_FOR_BUILD`) is set.
  pub fn has_build_compiler(&self) -> bool {
    ["CC", "CXX"]
      .iter()
      .any(|base| self.var(base, VarSet::ForBuild).is_some())
  }
}

/// A set of environment overrides applied for the duration of a closure.
///
/// `Some(value)` sets a variable, `None` removes it. Previous values are
/// restored when the closure returns, fails or panics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
  vars: Vec<(String, Option<String>)>,
}

impl EnvOverrides {
  pub fn new() -> Self {
    Self::default()
  }

  /// Removes every [`CLEARED_VARS`] entry and its `_FOR_BUILD` variant.
  pub fn clear_toolchain() -> Self {
    let mut overrides = Self::new();
    for base in CLEARED_VARS {
      overrides.remove(VarSet::Plain.name(base));
      overrides.remove(VarSet::ForBuild.name(base));
    }
    overrides
  }

  pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
    self.vars.push((name.into(), Some(value.into())));
    self
  }

  pub fn remove(&mut self, name: impl Into<String>) -> &mut Self {
    self.vars.push((name.into(), None));
    self
  }

  pub fn len(&self) -> usize {
    self.vars.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vars.is_empty()
  }

  /// Runs `f` with the overrides applied to the process environment.
  pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
    debug!(overrides = self.vars.len(), "entering scoped environment");
    temp_env::with_vars(&self.vars, f)
  }
}
