//! Package-manager settings and profiles.
//!
//! A [`Profile`] is the read-only snapshot handed over by the package manager:
//! platform settings (`os`, `arch`, optionally `os_build` / `arch_build`) plus
//! an environment overlay. [`Profiles`] records once, at entry, whether the
//! recipe sees a single unified settings set or separate build and target sets.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::ini::Ini;
use crate::platform::Platform;

/// Resolved package-manager settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
  values: BTreeMap<String, String>,
}

impl Settings {
  pub fn new() -> Self {
    Self::default()
  }

  /// Settings describing the machine this binary runs on.
  ///
  /// Empty when the platform has no package-manager name.
  pub fn detected() -> Self {
    match Platform::current() {
      Some(platform) => Self::new().with("os", platform.os).with("arch", platform.arch),
      None => Self::new(),
    }
  }

  /// Returns the value of `key`; blank values count as unset.
  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .values
      .get(key)
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.values.insert(key.into(), value.into());
  }

  pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.set(key, value);
    self
  }

  /// Applies a `key=value` assignment as given on a command line.
  pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
    let (key, value) = assignment
      .split_once('=')
      .map(|(k, v)| (k.trim(), v.trim()))
      .filter(|(k, _)| !k.is_empty())
      .ok_or_else(|| Error::InvalidSetting(assignment.to_string()))?;
    self.set(key, value);
    Ok(())
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn os(&self) -> Option<&str> {
    self.get("os")
  }

  pub fn arch(&self) -> Option<&str> {
    self.get("arch")
  }

  pub fn os_build(&self) -> Option<&str> {
    self.get("os_build")
  }

  pub fn arch_build(&self) -> Option<&str> {
    self.get("arch_build")
  }

  /// Whether `os_build` or `arch_build` is declared.
  pub fn has_build_settings(&self) -> bool {
    self.os_build().is_some() || self.arch_build().is_some()
  }
}

/// Settings plus the environment overlay of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
  pub settings: Settings,
  pub env: BTreeMap<String, String>,
}

impl Profile {
  pub fn new(settings: Settings) -> Self {
    Self {
      settings,
      env: BTreeMap::new(),
    }
  }

  /// Builds a profile from the `[settings]` and `[env]` sections of `ini`.
  ///
  /// Other sections are ignored.
  pub fn from_ini(ini: &Ini) -> Self {
    let mut profile = Profile::default();
    if let Some(section) = ini.section("settings") {
      for (key, value) in section.iter() {
        profile.settings.set(key, value);
      }
    }
    if let Some(section) = ini.section("env") {
      for (key, value) in section.iter() {
        profile.env.insert(key.to_string(), value.to_string());
      }
    }
    profile
  }

  /// Loads a profile file.
  pub fn load(path: &Path) -> Result<Self> {
    let profile = Self::from_ini(&Ini::load(path)?);
    debug!(
      path = %path.display(),
      settings = ?profile.settings,
      env_keys = profile.env.len(),
      "loaded profile"
    );
    Ok(profile)
  }
}

/// The shape of the settings a recipe was configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profiles {
  /// One settings set; cross-building is inferred from `*_build` settings
  /// and `*_FOR_BUILD` environment variables.
  Unified(Profile),
  /// Explicit build and/or target settings. At least one side is present.
  Separate {
    build: Option<Profile>,
    target: Option<Profile>,
  },
}

impl Profiles {
  /// Decides the shape from what the caller supplied.
  ///
  /// Explicit build or target settings take precedence; `unified` is used
  /// only when neither is present.
  pub fn from_parts(unified: Profile, build: Option<Profile>, target: Option<Profile>) -> Self {
    if build.is_none() && target.is_none() {
      Profiles::Unified(unified)
    } else {
      Profiles::Separate { build, target }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_settings_count_as_unset() {
    let settings = Settings::new().with("os", "Linux").with("arch", "  ");
    assert_eq!(settings.os(), Some("Linux"));
    assert_eq!(settings.arch(), None);
    assert!(!settings.has_build_settings());
  }

  #[test]
  fn build_settings_are_detected() {
    let settings = Settings::new().with("os", "Linux").with("os_build", "Linux");
    assert!(settings.has_build_settings());

    let settings = Settings::new().with("arch_build", "x86_64");
    assert!(settings.has_build_settings());
  }

  #[test]
  fn assignments() {
    let mut settings = Settings::new();
    settings.apply_assignment("arch=armv8").unwrap();
    settings.apply_assignment(" compiler.version = 12 ").unwrap();
    assert_eq!(settings.arch(), Some("armv8"));
    assert_eq!(settings.get("compiler.version"), Some("12"));

    assert!(matches!(settings.apply_assignment("arch"), Err(Error::InvalidSetting(_))));
    assert!(matches!(settings.apply_assignment("=x"), Err(Error::InvalidSetting(_))));
  }

  #[test]
  fn profile_from_ini() {
    let ini = Ini::parse(
      "[settings]\nos=Linux\narch=armv7hf\nos_build=Linux\narch_build=x86_64\n\n\
       [options]\nshared=True\n\n[env]\nCC=arm-linux-gnueabihf-gcc\n",
    )
    .unwrap();
    let profile = Profile::from_ini(&ini);

    assert_eq!(profile.settings.arch(), Some("armv7hf"));
    assert_eq!(profile.settings.arch_build(), Some("x86_64"));
    assert_eq!(profile.settings.get("shared"), None);
    assert_eq!(profile.env.get("CC").map(String::as_str), Some("arm-linux-gnueabihf-gcc"));
  }

  #[test]
  fn profile_load_from_disk() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("host");
    std::fs::write(&path, "[settings]\nos=Macos\narch=armv8\n").unwrap();

    let profile = Profile::load(&path).unwrap();
    assert_eq!(profile.settings.os(), Some("Macos"));
    assert!(profile.env.is_empty());
  }

  #[test]
  fn profiles_shape_is_decided_once() {
    let unified = Profile::new(Settings::new().with("os", "Linux"));
    let build = Profile::new(Settings::new().with("os", "Linux").with("arch", "x86_64"));

    assert!(matches!(
      Profiles::from_parts(unified.clone(), None, None),
      Profiles::Unified(_)
    ));
    assert!(matches!(
      Profiles::from_parts(unified.clone(), Some(build.clone()), None),
      Profiles::Separate {
        build: Some(_),
        target: None
      }
    ));
    assert!(matches!(
      Profiles::from_parts(unified, None, Some(build)),
      Profiles::Separate {
        build: None,
        target: Some(_)
      }
    ));
  }

  #[test]
  fn detected_settings_match_platform() {
    let settings = Settings::detected();
    if let Some(platform) = Platform::current() {
      assert_eq!(settings.os(), Some(platform.os.as_str()));
      assert_eq!(settings.arch(), Some(platform.arch.as_str()));
    } else {
      assert!(settings.is_empty());
    }
  }
}
