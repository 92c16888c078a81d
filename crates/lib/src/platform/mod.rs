pub mod arch;
pub mod os;

use std::fmt;

use arch::ArchInfo;

use crate::error::Result;

/// A platform described with package-manager identifiers (e.g. "Linux" / "armv8")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
  pub os: String,
  pub arch: String,
}

impl Platform {
  /// Create a new platform description
  pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
    Self {
      os: os.into(),
      arch: arch.into(),
    }
  }

  /// Detect the platform this binary runs on
  ///
  /// Returns `None` if the OS or architecture has no package-manager name
  pub fn current() -> Option<Self> {
    Some(Self::new(os::current()?, arch::current()?))
  }

  /// Meson `system` value for this platform
  pub fn system(&self) -> String {
    os::system_from_os(&self.os)
  }

  /// Meson CPU family and endianness for this platform
  pub fn arch_info(&self) -> Result<ArchInfo> {
    arch::cpu_family_and_endian(&self.arch)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.arch, self.os)
  }
}
