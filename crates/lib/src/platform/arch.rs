use std::fmt;

use crate::error::{Error, Result};

/// Byte order of a CPU family, as Meson spells it in machine files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
  Little,
  Big,
}

impl Endian {
  /// Returns the lowercase string identifier used by Meson
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Little => "little",
      Self::Big => "big",
    }
  }
}

impl fmt::Display for Endian {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Meson metadata for a package-manager architecture identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchInfo {
  pub arch: &'static str,
  pub cpu_family: &'static str,
  pub endian: Endian,
}

const fn entry(arch: &'static str, cpu_family: &'static str, endian: Endian) -> ArchInfo {
  ArchInfo {
    arch,
    cpu_family,
    endian,
  }
}

/// Package-manager architectures and their Meson CPU family
///
/// See <https://mesonbuild.com/Reference-tables.html#cpu-families>.
pub const ARCH_TABLE: &[ArchInfo] = &[
  entry("x86", "x86", Endian::Little),
  entry("x86_64", "x86_64", Endian::Little),
  entry("ppc32be", "ppc", Endian::Big),
  entry("ppc32", "ppc", Endian::Little),
  entry("ppc64le", "ppc64", Endian::Little),
  entry("ppc64", "ppc64", Endian::Big),
  entry("armv4", "arm", Endian::Little),
  entry("armv4i", "arm", Endian::Little),
  entry("armv5el", "arm", Endian::Little),
  entry("armv5hf", "arm", Endian::Little),
  entry("armv6", "arm", Endian::Little),
  entry("armv7", "arm", Endian::Little),
  entry("armv7hf", "arm", Endian::Little),
  entry("armv7s", "arm", Endian::Little),
  entry("armv7k", "arm", Endian::Little),
  entry("armv8_32", "arm", Endian::Little),
  entry("armv8", "aarch64", Endian::Little),
  entry("armv8.3", "aarch64", Endian::Little),
  entry("sparc", "sparc", Endian::Big),
  entry("sparcv9", "sparc64", Endian::Big),
  entry("mips", "mips", Endian::Big),
  entry("mips64", "mips64", Endian::Big),
  entry("avr", "avr", Endian::Little),
  entry("s390", "s390", Endian::Big),
  entry("s390x", "s390", Endian::Big),
  entry("wasm", "wasm", Endian::Little),
];

/// Looks up the Meson CPU family and endianness of `arch`
///
/// Matching is exact: package-manager architecture names are case sensitive.
pub fn cpu_family_and_endian(arch: &str) -> Result<ArchInfo> {
  ARCH_TABLE
    .iter()
    .find(|info| info.arch == arch)
    .copied()
    .ok_or_else(|| Error::UnknownArchitecture(arch.to_string()))
}

/// Returns the package-manager name of the CPU this binary runs on
///
/// Returns `None` if the architecture has no package-manager equivalent
pub fn current() -> Option<&'static str> {
  match std::env::consts::ARCH {
    "x86" => Some("x86"),
    "x86_64" => Some("x86_64"),
    "aarch64" => Some("armv8"),
    "arm" => Some("armv7"),
    "powerpc" if cfg!(target_endian = "big") => Some("ppc32be"),
    "powerpc" => Some("ppc32"),
    "powerpc64" if cfg!(target_endian = "little") => Some("ppc64le"),
    "powerpc64" => Some("ppc64"),
    "sparc" => Some("sparc"),
    "sparc64" => Some("sparcv9"),
    "mips" => Some("mips"),
    "mips64" => Some("mips64"),
    "s390x" => Some("s390x"),
    "wasm32" => Some("wasm"),
    "avr" => Some("avr"),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn table_has_no_duplicate_keys() {
    let keys: HashSet<_> = ARCH_TABLE.iter().map(|info| info.arch).collect();
    assert_eq!(keys.len(), ARCH_TABLE.len());
  }

  #[test]
  fn every_table_entry_resolves_to_itself() {
    for info in ARCH_TABLE {
      assert_eq!(cpu_family_and_endian(info.arch).unwrap(), *info);
    }
  }

  #[test]
  fn common_architectures() {
    let armv8 = cpu_family_and_endian("armv8").unwrap();
    assert_eq!(armv8.cpu_family, "aarch64");
    assert_eq!(armv8.endian, Endian::Little);

    let ppc64 = cpu_family_and_endian("ppc64").unwrap();
    assert_eq!(ppc64.cpu_family, "ppc64");
    assert_eq!(ppc64.endian, Endian::Big);

    let x86 = cpu_family_and_endian("x86").unwrap();
    assert_eq!((x86.cpu_family, x86.endian), ("x86", Endian::Little));
  }

  #[test]
  fn s390x_shares_s390_family() {
    let s390x = cpu_family_and_endian("s390x").unwrap();
    assert_eq!((s390x.cpu_family, s390x.endian), ("s390", Endian::Big));
  }

  #[test]
  fn unknown_architecture_is_rejected() {
    let err = cpu_family_and_endian("riscv128").unwrap_err();
    assert!(matches!(err, Error::UnknownArchitecture(ref a) if a == "riscv128"));

    // Lookup does not fold case
    assert!(cpu_family_and_endian("ARMV8").is_err());
    assert!(cpu_family_and_endian("").is_err());
  }

  #[test]
  fn current_arch_is_in_table_when_known() {
    if let Some(arch) = current() {
      assert!(cpu_family_and_endian(arch).is_ok());
    }
  }

  #[test]
  fn endian_display() {
    assert_eq!(Endian::Little.to_string(), "little");
    assert_eq!(Endian::Big.to_string(), "big");
  }
}
