/// Converts a package-manager OS name into a Meson system name
///
/// See <https://mesonbuild.com/Reference-tables.html#operating-system-names>.
/// Apple platforms share the `darwin` kernel name; everything else is passed
/// through lowercased.
pub fn system_from_os(os: &str) -> String {
  let os = os.to_lowercase();
  match os.as_str() {
    "macos" | "ios" => "darwin".to_string(),
    _ => os,
  }
}

/// Returns the package-manager name of the operating system at runtime
///
/// Returns `None` if the OS has no package-manager equivalent
pub fn current() -> Option<&'static str> {
  match std::env::consts::OS {
    "linux" => Some("Linux"),
    "macos" => Some("Macos"),
    "windows" => Some("Windows"),
    "ios" => Some("iOS"),
    "android" => Some("Android"),
    "freebsd" => Some("FreeBSD"),
    "solaris" => Some("SunOS"),
    _ => None,
  }
}
