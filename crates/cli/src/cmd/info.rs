use anyhow::{Result, bail};
use serde::Serialize;

use mesongen_lib::platform::{Platform, arch, os};

use crate::output::{OutputFormat, mapping, print_json, print_stat, print_warning};

#[derive(Serialize)]
struct PlatformInfo {
  os: String,
  arch: String,
  system: String,
  cpu_family: &'static str,
  endian: &'static str,
}

/// Shows how a platform maps to Meson's machine names.
///
/// Without arguments the detected platform is shown; `--arch` / `--os`
/// replace either half.
pub fn cmd_info(arch_override: Option<&str>, os_override: Option<&str>, format: OutputFormat) -> Result<()> {
  let detected = Platform::current();
  if detected.is_none() && (arch_override.is_none() || os_override.is_none()) {
    print_warning("Could not detect platform.");
  }

  let os_name = os_override
    .map(str::to_string)
    .or_else(|| detected.as_ref().map(|p| p.os.clone()));
  let arch_name = arch_override
    .map(str::to_string)
    .or_else(|| detected.as_ref().map(|p| p.arch.clone()));

  let (Some(os_name), Some(arch_name)) = (os_name, arch_name) else {
    bail!("Pass --os and --arch to describe an undetected platform");
  };

  let arch_info = arch::cpu_family_and_endian(&arch_name)?;
  let info = PlatformInfo {
    system: os::system_from_os(&os_name),
    os: os_name,
    arch: arch_name,
    cpu_family: arch_info.cpu_family,
    endian: arch_info.endian.as_str(),
  };

  if format.is_json() {
    return print_json(&info);
  }

  println!("Platform: {}", Platform::new(info.os.as_str(), info.arch.as_str()));
  print_stat("system", &mapping(&info.os, &info.system));
  print_stat("cpu", &info.arch);
  print_stat("cpu_family", info.cpu_family);
  print_stat("endian", info.endian);

  Ok(())
}
