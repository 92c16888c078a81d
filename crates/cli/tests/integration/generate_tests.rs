//! Tests for `mesongen generate`.

use predicates::prelude::*;

use super::common::{TestEnv, mesongen_cmd};

const CROSS_PROFILE: &str = "\
[settings]
os=Linux
arch=armv7hf
os_build=Linux
arch_build=x86_64

[env]
CC=arm-linux-gnueabihf-gcc
CXX=arm-linux-gnueabihf-g++
";

#[test]
fn cross_profile_writes_cross_file() {
  let env = TestEnv::new();
  let profile = env.write_file("profiles/armhf", CROSS_PROFILE);

  mesongen_cmd()
    .arg("generate")
    .arg("--output")
    .arg(env.output_path())
    .arg("--profile")
    .arg(&profile)
    .env("CFLAGS", "-O2")
    .assert()
    .success()
    .stdout(predicate::str::contains("Cross-building"));

  let cross = env.read_file("output/cross/default.ini");
  assert!(cross.contains("c = 'arm-linux-gnueabihf-gcc'"));
  assert!(cross.contains("c_args = '-O2'"));
  assert!(cross.contains("needs_exe_wrapper = true"));
  assert!(cross.contains("[host_machine]\nsystem = 'linux'\ncpu = 'armv7hf'\ncpu_family = 'arm'\nendian = 'little'\n"));
  assert!(!env.output_path().join("native").exists());
}

#[test]
fn build_compiler_adds_native_file() {
  let env = TestEnv::new();
  let profile = env.write_file("profiles/armhf", CROSS_PROFILE);

  mesongen_cmd()
    .arg("generate")
    .arg("--output")
    .arg(env.output_path())
    .arg("--profile")
    .arg(&profile)
    .env("CC_FOR_BUILD", "/usr/bin/gcc")
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote 2 machine file(s)"));

  let native = env.read_file("output/native/default.ini");
  assert!(native.contains("c = '/usr/bin/gcc'"));
  assert!(native.contains("[build_machine]\nsystem = 'linux'\ncpu = 'x86_64'"));
}

#[test]
fn cross_without_compiler_fails() {
  let env = TestEnv::new();

  mesongen_cmd()
    .arg("generate")
    .arg("--output")
    .arg(env.output_path())
    .args(["-s", "os=Linux", "-s", "arch=armv8", "--force-cross"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("CC and CXX are undefined"));

  assert!(!env.output_path().exists());
}

#[test]
fn separate_profiles_json_output() {
  let env = TestEnv::new();
  let build = env.write_file("profiles/build", "[settings]\nos=Linux\narch=x86_64\n");
  let target = env.write_file(
    "profiles/target",
    "[settings]\nos=Linux\narch=s390x\n\n[env]\nCC=s390x-linux-gnu-gcc\n",
  );

  let output = mesongen_cmd()
    .arg("generate")
    .arg("--output")
    .arg(env.output_path())
    .arg("--build-profile")
    .arg(&build)
    .arg("--target-profile")
    .arg(&target)
    .args(["--format", "json"])
    .output()
    .unwrap();
  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["native"].as_array().unwrap().len(), 1);
  assert_eq!(json["cross"].as_array().unwrap().len(), 1);

  let cross = env.read_file("output/cross/default.ini");
  assert!(cross.contains("endian = 'big'"));
  assert!(cross.contains("cpu_family = 's390'"));
}

#[test]
fn missing_profile_is_reported() {
  let env = TestEnv::new();

  mesongen_cmd()
    .arg("generate")
    .arg("--output")
    .arg(env.output_path())
    .arg("--profile")
    .arg(env.path().join("nope"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load profile"));
}

#[test]
fn setting_override_conflicts_with_separate_profiles() {
  let env = TestEnv::new();
  let build = env.write_file("build.profile", "[settings]\nos=Linux\narch=x86_64\n");

  mesongen_cmd()
    .arg("generate")
    .arg("--output")
    .arg(env.output_path())
    .arg("--build-profile")
    .arg(&build)
    .arg("-s")
    .arg("arch=armv8")
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot be used with"));

  assert!(!env.output_path().join("native").exists());
}

#[test]
fn unknown_arch_is_reported() {
  let env = TestEnv::new();

  mesongen_cmd()
    .arg("generate")
    .arg("--output")
    .arg(env.output_path())
    .args(["-s", "os=Linux", "-s", "arch=vax", "-s", "os_build=Linux"])
    .env("CC", "cc")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown arch: vax"));
}
