//! Tests for `mesongen configure/build/install` against a stand-in meson.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use predicates::prelude::*;

use super::common::{TestEnv, mesongen_cmd};

/// Installs a script that logs its arguments and the `CC` it sees.
fn fake_meson(env: &TestEnv) -> (PathBuf, PathBuf) {
  let log = env.path().join("meson.log");
  let script = env.write_file(
    "bin/meson",
    &format!(
      "#!/bin/sh\necho \"$@\" >> '{}'\necho \"CC=${{CC-unset}}\" >> '{}'\n",
      log.display(),
      log.display()
    ),
  );
  std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
  (script, log)
}

#[test]
fn configure_runs_meson_setup_with_machine_files() {
  let env = TestEnv::new();
  let (meson, log) = fake_meson(&env);
  env.write_file("src/meson.build", "project('demo', 'c')\n");

  mesongen_cmd()
    .arg("configure")
    .arg(env.path().join("src"))
    .arg("--build-folder")
    .arg(env.path().join("build"))
    .arg("--meson")
    .arg(&meson)
    .env("CC", "gcc")
    .assert()
    .success()
    .stdout(predicate::str::contains("Configured"));

  let logged = std::fs::read_to_string(&log).unwrap();
  assert!(logged.starts_with("setup -Dprefix="));
  assert!(logged.contains("--native-file="));
  assert!(logged.contains("CC=unset"));

  let native = env.read_file("build/_meson_machine_files/native/default.ini");
  assert!(native.contains("c = 'gcc'"));
}

#[test]
fn install_uses_meson_from_environment() {
  let env = TestEnv::new();
  let (meson, log) = fake_meson(&env);
  env.write_file("src/meson.build", "project('demo', 'c')\n");
  let prefix = env.path().join("pkg");

  mesongen_cmd()
    .arg("install")
    .arg(env.path().join("src"))
    .arg("--build-folder")
    .arg(env.path().join("build"))
    .arg("--prefix")
    .arg(&prefix)
    .env("MESON", &meson)
    .assert()
    .success();

  let logged = std::fs::read_to_string(&log).unwrap();
  let prefix = dunce::canonicalize(&prefix).unwrap();
  assert!(logged.contains(&format!("-Dprefix={}", prefix.display())));
  assert!(logged.contains("install -C"));
}

#[test]
fn missing_source_fails() {
  let env = TestEnv::new();

  mesongen_cmd()
    .arg("configure")
    .arg(env.path().join("does-not-exist"))
    .arg("--build-folder")
    .arg(env.path().join("build"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Source directory not found"));
}
