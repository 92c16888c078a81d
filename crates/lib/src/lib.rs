//! mesongen-lib: Meson machine files from package-manager settings
//!
//! This crate turns resolved platform settings and compiler environment
//! variables into Meson machine files:
//! - `platform`: architecture and OS tables mapping to Meson's names
//! - `machine_file`: a named, sectioned key/value file
//! - `toolchain`: decides between native and cross files and renders them
//! - `meson`: runs `meson setup/compile/install` with the generated files

pub mod env;
pub mod error;
pub mod ini;
pub mod machine_file;
pub mod meson;
pub mod platform;
pub mod settings;
pub mod toolchain;

pub use error::{Error, Result};
