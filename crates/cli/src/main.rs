mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::{PipelineStep, cmd_generate, cmd_info, cmd_pipeline};
use crate::output::{OutputFormat, print_error};

/// mesongen - Meson machine files from package-manager settings
#[derive(Parser)]
#[command(name = "mesongen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

/// Where settings come from.
///
/// Without any profile the running machine is described.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
  /// Profile with the unified settings (`[settings]` / `[env]` sections)
  #[arg(long)]
  pub profile: Option<PathBuf>,

  /// Profile describing the build machine
  #[arg(long)]
  pub build_profile: Option<PathBuf>,

  /// Profile describing the target machine
  #[arg(long)]
  pub target_profile: Option<PathBuf>,

  /// Override a unified setting (e.g. `-s arch=armv8`)
  #[arg(
    short = 's',
    long = "setting",
    value_name = "KEY=VALUE",
    conflicts_with_all = ["build_profile", "target_profile"]
  )]
  pub settings: Vec<String>,

  /// Describe a cross build even without cross-building signals
  #[arg(long)]
  pub force_cross: bool,
}

/// Folders used by the configure/build/install steps.
#[derive(Args, Debug, Clone)]
pub struct RecipeArgs {
  /// Meson project source directory
  pub source: PathBuf,

  /// Build folder; receives `_meson` and `_meson_machine_files`
  #[arg(long, default_value = "build")]
  pub build_folder: PathBuf,

  /// Install prefix (defaults to `<build-folder>/package`)
  #[arg(long)]
  pub prefix: Option<PathBuf>,

  /// Meson executable (defaults to $MESON, then `meson` on PATH)
  #[arg(long)]
  pub meson: Option<PathBuf>,

  #[command(flatten)]
  pub profiles: ProfileArgs,
}

#[derive(Subcommand)]
enum Commands {
  /// Write native and cross machine files
  Generate {
    /// Directory receiving `native/` and `cross/`
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    #[command(flatten)]
    profiles: ProfileArgs,
  },

  /// Generate machine files and run `meson setup`
  Configure(RecipeArgs),

  /// Configure, then run `meson compile`
  Build(RecipeArgs),

  /// Configure, then run `meson install`
  Install(RecipeArgs),

  /// Show the detected platform and its Meson names
  Info {
    /// Package-manager architecture to look up instead of the detected one
    #[arg(long)]
    arch: Option<String>,

    /// Package-manager OS to look up instead of the detected one
    #[arg(long)]
    os: Option<String>,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let format = cli.format;
  let result = match cli.command {
    Commands::Generate { output, profiles } => cmd_generate(&output, &profiles, format),
    Commands::Configure(args) => cmd_pipeline(&args, PipelineStep::Configure, format),
    Commands::Build(args) => cmd_pipeline(&args, PipelineStep::Build, format),
    Commands::Install(args) => cmd_pipeline(&args, PipelineStep::Install, format),
    Commands::Info { arch, os } => cmd_info(arch.as_deref(), os.as_deref(), format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
