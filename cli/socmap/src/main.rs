//! socmap CLI: linker scripts and clock-assignment RTL from SoC bus configurations.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use manifest::SocManifest;

#[derive(Parser)]
#[command(name = "socmap", version, about = "SoC address map and clock synthesis")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new socmap project
    Init {
        /// Project name
        name: String,
    },
    /// Generate the linker script
    Linker {
        /// Bus configuration files followed by the output path (default: from socmap.toml)
        paths: Vec<PathBuf>,
        /// Boot memory block (a block name or "first-memory")
        #[arg(long)]
        boot_memory: Option<String>,
        /// Emit _peripheral_<NAME>_start/_end symbols
        #[arg(long)]
        peripheral_symbols: bool,
    },
    /// Generate the clock-assignment RTL include
    Clocks {
        /// Bus configuration files (default: from socmap.toml)
        paths: Vec<PathBuf>,
        /// Output file (overrides --xilinx-root)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Hardware root the RTL output path is relative to
        #[arg(long, env = "XILINX_ROOT")]
        xilinx_root: Option<PathBuf>,
        /// Fail when no main bus configuration is present
        #[arg(long)]
        strict: bool,
    },
    /// Generate every artifact configured in socmap.toml
    Generate {
        /// Generate only this artifact (linker-script, clock-assignments)
        #[arg(long)]
        only: Option<String>,
        /// Hardware root the RTL output path is relative to
        #[arg(long, env = "XILINX_ROOT")]
        xilinx_root: Option<PathBuf>,
        /// Fail when no main bus configuration is present
        #[arg(long)]
        strict: bool,
    },
    /// Show the classified address map, symbols and clock bindings
    Inspect {
        /// Bus configuration files (default: from socmap.toml)
        paths: Vec<PathBuf>,
        /// Boot memory block (a block name or "first-memory")
        #[arg(long)]
        boot_memory: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Linker {
            paths,
            boot_memory,
            peripheral_symbols,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            commands::linker::run(
                &project_dir,
                &manifest,
                &paths,
                boot_memory.as_deref(),
                peripheral_symbols,
            )
        }

        Commands::Clocks {
            paths,
            output,
            xilinx_root,
            strict,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            commands::clocks::run(
                &project_dir,
                &manifest,
                &paths,
                output.as_deref(),
                xilinx_root.as_deref(),
                strict,
            )
        }

        Commands::Generate {
            only,
            xilinx_root,
            strict,
        } => {
            let (manifest, project_dir) = load_manifest_required(&cwd)?;
            commands::generate::run(
                &project_dir,
                &manifest,
                only.as_deref(),
                xilinx_root.as_deref(),
                strict,
            )
        }

        Commands::Inspect {
            paths,
            boot_memory,
            format,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            commands::inspect::run(
                &project_dir,
                &manifest,
                &paths,
                boot_memory.as_deref(),
                format.as_deref(),
            )
        }
    }
}

/// Load manifest, returning error if not found.
fn load_manifest_required(cwd: &Path) -> anyhow::Result<(SocManifest, PathBuf)> {
    match SocManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((manifest, dir)),
        None => anyhow::bail!("no socmap.toml found (run `socmap init` first)"),
    }
}

/// Load the manifest from the current directory upward, falling back to the
/// built-in defaults rooted at `cwd`.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(SocManifest, PathBuf)> {
    match SocManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((manifest, dir)),
        None => Ok((SocManifest::default(), cwd.to_path_buf())),
    }
}
