//! crossbuild — build-target dispatcher for release and cross-compiled
//! Linux builds of this workspace.

mod commands;
mod config;
mod plan;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use config::{workspace_root, CrossbuildConfig};

#[derive(Parser)]
#[command(name = "crossbuild", version, about = "Release and cross-compilation builds")]
struct Cli {
    /// Print the build command instead of running it
    #[arg(long, global = true)]
    dry_run: bool,
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the workspace in release mode for the host
    Release,
    /// Build the workspace in release mode for x86_64-unknown-linux-gnu
    Linux,
    /// Inspect or regenerate the toolchain descriptor
    Toolchain {
        #[command(subcommand)]
        action: ToolchainAction,
    },
    /// Check the build command, target compilers, and descriptor
    Doctor,
}

#[derive(Subcommand)]
enum ToolchainAction {
    /// Print the toolchain descriptor
    Show {
        /// Output format (cmake, toml)
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate a toolchain descriptor (default: the configured one)
    Validate {
        /// Descriptor file (.cmake or .toml)
        path: Option<PathBuf>,
    },
    /// Write the built-in descriptor
    Write {
        /// Output file (default: the configured descriptor path)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Dispatch a parsed command line; returns the process exit code.
fn run(cli: Cli) -> anyhow::Result<i32> {
    let root = workspace_root();
    let config = CrossbuildConfig::load(&root)?;
    let program = config.program(std::env::var_os("CARGO"));

    match cli.command {
        Commands::Release => {
            let plan = commands::build::release_plan(&program, &root, &config);
            commands::build::run(&plan, cli.dry_run)
        }

        Commands::Linux => {
            let plan = commands::build::linux_plan(&program, &root, &config);
            commands::build::run(&plan, cli.dry_run)
        }

        Commands::Toolchain { action } => {
            let descriptor = config.descriptor_path(&root);
            match action {
                ToolchainAction::Show { format } => {
                    commands::toolchain::show(&descriptor, format.as_deref())
                }
                ToolchainAction::Validate { path } => {
                    commands::toolchain::validate(path.as_deref().unwrap_or(&descriptor))
                }
                ToolchainAction::Write { output, force } => {
                    commands::toolchain::write(output.as_deref().unwrap_or(&descriptor), force)
                }
            }?;
            Ok(0)
        }

        Commands::Doctor => {
            commands::doctor::run(&program, &config.descriptor_path(&root))?;
            Ok(0)
        }
    }
}
