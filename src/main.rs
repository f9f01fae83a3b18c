//! craft-bp - blueprint tooling CLI

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use craft_blueprints::Platform;
use craft_blueprints::cmd;

#[derive(Parser, Debug)]
#[command(name = "craft-bp")]
#[command(author, version, about = "Craft blueprint tooling")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate blueprint files
    Check {
        /// Blueprint files or directories to scan for *.toml
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show a blueprint as evaluated for a platform and option set
    Show {
        /// Blueprint file
        blueprint: PathBuf,
        /// Target platform (windows, macos, unix); defaults to the host
        #[arg(long)]
        platform: Option<Platform>,
        /// Option overrides, e.g. -D enable_crash_reporter=true
        #[arg(short = 'D', long = "define")]
        options: Vec<String>,
    },
    /// Print the packaging define map as JSON
    Defines {
        /// Blueprint file
        blueprint: PathBuf,
        #[arg(long)]
        platform: Option<Platform>,
        #[arg(short = 'D', long = "define")]
        options: Vec<String>,
        /// Build directory icon/pkgproj paths resolve against
        #[arg(long, default_value = ".")]
        build_dir: PathBuf,
        /// Resolved version string
        #[arg(long)]
        version: Option<String>,
        /// Produce defines for the NSIS packager
        #[arg(long)]
        nullsoft: bool,
    },
    /// Extract the version string from VERSION.cmake via cmake
    Version {
        /// Source directory containing VERSION.cmake
        source_dir: PathBuf,
        /// print-var.cmake helper script
        #[arg(long)]
        script: Option<PathBuf>,
        /// Build number forwarded to cmake
        #[arg(long)]
        build_number: Option<String>,
    },
    /// Pair archived binaries with symbol files and run symsorter
    DumpSymbols {
        /// Directory holding the packaged binaries
        #[arg(long)]
        archive_dir: PathBuf,
        /// Root of the installed layout
        #[arg(long)]
        install_root: PathBuf,
        /// Output directory for sorted symbols (cleared first);
        /// defaults to `<craft root>/symbols`
        #[arg(long)]
        dest: Option<PathBuf>,
        #[arg(long)]
        platform: Option<Platform>,
        /// Installed-package manifest directory for skip patterns;
        /// defaults to `<craft root>/manifests` when that exists
        #[arg(long)]
        manifest_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { paths } => cmd::check::run(&paths),
        Commands::Show {
            blueprint,
            platform,
            options,
        } => cmd::show::run(
            &blueprint,
            platform.unwrap_or_else(Platform::current),
            &options,
        ),
        Commands::Defines {
            blueprint,
            platform,
            options,
            build_dir,
            version,
            nullsoft,
        } => cmd::defines::run(
            &blueprint,
            platform.unwrap_or_else(Platform::current),
            &options,
            &build_dir,
            version,
            nullsoft,
        ),
        Commands::Version {
            source_dir,
            script,
            build_number,
        } => cmd::version::run(&source_dir, script, build_number),
        Commands::DumpSymbols {
            archive_dir,
            install_root,
            dest,
            platform,
            manifest_dir,
        } => cmd::symbols::run(
            archive_dir,
            install_root,
            dest,
            platform.unwrap_or_else(Platform::current),
            manifest_dir,
        ),
    }
}
