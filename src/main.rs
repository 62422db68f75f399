use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use goup::commands::update::{self, UpdateOutcome};
use goup::core::config::{Config, Overrides};
use goup::core::install;

#[derive(Parser)]
#[clap(name = "goup")]
#[clap(about = "Update the installed Go toolchain to the latest release")]
#[clap(disable_version_flag = true)]
pub struct Cli {
    /// Print the tool version and exit
    #[clap(short = 'v', long = "version")]
    version: bool,
    /// Detect the install path from the `go` binary on PATH
    #[clap(short = 'a', long, conflicts_with = "install_path")]
    auto_path: bool,
    /// Install root; the toolchain is unpacked into <PATH>/go (default: /usr/local)
    #[clap(short = 'i', long, value_name = "PATH")]
    install_path: Option<PathBuf>,
    /// Download-listing page (default: https://go.dev/dl/)
    #[clap(short = 'd', long, value_name = "URL")]
    download_page: Option<String>,
    /// Substring the archive link must contain (default: linux)
    #[clap(short = 'p', long, value_name = "FILTER")]
    platform: Option<String>,
    /// Where to save the archive (default: ~/Downloads/golang.tar.gz)
    #[clap(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Replace an existing archive without asking
    #[clap(short = 'y', long)]
    yes: bool,
    /// Install even if the installed version cannot be determined or is current
    #[clap(short = 'f', long)]
    force: bool,
    /// Do not show download progress
    #[clap(short = 'q', long)]
    quiet: bool,
    /// Run install commands without sudo
    #[clap(long)]
    no_sudo: bool,
    /// Config file (default: ~/.goup/config.json)
    #[clap(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[clap(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("goup v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let install_root = if cli.auto_path {
        let root = install::detect_install_root()?;
        println!("Will be installed to {}", root.display());
        Some(root)
    } else {
        cli.install_path
    };

    let overrides = Overrides {
        download_page: cli.download_page,
        install_root,
        archive_path: cli.output,
        platform: cli.platform,
        no_elevate: cli.no_sudo,
        force: cli.force,
        assume_yes: cli.yes,
        quiet: cli.quiet,
    };

    let config = Config::load(cli.config.as_deref(), overrides)?;
    log::debug!("{config:?}");

    match update::update_toolchain(&config)? {
        UpdateOutcome::AlreadyCurrent { version } => log::info!("{version} is current"),
        UpdateOutcome::Declined => log::info!("update cancelled"),
        UpdateOutcome::Installed { version } => {
            log::info!("installed {}", version.as_deref().unwrap_or("unknown version"))
        }
    }

    Ok(())
}
