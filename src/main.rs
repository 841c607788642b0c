//! audioload CLI
//!
//! Command-line interface for the audioload decoder.

use clap::Parser;
use env_logger::Env;
use log::debug;

use audioload::cli::{commands, Cli, Commands};
use audioload::BackendGuard;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("audioload v{}", env!("CARGO_PKG_VERSION"));

    let _backend = BackendGuard::new();

    match cli.command {
        Commands::Info { path, json } => commands::info(&path, cli.backend, json),
        Commands::Load {
            path,
            channel,
            limit,
            json,
        } => commands::load(&path, cli.backend, channel, limit, json),
    }
}
