mod cli;
mod commands;
mod config;
mod domain;
mod infra;
mod media;
mod workflows;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use config::ConfigStore;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut store = ConfigStore::new(config::get_config_path());
    log::debug!("Using config file {}", store.path().display());

    match cli.command {
        Some(Command::Config(args)) => commands::config(args, &mut store),
        Some(Command::Download(args)) => commands::download(args, &store),
        None => commands::download(cli.download, &store),
    }
}
