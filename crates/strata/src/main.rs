use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::app::App;
use crate::config::Config;

mod cli;
mod config;

fn main() -> anyhow::Result<()> {
    let app = App::parse();
    let config = Config::load(app.config.as_deref())?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    app.run(&config)
}
