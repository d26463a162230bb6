use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::{ext, extract, list};
use crate::config::Config;

#[derive(Clone, Debug, Parser)]
#[command(name = "strata", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Configuration file (defaults to ./strata.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "x", name = "extract", about = "Decompress files into an output directory")]
    Extract(extract::ExtractArg),
    #[command(alias = "ls", name = "list", about = "Show the format detected for each file")]
    List(list::ListArg),
    #[command(name = "ext", about = "Load the native extension and report the outcome")]
    Ext(ext::ExtArg),
}

impl App {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        match self.cmd {
            Commands::Extract(arg) => extract::run(arg, config),
            Commands::List(arg) => list::run(arg, config),
            Commands::Ext(arg) => ext::run(arg, config),
        }
    }
}
