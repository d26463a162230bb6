use std::path::PathBuf;

use clap::Args;
use strata_ext::{ExtensionConfig, InitOutcome, init_global};

use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct ExtArg {
    /// Directory holding the native library and its companion module
    #[arg(long)]
    pub lib_dir: Option<PathBuf>,
}

pub fn run(arg: ExtArg, config: &Config) -> anyhow::Result<()> {
    let mut ext_config = ExtensionConfig::default();
    if let Some(dir) = arg.lib_dir.or_else(|| config.lib_dir.clone()) {
        ext_config = ext_config.lib_dir(dir);
    }

    match init_global(&ext_config)? {
        InitOutcome::Unavailable => println!("native extension unavailable ({})", ext_config.module),
        InitOutcome::Loaded(path) => println!("loaded {}", path.display()),
        InitOutcome::NotFound(path) => {
            println!("{} not found, relying on the system library path", path.display())
        }
    }
    Ok(())
}
