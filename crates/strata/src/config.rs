use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;

const CONFIG_FILE: &str = "strata.toml";
const ENV_PREFIX: &str = "STRATA_";

/// Settings shared by all subcommands. Command-line flags take precedence.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub lib_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub masks: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            lib_dir: None,
            out_dir: None,
            format: None,
            masks: Vec::new(),
        }
    }
}

impl Config {
    /// Merge `path` (or `./strata.toml`) and `STRATA_*` environment
    /// variables, in that order. A missing file is fine.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let path = path.unwrap_or(Path::new(CONFIG_FILE));
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }
}
