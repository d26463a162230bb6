use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load native library '{path}': {source}")]
    NativeLoad {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("native module not found: {0}")]
    ModuleNotFound(String),

    #[error("{hook} in '{path}' returned error code {code}")]
    Registration {
        path: PathBuf,
        hook: &'static str,
        code: i32,
    },
}
