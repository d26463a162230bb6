//! Binds the strata native library into the host process.
//!
//! Initialization is best-effort in one direction only: a missing companion
//! module or library file is tolerated, but a library that is present and
//! fails to load is an error the caller has to see.

pub use error::{Error, Result};
pub use host::{ExtensionHost, NativeHost};
pub use loader::{
    ExtensionConfig, InitOutcome, LoadOutcome, global_host, init_extension, init_global, load_lib,
};
pub use path::{default_lib_dir, lib_file_name, lib_path};

mod error;
pub mod host;
mod loader;
mod path;
