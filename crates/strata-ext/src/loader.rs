use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::Result;
use crate::host::{ExtensionHost, NativeHost};
use crate::path::{default_lib_dir, lib_path};

/// Result of looking for the base library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(PathBuf),
    /// No file at the expected path. The library may still be resolved by
    /// the OS search path when the companion module is imported.
    NotFound(PathBuf),
}

/// Result of extension initialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// Companion module not available; nothing was loaded.
    Unavailable,
    Loaded(PathBuf),
    NotFound(PathBuf),
}

impl From<LoadOutcome> for InitOutcome {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Loaded(path) => Self::Loaded(path),
            LoadOutcome::NotFound(path) => Self::NotFound(path),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExtensionConfig {
    pub lib_dir: PathBuf,
    pub lib_name: String,
    pub module: String,
    pub module_dirs: Vec<PathBuf>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        let lib_dir = default_lib_dir();
        Self {
            module_dirs: vec![lib_dir.clone()],
            lib_dir,
            lib_name: "libstrata".to_string(),
            module: "_strata".to_string(),
        }
    }
}

impl ExtensionConfig {
    /// Use `dir` both for the base library and for module lookup.
    pub fn lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.module_dirs = vec![dir.clone()];
        self.lib_dir = dir;
        self
    }

    pub fn lib_name(mut self, name: impl Into<String>) -> Self {
        self.lib_name = name.into();
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn module_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.module_dirs = dirs;
        self
    }
}

/// Load `lib_dir/<lib>.<suffix>` into the host's operator and class
/// registries.
///
/// A missing file is not an error. A file that exists but fails to load
/// (for instance a missing dynamic dependency) is returned as-is: that needs
/// the user to fix their installation.
pub fn load_lib<H>(host: &H, lib_dir: &Path, lib: &str) -> Result<LoadOutcome>
where
    H: ExtensionHost + ?Sized,
{
    let path = lib_path(lib_dir, lib);
    if !path.exists() {
        debug!(path = %path.display(), "native library not found");
        return Ok(LoadOutcome::NotFound(path));
    }
    host.load_ops(&path)?;
    host.load_classes(&path)?;
    info!(path = %path.display(), "loaded native library");
    Ok(LoadOutcome::Loaded(path))
}

/// Load the native extension if its companion module is available.
pub fn init_extension<H>(host: &H, config: &ExtensionConfig) -> Result<InitOutcome>
where
    H: ExtensionHost + ?Sized,
{
    if !host.is_module_available(&config.module) {
        warn!(module = %config.module, "strata native extension is not available");
        return Ok(InitOutcome::Unavailable);
    }
    let outcome = load_lib(host, &config.lib_dir, &config.lib_name)?;
    host.import_module(&config.module)?;
    Ok(outcome.into())
}

struct Extension {
    host: NativeHost,
    outcome: InitOutcome,
}

static EXTENSION: OnceCell<Extension> = OnceCell::new();

/// Initialize the extension once per process with a [`NativeHost`].
///
/// Later calls return the first successful outcome and ignore `config`. A
/// failed attempt caches nothing: the next call builds a fresh host from its
/// own `config`.
pub fn init_global(config: &ExtensionConfig) -> Result<&'static InitOutcome> {
    let extension = EXTENSION.get_or_try_init(|| {
        let host = NativeHost::new(config.module_dirs.clone());
        let outcome = init_extension(&host, config)?;
        Ok::<_, crate::Error>(Extension { host, outcome })
    })?;
    Ok(&extension.outcome)
}

/// The process-wide host, once [`init_global`] has succeeded.
pub fn global_host() -> Option<&'static NativeHost> {
    EXTENSION.get().map(|extension| &extension.host)
}
