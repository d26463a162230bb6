//! Host-side registries that native libraries are loaded into.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use libloading::Library;
use tracing::debug;

use crate::path::lib_file_name;
use crate::{Error, Result};

/// Registration hook a native library may export.
type RegisterFn = unsafe extern "C" fn() -> i32;

const OPS_HOOK: &str = "strata_register_ops";
const CLASSES_HOOK: &str = "strata_register_classes";
const MODULE_HOOK: &str = "strata_module_init";

/// The process side of extension loading.
///
/// Loading into the operator and class registries is separate so that a
/// host can back them differently; [`NativeHost`] opens the library for
/// both.
pub trait ExtensionHost {
    /// Whether the companion module can be imported.
    fn is_module_available(&self, module: &str) -> bool;

    fn load_ops(&self, path: &Path) -> Result<()>;

    fn load_classes(&self, path: &Path) -> Result<()>;

    /// Initialize the companion module. Runs after the base library is
    /// loaded.
    fn import_module(&self, module: &str) -> Result<()>;
}

#[derive(Default)]
struct Registry {
    libraries: HashMap<PathBuf, Library>,
}

impl Registry {
    fn contains(&self, path: &Path) -> bool {
        self.libraries.contains_key(path)
    }

    fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.libraries.keys().cloned().collect();
        paths.sort();
        paths
    }
}

/// Host backed by the OS dynamic loader.
///
/// Loaded libraries stay mapped for as long as the host lives.
#[derive(Default)]
pub struct NativeHost {
    module_dirs: Vec<PathBuf>,
    ops: Mutex<Registry>,
    classes: Mutex<Registry>,
    modules: Mutex<Registry>,
}

impl NativeHost {
    /// Host looking up companion modules in `module_dirs`, in order.
    pub fn new(module_dirs: Vec<PathBuf>) -> Self {
        Self {
            module_dirs,
            ..Self::default()
        }
    }

    pub fn module_path(&self, module: &str) -> Option<PathBuf> {
        let file_name = lib_file_name(module);
        self.module_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
    }

    pub fn loaded_ops(&self) -> Vec<PathBuf> {
        lock(&self.ops).paths()
    }

    pub fn loaded_classes(&self) -> Vec<PathBuf> {
        lock(&self.classes).paths()
    }

    pub fn loaded_modules(&self) -> Vec<PathBuf> {
        lock(&self.modules).paths()
    }
}

impl ExtensionHost for NativeHost {
    fn is_module_available(&self, module: &str) -> bool {
        self.module_path(module).is_some()
    }

    fn load_ops(&self, path: &Path) -> Result<()> {
        register(&self.ops, path, OPS_HOOK)
    }

    fn load_classes(&self, path: &Path) -> Result<()> {
        register(&self.classes, path, CLASSES_HOOK)
    }

    fn import_module(&self, module: &str) -> Result<()> {
        let path = self
            .module_path(module)
            .ok_or_else(|| Error::ModuleNotFound(module.to_string()))?;
        register(&self.modules, &path, MODULE_HOOK)
    }
}

fn lock(registry: &Mutex<Registry>) -> std::sync::MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open `path`, run its `hook` if exported, and keep it in `registry`.
/// Registering the same path twice is a no-op.
fn register(registry: &Mutex<Registry>, path: &Path, hook: &'static str) -> Result<()> {
    let mut registry = lock(registry);
    if registry.contains(path) {
        return Ok(());
    }

    // SAFETY: loading runs the library's initializers; callers opt into
    // trusting the libraries they point the host at.
    let library = unsafe { Library::new(path) }.map_err(|source| Error::NativeLoad {
        path: path.to_path_buf(),
        source,
    })?;

    // SAFETY: hooks are declared as `extern "C" fn() -> i32`.
    let code = unsafe {
        match library.get::<RegisterFn>(hook.as_bytes()) {
            Ok(hook_fn) => Some(hook_fn()),
            Err(_) => None,
        }
    };
    match code {
        Some(0) => debug!(path = %path.display(), hook, "registration hook ran"),
        Some(code) => {
            return Err(Error::Registration {
                path: path.to_path_buf(),
                hook,
                code,
            });
        }
        None => debug!(path = %path.display(), hook, "no registration hook exported"),
    }

    registry.libraries.insert(path.to_path_buf(), library);
    Ok(())
}
