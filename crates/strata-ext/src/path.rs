use std::env;
use std::env::consts::DLL_EXTENSION;
use std::path::{Path, PathBuf};

/// File name of a shared library named `name` on this platform.
pub fn lib_file_name(name: &str) -> String {
    format!("{name}.{DLL_EXTENSION}")
}

/// `lib_dir/<name>.<so|dylib|dll>`.
pub fn lib_path(lib_dir: &Path, name: &str) -> PathBuf {
    lib_dir.join(lib_file_name(name))
}

/// The `lib` directory next to the running executable.
pub fn default_lib_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("lib")))
        .unwrap_or_else(|| PathBuf::from("lib"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lib_path_uses_platform_suffix() {
        let path = lib_path(Path::new("opt").join("lib").as_path(), "libstrata");
        assert_eq!(path.parent(), Some(Path::new("opt").join("lib").as_path()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        #[cfg(target_os = "linux")]
        assert_eq!(name, "libstrata.so");
        #[cfg(target_os = "macos")]
        assert_eq!(name, "libstrata.dylib");
        #[cfg(target_os = "windows")]
        assert_eq!(name, "libstrata.dll");
    }

    #[test]
    fn default_lib_dir_ends_with_lib() {
        assert!(default_lib_dir().ends_with("lib"));
    }
}
