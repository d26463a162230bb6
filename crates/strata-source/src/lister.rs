use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::trace;

use crate::{Error, Result};

/// Lists files under a set of roots.
///
/// A root that is a file is yielded as-is. A directory root yields its
/// direct children, sorted by name, whose file names match any mask. No
/// masks means everything matches.
#[derive(Debug)]
pub struct FileLister {
    roots: VecDeque<PathBuf>,
    masks: Vec<Pattern>,
    pending: VecDeque<PathBuf>,
}

impl FileLister {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            masks: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Restrict directory listings to names matching one of `masks`
    /// (Unix shell-style). Empty strings are ignored.
    pub fn masks<I, S>(mut self, masks: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.masks = masks
            .into_iter()
            .filter(|mask| !mask.as_ref().is_empty())
            .map(|mask| Pattern::new(mask.as_ref()))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    fn matches(&self, name: &str) -> bool {
        self.masks.is_empty() || self.masks.iter().any(|mask| mask.matches(name))
    }

    fn expand(&mut self, root: &Path) -> Result<()> {
        let list_err = |source| Error::List {
            path: root.to_path_buf(),
            source,
        };
        let mut children = Vec::new();
        for entry in fs::read_dir(root).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let name = entry.file_name();
            if self.matches(&name.to_string_lossy()) {
                children.push(entry.path());
            }
        }
        children.sort();
        trace!(root = %root.display(), count = children.len(), "listed directory");
        self.pending.extend(children);
        Ok(())
    }
}

impl Iterator for FileLister {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                return Some(Ok(path));
            }
            let root = self.roots.pop_front()?;
            if root.is_file() {
                return Some(Ok(root));
            }
            if let Err(err) = self.expand(&root) {
                return Some(Err(err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    fn names(paths: Vec<PathBuf>) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn lists_sorted_children() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["b.gz", "a.xz", "c.txt"]);
        let paths: Vec<_> = FileLister::new([dir.path()])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(names(paths), ["a.xz", "b.gz", "c.txt"]);
    }

    #[test]
    fn masks_filter_directory_children() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["b.gz", "a.xz", "c.txt"]);
        let paths: Vec<_> = FileLister::new([dir.path()])
            .masks(["*.gz", "*.xz"])
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(names(paths), ["a.xz", "b.gz"]);
    }

    #[test]
    fn empty_mask_matches_everything() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["one", "two"]);
        let count = FileLister::new([dir.path()])
            .masks([""])
            .unwrap()
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn file_roots_bypass_masks() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["data.bin"]);
        let file = dir.path().join("data.bin");
        let paths: Vec<_> = FileLister::new([&file])
            .masks(["*.gz"])
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(paths, [file]);
    }

    #[test]
    fn missing_root_is_an_error_item() {
        let dir = tempdir().unwrap();
        let mut lister = FileLister::new([dir.path().join("absent")]);
        assert!(matches!(lister.next(), Some(Err(Error::List { .. }))));
        assert!(lister.next().is_none());
    }

    #[test]
    fn invalid_mask_is_rejected() {
        assert!(FileLister::new(["."]).masks(["[unclosed"]).is_err());
    }
}
