use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Writes `(meta, data)` pairs to disk, yielding each target path.
///
/// The target is `filepath_fn(meta)`, or `meta` itself with [`Saver::new`].
/// Existing targets are left untouched. New files are written to a
/// temporary sibling first and moved into place without clobbering.
#[derive(Clone, Debug)]
pub struct Saver<I, F> {
    items: I,
    filepath_fn: F,
}

impl<I, M> Saver<I, fn(M) -> PathBuf>
where
    M: Into<PathBuf>,
{
    pub fn new<T, D>(items: T) -> Self
    where
        T: IntoIterator<IntoIter = I, Item = (M, D)>,
    {
        Self {
            items: items.into_iter(),
            filepath_fn: |meta| meta.into(),
        }
    }
}

impl<I, F> Saver<I, F> {
    pub fn with_filepath_fn<T>(items: T, filepath_fn: F) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            items: items.into_iter(),
            filepath_fn,
        }
    }
}

impl<I, F, M, D> Iterator for Saver<I, F>
where
    I: Iterator<Item = (M, D)>,
    F: FnMut(M) -> PathBuf,
    D: AsRef<[u8]>,
{
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        let (meta, data) = self.items.next()?;
        let path = (self.filepath_fn)(meta);
        Some(save_new(&path, data.as_ref()).map(|_| path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

/// Write `data` to `path` unless it already exists. Returns whether a new
/// file was written.
pub fn save_new(path: &Path, data: &[u8]) -> Result<bool> {
    save_new_from(path, &mut &data[..])
}

/// Stream `reader` into `path` unless it already exists. Returns whether a
/// new file was written.
///
/// Nothing is read when the target exists. A failed read leaves no file
/// behind.
pub fn save_new_from<R: Read + ?Sized>(path: &Path, reader: &mut R) -> Result<bool> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        debug!(path = %path.display(), "target exists, skipping");
        return Ok(false);
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".strata.")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(write_err)?;
    let bytes = io::copy(reader, &mut tmp).map_err(write_err)?;

    match tmp.persist_noclobber(path) {
        Ok(_) => {
            debug!(path = %path.display(), bytes, "saved");
            Ok(true)
        }
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(err) => Err(write_err(err.error)),
    }
}
