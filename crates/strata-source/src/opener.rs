use std::fs::File;
use std::path::Path;

use strata_extract::{EntrySource, StreamEntry, exact_len};

/// Opens each path read-only, yielding it as a [`StreamEntry`] keyed by the
/// path's display form.
#[derive(Clone, Debug)]
pub struct FileOpener<I> {
    paths: I,
    count: Option<usize>,
}

impl<I: Iterator> FileOpener<I> {
    pub fn new<T>(paths: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let paths = paths.into_iter();
        Self {
            count: exact_len(&paths),
            paths,
        }
    }
}

impl<I, P> EntrySource for FileOpener<I>
where
    I: Iterator<Item = P>,
    P: AsRef<Path>,
{
    type Reader = File;

    fn next_entry(&mut self) -> Option<strata_extract::Result<StreamEntry<File>>> {
        let path = self.paths.next()?;
        let path = path.as_ref();
        let id = path.display().to_string();
        Some(match File::open(path) {
            Ok(file) => Ok(StreamEntry::new(id, file)),
            Err(source) => Err(strata_extract::Error::Open {
                identifier: id,
                source,
            }),
        })
    }

    fn entry_count(&self) -> Option<usize> {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn opens_in_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "alpha").unwrap();
        fs::write(&b, "beta").unwrap();

        let mut opener = FileOpener::new(vec![a.clone(), b]);
        assert_eq!(opener.entry_count(), Some(2));

        let mut first = opener.next_entry().unwrap().unwrap();
        assert_eq!(first.id, a.display().to_string());
        let mut content = String::new();
        first.stream.read_to_string(&mut content).unwrap();
        assert_eq!(content, "alpha");

        assert!(opener.next_entry().unwrap().is_ok());
        assert!(opener.next_entry().is_none());
        assert_eq!(opener.entry_count(), Some(2));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempdir().unwrap();
        let mut opener = FileOpener::new([dir.path().join("gone.gz")]);
        match opener.next_entry() {
            Some(Err(strata_extract::Error::Open { identifier, .. })) => {
                assert!(identifier.ends_with("gone.gz"))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
