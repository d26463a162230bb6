use std::io::Read;

use tracing::debug;

use crate::decoder::{Decompressed, decompressor};
use crate::entry::{EntrySource, StreamEntry};
use crate::format::{CompressionFormat, infer_format};
use crate::{Error, Result};

/// Wraps every stream of an upstream source in the decompression matching
/// its format.
///
/// The format is either fixed at construction or inferred per entry from
/// the identifier's extension. Iteration is lazy and order-preserving; the
/// first error ends the sequence.
#[derive(Clone, Debug)]
pub struct Extractor<S> {
    source: S,
    format: Option<CompressionFormat>,
    done: bool,
}

impl<S: EntrySource> Extractor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            format: None,
            done: false,
        }
    }

    pub fn with_format(source: S, format: CompressionFormat) -> Self {
        Self {
            format: Some(format),
            ..Self::new(source)
        }
    }

    /// Same as [`Extractor::with_format`], parsing the tag case-insensitively.
    pub fn with_format_str(source: S, tag: &str) -> Result<Self> {
        Ok(Self::with_format(source, tag.parse()?))
    }

    pub fn format(&self) -> Option<CompressionFormat> {
        self.format
    }

    pub fn detect_format(&self, identifier: &str) -> Result<CompressionFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => infer_format(identifier),
        }
    }

    /// Upstream entry count. Decompression maps entries one to one.
    pub fn len(&self) -> Result<usize> {
        self.source.entry_count().ok_or(Error::LengthUnsupported)
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S> Extractor<S>
where
    S: EntrySource,
    S::Reader: Read,
{
    fn decompress(
        &self,
        entry: StreamEntry<S::Reader>,
    ) -> Result<StreamEntry<Decompressed<S::Reader>>> {
        let format = self.detect_format(&entry.id)?;
        debug!(id = %entry.id, %format, "wrapping stream");
        let (id, stream) = entry.into_parts();
        Ok(StreamEntry::new(id, decompressor(format)(stream)))
    }
}

impl<S> Iterator for Extractor<S>
where
    S: EntrySource,
    S::Reader: Read,
{
    type Item = Result<StreamEntry<Decompressed<S::Reader>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self
            .source
            .next_entry()?
            .and_then(|entry| self.decompress(entry));
        self.done = item.is_err();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::IterSource;
    use std::io::Cursor;

    type Src = IterSource<std::vec::IntoIter<StreamEntry<Cursor<Vec<u8>>>>>;

    fn source(ids: &[&str]) -> Src {
        IterSource::new(
            ids.iter()
                .map(|id| StreamEntry::new(*id, Cursor::new(Vec::new())))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn explicit_format_overrides_extension() {
        let extractor = Extractor::with_format(source(&[]), CompressionFormat::Gzip);
        for id in ["data.zip", "data.xz", "README", "x.tar"] {
            assert_eq!(extractor.detect_format(id).unwrap(), CompressionFormat::Gzip);
        }
    }

    #[test]
    fn with_format_str_parses_case_insensitively() {
        let upper = Extractor::with_format_str(source(&[]), "GZIP").unwrap();
        let lower = Extractor::with_format_str(source(&[]), "gzip").unwrap();
        assert_eq!(upper.format(), lower.format());
        assert_eq!(upper.format(), Some(CompressionFormat::Gzip));
    }

    #[test]
    fn with_format_str_rejects_unknown() {
        let err = Extractor::with_format_str(source(&["a.gz"]), "rar").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn ends_after_first_error() {
        let mut extractor = Extractor::new(source(&["a.gz", "b.txt", "c.gz"]));
        assert!(extractor.next().unwrap().is_ok());
        assert!(matches!(
            extractor.next().unwrap(),
            Err(Error::UnsupportedExtension { .. })
        ));
        assert!(extractor.next().is_none());
    }

    #[test]
    fn len_forwards_upstream() {
        let extractor = Extractor::new(source(&["a.gz", "b.tar", "c.zip"]));
        assert_eq!(extractor.len().unwrap(), 3);
        assert!(!extractor.is_empty().unwrap());
    }
}
