use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::Error;

/// Compression formats the extractor knows how to unwrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompressionFormat {
    Gzip,
    Lzma,
    Tar,
    Zip,
}

impl CompressionFormat {
    pub const ALL: [Self; 4] = [Self::Gzip, Self::Lzma, Self::Tar, Self::Zip];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Lzma => "lzma",
            Self::Tar => "tar",
            Self::Zip => "zip",
        }
    }

    /// Map a bare file extension (no leading dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "gz" => Some(Self::Gzip),
            "xz" => Some(Self::Lzma),
            "tar" => Some(Self::Tar),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

impl FromStr for CompressionFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the format from the last extension of `identifier`.
///
/// Only the trailing extension counts, so `data.tar.gz` is gzip. The error
/// carries the observed extension with its leading dot, or an empty string
/// when there is none.
pub fn infer_format(identifier: &str) -> crate::Result<CompressionFormat> {
    let ext = Path::new(identifier)
        .extension()
        .map(|ext| ext.to_string_lossy());

    ext.as_deref()
        .and_then(CompressionFormat::from_extension)
        .ok_or_else(|| Error::UnsupportedExtension {
            identifier: identifier.to_string(),
            extension: ext.map(|e| format!(".{e}")).unwrap_or_default(),
        })
}
