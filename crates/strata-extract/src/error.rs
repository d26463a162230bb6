use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("'{0}' is not a supported compression format (expected gzip, lzma, tar or zip)")]
    InvalidFormat(String),

    #[error("'{identifier}' has file extension '{extension}', which has no matching decompressor")]
    UnsupportedExtension {
        identifier: String,
        extension: String,
    },

    #[error("upstream source does not report a length")]
    LengthUnsupported,

    #[error("failed to open '{identifier}': {source}")]
    Open {
        identifier: String,
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
