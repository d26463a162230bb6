use std::io::{self, Cursor, Read, Seek};
use std::mem;

use flate2::read::MultiGzDecoder;
use xz2::read::XzDecoder;
use xz2::stream::{CONCATENATED, Stream};

use crate::format::CompressionFormat;

/// Constructor turning a raw stream into its decompressed form.
pub type Decompressor<R> = fn(R) -> Decompressed<R>;

/// Look up the decompressor bound to `format`.
///
/// Total over [`CompressionFormat`]: adding a variant without a binding does
/// not compile.
pub fn decompressor<R: Read>(format: CompressionFormat) -> Decompressor<R> {
    match format {
        CompressionFormat::Gzip => wrap_gzip,
        CompressionFormat::Lzma => wrap_lzma,
        CompressionFormat::Tar => wrap_tar,
        CompressionFormat::Zip => wrap_zip,
    }
}

fn wrap_gzip<R: Read>(reader: R) -> Decompressed<R> {
    Decompressed::Gzip(DecodedStream::new(reader, Codec::Gzip))
}

fn wrap_lzma<R: Read>(reader: R) -> Decompressed<R> {
    Decompressed::Lzma(DecodedStream::new(reader, Codec::Lzma))
}

fn wrap_tar<R: Read>(reader: R) -> Decompressed<R> {
    Decompressed::Tar(TarStream::new(reader))
}

fn wrap_zip<R: Read>(reader: R) -> Decompressed<R> {
    Decompressed::Zip(ZipStream::new(reader))
}

/// A stream wrapped in the decompression matching its format.
///
/// Nothing is read from the wrapped stream until the consumer reads from
/// this value.
pub enum Decompressed<R: Read> {
    Gzip(DecodedStream<R>),
    Lzma(DecodedStream<R>),
    Tar(TarStream<R>),
    Zip(ZipStream<R>),
}

impl<R: Read> Decompressed<R> {
    pub fn format(&self) -> CompressionFormat {
        match self {
            Self::Gzip(_) => CompressionFormat::Gzip,
            Self::Lzma(_) => CompressionFormat::Lzma,
            Self::Tar(_) => CompressionFormat::Tar,
            Self::Zip(_) => CompressionFormat::Zip,
        }
    }

    /// The decoded byte stream, for the gzip and lzma formats.
    pub fn as_stream(&mut self) -> Option<&mut DecodedStream<R>> {
        match self {
            Self::Gzip(s) | Self::Lzma(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_stream(self) -> Option<DecodedStream<R>> {
        match self {
            Self::Gzip(s) | Self::Lzma(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tar(&mut self) -> Option<&mut TarStream<R>> {
        match self {
            Self::Tar(archive) => Some(archive),
            _ => None,
        }
    }

    pub fn as_zip(&mut self) -> Option<&mut ZipStream<R>> {
        match self {
            Self::Zip(archive) => Some(archive),
            _ => None,
        }
    }
}

impl<R: Read> std::fmt::Debug for Decompressed<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Decompressed").field(&self.format()).finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Codec {
    Gzip,
    Lzma,
}

enum State<R: Read> {
    Pending(R, Codec),
    Gzip(MultiGzDecoder<R>),
    Lzma(XzDecoder<R>),
    Failed,
}

/// Byte stream decoder that is only set up on the first read.
///
/// Gzip accepts multi-member files. Lzma accepts both the `.xz` container
/// and legacy `.lzma` data, including concatenated streams.
pub struct DecodedStream<R: Read> {
    state: State<R>,
}

impl<R: Read> DecodedStream<R> {
    fn new(reader: R, codec: Codec) -> Self {
        Self {
            state: State::Pending(reader, codec),
        }
    }

    /// Whether any byte has been requested from the wrapped stream yet.
    pub fn is_started(&self) -> bool {
        !matches!(self.state, State::Pending(..))
    }

    /// Recover the wrapped stream. `None` if setting up the decoder failed.
    pub fn into_inner(self) -> Option<R> {
        match self.state {
            State::Pending(reader, _) => Some(reader),
            State::Gzip(decoder) => Some(decoder.into_inner()),
            State::Lzma(decoder) => Some(decoder.into_inner()),
            State::Failed => None,
        }
    }

    fn start(&mut self) -> io::Result<()> {
        self.state = match mem::replace(&mut self.state, State::Failed) {
            State::Pending(reader, Codec::Gzip) => State::Gzip(MultiGzDecoder::new(reader)),
            State::Pending(reader, Codec::Lzma) => {
                let stream =
                    Stream::new_auto_decoder(u64::MAX, CONCATENATED).map_err(io::Error::other)?;
                State::Lzma(XzDecoder::new_stream(reader, stream))
            }
            started => started,
        };
        Ok(())
    }
}

impl<R: Read> Read for DecodedStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.start()?;
        match &mut self.state {
            State::Gzip(decoder) => decoder.read(buf),
            State::Lzma(decoder) => decoder.read(buf),
            State::Pending(..) | State::Failed => {
                Err(io::Error::other("decoder failed to initialize"))
            }
        }
    }
}

const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
const XZ_MAGIC: &[u8] = &[0xFD, b'7', b'z', b'X', b'Z', 0x00];

/// Bytes consumed while sniffing, replayed ahead of the rest of the stream.
type Sniffed<R> = io::Chain<Cursor<Vec<u8>>, R>;

/// Tar payload with any gzip or xz layer removed.
pub enum TarInput<R: Read> {
    Plain(Sniffed<R>),
    Gzip(Box<MultiGzDecoder<Sniffed<R>>>),
    Xz(Box<XzDecoder<Sniffed<R>>>),
}

impl<R: Read> TarInput<R> {
    /// Peek at the leading magic bytes and strip a gzip or xz layer if found.
    fn sniff(mut reader: R) -> io::Result<Self> {
        let mut magic = Vec::with_capacity(XZ_MAGIC.len());
        (&mut reader)
            .take(XZ_MAGIC.len() as u64)
            .read_to_end(&mut magic)?;
        let compressed_with = if magic.starts_with(GZIP_MAGIC) {
            Some(Codec::Gzip)
        } else if magic.starts_with(XZ_MAGIC) {
            Some(Codec::Lzma)
        } else {
            None
        };

        let input = Cursor::new(magic).chain(reader);
        Ok(match compressed_with {
            Some(Codec::Gzip) => Self::Gzip(Box::new(MultiGzDecoder::new(input))),
            Some(Codec::Lzma) => {
                let stream = Stream::new_stream_decoder(u64::MAX, CONCATENATED)
                    .map_err(io::Error::other)?;
                Self::Xz(Box::new(XzDecoder::new_stream(input, stream)))
            }
            None => Self::Plain(input),
        })
    }
}

impl<R: Read> Read for TarInput<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            Self::Xz(d) => d.read(buf),
        }
    }
}

enum TarState<R: Read> {
    Pending(R),
    Open(tar::Archive<TarInput<R>>),
    Failed,
}

/// Tar archive opened on first access.
///
/// Plain, gzip-compressed and xz-compressed tarballs are all accepted; the
/// compression layer is recognized from the first bytes of the stream.
pub struct TarStream<R: Read> {
    state: TarState<R>,
}

impl<R: Read> TarStream<R> {
    fn new(reader: R) -> Self {
        Self {
            state: TarState::Pending(reader),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, TarState::Open(_))
    }

    pub fn archive(&mut self) -> io::Result<&mut tar::Archive<TarInput<R>>> {
        self.state = match mem::replace(&mut self.state, TarState::Failed) {
            TarState::Pending(reader) => {
                TarState::Open(tar::Archive::new(TarInput::sniff(reader)?))
            }
            opened => opened,
        };
        match &mut self.state {
            TarState::Open(archive) => Ok(archive),
            _ => Err(io::Error::other("tar archive failed to open")),
        }
    }

    pub fn entries(&mut self) -> io::Result<tar::Entries<'_, TarInput<R>>> {
        self.archive()?.entries()
    }

    /// Unpack every entry under `dst`, using the tar crate's path checks.
    pub fn unpack(&mut self, dst: impl AsRef<std::path::Path>) -> io::Result<()> {
        self.archive()?.unpack(dst)
    }
}

enum ZipState<R> {
    Pending(R),
    Open(zip::ZipArchive<R>),
    Failed,
}

/// Zip archive opened on first access.
///
/// Reading the central directory needs a seekable stream, so the accessors
/// require `R: Seek`.
pub struct ZipStream<R> {
    state: ZipState<R>,
}

impl<R> ZipStream<R> {
    fn new(reader: R) -> Self {
        Self {
            state: ZipState::Pending(reader),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ZipState::Open(_))
    }
}

impl<R: Read + Seek> ZipStream<R> {
    pub fn archive(&mut self) -> zip::result::ZipResult<&mut zip::ZipArchive<R>> {
        self.state = match mem::replace(&mut self.state, ZipState::Failed) {
            ZipState::Pending(reader) => ZipState::Open(zip::ZipArchive::new(reader)?),
            opened => opened,
        };
        match &mut self.state {
            ZipState::Open(archive) => Ok(archive),
            _ => Err(io::Error::other("zip archive failed to open").into()),
        }
    }

    /// Entry names in central-directory order.
    pub fn names(&mut self) -> zip::result::ZipResult<Vec<String>> {
        Ok(self.archive()?.file_names().map(str::to_owned).collect())
    }
}
