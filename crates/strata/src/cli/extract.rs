use std::collections::HashMap;
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use strata_extract::{Decompressed, StreamEntry};
use strata_source::{FileLister, FileOpener, save_new_from};
use tracing::{info, warn};

use super::{extractor, output_name};
use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct ExtractArg {
    /// Files, or directories whose files are extracted
    #[arg(required = true)]
    pub roots: Vec<PathBuf>,

    /// Shell-style pattern for directory children (repeatable)
    #[arg(short, long = "mask")]
    pub masks: Vec<String>,

    /// Force a format (gzip, lzma, tar, zip) instead of using extensions
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output directory (defaults to the current directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// What extracting a single entry produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Extracted {
    Written(PathBuf),
    Skipped(PathBuf),
    Unpacked(PathBuf),
}

pub fn run(arg: ExtractArg, config: &Config) -> anyhow::Result<()> {
    let masks = if arg.masks.is_empty() {
        &config.masks
    } else {
        &arg.masks
    };
    let out_dir = arg
        .out
        .or_else(|| config.out_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let paths = FileLister::new(&arg.roots)
        .masks(masks)?
        .collect::<strata_source::Result<Vec<_>>>()?;
    let extractor = extractor(FileOpener::new(paths), arg.format.as_deref(), config)?;
    info!(count = ?extractor.len().ok(), out = %out_dir.display(), "extracting");

    let mut targets = Targets::default();
    for entry in extractor {
        let entry = entry?;
        let target = out_dir.join(output_name(&entry.id));
        if let Some(owner) = targets.claim(&target, &entry.id) {
            warn!(
                id = %entry.id,
                %owner,
                target = %target.display(),
                "output name already used by another entry"
            );
        }
        match extract_entry(entry, &out_dir)? {
            Extracted::Written(path) => println!("wrote {}", path.display()),
            Extracted::Skipped(path) => println!("exists {}", path.display()),
            Extracted::Unpacked(path) => println!("unpacked {}", path.display()),
        }
    }
    Ok(())
}

/// Which identifier first mapped to each output target in this run.
#[derive(Debug, Default)]
struct Targets {
    owners: HashMap<PathBuf, String>,
}

impl Targets {
    /// Record `id` as producing `target`. Returns the earlier identifier if a
    /// different one already claimed it.
    fn claim(&mut self, target: &Path, id: &str) -> Option<String> {
        match self.owners.get(target) {
            Some(owner) if owner != id => Some(owner.clone()),
            Some(_) => None,
            None => {
                self.owners.insert(target.to_path_buf(), id.to_string());
                None
            }
        }
    }
}

/// Write one decompressed entry under `out_dir`.
///
/// Byte streams go to `out_dir/<stem>` and are streamed to disk; an existing
/// target is skipped without decoding anything. Archives unpack into that
/// directory.
pub fn extract_entry<R: Read + Seek>(
    entry: StreamEntry<Decompressed<R>>,
    out_dir: &Path,
) -> anyhow::Result<Extracted> {
    let (id, stream) = entry.into_parts();
    let target = out_dir.join(output_name(&id));

    match stream {
        Decompressed::Gzip(mut decoded) | Decompressed::Lzma(mut decoded) => {
            let written = save_new_from(&target, &mut decoded)
                .with_context(|| format!("failed to decompress '{id}'"))?;
            if written {
                Ok(Extracted::Written(target))
            } else {
                Ok(Extracted::Skipped(target))
            }
        }
        Decompressed::Tar(mut archive) => {
            fs::create_dir_all(&target)?;
            archive
                .unpack(&target)
                .with_context(|| format!("failed to unpack '{id}'"))?;
            Ok(Extracted::Unpacked(target))
        }
        Decompressed::Zip(mut zip) => {
            fs::create_dir_all(&target)?;
            zip.archive()
                .and_then(|archive| archive.extract(&target))
                .with_context(|| format!("failed to unpack '{id}'"))?;
            Ok(Extracted::Unpacked(target))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};
    use strata_extract::{Extractor, IterSource};
    use tempfile::tempdir;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn tarball(name: &str, content: &[u8]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content).unwrap();
        builder.into_inner().unwrap()
    }

    fn first_entry(id: &str, bytes: Vec<u8>) -> StreamEntry<Decompressed<Cursor<Vec<u8>>>> {
        let source = IterSource::new(vec![StreamEntry::new(id, Cursor::new(bytes))]);
        Extractor::new(source).next().unwrap().unwrap()
    }

    #[test]
    fn gzip_is_written_once() {
        let out = tempdir().unwrap();
        let target = out.path().join("rows.csv");

        let entry = first_entry("in/rows.csv.gz", gzip(b"a,b"));
        assert_eq!(
            extract_entry(entry, out.path()).unwrap(),
            Extracted::Written(target.clone())
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "a,b");

        let again = first_entry("in/rows.csv.gz", gzip(b"changed"));
        assert_eq!(
            extract_entry(again, out.path()).unwrap(),
            Extracted::Skipped(target.clone())
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "a,b");
    }

    #[test]
    fn existing_target_is_skipped_before_decoding() {
        let out = tempdir().unwrap();
        let target = out.path().join("rows.csv");
        fs::write(&target, "kept").unwrap();

        let entry = first_entry("rows.csv.gz", b"not gzip at all".to_vec());
        assert_eq!(
            extract_entry(entry, out.path()).unwrap(),
            Extracted::Skipped(target.clone())
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "kept");
    }

    #[test]
    fn colliding_identifiers_are_reported() {
        let mut targets = Targets::default();
        let target = Path::new("out/x");
        assert_eq!(targets.claim(target, "a/x.gz"), None);
        assert_eq!(targets.claim(target, "a/x.gz"), None);
        assert_eq!(targets.claim(target, "b/x.gz").as_deref(), Some("a/x.gz"));
        assert_eq!(targets.claim(Path::new("out/y"), "b/y.gz"), None);
    }

    #[test]
    fn gzip_tarball_is_unpacked() {
        let out = tempdir().unwrap();
        let source = IterSource::new(vec![StreamEntry::new(
            "bundle.tgz",
            Cursor::new(gzip(&tarball("inner.txt", b"packed"))),
        )]);
        let entry = Extractor::with_format_str(source, "tar")
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        let dir = out.path().join("bundle");
        assert_eq!(
            extract_entry(entry, out.path()).unwrap(),
            Extracted::Unpacked(dir.clone())
        );
        assert_eq!(fs::read_to_string(dir.join("inner.txt")).unwrap(), "packed");
    }

    #[test]
    fn tar_is_unpacked_into_stem_dir() {
        let out = tempdir().unwrap();
        let entry = first_entry("bundle.tar", tarball("inner.txt", b"inside"));
        let dir = out.path().join("bundle");
        assert_eq!(
            extract_entry(entry, out.path()).unwrap(),
            Extracted::Unpacked(dir.clone())
        );
        assert_eq!(fs::read_to_string(dir.join("inner.txt")).unwrap(), "inside");
    }

    #[test]
    fn corrupt_stream_reports_identifier() {
        let out = tempdir().unwrap();
        let entry = first_entry("broken.gz", b"not gzip at all".to_vec());
        let err = extract_entry(entry, out.path()).unwrap_err();
        assert!(err.to_string().contains("broken.gz"));
        assert!(!out.path().join("broken").exists());
    }
}
