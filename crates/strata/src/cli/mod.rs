pub mod app;
pub mod ext;
pub mod extract;
pub mod list;

use std::path::Path;

use strata_extract::{EntrySource, Extractor};

/// Extractor with the format from the flag, else the config, else inferred.
pub(crate) fn extractor<S: EntrySource>(
    source: S,
    flag: Option<&str>,
    config: &crate::config::Config,
) -> strata_extract::Result<Extractor<S>> {
    match flag.or(config.format.as_deref()) {
        Some(tag) => Extractor::with_format_str(source, tag),
        None => Ok(Extractor::new(source)),
    }
}

/// Output name for an extracted identifier: its file name minus the last
/// extension.
pub(crate) fn output_name(id: &str) -> String {
    Path::new(id)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string())
}
