//! Filesystem providers and sinks for strata pipelines.
//!
//! [`FileLister`] and [`FileOpener`] feed an extractor; [`Saver`] persists
//! what comes out of one.

pub use error::{Error, Result};
pub use lister::FileLister;
pub use opener::FileOpener;
pub use saver::{Saver, save_new, save_new_from};

mod error;
mod lister;
mod opener;
mod saver;
