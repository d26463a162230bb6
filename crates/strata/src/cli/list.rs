use std::path::PathBuf;

use clap::Args;
use strata_extract::IterSource;
use strata_source::FileLister;

use super::extractor;
use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct ListArg {
    #[arg(required = true)]
    pub roots: Vec<PathBuf>,

    #[arg(short, long = "mask")]
    pub masks: Vec<String>,

    #[arg(short, long)]
    pub format: Option<String>,
}

pub fn run(arg: ListArg, config: &Config) -> anyhow::Result<()> {
    let masks = if arg.masks.is_empty() {
        &config.masks
    } else {
        &arg.masks
    };
    // Detection needs no stream, so nothing is opened here.
    let detector = extractor(
        IterSource::new(Vec::<strata_extract::StreamEntry<std::io::Empty>>::new()),
        arg.format.as_deref(),
        config,
    )?;

    for path in FileLister::new(&arg.roots).masks(masks)? {
        let id = path?.display().to_string();
        match detector.detect_format(&id) {
            Ok(format) => println!("{format}\t{id}"),
            Err(err) => println!("-\t{err}"),
        }
    }
    Ok(())
}
