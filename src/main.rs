mod catalog;
mod clap;
mod codec;
mod color;
mod compositor;
mod error;
mod matcher;
mod mosaic;

use anyhow::{Context, Result};

use crate::clap::MosaicConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = crate::clap::get_matches();
    let config = MosaicConfig::from_matches(&matches)?;
    log::debug!("{config:?}");

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to start the worker threads")?;
    }

    mosaic::mosaic(&config).with_context(|| {
        format!(
            "failed to build a mosaic of {} from {}",
            config.target.display(),
            config.samples.display()
        )
    })
}
