use std::path::PathBuf;

use clap::{arg, value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::error::{MosaicError, Result};

pub(crate) const DEFAULT_QUALITY: u8 = 100;
pub(crate) const DEFAULT_OUTPUT: &str = "result.jpg";

pub(crate) fn command() -> Command {
    Command::new("photomosaic")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Replaces every pixel of a target image with the sample image closest to its color.")
        .arg(
            Arg::new("target")
                .help("Path to the main (target) image")
                .required(true)
                .index(1)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("samples")
                .help("Path to the directory containing sample images, all of one resolution")
                .required(true)
                .index(2)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("quality")
                .help("Output quality (1 - 100)")
                .index(3)
                .value_parser(value_parser!(i64))
                .default_value("100"),
        )
        .arg(
            arg!(-o --output [OUTPUT] "output image file path")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(
            arg!(-j --threads [THREADS] "Number of worker threads (defaults to one per core)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("no_progress")
                .help("Do not draw progress bars")
                .long("no-progress")
                .action(ArgAction::SetTrue),
        )
}

pub(crate) fn get_matches() -> ArgMatches {
    command().get_matches()
}

/// Validated command line.
#[derive(Debug, Clone)]
pub(crate) struct MosaicConfig {
    pub(crate) target: PathBuf,
    pub(crate) samples: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) quality: u8,
    pub(crate) threads: Option<usize>,
    pub(crate) progress: bool,
}

impl MosaicConfig {
    pub(crate) fn new(target: impl Into<PathBuf>, samples: impl Into<PathBuf>) -> Self {
        MosaicConfig {
            target: target.into(),
            samples: samples.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            quality: DEFAULT_QUALITY,
            threads: None,
            progress: true,
        }
    }

    /// Checks every argument before anything touches the filesystem.
    pub(crate) fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let path = |id: &str| {
            matches
                .get_one::<PathBuf>(id)
                .cloned()
                .ok_or_else(|| MosaicError::InvalidArgument(format!("missing <{id}>")))
        };
        let mut config = MosaicConfig::new(path("target")?, path("samples")?);
        config.output = path("output")?;

        if let Some(&quality) = matches.get_one::<i64>("quality") {
            config.quality = u8::try_from(quality)
                .ok()
                .filter(|q| (1..=100).contains(q))
                .ok_or_else(|| {
                    MosaicError::InvalidArgument(format!(
                        "output quality {quality} is not valid, value must be within 1 - 100"
                    ))
                })?;
        }

        config.threads = matches.get_one::<usize>("threads").copied();
        if config.threads == Some(0) {
            return Err(MosaicError::InvalidArgument(
                "thread count must be at least 1".to_string(),
            ));
        }

        config.progress = !matches.get_flag("no_progress");
        Ok(config)
    }
}
