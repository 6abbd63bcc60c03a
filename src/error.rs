use std::path::PathBuf;

use thiserror::Error;

/// Every way a mosaic run can fail. None of them are retried.
#[derive(Debug, Error)]
pub(crate) enum MosaicError {
    #[error("could not load image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "all sample images must have the same resolution: {} is {}x{}, expected {}x{}",
        path.display(),
        actual.0,
        actual.1,
        expected.0,
        expected.1
    )]
    ResolutionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("no usable sample images")]
    EmptyCatalog,

    #[error("could not write output image {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not read directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("output image of {width}x{height} pixels is too large")]
    DimensionOverflow { width: u64, height: u64 },

    /// A pipeline stage handed the next one data it could not have produced.
    #[error("internal error: {0}")]
    Internal(String),
}

pub(crate) type Result<T, E = MosaicError> = std::result::Result<T, E>;
