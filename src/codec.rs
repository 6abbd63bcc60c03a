//! Thin wrapper over the `image` crate: everything the pipeline reads or
//! writes on disk goes through [`decode`] and [`encode`].

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use image::{codecs::jpeg::JpegEncoder, ImageError, ImageFormat, ImageReader, RgbImage};

use crate::error::{MosaicError, Result};

/// Decodes any supported image file into 8-bit RGB, dropping alpha.
pub(crate) fn decode(path: &Path) -> Result<RgbImage> {
    let decode_error = |source: ImageError| MosaicError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| decode_error(e.into()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.into()))?
        .decode()
        .map_err(decode_error)?
        .into_rgb8();
    Ok(img)
}

/// Writes `img` to `path`. JPEG is the default format; `quality` only
/// applies to it.
pub(crate) fn encode(path: &Path, img: &RgbImage, quality: u8) -> Result<()> {
    let encode_error = |source: ImageError| MosaicError::Encode {
        path: path.to_path_buf(),
        source,
    };
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Jpeg) | Err(_) => {
            let file = File::create(path).map_err(|e| encode_error(e.into()))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
            img.write_with_encoder(encoder).map_err(encode_error)
        }
        Ok(format) => {
            if quality != crate::clap::DEFAULT_QUALITY {
                log::warn!(
                    "output quality {} is ignored for {:?} output",
                    quality,
                    format
                );
            }
            img.save_with_format(path, format).map_err(encode_error)
        }
    }
}

/// Lists the regular files of `dir` sorted by file name. Subdirectories are
/// skipped; everything else is left for [`decode`] to accept or reject.
pub(crate) fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_error = |source: std::io::Error| MosaicError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = vec![];
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            log::debug!("skipping subdirectory {}", path.display());
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}
