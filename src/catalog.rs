//! The sample catalog: every tile image reduced to its average color, kept
//! together with its pixels for compositing.

use std::path::{Path, PathBuf};

use image::RgbImage;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::{
    codec,
    color::{Color, ImageColorExt},
    error::{MosaicError, Result},
};

#[derive(Debug)]
pub(crate) struct Sample {
    pub(crate) path: PathBuf,
    pub(crate) color: Color,
    pub(crate) image: RgbImage,
}

/// Samples in load order. The index of a sample is its id everywhere else in
/// the pipeline.
#[derive(Debug)]
pub(crate) struct Catalog {
    samples: Vec<Sample>,
    tile_size: (u32, u32),
}

impl Catalog {
    /// Decodes every file in `dir` (sorted by name) and builds the catalog.
    ///
    /// Decoding runs in parallel, but failures are reported in load order:
    /// the first file that is either undecodable or of the wrong size aborts
    /// the load, as if the folder had been read one file at a time.
    pub(crate) fn load(dir: &Path, pb: &ProgressBar) -> Result<Self> {
        let paths = codec::list_images(dir)?;
        pb.set_length(paths.len() as u64);
        let decoded = paths
            .into_par_iter()
            .map(|path| {
                let img = codec::decode(&path);
                pb.inc(1);
                img.map(|img| (path, img))
            })
            .collect::<Vec<_>>();

        let mut images = Vec::with_capacity(decoded.len());
        let mut tile_size = None;
        for result in decoded {
            let (path, img) = result?;
            let expected = *tile_size.get_or_insert(img.dimensions());
            ensure_tile_size(&path, &img, expected)?;
            images.push((path, img));
        }
        Self::build(images)
    }

    /// Takes ownership of already decoded samples. The first one fixes the
    /// tile size; any other size aborts the whole build.
    pub(crate) fn build<I>(images: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PathBuf, RgbImage)>,
    {
        let images = images.into_iter().collect::<Vec<_>>();
        let Some((_, first)) = images.first() else {
            return Err(MosaicError::EmptyCatalog);
        };
        let tile_size = first.dimensions();
        for (path, img) in &images {
            ensure_tile_size(path, img, tile_size)?;
        }
        let samples = images
            .into_par_iter()
            .map(|(path, image)| Sample {
                path,
                color: image.average_color(),
                image,
            })
            .collect::<Vec<_>>();
        for sample in &samples {
            log::debug!("{}: average color {:?}", sample.path.display(), sample.color);
        }
        Ok(Catalog { samples, tile_size })
    }

    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }

    pub(crate) fn tile_size(&self) -> (u32, u32) {
        self.tile_size
    }

    pub(crate) fn colors(&self) -> Vec<Color> {
        self.samples.iter().map(|s| s.color).collect()
    }

    pub(crate) fn images(&self) -> Vec<&RgbImage> {
        self.samples.iter().map(|s| &s.image).collect()
    }
}

fn ensure_tile_size(path: &Path, img: &RgbImage, expected: (u32, u32)) -> Result<()> {
    if img.dimensions() == expected {
        return Ok(());
    }
    Err(MosaicError::ResolutionMismatch {
        path: path.to_path_buf(),
        expected,
        actual: img.dimensions(),
    })
}

#[cfg(test)]
mod tests {
    use image::Rgb;
    use tempfile::tempdir;

    use super::*;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb(rgb))
    }

    fn named(images: Vec<RgbImage>) -> Vec<(PathBuf, RgbImage)> {
        images
            .into_iter()
            .enumerate()
            .map(|(i, img)| (PathBuf::from(format!("{i}.png")), img))
            .collect()
    }

    #[test]
    fn build_computes_truncated_averages_in_load_order() {
        let odd = RgbImage::from_raw(2, 1, vec![0, 0, 0, 3, 5, 255]).unwrap();
        let catalog = Catalog::build(named(vec![solid(2, 1, [9, 8, 7]), odd])).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.tile_size(), (2, 1));
        assert_eq!(
            catalog.colors(),
            vec![Color::new(9, 8, 7), Color::new(1, 2, 127)]
        );
    }

    #[test]
    fn build_keeps_sample_buffers_untouched() {
        let img = RgbImage::from_fn(3, 3, |x, y| Rgb([x as u8, y as u8, 99]));
        let catalog = Catalog::build(named(vec![img.clone()])).unwrap();
        assert_eq!(catalog.samples[0].image, img);
        assert_eq!(catalog.images(), vec![&img]);
    }

    #[test]
    fn build_rejects_mismatched_resolution() {
        let err = Catalog::build(named(vec![
            solid(2, 2, [0; 3]),
            solid(2, 2, [1; 3]),
            solid(3, 2, [2; 3]),
        ]))
        .unwrap_err();
        match err {
            MosaicError::ResolutionMismatch {
                path,
                expected,
                actual,
            } => {
                assert_eq!(path, PathBuf::from("2.png"));
                assert_eq!(expected, (2, 2));
                assert_eq!(actual, (3, 2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn build_rejects_mismatch_in_either_order() {
        for images in [
            vec![solid(1, 1, [0; 3]), solid(1, 2, [0; 3])],
            vec![solid(1, 2, [0; 3]), solid(1, 1, [0; 3])],
        ] {
            assert!(matches!(
                Catalog::build(named(images)),
                Err(MosaicError::ResolutionMismatch { .. })
            ));
        }
    }

    #[test]
    fn build_without_samples_is_empty_catalog() {
        assert!(matches!(
            Catalog::build(Vec::new()),
            Err(MosaicError::EmptyCatalog)
        ));
    }

    #[test]
    fn load_reads_directory_sorted_by_name() {
        let dir = tempdir().unwrap();
        solid(2, 2, [200, 0, 0]).save(dir.path().join("b.png")).unwrap();
        solid(2, 2, [0, 200, 0]).save(dir.path().join("a.png")).unwrap();
        std::fs::create_dir(dir.path().join("skipped")).unwrap();

        let catalog = Catalog::load(dir.path(), &ProgressBar::hidden()).unwrap();
        assert_eq!(
            catalog.colors(),
            vec![Color::new(0, 200, 0), Color::new(200, 0, 0)]
        );
        assert_eq!(catalog.samples[0].path, dir.path().join("a.png"));
    }

    #[test]
    fn load_empty_directory_is_empty_catalog() {
        let dir = tempdir().unwrap();
        let err = Catalog::load(dir.path(), &ProgressBar::hidden()).unwrap_err();
        assert!(matches!(err, MosaicError::EmptyCatalog));
    }

    #[test]
    fn load_fails_on_non_image_file() {
        let dir = tempdir().unwrap();
        solid(2, 2, [1, 2, 3]).save(dir.path().join("a.png")).unwrap();
        std::fs::write(dir.path().join("readme.txt"), "hello").unwrap();
        let err = Catalog::load(dir.path(), &ProgressBar::hidden()).unwrap_err();
        assert!(matches!(err, MosaicError::Decode { .. }));
    }

    #[test]
    fn load_reports_mismatch_before_a_later_undecodable_file() {
        let dir = tempdir().unwrap();
        solid(2, 2, [1, 2, 3]).save(dir.path().join("a.png")).unwrap();
        solid(3, 3, [4, 5, 6]).save(dir.path().join("b.png")).unwrap();
        std::fs::write(dir.path().join("c.txt"), "not an image").unwrap();

        let err = Catalog::load(dir.path(), &ProgressBar::hidden()).unwrap_err();
        match err {
            MosaicError::ResolutionMismatch {
                path,
                expected,
                actual,
            } => {
                assert_eq!(path, dir.path().join("b.png"));
                assert_eq!(expected, (2, 2));
                assert_eq!(actual, (3, 3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_reports_first_undecodable_file_in_name_order() {
        let dir = tempdir().unwrap();
        solid(2, 2, [1, 2, 3]).save(dir.path().join("a.png")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "first").unwrap();
        solid(3, 3, [4, 5, 6]).save(dir.path().join("c.png")).unwrap();
        std::fs::write(dir.path().join("d.txt"), "second").unwrap();

        for _ in 0..8 {
            match Catalog::load(dir.path(), &ProgressBar::hidden()).unwrap_err() {
                MosaicError::Decode { path, .. } => {
                    assert_eq!(path, dir.path().join("b.txt"))
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
