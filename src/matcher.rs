use image::RgbImage;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::{
    color::Color,
    error::{MosaicError, Result},
};

/// Catalog index chosen for every target pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AssignmentMap {
    width: u32,
    height: u32,
    indices: Vec<usize>,
}

impl AssignmentMap {
    /// Fails with [`MosaicError::Internal`] when `indices` does not cover the
    /// grid exactly.
    pub(crate) fn new(width: u32, height: u32, indices: Vec<usize>) -> Result<Self> {
        let cells = width as usize * height as usize;
        if indices.len() != cells {
            return Err(MosaicError::Internal(format!(
                "assignment map for a {width}x{height} grid holds {} entries",
                indices.len()
            )));
        }
        Ok(AssignmentMap {
            width,
            height,
            indices,
        })
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(crate) fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// One target row of the grid.
    pub(crate) fn row(&self, y: u32) -> &[usize] {
        let start = y as usize * self.width as usize;
        &self.indices[start..start + self.width as usize]
    }
}

/// Index of the closest color. Only a strictly smaller distance replaces the
/// current best, so ties go to the earliest entry.
pub(crate) fn nearest(colors: &[Color], pixel: &Color) -> Option<usize> {
    colors
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.distance(pixel))
        .map(|(i, _)| i)
}

/// Picks a sample for every pixel of `target`. Rows are matched in parallel
/// and the progress bar advances once per row.
pub(crate) fn assign(
    target: &RgbImage,
    colors: &[Color],
    pb: &ProgressBar,
) -> Result<AssignmentMap> {
    if colors.is_empty() {
        return Err(MosaicError::EmptyCatalog);
    }
    pb.set_length(u64::from(target.height()));
    let rows = (0..target.height())
        .into_par_iter()
        .map(|y| {
            let row = (0..target.width())
                .map(|x| {
                    nearest(colors, &Color::from(target.get_pixel(x, y)))
                        .ok_or(MosaicError::EmptyCatalog)
                })
                .collect::<Result<Vec<_>>>();
            pb.inc(1);
            row
        })
        .collect::<Result<Vec<_>>>()?;
    AssignmentMap::new(target.width(), target.height(), rows.concat())
}
