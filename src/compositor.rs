use image::RgbImage;
use indicatif::ProgressBar;
use itertools::iproduct;
use rayon::prelude::*;

use crate::{
    error::{MosaicError, Result},
    matcher::AssignmentMap,
};

/// Builds the mosaic: every grid cell of `map` becomes a full copy of the
/// tile it was assigned, placed at native resolution.
///
/// `tiles` are indexed by the ids stored in `map` and must all be
/// `tile_size`. Both are checked before any pixel is written.
pub(crate) fn composite(
    map: &AssignmentMap,
    tiles: &[&RgbImage],
    tile_size: (u32, u32),
    pb: &ProgressBar,
) -> Result<RgbImage> {
    if let Some(&index) = map.indices().iter().find(|&&i| i >= tiles.len()) {
        return Err(MosaicError::Internal(format!(
            "sample index {index} is out of range for a catalog of {}",
            tiles.len()
        )));
    }
    if let Some(tile) = tiles.iter().find(|t| t.dimensions() != tile_size) {
        return Err(MosaicError::Internal(format!(
            "tile of {:?} does not match the catalog tile size {tile_size:?}",
            tile.dimensions()
        )));
    }

    let (grid_width, grid_height) = map.dimensions();
    let (tile_width, tile_height) = tile_size;
    let overflow = || MosaicError::DimensionOverflow {
        width: u64::from(grid_width) * u64::from(tile_width),
        height: u64::from(grid_height) * u64::from(tile_height),
    };
    let out_width = grid_width.checked_mul(tile_width).ok_or_else(overflow)?;
    let out_height = grid_height.checked_mul(tile_height).ok_or_else(overflow)?;
    let len = (out_width as usize)
        .checked_mul(out_height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(overflow)?;

    let mut buf = vec![0u8; len];
    if len > 0 {
        let row_len = tile_width as usize * 3;
        let out_row_len = out_width as usize * 3;
        pb.set_length(u64::from(grid_height));
        // one band per grid row, `tile_height` output rows tall
        buf.par_chunks_mut(out_row_len * tile_height as usize)
            .enumerate()
            .for_each(|(y, band)| {
                let cells = map.row(y as u32).iter().enumerate();
                for (j, (x, &index)) in iproduct!(0..tile_height as usize, cells) {
                    let src = j * row_len;
                    let dst = j * out_row_len + x * row_len;
                    band[dst..dst + row_len]
                        .copy_from_slice(&tiles[index].as_raw()[src..src + row_len]);
                }
                pb.inc(1);
            });
    }

    RgbImage::from_raw(out_width, out_height, buf)
        .ok_or_else(|| MosaicError::Internal("output buffer has the wrong length".to_string()))
}
