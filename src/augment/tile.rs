//! Splitting backgrounds into fixed-size frames.

use image::imageops;

use crate::error::SynthError;
use crate::ir::RasterImage;

/// Top-left corners of the tiles cut from a `width`×`height` image.
///
/// Origins step by `tile` along each axis while `origin < extent - tile`.
/// The comparison is strict, so the last strip within `tile` pixels of the
/// far edge is dropped rather than padded; an axis no longer than `tile`
/// yields no origins. Order is ascending x, then ascending y.
///
/// `tile` must be non-zero.
pub fn tile_origins(width: u32, height: u32, tile: u32) -> Vec<(u32, u32)> {
    let xs = axis_origins(width, tile);
    let ys = axis_origins(height, tile);

    xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
        .collect()
}

/// Number of tiles [`split_background`] would produce, without cropping.
pub fn tile_count(width: u32, height: u32, tile: u32) -> usize {
    axis_origins(width, tile).len() * axis_origins(height, tile).len()
}

/// Crop `image` into `tile`×`tile` frames at [`tile_origins`].
pub fn split_background(image: &RasterImage, tile: u32) -> Result<Vec<RasterImage>, SynthError> {
    if tile == 0 {
        return Err(SynthError::InvalidConfig {
            message: "tile size must be greater than 0".to_string(),
        });
    }

    Ok(tile_origins(image.width(), image.height(), tile)
        .into_iter()
        .map(|(x, y)| imageops::crop_imm(image, x, y, tile, tile).to_image())
        .collect())
}

fn axis_origins(extent: u32, tile: u32) -> Vec<u32> {
    if tile == 0 {
        return Vec::new();
    }

    let (extent, tile) = (u64::from(extent), u64::from(tile));
    (0..)
        .map(|i: u64| i * tile)
        .take_while(|origin| origin + tile < extent)
        .map(|origin| origin as u32)
        .collect()
}
