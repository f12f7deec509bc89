//! Random placement of foregrounds onto background frames.

use image::imageops;
use rand::RngExt;

use crate::config::InstanceCountDistribution;
use crate::error::SynthError;
use crate::ir::{BBox, CompositeImage, RasterImage};

/// Pastes randomly chosen foregrounds onto frames and records their boxes.
///
/// Random draws happen in a fixed order per composite: the instance count,
/// then every foreground index, then `x` and `y` for each placement in turn.
/// Keeping that order is what makes a seeded run reproducible.
#[derive(Clone, Copy, Debug)]
pub struct Compositor<'a> {
    pool: &'a [RasterImage],
    distribution: &'a InstanceCountDistribution,
}

impl<'a> Compositor<'a> {
    pub fn new(
        pool: &'a [RasterImage],
        distribution: &'a InstanceCountDistribution,
    ) -> Result<Self, SynthError> {
        if pool.is_empty() {
            return Err(SynthError::EmptyForegroundPool);
        }
        Ok(Self { pool, distribution })
    }

    /// Build one composite over a private copy of `frame`.
    ///
    /// Foregrounds are chosen uniformly with replacement and may overlap or
    /// occlude each other. A chosen foreground larger than the frame is an
    /// [`SynthError::InvalidPlacement`].
    pub fn compose<R: RngExt + ?Sized>(
        &self,
        frame: &RasterImage,
        rng: &mut R,
    ) -> Result<CompositeImage, SynthError> {
        let count = self.distribution.sample(rng);
        let picks: Vec<usize> = (0..count)
            .map(|_| rng.random_range(0..self.pool.len()))
            .collect();

        let mut canvas = frame.clone();
        let mut boxes = Vec::with_capacity(picks.len());
        for idx in picks {
            boxes.push(paste_random(&mut canvas, &self.pool[idx], rng)?);
        }

        Ok(CompositeImage {
            image: canvas,
            boxes,
        })
    }
}

/// Paste `foreground` at a uniformly random offset that keeps it inside
/// `canvas`, overwriting the pixels underneath.
pub fn paste_random<R: RngExt + ?Sized>(
    canvas: &mut RasterImage,
    foreground: &RasterImage,
    rng: &mut R,
) -> Result<BBox, SynthError> {
    let (frame_width, frame_height) = canvas.dimensions();
    let (width, height) = foreground.dimensions();

    if width > frame_width || height > frame_height {
        return Err(SynthError::InvalidPlacement {
            width,
            height,
            frame_width,
            frame_height,
        });
    }

    let x = rng.random_range(0..=frame_width - width);
    let y = rng.random_range(0..=frame_height - height);
    imageops::replace(canvas, foreground, i64::from(x), i64::from(y));

    Ok(BBox::from_placement(x, y, width, height))
}
