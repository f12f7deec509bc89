//! Rotation/flip orbit of an image.
//!
//! Rotating by {0°, 90°, 180°, 270°} and then applying {identity, vertical
//! flip, horizontal flip, both flips} enumerates every symmetry of the square
//! twice: the 180° and 270° rows repeat the 0° and 90° rows in a different
//! order. The orbit keeps each symmetry once, at its first position in that
//! enumeration, which leaves the 0° and 90° rows.

use image::imageops;

use crate::ir::RasterImage;

/// Number of images in an orbit.
pub const ORBIT_SIZE: usize = 8;

/// Counter-clockwise rotation by a multiple of 90°.
///
/// 90° and 270° swap width and height (the canvas expands to fit).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// Mirror applied after rotating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flip {
    None,
    /// Top to bottom.
    Vertical,
    /// Left to right.
    Horizontal,
    /// Horizontal, then vertical.
    Both,
}

/// One member of the orbit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Orientation {
    pub rotation: Rotation,
    pub flip: Flip,
}

impl Orientation {
    /// The orbit in generation order.
    pub const ALL: [Orientation; ORBIT_SIZE] = [
        Orientation::new(Rotation::Deg0, Flip::None),
        Orientation::new(Rotation::Deg0, Flip::Vertical),
        Orientation::new(Rotation::Deg0, Flip::Horizontal),
        Orientation::new(Rotation::Deg0, Flip::Both),
        Orientation::new(Rotation::Deg90, Flip::None),
        Orientation::new(Rotation::Deg90, Flip::Vertical),
        Orientation::new(Rotation::Deg90, Flip::Horizontal),
        Orientation::new(Rotation::Deg90, Flip::Both),
    ];

    pub const fn new(rotation: Rotation, flip: Flip) -> Self {
        Self { rotation, flip }
    }

    /// Returns true if this orientation swaps width and height.
    pub fn is_transposed(&self) -> bool {
        matches!(self.rotation, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Produce a new image in this orientation.
    pub fn apply(&self, image: &RasterImage) -> RasterImage {
        // imageops rotates clockwise.
        let rotated = match self.rotation {
            Rotation::Deg0 => image.clone(),
            Rotation::Deg90 => imageops::rotate270(image),
            Rotation::Deg180 => imageops::rotate180(image),
            Rotation::Deg270 => imageops::rotate90(image),
        };

        match self.flip {
            Flip::None => rotated,
            Flip::Vertical => imageops::flip_vertical(&rotated),
            Flip::Horizontal => imageops::flip_horizontal(&rotated),
            Flip::Both => imageops::flip_vertical(&imageops::flip_horizontal(&rotated)),
        }
    }
}

/// Materialize all eight orientations of `image`, in [`Orientation::ALL`] order.
pub fn orbit(image: &RasterImage) -> Vec<RasterImage> {
    Orientation::ALL
        .iter()
        .map(|orientation| orientation.apply(image))
        .collect()
}
