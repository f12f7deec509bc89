//! Image augmentation stages.
//!
//! - [`transform`]: the eight-member rotation/flip orbit of an image
//! - [`tile`]: cutting oversized backgrounds into fixed-size frames
//! - [`composite`]: pasting random foregrounds onto a frame

pub mod composite;
pub mod tile;
pub mod transform;

pub use composite::{paste_random, Compositor};
pub use tile::{split_background, tile_count, tile_origins};
pub use transform::{orbit, Flip, Orientation, Rotation, ORBIT_SIZE};
