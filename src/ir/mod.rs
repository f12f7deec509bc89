//! Data model shared by the augmentation stages.
//!
//! # Design Principles
//!
//! 1. **Integer Geometry**: boxes are pixel-exact `u32` XYXY rectangles;
//!    nothing in the pipeline ever produces fractional coordinates.
//!
//! 2. **Immutable Outputs**: a composite and its annotation are built once
//!    and never mutated after being handed to the writer.
//!
//! # Example
//!
//! ```
//! use synthvoc::ir::{AnnotationDocument, BBox};
//! use synthvoc::ir::io_voc_xml::{from_voc_xml_str, to_voc_xml_string};
//!
//! let doc = AnnotationDocument::new(
//!     "0",
//!     "polar-bear",
//!     416,
//!     416,
//!     vec![BBox::from_placement(10, 20, 50, 50)],
//! );
//! let xml = to_voc_xml_string(&doc);
//! assert_eq!(from_voc_xml_str(&xml).unwrap(), doc);
//! ```

mod bbox;
pub mod io_voc_xml;
mod model;

// Re-export core types for convenient access
pub use bbox::BBox;
pub use model::{AnnotationDocument, CompositeImage, RasterImage};
