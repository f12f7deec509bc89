//! Composite and annotation model.
//!
//! A [`CompositeImage`] is what the compositor produces; an
//! [`AnnotationDocument`] is the serializable view of it that is written
//! next to the image on disk.

use super::bbox::BBox;

/// Pixel buffer used throughout the pipeline.
///
/// Every source is converted to 8-bit RGB on load, so pasting a foreground
/// overwrites colour channels only.
pub type RasterImage = image::RgbImage;

/// A background frame with foregrounds pasted onto it.
#[derive(Clone, Debug)]
pub struct CompositeImage {
    /// The pixels of the composite.
    pub image: RasterImage,

    /// One box per pasted instance, in paste order.
    pub boxes: Vec<BBox>,
}

impl CompositeImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Builds the annotation document describing this composite.
    ///
    /// `identifier` becomes the stem of the `<filename>` entry.
    pub fn annotation(
        &self,
        identifier: impl Into<String>,
        label: impl Into<String>,
    ) -> AnnotationDocument {
        AnnotationDocument::new(
            identifier,
            label,
            self.width(),
            self.height(),
            self.boxes.clone(),
        )
    }
}

/// Dimensions and object boxes of one composite, ready for serialization.
///
/// Immutable once built; every object carries the same class label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationDocument {
    identifier: String,
    label: String,
    width: u32,
    height: u32,
    boxes: Vec<BBox>,
}

impl AnnotationDocument {
    pub fn new(
        identifier: impl Into<String>,
        label: impl Into<String>,
        width: u32,
        height: u32,
        boxes: Vec<BBox>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            width,
            height,
            boxes,
        }
    }

    /// The output identifier (file stem shared by the image and the XML).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The image file name recorded in `<filename>`.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.identifier)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn boxes(&self) -> &[BBox] {
        &self.boxes
    }
}
