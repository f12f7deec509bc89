//! Integer bounding boxes in canonical XYXY format.

/// An axis-aligned bounding box in pixel XYXY format (xmin, ymin, xmax, ymax).
///
/// `xmax`/`ymax` are exclusive edges: a `w`×`h` object pasted at `(x, y)`
/// covers `BBox { xmin: x, ymin: y, xmax: x + w, ymax: y + h }`.
///
/// Note: the constructor does NOT enforce `min < max`, so boxes read from
/// disk can be represented as-is and reported by verification rather than
/// rejected while parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BBox {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl BBox {
    /// Creates a new bounding box from explicit coordinates.
    #[inline]
    pub fn from_xyxy(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Creates the box covered by a `width`×`height` object placed at `(x, y)`.
    #[inline]
    pub fn from_placement(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Returns the width of the box, or 0 if it is malformed.
    #[inline]
    pub fn width(&self) -> u32 {
        self.xmax.saturating_sub(self.xmin)
    }

    /// Returns the height of the box, or 0 if it is malformed.
    #[inline]
    pub fn height(&self) -> u32 {
        self.ymax.saturating_sub(self.ymin)
    }

    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Returns true if the box is strictly ordered (min < max on both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.xmin < self.xmax && self.ymin < self.ymax
    }

    /// Returns true if the box lies fully inside a `width`×`height` image.
    #[inline]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.xmax <= width && self.ymax <= height
    }
}
