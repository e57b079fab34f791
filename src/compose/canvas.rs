//! Page canvas sizing.
//!
//! A canvas is the rectangle, in PDF points (1/72 inch), that a composited
//! page occupies. Document pages keep their media box; images are sized from
//! their pixel dimensions at a fixed density.

use lopdf::Object;

use crate::error::{BatesError, Result};

/// Assumed density of raster inputs, in pixels per inch.
pub const IMAGE_DPI: f32 = 300.0;

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// US Letter, used when a page and all of its ancestors lack a media box.
pub const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Clockwise turn a viewer applies to a page, from its `/Rotate` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Shown as stored.
    #[default]
    None,
    /// Turned 90 degrees clockwise.
    Quarter,
    /// Turned upside down.
    Half,
    /// Turned 270 degrees clockwise.
    ThreeQuarter,
}

impl Rotation {
    /// Interpret a `/Rotate` value. Values that are not a multiple of 90 are
    /// ignored, as viewers do.
    pub fn from_degrees(degrees: i64) -> Self {
        match degrees.rem_euclid(360) {
            90 => Self::Quarter,
            180 => Self::Half,
            270 => Self::ThreeQuarter,
            _ => Self::None,
        }
    }

    /// Whether width and height trade places.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Quarter | Self::ThreeQuarter)
    }
}

/// Origin and size of a page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Lower-left x.
    pub x: f32,
    /// Lower-left y.
    pub y: f32,
    /// Width, always positive.
    pub width: f32,
    /// Height, always positive.
    pub height: f32,
}

impl Canvas {
    /// Create a canvas, rejecting zero, negative and non-finite sizes.
    ///
    /// # Errors
    ///
    /// Returns [`BatesError::InvalidCanvas`] when the area would be empty.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !(valid(width) && valid(height)) || !x.is_finite() || !y.is_finite() {
            return Err(BatesError::InvalidCanvas { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Canvas of a document page from its `[llx lly urx ury]` media box.
    ///
    /// Corners may be given in any order.
    pub fn from_media_box(media_box: [f32; 4]) -> Result<Self> {
        let [x0, y0, x1, y1] = media_box;
        Self::new(x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
    }

    /// Canvas of a raster image.
    ///
    /// With pixel dimensions available the image is laid out at
    /// [`IMAGE_DPI`]; otherwise the intrinsic size is used as-is.
    pub fn for_image(pixel_dimensions: Option<(u32, u32)>, intrinsic: (f32, f32)) -> Result<Self> {
        let (width, height) = match pixel_dimensions {
            Some((px_wide, px_high)) if px_wide > 0 && px_high > 0 => {
                (pixels_to_points(px_wide), pixels_to_points(px_high))
            }
            _ => intrinsic,
        };
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// The canvas as a viewer shows it after `rotation`.
    ///
    /// A rotated canvas is moved to the origin; an unrotated one is returned
    /// unchanged.
    pub fn rotated(&self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::None => *self,
            _ if rotation.swaps_axes() => Self {
                x: 0.0,
                y: 0.0,
                width: self.height,
                height: self.width,
            },
            _ => Self {
                x: 0.0,
                y: 0.0,
                ..*self
            },
        }
    }

    /// Matrix `[a b c d e f]` mapping this canvas onto
    /// [`rotated`](Self::rotated) with the same `rotation`.
    pub fn rotation_matrix(&self, rotation: Rotation) -> [f32; 6] {
        let (x0, y0, x1, y1) = (self.x, self.y, self.right(), self.top());
        match rotation {
            Rotation::None => [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            Rotation::Quarter => [0.0, -1.0, 1.0, 0.0, -y0, x1],
            Rotation::Half => [-1.0, 0.0, 0.0, -1.0, x1, y1],
            Rotation::ThreeQuarter => [0.0, 1.0, -1.0, 0.0, y1, -x0],
        }
    }

    /// The canvas as a PDF rectangle array.
    pub fn to_media_box(&self) -> Vec<Object> {
        vec![
            Object::Real(self.x),
            Object::Real(self.y),
            Object::Real(self.right()),
            Object::Real(self.top()),
        ]
    }
}

/// Apply `matrix` to the point `(x, y)`.
pub fn transform_point(matrix: [f32; 6], x: f32, y: f32) -> (f32, f32) {
    let [a, b, c, d, e, f] = matrix;
    (a * x + c * y + e, b * x + d * y + f)
}

/// Convert a pixel count at [`IMAGE_DPI`] to points.
pub fn pixels_to_points(pixels: u32) -> f32 {
    pixels as f32 / IMAGE_DPI * POINTS_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some((900, 1200)), (1.0, 1.0), 216.0, 288.0)]
    #[case(Some((2550, 3300)), (1.0, 1.0), 612.0, 792.0)]
    #[case(Some((300, 150)), (1.0, 1.0), 72.0, 36.0)]
    #[case(None, (640.0, 480.0), 640.0, 480.0)]
    #[case(Some((0, 10)), (50.0, 40.0), 50.0, 40.0)]
    fn test_image_canvas(
        #[case] pixels: Option<(u32, u32)>,
        #[case] intrinsic: (f32, f32),
        #[case] width: f32,
        #[case] height: f32,
    ) {
        let canvas = Canvas::for_image(pixels, intrinsic).unwrap();
        assert_eq!(canvas.x, 0.0);
        assert_eq!(canvas.y, 0.0);
        assert!((canvas.width - width).abs() < 1e-3);
        assert!((canvas.height - height).abs() < 1e-3);
    }

    #[test]
    fn test_zero_area_is_rejected() {
        assert!(matches!(
            Canvas::for_image(None, (0.0, 100.0)),
            Err(BatesError::InvalidCanvas { .. })
        ));
        assert!(Canvas::from_media_box([0.0, 0.0, 612.0, 0.0]).is_err());
        assert!(Canvas::new(0.0, 0.0, f32::NAN, 10.0).is_err());
    }

    #[test]
    fn test_media_box_normalization() {
        let canvas = Canvas::from_media_box([612.0, 792.0, 0.0, 0.0]).unwrap();
        assert_eq!(canvas, Canvas::new(0.0, 0.0, 612.0, 792.0).unwrap());

        let offset = Canvas::from_media_box([10.0, 20.0, 110.0, 220.0]).unwrap();
        assert_eq!(offset.right(), 110.0);
        assert_eq!(offset.top(), 220.0);
        assert_eq!(offset.to_media_box().len(), 4);
    }

    #[rstest]
    #[case(0, Rotation::None)]
    #[case(90, Rotation::Quarter)]
    #[case(-270, Rotation::Quarter)]
    #[case(180, Rotation::Half)]
    #[case(630, Rotation::ThreeQuarter)]
    #[case(45, Rotation::None)]
    fn test_rotation_from_degrees(#[case] degrees: i64, #[case] expected: Rotation) {
        assert_eq!(Rotation::from_degrees(degrees), expected);
    }

    #[rstest]
    // Source corner that ends up at the visual bottom-right.
    #[case(Rotation::None, (110.0, 20.0))]
    #[case(Rotation::Quarter, (110.0, 220.0))]
    #[case(Rotation::Half, (10.0, 220.0))]
    #[case(Rotation::ThreeQuarter, (10.0, 20.0))]
    fn test_rotation_matrix_corners(#[case] rotation: Rotation, #[case] corner: (f32, f32)) {
        let canvas = Canvas::from_media_box([10.0, 20.0, 110.0, 220.0]).unwrap();
        let upright = canvas.rotated(rotation);
        let matrix = canvas.rotation_matrix(rotation);

        if rotation == Rotation::None {
            assert_eq!(upright, canvas);
        } else {
            assert_eq!((upright.x, upright.y), (0.0, 0.0));
        }
        let (u, v) = transform_point(matrix, corner.0, corner.1);
        assert!((u - upright.right()).abs() < 1e-3);
        assert!((v - upright.y).abs() < 1e-3);
    }

    #[test]
    fn test_quarter_turn_swaps_size() {
        let letter = Canvas::from_media_box(DEFAULT_MEDIA_BOX).unwrap();
        let upright = letter.rotated(Rotation::Quarter);
        assert_eq!((upright.width, upright.height), (792.0, 612.0));
        assert_eq!(letter.rotated(Rotation::Half), letter);
    }
}
