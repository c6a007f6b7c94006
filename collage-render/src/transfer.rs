use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp, Interpolation};

use collage_core::{Canvas, CollageError, Polygon, Result};

use crate::transform::ScaleTranslate;

/// One annotated object: its full source image and outline in that
/// image's pixel space.
#[derive(Debug, Clone)]
pub struct SourceSample {
    pub image: RgbImage,
    pub polygon: Polygon,
}

impl SourceSample {
    pub fn new(image: RgbImage, polygon: Polygon) -> Self {
        Self { image, polygon }
    }
}

/// A source image warped into canvas space.
#[derive(Debug, Clone)]
pub struct Transferred {
    /// Canvas-sized image; pixels with no source pre-image are black.
    pub image: RgbImage,
    /// Outline consistent with the warped pixels, in whole pixels.
    pub polygon: Polygon,
    pub transform: ScaleTranslate,
}

/// Warp `sample` so that its reference edge matches the scale of `target`
/// and its first vertex lands on the first vertex of `target`.
///
/// The source image and outline are first stretched to canvas size. The
/// returned polygon is the source outline pushed through the same transform
/// as the pixels, which may differ from `target` by rounding.
pub fn transfer(sample: &SourceSample, target: &Polygon, canvas: Canvas) -> Result<Transferred> {
    let (src_w, src_h) = sample.image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(CollageError::InvalidDimensions {
            width: src_w,
            height: src_h,
            message: "source image is empty".to_string(),
        });
    }
    if canvas.is_empty() {
        return Err(CollageError::InvalidDimensions {
            width: canvas.width,
            height: canvas.height,
            message: "canvas is empty".to_string(),
        });
    }

    let rescaled = sample.polygon.scaled(
        canvas.width as f64 / src_w as f64,
        canvas.height as f64 / src_h as f64,
    );
    let transform = ScaleTranslate::from_reference_edges(&rescaled, target)?;
    let projection = transform.to_projection().ok_or_else(|| {
        CollageError::InvalidGeometry(format!("scale {} is not invertible", transform.scale))
    })?;

    let resized = if (src_w, src_h) == (canvas.width, canvas.height) {
        sample.image.clone()
    } else {
        imageops::resize(&sample.image, canvas.width, canvas.height, FilterType::Triangle)
    };
    let image = warp(&resized, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]));
    let polygon = transform.apply_polygon(&rescaled).rounded();

    log::trace!(
        "transfer scale={:.4} move=({:.1}, {:.1})",
        transform.scale,
        transform.move_x,
        transform.move_y
    );

    Ok(Transferred {
        image,
        polygon,
        transform,
    })
}
