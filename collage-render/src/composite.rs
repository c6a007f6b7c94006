use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;

use collage_core::{Canvas, CollageError, Polygon, Result};

use crate::transfer::{transfer, SourceSample};

const MASK_ON: Luma<u8> = Luma([255]);

/// Rasterize `polygon` into a `width` x `height` mask: 255 inside and on
/// the boundary, 0 elsewhere. Vertices are rounded to whole pixels and
/// anything outside the mask is clipped.
pub fn polygon_mask(polygon: &Polygon, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    let mut points: Vec<PixelPoint<i32>> = Vec::with_capacity(polygon.vertex_count());
    for p in &polygon.vertices {
        let point = PixelPoint::new(p.x.round() as i32, p.y.round() as i32);
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    // The fill routine rejects an explicitly closed loop.
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    match points.as_slice() {
        [] => {}
        [p] => {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
                mask.put_pixel(p.x as u32, p.y as u32, MASK_ON);
            }
        }
        [a, b] => draw_line_segment_mut(
            &mut mask,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            MASK_ON,
        ),
        _ => draw_polygon_mut(&mut mask, &points, MASK_ON),
    }
    mask
}

/// Copy the pixels of `warped` that fall inside `polygon` onto `canvas`.
pub fn composite(warped: &RgbImage, canvas: &mut RgbImage, polygon: &Polygon) -> Result<()> {
    if warped.dimensions() != canvas.dimensions() {
        let (width, height) = warped.dimensions();
        return Err(CollageError::InvalidDimensions {
            width,
            height,
            message: format!(
                "warped image does not match the {}x{} canvas",
                canvas.width(),
                canvas.height()
            ),
        });
    }

    let mask = polygon_mask(polygon, canvas.width(), canvas.height());
    for (x, y, value) in mask.enumerate_pixels() {
        if value.0[0] > 0 {
            canvas.put_pixel(x, y, *warped.get_pixel(x, y));
        }
    }
    Ok(())
}

/// Owns the canvas buffer of one composite while objects are added to it.
///
/// Objects are pasted in the order they are added, so a later object
/// covers an earlier one where their outlines overlap.
#[derive(Debug)]
pub struct Compositor {
    size: Canvas,
    canvas: RgbImage,
    polygons: Vec<Polygon>,
}

impl Compositor {
    /// Start from `background` stretched to the canvas size.
    pub fn new(background: &RgbImage, size: Canvas) -> Result<Self> {
        if size.is_empty() {
            return Err(CollageError::InvalidDimensions {
                width: size.width,
                height: size.height,
                message: "canvas is empty".to_string(),
            });
        }
        let (bg_w, bg_h) = background.dimensions();
        if bg_w == 0 || bg_h == 0 {
            return Err(CollageError::InvalidDimensions {
                width: bg_w,
                height: bg_h,
                message: "background image is empty".to_string(),
            });
        }
        let canvas = imageops::resize(background, size.width, size.height, FilterType::Triangle);
        Ok(Self {
            size,
            canvas,
            polygons: Vec::new(),
        })
    }

    /// Transfer `sample` onto its assigned `target` and paste it.
    /// Returns the outline of the pasted object.
    pub fn add(&mut self, sample: &SourceSample, target: &Polygon) -> Result<&Polygon> {
        let transferred = transfer(sample, target, self.size)?;
        composite(&transferred.image, &mut self.canvas, &transferred.polygon)?;
        self.polygons.push(transferred.polygon);
        Ok(&self.polygons[self.polygons.len() - 1])
    }

    pub fn size(&self) -> Canvas {
        self.size
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn finish(self) -> (RgbImage, Vec<Polygon>) {
        (self.canvas, self.polygons)
    }
}
