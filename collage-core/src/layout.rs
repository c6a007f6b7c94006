use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::error::{CollageError, Result};
use crate::geometry::Polygon;
use crate::placement::{place, DEFAULT_MAX_ATTEMPTS};
use crate::retry::attempt;
use crate::spatial::PlacedSet;

/// Tuning knobs for one layout run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Random positions tried per polygon before the canvas grows.
    pub max_attempts: u32,
    /// Multiplier applied to both canvas sides on each growth round.
    pub growth_factor: f64,
    /// Growth rounds allowed across the whole run.
    pub max_growth_rounds: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            growth_factor: 1.2,
            max_growth_rounds: 20,
        }
    }
}

/// Result of a layout run: placed polygons in input order and the final canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub polygons: Vec<Polygon>,
    pub canvas: Canvas,
    pub growth_rounds: u32,
}

/// Place every polygon without overlap, growing the canvas when one does not fit.
///
/// Polygons are placed in input order. A failed placement multiplies both
/// canvas sides by `config.growth_factor` and retries the same polygon
/// against the same placed set; earlier placements stay valid because the
/// canvas only grows away from the origin.
pub fn layout<R: Rng + ?Sized>(
    polygons: &[Polygon],
    initial: Canvas,
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<Layout> {
    if let Some(index) = polygons.iter().position(Polygon::is_empty) {
        return Err(CollageError::InvalidGeometry(format!(
            "polygon {} has no vertices",
            index
        )));
    }

    let mut canvas = initial;
    let mut growth_rounds = 0u32;
    let mut placed = PlacedSet::new();

    for (index, polygon) in polygons.iter().enumerate() {
        let remaining = config.max_growth_rounds.saturating_sub(growth_rounds);
        let result = attempt(remaining.saturating_add(1), |try_index| {
            if try_index > 0 {
                canvas = canvas.grown(config.growth_factor);
                growth_rounds += 1;
                log::debug!(
                    "polygon {}: canvas grown to {}x{}",
                    index,
                    canvas.width,
                    canvas.height
                );
            }
            place(polygon, &placed, canvas, config.max_attempts, rng)
        });

        match result {
            Ok(accepted) => placed.push(accepted),
            Err(exhausted) => {
                return Err(match exhausted.last {
                    CollageError::PlacementFailed { .. } => CollageError::LayoutUnbounded {
                        rounds: growth_rounds,
                        width: canvas.width,
                        height: canvas.height,
                    },
                    other => other,
                });
            }
        }
    }

    log::debug!(
        "laid out {} polygons on {}x{} after {} growth rounds",
        placed.len(),
        canvas.width,
        canvas.height,
        growth_rounds
    );

    Ok(Layout {
        polygons: placed.into_polygons(),
        canvas,
        growth_rounds,
    })
}

/// One annotated object as read from its source image.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutline {
    pub polygon: Polygon,
    pub image_width: u32,
    pub image_height: u32,
}

/// Bring outlines from images of different resolutions to a common scale
/// and estimate a starting canvas.
///
/// Each polygon is divided by its own image size and multiplied by the
/// largest width and height in the batch. The initial canvas has the area
/// of one largest image per object and the aspect ratio of the largest sides.
pub fn normalize_batch(outlines: &[SourceOutline]) -> Result<(Vec<Polygon>, Canvas)> {
    if outlines.is_empty() {
        return Err(CollageError::InvalidGeometry(
            "cannot lay out an empty batch".to_string(),
        ));
    }
    if let Some(bad) = outlines
        .iter()
        .find(|o| o.image_width == 0 || o.image_height == 0)
    {
        return Err(CollageError::InvalidDimensions {
            width: bad.image_width,
            height: bad.image_height,
            message: "source image has a zero dimension".to_string(),
        });
    }

    let max_w = outlines.iter().map(|o| o.image_width).max().unwrap_or(1);
    let max_h = outlines.iter().map(|o| o.image_height).max().unwrap_or(1);

    let polygons = outlines
        .iter()
        .map(|o| {
            o.polygon.scaled(
                max_w as f64 / o.image_width as f64,
                max_h as f64 / o.image_height as f64,
            )
        })
        .collect();

    let area = max_w as f64 * max_h as f64 * outlines.len() as f64;
    let width = area.sqrt().floor();
    let height = (max_h as f64 / max_w as f64 * width).floor();

    Ok((polygons, Canvas::new(width as u32, height as u32)))
}
