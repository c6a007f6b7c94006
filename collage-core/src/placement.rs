use rand::Rng;

use crate::canvas::Canvas;
use crate::error::{CollageError, Result};
use crate::geometry::{bounding_extent, Polygon};
use crate::retry::attempt;
use crate::spatial::PlacedSet;

/// Candidate positions sampled before a placement gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Find a random collision-free position for `polygon` on `canvas`.
///
/// The polygon is first moved so its bounding box starts at the origin,
/// then shifted by a uniformly sampled integer offset that keeps the
/// bounding box strictly inside `[0, width) x [0, height)`. Up to
/// `max_attempts` offsets are tried against `existing`.
///
/// Fails with [`CollageError::PlacementFailed`] when the polygon is at least
/// as large as the canvas in either dimension (with `attempts == 0`), or
/// when every sampled position collides.
pub fn place<R: Rng + ?Sized>(
    polygon: &Polygon,
    existing: &PlacedSet,
    canvas: Canvas,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Polygon> {
    let normalized = polygon.normalized()?;
    let (poly_w, poly_h) = bounding_extent(&normalized)?;

    let free_w = canvas.width as f64 - poly_w;
    let free_h = canvas.height as f64 - poly_h;
    if free_w <= 0.0 || free_h <= 0.0 {
        return Err(CollageError::PlacementFailed {
            attempts: 0,
            width: canvas.width,
            height: canvas.height,
        });
    }

    // x < ceil(free_w) as an integer implies x < free_w, so the fit holds.
    let span_x = free_w.ceil() as u32;
    let span_y = free_h.ceil() as u32;
    let mut sample = |rng: &mut R| {
        let x = rng.gen_range(0..span_x);
        let y = rng.gen_range(0..span_y);
        normalized.translate(x as f64, y as f64)
    };

    if existing.is_empty() {
        return Ok(sample(rng));
    }

    attempt(max_attempts, |index| {
        let candidate = sample(rng);
        if existing.collides(&candidate) {
            log::trace!("placement attempt {} collided", index + 1);
            Err(())
        } else {
            Ok(candidate)
        }
    })
    .map_err(|exhausted| CollageError::PlacementFailed {
        attempts: exhausted.attempts,
        width: canvas.width,
        height: canvas.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::intersects;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::from_pairs(&[[x, y], [x + size, y], [x + size, y + size], [x, y + size]])
    }

    #[test]
    fn test_placed_polygon_fits_canvas() {
        let mut rng = StdRng::seed_from_u64(7);
        let poly = Polygon::from_pairs(&[[100.0, 40.0], [130.5, 45.0], [112.0, 77.25]]);
        let canvas = Canvas::new(64, 48);
        for _ in 0..200 {
            let placed = place(&poly, &PlacedSet::new(), canvas, 50, &mut rng).unwrap();
            let bbox = placed.bbox().unwrap();
            assert!(bbox.min.x >= 0.0 && bbox.min.y >= 0.0);
            assert!(bbox.max.x < canvas.width as f64);
            assert!(bbox.max.y < canvas.height as f64);
        }
    }

    #[test]
    fn test_shape_is_preserved() {
        let mut rng = StdRng::seed_from_u64(3);
        let poly = Polygon::from_pairs(&[[5.0, 5.0], [9.0, 5.0], [7.0, 8.0]]);
        let placed = place(&poly, &PlacedSet::new(), Canvas::new(100, 100), 50, &mut rng).unwrap();
        let dx = placed.vertices[0].x - 5.0;
        let dy = placed.vertices[0].y - 5.0;
        assert_eq!(placed, poly.translate(dx, dy));
        assert_eq!(dx.fract(), 0.0);
        assert_eq!(dy.fract(), 0.0);
    }

    #[test]
    fn test_too_large_fails_without_sampling() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = place(&square(0.0, 0.0, 20.0), &PlacedSet::new(), Canvas::new(10, 10), 50, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            CollageError::PlacementFailed {
                attempts: 0,
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn test_exact_fit_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = place(&square(0.0, 0.0, 10.0), &PlacedSet::new(), Canvas::new(10, 30), 50, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_crowded_canvas_gives_up_after_max_attempts() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut existing = PlacedSet::new();
        existing.push(square(0.0, 0.0, 30.0));
        let err = place(&square(0.0, 0.0, 2.0), &existing, Canvas::new(20, 20), 50, &mut rng)
            .unwrap_err();
        assert!(matches!(err, CollageError::PlacementFailed { attempts: 50, .. }));
    }

    #[test]
    fn test_avoids_existing_polygons() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut existing = PlacedSet::new();
        existing.push(square(0.0, 0.0, 40.0));
        for _ in 0..50 {
            let placed = place(&square(0.0, 0.0, 5.0), &existing, Canvas::new(100, 100), 50, &mut rng)
                .unwrap();
            assert!(!intersects(&placed, &existing.polygons()[0]));
        }
        assert_eq!(existing.len(), 1);
    }

    #[test]
    fn test_same_seed_same_position() {
        let poly = square(3.0, 3.0, 4.0);
        let canvas = Canvas::new(500, 500);
        let a = place(&poly, &PlacedSet::new(), canvas, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = place(&poly, &PlacedSet::new(), canvas, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
