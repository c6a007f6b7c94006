use imageproc::geometric_transformations::Projection;
use serde::{Deserialize, Serialize};

use collage_core::{CollageError, Point, Polygon, Result};

/// Uniform scale about the origin followed by a translation.
///
/// Maps `p` to `p * scale + (move_x, move_y)`. No rotation or shear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleTranslate {
    pub scale: f64,
    pub move_x: f64,
    pub move_y: f64,
}

impl ScaleTranslate {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            move_x: 0.0,
            move_y: 0.0,
        }
    }

    /// Solve the transform that carries the reference edge (vertex 0 to
    /// vertex 1) of `source` onto the length of the reference edge of
    /// `target`, anchored so that source vertex 0 lands on target vertex 0.
    pub fn from_reference_edges(source: &Polygon, target: &Polygon) -> Result<Self> {
        let (s0, s1) = source.reference_edge()?;
        let (t0, t1) = target.reference_edge()?;

        let source_len = s0.distance_to(&s1);
        let target_len = t0.distance_to(&t1);
        if source_len <= f64::EPSILON {
            return Err(CollageError::InvalidGeometry(
                "source reference edge has zero length".to_string(),
            ));
        }
        if target_len <= f64::EPSILON {
            return Err(CollageError::InvalidGeometry(
                "target reference edge has zero length".to_string(),
            ));
        }

        let scale = target_len / source_len;
        Ok(Self {
            scale,
            move_x: t0.x - s0.x * scale,
            move_y: t0.y - s0.y * scale,
        })
    }

    pub fn apply(&self, point: &Point) -> Point {
        Point::new(
            point.x * self.scale + self.move_x,
            point.y * self.scale + self.move_y,
        )
    }

    pub fn apply_polygon(&self, polygon: &Polygon) -> Polygon {
        Polygon::new(polygon.vertices.iter().map(|p| self.apply(p)).collect())
    }

    /// Row-major 3x3 matrix for image warping. `None` when the scale is not
    /// invertible.
    pub fn to_projection(&self) -> Option<Projection> {
        let s = self.scale as f32;
        Projection::from_matrix([
            s,
            0.0,
            self.move_x as f32,
            0.0,
            s,
            self.move_y as f32,
            0.0,
            0.0,
            1.0,
        ])
    }
}

impl Default for ScaleTranslate {
    fn default() -> Self {
        Self::identity()
    }
}
