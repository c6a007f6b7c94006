use serde::{Deserialize, Serialize};

use crate::error::{CollageError, Result};

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Closed-interval overlap: boxes sharing an edge intersect.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// A polygon defined by an ordered list of vertices.
///
/// Vertices 0 and 1 form the reference edge used by image transfer. The
/// closing edge from the last vertex back to the first is implied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn from_pairs(pairs: &[[f64; 2]]) -> Self {
        Self::new(pairs.iter().copied().map(Point::from).collect())
    }

    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.vertices.iter().map(|p| [p.x, p.y]).collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.vertices)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.vertices.iter().map(|p| p.translate(dx, dy)).collect())
    }

    /// Multiply x and y coordinates by independent factors.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::new(
            self.vertices
                .iter()
                .map(|p| Point::new(p.x * sx, p.y * sy))
                .collect(),
        )
    }

    /// Round every coordinate to the nearest integer pixel.
    pub fn rounded(&self) -> Self {
        Self::new(
            self.vertices
                .iter()
                .map(|p| Point::new(p.x.round(), p.y.round()))
                .collect(),
        )
    }

    /// Translate so the bounding box minimum sits at the origin.
    pub fn normalized(&self) -> Result<Self> {
        let bbox = self.bbox().ok_or_else(empty_polygon)?;
        Ok(self.translate(-bbox.min.x, -bbox.min.y))
    }

    /// The edge from vertex 0 to vertex 1.
    pub fn reference_edge(&self) -> Result<(Point, Point)> {
        match self.vertices.as_slice() {
            [a, b, ..] => Ok((*a, *b)),
            _ => Err(CollageError::InvalidGeometry(format!(
                "reference edge needs at least 2 vertices, got {}",
                self.vertices.len()
            ))),
        }
    }

    /// Closed edge loop. A single vertex yields one zero-length edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Even-odd ray casting. Degenerate polygons contain nothing.
    pub fn contains_point(&self, point: &Point) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > point.y) != (vj.y > point.y)
                && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

fn empty_polygon() -> CollageError {
    CollageError::InvalidGeometry("polygon has no vertices".to_string())
}

/// Width and height of the polygon's bounding box.
pub fn bounding_extent(polygon: &Polygon) -> Result<(f64, f64)> {
    let bbox = polygon.bbox().ok_or_else(empty_polygon)?;
    Ok((bbox.width(), bbox.height()))
}

pub fn translate(polygon: &Polygon, dx: f64, dy: f64) -> Polygon {
    polygon.translate(dx, dy)
}

/// True when the two polygons share any interior or boundary point.
///
/// Touching edges count as an intersection. Empty polygons intersect nothing.
pub fn intersects(a: &Polygon, b: &Polygon) -> bool {
    let (Some(box_a), Some(box_b)) = (a.bbox(), b.bbox()) else {
        return false;
    };
    if !box_a.intersects(&box_b) {
        return false;
    }

    for (p1, p2) in a.edges() {
        for (q1, q2) in b.edges() {
            if segments_intersect(p1, p2, q1, q2) {
                return true;
            }
        }
    }

    // No boundary crossing: either disjoint or one fully inside the other.
    b.contains_point(&a.vertices[0]) || a.contains_point(&b.vertices[0])
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// `p` lies within the bounding box of segment `a`-`b` (collinearity assumed).
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed segment intersection, endpoints and collinear overlap included.
fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}
