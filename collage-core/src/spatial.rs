use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{intersects, BBox, Polygon};

/// An entry in the R-tree, referencing a placed polygon by its index.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    /// Index into the placed polygon vector.
    pub polygon_index: usize,
    /// Bounding box of the polygon.
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        bbox_envelope(&self.bbox)
    }
}

fn bbox_envelope(bbox: &BBox) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.min.x, bbox.min.y], [bbox.max.x, bbox.max.y])
}

/// Polygons already committed to canvas coordinates during one layout run.
///
/// Append-only. The R-tree narrows collision checks to polygons whose
/// bounding boxes overlap the candidate before the exact polygon test runs.
#[derive(Debug, Default)]
pub struct PlacedSet {
    polygons: Vec<Polygon>,
    tree: RTree<SpatialEntry>,
}

impl PlacedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a polygon. Empty polygons are kept in order but never collide.
    pub fn push(&mut self, polygon: Polygon) {
        if let Some(bbox) = polygon.bbox() {
            self.tree.insert(SpatialEntry {
                polygon_index: self.polygons.len(),
                bbox,
            });
        }
        self.polygons.push(polygon);
    }

    /// True when `candidate` intersects any placed polygon.
    pub fn collides(&self, candidate: &Polygon) -> bool {
        let Some(bbox) = candidate.bbox() else {
            return false;
        };
        self.tree
            .locate_in_envelope_intersecting(&bbox_envelope(&bbox))
            .any(|entry| intersects(candidate, &self.polygons[entry.polygon_index]))
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

impl FromIterator<Polygon> for PlacedSet {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        let mut set = Self::new();
        for polygon in iter {
            set.push(polygon);
        }
        set
    }
}
