//! # Collage Core
//!
//! Polygon geometry, collision-free random placement and a growable-canvas
//! layout loop. Given the outlines of several annotated objects, computes
//! non-overlapping positions for all of them on one composite canvas.
//!
//! Randomness is always passed in explicitly so that runs can be replayed
//! from a seed.

pub mod canvas;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod placement;
pub mod retry;
pub mod spatial;

pub use canvas::Canvas;
pub use error::{CollageError, Result};
pub use geometry::{bounding_extent, intersects, translate, BBox, Point, Polygon};
pub use layout::{layout, normalize_batch, Layout, LayoutConfig, SourceOutline};
pub use placement::place;
pub use spatial::PlacedSet;
