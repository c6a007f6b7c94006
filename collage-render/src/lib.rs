//! # Collage Render
//!
//! Pixel side of a composite: carries each source object into canvas space
//! with a uniform scale plus translation solved from its reference edge,
//! then pastes it onto the canvas through a polygon mask.

pub mod composite;
pub mod transfer;
pub mod transform;

pub use composite::{composite, polygon_mask, Compositor};
pub use transfer::{transfer, SourceSample, Transferred};
pub use transform::ScaleTranslate;
