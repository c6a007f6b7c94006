//! # Collage I/O
//!
//! labelme annotation records, the source folder of annotated single-object
//! images, background images, and writing composite JPEG + annotation pairs
//! with the image embedded as base64.

pub mod annotation;
pub mod dataset;
pub mod error;
pub mod imagery;

pub use annotation::{Annotation, Shape};
pub use dataset::{write_composite, AnnotatedImage, SourceDataset};
pub use error::{IoError, Result};
pub use imagery::{encode_base64, encode_jpeg, load_backgrounds, load_rgb};
