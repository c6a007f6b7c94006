use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use collage_core::{Canvas, CollageError, Polygon, SourceOutline};

use crate::error::{IoError, Result};

/// A labelme annotation file.
///
/// Keys this crate does not interpret are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub flags: Map<String, Value>,
    pub shapes: Vec<Shape>,
    /// Image file name, relative to the annotation's folder.
    pub image_path: String,
    /// Base64-encoded image bytes, or `null`.
    #[serde(default)]
    pub image_data: Option<String>,
    pub image_height: u32,
    pub image_width: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One labelme shape. Shape keys are snake_case in the labelme schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub label: String,
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub group_id: Option<Value>,
    #[serde(default = "default_shape_type")]
    pub shape_type: String,
    #[serde(default)]
    pub flags: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_shape_type() -> String {
    "polygon".to_string()
}

impl Shape {
    /// A polygon shape carrying the label, group and flags of `source`.
    pub fn placed_from(source: &Shape, polygon: &Polygon) -> Self {
        Self {
            label: source.label.clone(),
            points: polygon.to_pairs(),
            group_id: source.group_id.clone(),
            shape_type: default_shape_type(),
            flags: source.flags.clone(),
            extra: Map::new(),
        }
    }

    pub fn polygon(&self) -> Polygon {
        Polygon::from_pairs(&self.points)
    }
}

impl Annotation {
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| IoError::io(path, e))?;
        Self::from_json(&json).map_err(|source| IoError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The first shape, which holds the object outline.
    pub fn primary_shape(&self) -> Result<&Shape> {
        match self.shapes.first() {
            Some(shape) if !shape.points.is_empty() => Ok(shape),
            _ => Err(IoError::MissingShape),
        }
    }

    /// The object outline together with the image size it was drawn on.
    pub fn outline(&self) -> Result<SourceOutline> {
        let shape = self.primary_shape()?;
        if self.image_width == 0 || self.image_height == 0 {
            return Err(CollageError::InvalidDimensions {
                width: self.image_width,
                height: self.image_height,
                message: format!("annotation for {} has a zero image size", self.image_path),
            }
            .into());
        }
        Ok(SourceOutline {
            polygon: shape.polygon(),
            image_width: self.image_width,
            image_height: self.image_height,
        })
    }

    /// Location of the annotated image, resolved against `base_dir`.
    pub fn image_file(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.image_path)
    }

    /// Copy of this record describing a composite image instead.
    pub fn for_composite(
        &self,
        shapes: Vec<Shape>,
        image_path: &str,
        canvas: Canvas,
        image_data: String,
    ) -> Self {
        Self {
            shapes,
            image_path: image_path.to_string(),
            image_data: Some(image_data),
            image_height: canvas.height,
            image_width: canvas.width,
            ..self.clone()
        }
    }
}
