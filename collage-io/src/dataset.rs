use std::path::{Path, PathBuf};

use image::RgbImage;
use rand::Rng;

use collage_core::{Canvas, SourceOutline};

use crate::annotation::{Annotation, Shape};
use crate::error::{IoError, Result};
use crate::imagery::{encode_base64, encode_jpeg, load_rgb, sorted_files};

/// A folder of labelme annotations, each pointing at its source image.
#[derive(Debug, Clone)]
pub struct SourceDataset {
    root: PathBuf,
    annotations: Vec<PathBuf>,
}

/// An annotation loaded together with its decoded image.
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    pub path: PathBuf,
    pub annotation: Annotation,
    pub image: RgbImage,
}

impl AnnotatedImage {
    pub fn outline(&self) -> Result<SourceOutline> {
        self.annotation.outline()
    }

    pub fn shape(&self) -> Result<&Shape> {
        self.annotation.primary_shape()
    }
}

impl SourceDataset {
    /// Index every `.json` file directly inside `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let annotations: Vec<PathBuf> = sorted_files(root)?
            .into_iter()
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
            })
            .collect();
        if annotations.is_empty() {
            return Err(IoError::EmptyDirectory {
                kind: "annotation files",
                dir: root.to_path_buf(),
            });
        }
        log::info!(
            "Found {} annotation files in {}",
            annotations.len(),
            root.display()
        );
        Ok(Self {
            root: root.to_path_buf(),
            annotations,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn annotations(&self) -> &[PathBuf] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Pick `count` annotation files uniformly with replacement.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&Path> {
        if self.annotations.is_empty() {
            return Vec::new();
        }
        (0..count)
            .map(|_| self.annotations[rng.gen_range(0..self.annotations.len())].as_path())
            .collect()
    }

    /// Read an annotation and decode the image it refers to.
    pub fn load(&self, path: &Path) -> Result<AnnotatedImage> {
        let annotation = Annotation::from_path(path)?;
        annotation.primary_shape()?;
        let image = load_rgb(&annotation.image_file(&self.root))?;
        Ok(AnnotatedImage {
            path: path.to_path_buf(),
            annotation,
            image,
        })
    }
}

/// Encode `image` once and write it as `<name>.jpg` next to `<name>.json`,
/// embedding the same JPEG bytes in the annotation.
///
/// `template` supplies every annotation key other than the shapes and the
/// image fields.
pub fn write_composite(
    out_dir: &Path,
    name: &str,
    image: &RgbImage,
    template: &Annotation,
    shapes: Vec<Shape>,
    quality: u8,
) -> Result<(PathBuf, PathBuf)> {
    let jpeg = encode_jpeg(image, quality)?;
    let image_name = format!("{}.jpg", name);
    let canvas = Canvas::new(image.width(), image.height());
    let annotation = template.for_composite(shapes, &image_name, canvas, encode_base64(&jpeg));

    let image_path = out_dir.join(&image_name);
    std::fs::write(&image_path, &jpeg).map_err(|e| IoError::io(&image_path, e))?;

    let json_path = out_dir.join(format!("{}.json", name));
    let json = annotation.to_json()?;
    std::fs::write(&json_path, json).map_err(|e| IoError::io(&json_path, e))?;

    log::debug!("Wrote {} and {}", image_path.display(), json_path.display());
    Ok((image_path, json_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use collage_core::Polygon;
    use image::Rgb;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn write_source(dir: &Path, stem: &str, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([90, 160, 30]))
            .save(dir.join(format!("{stem}.png")))
            .unwrap();
        let json = serde_json::json!({
            "version": "5.0.1",
            "flags": {},
            "shapes": [{
                "label": stem,
                "points": [[1.0, 1.0], [6.0, 1.0], [6.0, 5.0], [1.0, 5.0]],
                "group_id": null,
                "shape_type": "polygon",
                "flags": {}
            }],
            "imagePath": format!("{stem}.png"),
            "imageData": null,
            "imageHeight": height,
            "imageWidth": width
        });
        std::fs::write(dir.join(format!("{stem}.json")), json.to_string()).unwrap();
    }

    #[test]
    fn test_open_lists_only_json_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "b", 8, 8);
        write_source(dir.path(), "a", 8, 8);

        let dataset = SourceDataset::open(dir.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        let names: Vec<_> = dataset
            .annotations()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_empty_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SourceDataset::open(dir.path()),
            Err(IoError::EmptyDirectory { .. })
        ));
    }

    #[test]
    fn test_sample_with_replacement_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "only", 8, 8);
        let dataset = SourceDataset::open(dir.path()).unwrap();

        let picks = dataset.sample(5, &mut StdRng::seed_from_u64(1));
        assert_eq!(picks.len(), 5);
        assert!(picks.iter().all(|p| p.ends_with("only.json")));
    }

    #[test]
    fn test_load_resolves_image_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "obj", 12, 10);
        let dataset = SourceDataset::open(dir.path()).unwrap();

        let loaded = dataset.load(&dataset.annotations()[0]).unwrap();
        assert_eq!(loaded.image.dimensions(), (12, 10));
        assert_eq!(loaded.outline().unwrap().polygon.vertex_count(), 4);
        assert_eq!(loaded.shape().unwrap().label, "obj");
    }

    #[test]
    fn test_load_fails_when_image_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "obj", 12, 10);
        std::fs::remove_file(dir.path().join("obj.png")).unwrap();
        let dataset = SourceDataset::open(dir.path()).unwrap();
        assert!(matches!(
            dataset.load(&dataset.annotations()[0]),
            Err(IoError::Image { .. })
        ));
    }

    #[test]
    fn test_write_composite_emits_jpeg_and_labelme() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "src", 8, 8);
        let template = Annotation::from_path(&dir.path().join("src.json")).unwrap();
        let shape = Shape::placed_from(
            &template.shapes[0],
            &Polygon::from_pairs(&[[2.0, 2.0], [9.0, 2.0], [9.0, 7.0]]),
        );

        let out = tempfile::tempdir().unwrap();
        let image = RgbImage::from_pixel(30, 20, Rgb([10, 20, 30]));
        let (jpg, json) =
            write_composite(out.path(), "merge_00001", &image, &template, vec![shape], 90).unwrap();

        assert!(jpg.ends_with("merge_00001.jpg"));
        let written = Annotation::from_path(&json).unwrap();
        assert_eq!(written.image_path, "merge_00001.jpg");
        assert_eq!((written.image_width, written.image_height), (30, 20));
        assert_eq!(written.shapes.len(), 1);
        assert_eq!(written.shapes[0].label, "src");
        let embedded = written.image_data.unwrap();
        assert_eq!(embedded, encode_base64(&std::fs::read(&jpg).unwrap()));
    }
}
