use std::path::{Path, PathBuf};

use image::RgbImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use collage_core::{layout, normalize_batch, CollageError, LayoutConfig};
use collage_io::{write_composite, AnnotatedImage, IoError, Shape, SourceDataset};
use collage_render::{Compositor, SourceSample};

/// Settings for one batch of composites.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub samples: usize,
    pub min_objects: usize,
    pub max_objects: usize,
    pub dataname: String,
    pub seed: u64,
    pub quality: u8,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub written: usize,
    pub failed: usize,
}

/// Why a single composite was abandoned.
#[derive(Error, Debug)]
pub enum SampleError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Collage(#[from] CollageError),

    #[error("No background images to draw from")]
    NoBackground,
}

/// Output stem for the 1-based sample `index`, e.g. `merge_00001`.
pub fn sample_name(dataname: &str, index: usize) -> String {
    format!("{}_{:05}", dataname, index)
}

/// Independent generator per sample so results do not depend on which
/// thread picks up which sample.
fn sample_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Generate `config.samples` composites into `out_dir`.
///
/// Samples run in parallel. A sample that fails is logged and skipped; the
/// others are unaffected.
pub fn run_batch(
    dataset: &SourceDataset,
    backgrounds: &[RgbImage],
    out_dir: &Path,
    config: &BatchConfig,
) -> BatchReport {
    let results: Vec<(usize, Result<PathBuf, SampleError>)> = (1..=config.samples)
        .into_par_iter()
        .map(|index| (index, generate_sample(index, dataset, backgrounds, out_dir, config)))
        .collect();

    let mut report = BatchReport::default();
    for (index, result) in results {
        match result {
            Ok(_) => report.written += 1,
            Err(e) => {
                log::warn!("Skipping {}: {}", sample_name(&config.dataname, index), e);
                report.failed += 1;
            }
        }
    }
    log::info!(
        "Batch finished: {} written, {} skipped",
        report.written,
        report.failed
    );
    report
}

/// Build and write one composite. Returns the path of the written annotation.
pub fn generate_sample(
    index: usize,
    dataset: &SourceDataset,
    backgrounds: &[RgbImage],
    out_dir: &Path,
    config: &BatchConfig,
) -> Result<PathBuf, SampleError> {
    let mut rng = sample_rng(config.seed, index);
    let name = sample_name(&config.dataname, index);

    let count = rng.gen_range(config.min_objects..=config.max_objects.max(config.min_objects));
    let objects: Vec<AnnotatedImage> = dataset
        .sample(count, &mut rng)
        .into_iter()
        .map(|path| dataset.load(path))
        .collect::<Result<_, _>>()?;

    let outlines = objects
        .iter()
        .map(AnnotatedImage::outline)
        .collect::<Result<Vec<_>, _>>()?;
    let (polygons, initial) = normalize_batch(&outlines)?;
    let placed = layout(&polygons, initial, &config.layout, &mut rng)?;
    log::debug!(
        "{}: {} objects on {}x{} ({} growth rounds)",
        name,
        objects.len(),
        placed.canvas.width,
        placed.canvas.height,
        placed.growth_rounds
    );

    let background = backgrounds
        .choose(&mut rng)
        .ok_or(SampleError::NoBackground)?;
    let mut compositor = Compositor::new(background, placed.canvas)?;

    let mut source_shapes = Vec::with_capacity(objects.len());
    let mut template = None;
    for (object, target) in objects.into_iter().zip(&placed.polygons) {
        let shape = object.shape()?.clone();
        let sample = SourceSample::new(object.image, shape.polygon());
        compositor.add(&sample, target)?;
        source_shapes.push(shape);
        template = Some(object.annotation);
    }
    // normalize_batch rejects empty batches, so at least one object was added.
    let template = template.ok_or(IoError::MissingShape)?;

    let (image, final_polygons) = compositor.finish();
    let shapes = source_shapes
        .iter()
        .zip(&final_polygons)
        .map(|(source, polygon)| Shape::placed_from(source, polygon))
        .collect();

    let (_, json_path) = write_composite(out_dir, &name, &image, &template, shapes, config.quality)?;
    log::info!(
        "Wrote {} ({} objects, {}x{})",
        name,
        final_polygons.len(),
        image.width(),
        image.height()
    );
    Ok(json_path)
}
