//! End-to-end corpus generation.
//!
//! A run loads every background and foreground, tiles the backgrounds,
//! expands foregrounds into one candidate pool, and writes one composite per
//! orientation of every tile:
//!
//! ```text
//! backgrounds --tile--> tiles --orbit--> frames --compose--> <id>.png + <id>.xml
//! foregrounds --orbit--> pool ----------------------^
//! ```
//!
//! Everything runs on one thread with one seeded random source, so the same
//! inputs and seed produce the same corpus.

mod plan;
mod report;
mod sources;

pub use plan::plan_run;
pub use report::{GenerationReport, RunPlan};
pub use sources::{list_source_files, load_image, probe_dimensions, OutputCounter};

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::augment::{orbit, split_background, Compositor, ORBIT_SIZE};
use crate::config::GeneratorConfig;
use crate::error::SynthError;
use crate::ir::io_voc_xml::{write_voc_xml, VOC_XML_EXTENSION};
use crate::ir::{CompositeImage, RasterImage};

/// Run the whole pipeline described by `config`.
///
/// Any failure aborts the run; pairs already written stay on disk.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport, SynthError> {
    config.validate()?;

    let background_paths = list_source_files(&config.backgrounds)?;
    let foreground_paths = list_source_files(&config.foregrounds)?;

    let tiles = load_tiles(&background_paths, config.tile_size)?;
    info!(
        "Backgrounds sliced: {} background(s) -> {} tile(s)",
        background_paths.len(),
        tiles.len()
    );

    let pool = load_pool(&foreground_paths, config.tile_size)?;
    info!(
        "Foreground images generated: {} foreground(s) -> {} candidate(s)",
        foreground_paths.len(),
        pool.len()
    );

    for dir in [&config.output, &config.annotations] {
        fs::create_dir_all(dir).map_err(|source| SynthError::OutputDir {
            path: dir.clone(),
            source,
        })?;
    }

    let mut counter = OutputCounter::from_dir(&config.output)?;
    let mut report = GenerationReport {
        seed: config.seed,
        tile_size: config.tile_size,
        backgrounds: background_paths.len(),
        tiles: tiles.len(),
        foregrounds: foreground_paths.len(),
        pool_size: pool.len(),
        first_id: counter.peek(),
        ..Default::default()
    };

    let compositor = Compositor::new(&pool, &config.distribution)?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    info!("Compositing started at id {}", counter.peek());
    for tile in tiles {
        // One tile's orbit at a time; the tile and its frames drop here.
        for frame in orbit(&tile) {
            let composite = compositor.compose(&frame, &mut rng)?;
            let id = counter.next_id();
            persist(config, id, &composite)?;
            debug!("Wrote composite {} with {} object(s)", id, composite.boxes.len());
            report.record(composite.boxes.len());
        }
    }

    info!("Done: {} composite(s) written", report.composites);
    Ok(report)
}

/// Paths a composite with `id` is written to: `(image, annotation)`.
pub fn output_paths(config: &GeneratorConfig, id: u64) -> (PathBuf, PathBuf) {
    (
        config.output.join(format!("{id}.png")),
        config
            .annotations
            .join(format!("{id}.{VOC_XML_EXTENSION}")),
    )
}

fn persist(config: &GeneratorConfig, id: u64, composite: &CompositeImage) -> Result<(), SynthError> {
    let (image_path, xml_path) = output_paths(config, id);

    composite
        .image
        .save_with_format(&image_path, ImageFormat::Png)
        .map_err(|source| SynthError::ImageWrite {
            path: image_path.clone(),
            source,
        })?;

    let doc = composite.annotation(id.to_string(), config.label.as_str());
    write_voc_xml(&xml_path, &doc)
}

/// Decode and tile every background, dropping each original after slicing.
fn load_tiles(paths: &[PathBuf], tile_size: u32) -> Result<Vec<RasterImage>, SynthError> {
    let mut tiles = Vec::new();
    for path in paths {
        let background = load_image(path)?;
        let mut sliced = split_background(&background, tile_size)?;
        if sliced.is_empty() {
            return Err(SynthError::BackgroundTooSmall {
                path: path.clone(),
                width: background.width(),
                height: background.height(),
                tile_size,
            });
        }
        debug!("{}: {} tile(s)", path.display(), sliced.len());
        tiles.append(&mut sliced);
    }
    Ok(tiles)
}

/// Decode every foreground and flatten their orbits into one pool.
fn load_pool(paths: &[PathBuf], tile_size: u32) -> Result<Vec<RasterImage>, SynthError> {
    let mut pool = Vec::with_capacity(paths.len() * ORBIT_SIZE);
    for path in paths {
        let foreground = load_image(path)?;
        check_foreground_fits(path, foreground.width(), foreground.height(), tile_size)?;
        pool.extend(orbit(&foreground));
    }
    Ok(pool)
}

/// A foreground must fit the frame in every orientation, i.e. both sides
/// must be at most `tile_size` since quarter turns swap them.
pub(crate) fn check_foreground_fits(
    path: &Path,
    width: u32,
    height: u32,
    tile_size: u32,
) -> Result<(), SynthError> {
    if width > tile_size || height > tile_size {
        return Err(SynthError::ForegroundTooLarge {
            path: path.to_path_buf(),
            width,
            height,
            tile_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn write_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
        RasterImage::from_pixel(width, height, Rgb(color))
            .save(path)
            .expect("write png");
    }

    fn fixture(root: &Path, background: (u32, u32), foreground: (u32, u32)) -> GeneratorConfig {
        let bg = root.join("backgrounds");
        let fg = root.join("foregrounds");
        fs::create_dir_all(&bg).expect("create bg dir");
        fs::create_dir_all(&fg).expect("create fg dir");
        write_png(&bg.join("bg.png"), background.0, background.1, [20, 40, 60]);
        write_png(&fg.join("fg.png"), foreground.0, foreground.1, [250, 250, 250]);

        let mut config = GeneratorConfig::new(bg, fg, root.join("result"));
        config.tile_size = 16;
        config
    }

    #[test]
    fn generate_writes_one_pair_per_tile_orientation() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let config = fixture(temp.path(), (40, 33), (5, 3));

        let report = generate(&config).expect("generate");
        // 40 -> origins 0, 16; 33 -> origins 0, 16.
        assert_eq!(report.tiles, 4);
        assert_eq!(report.pool_size, ORBIT_SIZE);
        assert_eq!(report.composites, 4 * ORBIT_SIZE);
        assert_eq!(report.first_id, 0);

        for id in 0..report.composites as u64 {
            let (image_path, xml_path) = output_paths(&config, id);
            assert!(image_path.is_file(), "missing {}", image_path.display());
            assert!(xml_path.is_file(), "missing {}", xml_path.display());
        }
    }

    #[test]
    fn generate_rejects_small_background() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let config = fixture(temp.path(), (16, 40), (5, 5));

        match generate(&config) {
            Err(SynthError::BackgroundTooSmall { width, height, .. }) => {
                assert_eq!((width, height), (16, 40));
            }
            other => panic!("expected BackgroundTooSmall, got {other:?}"),
        }
        assert!(!config.output.exists());
    }

    #[test]
    fn generate_rejects_oversized_foreground_before_writing() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let config = fixture(temp.path(), (40, 40), (4, 17));

        assert!(matches!(
            generate(&config),
            Err(SynthError::ForegroundTooLarge { .. })
        ));
        assert!(!config.output.exists());
    }
}
