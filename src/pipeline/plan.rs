//! Predicting a run from image headers.

use crate::augment::{tile_count, ORBIT_SIZE};
use crate::config::GeneratorConfig;
use crate::error::SynthError;

use super::report::RunPlan;
use super::sources::{list_source_files, probe_dimensions, OutputCounter};
use super::check_foreground_fits;

/// Compute what [`generate`](super::generate) would produce for `config`
/// without decoding pixels or writing anything.
///
/// Applies the same geometry checks as a real run, so a plan that succeeds
/// will not fail later on tile or foreground sizes.
pub fn plan_run(config: &GeneratorConfig) -> Result<RunPlan, SynthError> {
    config.validate()?;

    let background_paths = list_source_files(&config.backgrounds)?;
    let foreground_paths = list_source_files(&config.foregrounds)?;

    let mut tiles = 0;
    for path in &background_paths {
        let (width, height) = probe_dimensions(path)?;
        let count = tile_count(width, height, config.tile_size);
        if count == 0 {
            return Err(SynthError::BackgroundTooSmall {
                path: path.clone(),
                width,
                height,
                tile_size: config.tile_size,
            });
        }
        tiles += count;
    }

    for path in &foreground_paths {
        let (width, height) = probe_dimensions(path)?;
        check_foreground_fits(path, width, height, config.tile_size)?;
    }

    let composites = tiles * ORBIT_SIZE;
    Ok(RunPlan {
        tile_size: config.tile_size,
        backgrounds: background_paths.len(),
        tiles,
        foregrounds: foreground_paths.len(),
        pool_size: foreground_paths.len() * ORBIT_SIZE,
        composites,
        expected_objects: composites as f64 * config.distribution.mean(),
        first_id: OutputCounter::from_dir(&config.output)?.peek(),
    })
}
