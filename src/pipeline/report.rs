//! Summaries of a generation run and of a planned run.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// What a `generate` run produced.
#[derive(Clone, Debug, Default, Serialize)]
pub struct GenerationReport {
    /// Seed of the run's random source.
    pub seed: u64,
    /// Edge of the square frames.
    pub tile_size: u32,
    /// Background files read.
    pub backgrounds: usize,
    /// Tiles cut from all backgrounds (before orientation expansion).
    pub tiles: usize,
    /// Foreground files read.
    pub foregrounds: usize,
    /// Foreground candidates after orientation expansion.
    pub pool_size: usize,
    /// Composite/annotation pairs written.
    pub composites: usize,
    /// Objects pasted over all composites.
    pub objects: usize,
    /// Id of the first pair written by this run.
    pub first_id: u64,
    /// Number of composites per object count.
    pub instance_histogram: BTreeMap<u32, usize>,
}

impl GenerationReport {
    /// Record one written composite with `objects` pasted instances.
    pub fn record(&mut self, objects: usize) {
        self.composites += 1;
        self.objects += objects;
        *self
            .instance_histogram
            .entry(objects as u32)
            .or_insert(0) += 1;
    }

    /// Id of the last pair written, if any.
    pub fn last_id(&self) -> Option<u64> {
        (self.composites > 0).then(|| self.first_id + self.composites as u64 - 1)
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated {} composite(s) with {} object(s)",
            self.composites, self.objects
        )?;
        writeln!(
            f,
            "  {} background(s) -> {} tile(s) of {}x{}",
            self.backgrounds, self.tiles, self.tile_size, self.tile_size
        )?;
        writeln!(
            f,
            "  {} foreground(s) -> {} candidate(s)",
            self.foregrounds, self.pool_size
        )?;
        if let Some(last_id) = self.last_id() {
            writeln!(f, "  ids {}..={}", self.first_id, last_id)?;
        }
        for (count, composites) in &self.instance_histogram {
            writeln!(f, "  {} object(s): {} composite(s)", count, composites)?;
        }
        writeln!(f, "  seed {}", self.seed)
    }
}

/// Predicted output of a run, computed from image headers only.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunPlan {
    pub tile_size: u32,
    pub backgrounds: usize,
    pub tiles: usize,
    pub foregrounds: usize,
    pub pool_size: usize,
    /// Composites a run would write (one per tile orientation).
    pub composites: usize,
    /// Mean number of objects the configured distribution yields.
    pub expected_objects: f64,
    /// Id the first composite would receive.
    pub first_id: u64,
}

impl fmt::Display for RunPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run plan:")?;
        writeln!(
            f,
            "  {} background(s) -> {} tile(s) of {}x{}",
            self.backgrounds, self.tiles, self.tile_size, self.tile_size
        )?;
        writeln!(
            f,
            "  {} foreground(s) -> {} candidate(s)",
            self.foregrounds, self.pool_size
        )?;
        writeln!(
            f,
            "  {} composite(s), ~{:.1} object(s) expected",
            self.composites, self.expected_objects
        )?;
        writeln!(f, "  first id {}", self.first_id)
    }
}
