//! Generator configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional YAML file, and command-line flags. Both the file and the flags
//! are represented as a [`ConfigLayer`] whose fields are all optional; the
//! merged layer is resolved into a complete [`GeneratorConfig`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::RngExt;
use serde::Deserialize;

use crate::error::SynthError;

/// Default tile edge in pixels (detector input size).
pub const DEFAULT_TILE_SIZE: u32 = 416;
/// Default seed for the run's random source.
pub const DEFAULT_SEED: u64 = 42;
/// Default class label written to every `<object>`.
pub const DEFAULT_LABEL: &str = "polar-bear";
/// Annotation directory name used when none is configured.
pub const DEFAULT_ANNOTATIONS_DIR: &str = "Annotations";

/// Discrete distribution over the number of foregrounds pasted per composite.
///
/// Entries are kept sorted by count. Weights need not sum to one; they are
/// normalized when sampling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<u32, f64>")]
pub struct InstanceCountDistribution {
    entries: Vec<(u32, f64)>,
    total: f64,
}

impl InstanceCountDistribution {
    /// Build a distribution from `(count, weight)` pairs.
    ///
    /// Counts must be at least 1 and unique; weights must be finite and
    /// non-negative with a positive, finite sum.
    pub fn new(pairs: impl IntoIterator<Item = (u32, f64)>) -> Result<Self, SynthError> {
        let mut by_count: BTreeMap<u32, f64> = BTreeMap::new();
        for (count, weight) in pairs {
            if count == 0 {
                return Err(invalid("instance counts must be at least 1"));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!(
                    "weight for count {count} must be a finite non-negative number, got {weight}"
                )));
            }
            if by_count.insert(count, weight).is_some() {
                return Err(invalid(format!("count {count} listed more than once")));
            }
        }

        let total: f64 = by_count.values().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(invalid("instance count weights must have a positive, finite sum"));
        }

        Ok(Self {
            entries: by_count.into_iter().collect(),
            total,
        })
    }

    /// `(count, weight)` pairs in ascending count order.
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Probability of drawing `count`.
    pub fn probability(&self, count: u32) -> f64 {
        self.entries
            .iter()
            .find(|(c, _)| *c == count)
            .map(|(_, w)| w / self.total)
            .unwrap_or(0.0)
    }

    /// Largest count with non-zero weight.
    pub fn max_count(&self) -> u32 {
        self.entries
            .iter()
            .filter(|(_, w)| *w > 0.0)
            .map(|(c, _)| *c)
            .max()
            .unwrap_or(0)
    }

    /// Expected number of instances per composite.
    pub fn mean(&self) -> f64 {
        self.entries
            .iter()
            .map(|(c, w)| f64::from(*c) * w)
            .sum::<f64>()
            / self.total
    }

    /// Draw one count using a single uniform `f64` from `rng`.
    pub fn sample<R: RngExt + ?Sized>(&self, rng: &mut R) -> u32 {
        let mut draw = rng.random::<f64>() * self.total;

        for (count, weight) in &self.entries {
            if draw < *weight {
                return *count;
            }
            draw -= weight;
        }

        // Rounding can leave a tiny remainder past the last bucket.
        self.max_count()
    }
}

impl Default for InstanceCountDistribution {
    fn default() -> Self {
        Self {
            entries: vec![(1, 0.5), (2, 0.35), (3, 0.15)],
            total: 1.0,
        }
    }
}

impl TryFrom<BTreeMap<u32, f64>> for InstanceCountDistribution {
    type Error = SynthError;

    fn try_from(map: BTreeMap<u32, f64>) -> Result<Self, Self::Error> {
        Self::new(map)
    }
}

/// Parses `"1:0.5,2:0.35,3:0.15"`.
impl FromStr for InstanceCountDistribution {
    type Err = SynthError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut pairs = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (count, weight) = item
                .split_once(':')
                .ok_or_else(|| invalid(format!("expected 'count:weight', got '{item}'")))?;
            let count = count
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid(format!("invalid instance count '{}'", count.trim())))?;
            let weight = weight
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(format!("invalid weight '{}'", weight.trim())))?;
            pairs.push((count, weight));
        }
        Self::new(pairs)
    }
}

impl fmt::Display for InstanceCountDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (count, weight)) in self.entries.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", count, weight / self.total)?;
        }
        Ok(())
    }
}

/// A partial configuration, as read from a YAML file or collected from flags.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub backgrounds: Option<PathBuf>,
    pub foregrounds: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub annotations: Option<PathBuf>,
    pub seed: Option<u64>,
    pub tile_size: Option<u32>,
    pub distribution: Option<InstanceCountDistribution>,
    pub label: Option<String>,
}

impl ConfigLayer {
    /// Load a layer from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SynthError> {
        let raw = fs::read_to_string(path).map_err(|source| SynthError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| SynthError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            backgrounds: overrides.backgrounds.or(self.backgrounds),
            foregrounds: overrides.foregrounds.or(self.foregrounds),
            output: overrides.output.or(self.output),
            annotations: overrides.annotations.or(self.annotations),
            seed: overrides.seed.or(self.seed),
            tile_size: overrides.tile_size.or(self.tile_size),
            distribution: overrides.distribution.or(self.distribution),
            label: overrides.label.or(self.label),
        }
    }

    /// Resolve into a complete configuration, filling defaults.
    pub fn resolve(self) -> Result<GeneratorConfig, SynthError> {
        let backgrounds = self
            .backgrounds
            .ok_or_else(|| invalid("missing backgrounds directory (--backgrounds)"))?;
        let foregrounds = self
            .foregrounds
            .ok_or_else(|| invalid("missing foregrounds directory (--foregrounds)"))?;
        let output = self
            .output
            .ok_or_else(|| invalid("missing output directory (--output)"))?;

        let mut config = GeneratorConfig::new(backgrounds, foregrounds, output);
        if let Some(annotations) = self.annotations {
            config.annotations = annotations;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(distribution) = self.distribution {
            config.distribution = distribution;
        }
        if let Some(label) = self.label {
            config.label = label;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Complete settings for one generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Directory of background photographs.
    pub backgrounds: PathBuf,
    /// Directory of foreground cutouts.
    pub foregrounds: PathBuf,
    /// Directory receiving `<id>.png` composites.
    pub output: PathBuf,
    /// Directory receiving `<id>.xml` annotations.
    pub annotations: PathBuf,
    /// Seed for the single random source driving all sampling.
    pub seed: u64,
    /// Edge of the square tiles cut from backgrounds.
    pub tile_size: u32,
    /// How many foregrounds each composite receives.
    pub distribution: InstanceCountDistribution,
    /// Class label written for every object.
    pub label: String,
}

impl GeneratorConfig {
    /// Configuration with default tunables; annotations go to `<output>/Annotations`.
    pub fn new(
        backgrounds: impl Into<PathBuf>,
        foregrounds: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        let output = output.into();
        Self {
            backgrounds: backgrounds.into(),
            foregrounds: foregrounds.into(),
            annotations: output.join(DEFAULT_ANNOTATIONS_DIR),
            output,
            seed: DEFAULT_SEED,
            tile_size: DEFAULT_TILE_SIZE,
            distribution: InstanceCountDistribution::default(),
            label: DEFAULT_LABEL.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), SynthError> {
        if self.tile_size == 0 {
            return Err(invalid("tile size must be greater than 0"));
        }
        if self.label.trim().is_empty() {
            return Err(invalid("class label must not be empty"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> SynthError {
    SynthError::InvalidConfig {
        message: message.into(),
    }
}
