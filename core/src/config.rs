use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::AucError;
use crate::metrics::CurveOptions;
use crate::sampler::DEFAULT_SEPARATION;
use crate::sweep::{SeedPanel, SweepParams, REFERENCE_SEEDS};

/// Positive-class weights of the reference experiment.
pub const REFERENCE_CLASS_WEIGHTS: [f64; 9] =
    [0.4, 0.3, 0.2, 0.1, 0.05, 0.01, 0.005, 0.001, 0.0005];

/// Load a JSON configuration from disk, creating it with the provided initializer if missing.
pub fn load_or_init<T, F>(path: &Path, initializer: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    if path.exists() {
        return read_json(path);
    }

    let value = initializer();
    write_json(path, &value)?;
    Ok(value)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config from {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let serialized = serde_json::to_string_pretty(value)?;
    fs::write(path, serialized)
        .with_context(|| format!("failed to write config to {}", path.display()))
}

/// Population sizes and class weights to sweep, plus the shared seed panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub sizes: Vec<usize>,
    pub class_weights: Vec<f64>,
    pub seeds: SeedPanel,
    #[serde(default = "default_separation")]
    pub separation: f64,
    #[serde(default)]
    pub curve_options: CurveOptions,
}

fn default_separation() -> f64 {
    DEFAULT_SEPARATION
}

impl SweepGrid {
    /// The published grid: 1e5 and 1e6 times powers of two, then 1e7 to 5e7
    /// in steps of 5e6, against nine class weights.
    pub fn reference() -> Self {
        let doublings = [1, 2, 4, 8];
        let sizes = doublings
            .iter()
            .map(|&x| 100_000 * x)
            .chain(doublings.iter().map(|&x| 1_000_000 * x))
            .chain((10..=50).step_by(5).map(|x| 1_000_000 * x))
            .collect();

        Self {
            sizes,
            class_weights: REFERENCE_CLASS_WEIGHTS.to_vec(),
            seeds: SeedPanel::new(REFERENCE_SEEDS.to_vec()),
            separation: DEFAULT_SEPARATION,
            curve_options: CurveOptions::default(),
        }
    }

    /// A grid small enough for a quick end-to-end check.
    pub fn smoke() -> Self {
        Self {
            sizes: vec![10_000, 20_000],
            class_weights: vec![0.4, 0.1, 0.01],
            seeds: SeedPanel::new(REFERENCE_SEEDS[..5].to_vec()),
            separation: DEFAULT_SEPARATION,
            curve_options: CurveOptions {
                drop_intermediate_roc: true,
                drop_intermediate_pr: true,
            },
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.sizes.is_empty() {
            return Err(AucError::invalid("sizes", "grid has no population sizes"));
        }
        if self.class_weights.is_empty() {
            return Err(AucError::invalid("class_weights", "grid has no class weights"));
        }
        for params in self.points() {
            params.population(0).validate()?;
        }
        Ok(())
    }

    /// Every (size, weight) combination, sizes outermost.
    pub fn points(&self) -> impl Iterator<Item = SweepParams> + '_ {
        self.sizes.iter().flat_map(move |&size| {
            self.class_weights.iter().map(move |&weight| {
                SweepParams::new(size, weight)
                    .with_separation(self.separation)
                    .with_curve_options(self.curve_options)
            })
        })
    }
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self::reference()
    }
}
