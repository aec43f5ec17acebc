//! Synthetic score populations.
//!
//! A sample is two normal populations sharing one standard deviation: the
//! negatives centred on zero and the positives shifted by `separation`.

use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{AucError, Result};
use crate::rng::{seeded_rng, SampleRng};

/// Standard deviation shared by both score populations.
pub const SCORE_STD_DEV: f64 = 5.0;
/// Mean of the negative population.
pub const NEGATIVE_MEAN: f64 = 0.0;
/// Mean offset of the positive population when none is given.
pub const DEFAULT_SEPARATION: f64 = 10.0;

/// Parameters of one synthetic draw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationSpec {
    pub size: usize,
    pub positive_weight: f64,
    #[serde(default = "default_separation")]
    pub separation: f64,
    pub seed: u64,
}

fn default_separation() -> f64 {
    DEFAULT_SEPARATION
}

impl PopulationSpec {
    pub fn new(size: usize, positive_weight: f64, seed: u64) -> Self {
        Self {
            size,
            positive_weight,
            separation: DEFAULT_SEPARATION,
            seed,
        }
    }

    pub fn with_separation(mut self, separation: f64) -> Self {
        self.separation = separation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(AucError::invalid("size", "population size must be positive"));
        }
        if !self.positive_weight.is_finite() || !(0.0..=1.0).contains(&self.positive_weight) {
            return Err(AucError::invalid(
                "positive_weight",
                format!("must lie in [0, 1], got {}", self.positive_weight),
            ));
        }
        if !self.separation.is_finite() {
            return Err(AucError::invalid(
                "separation",
                format!("must be finite, got {}", self.separation),
            ));
        }
        Ok(())
    }

    /// Number of negative-label draws, truncated toward zero.
    pub fn negative_count(&self) -> usize {
        (self.size as f64 * (1.0 - self.positive_weight)) as usize
    }

    /// Number of positive-label draws, truncated toward zero.
    pub fn positive_count(&self) -> usize {
        (self.size as f64 * self.positive_weight) as usize
    }
}

/// Labels and scores of one draw. All negatives precede all positives.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSample {
    labels: Vec<u8>,
    scores: Vec<f64>,
}

impl LabeledSample {
    /// Build a sample from externally produced labels and scores. Labels must
    /// already be ordered negatives first.
    pub fn from_parts(labels: Vec<u8>, scores: Vec<f64>) -> Result<Self> {
        if labels.len() != scores.len() {
            return Err(AucError::invalid(
                "labels",
                format!(
                    "{} labels do not match {} scores",
                    labels.len(),
                    scores.len()
                ),
            ));
        }
        if let Some(label) = labels.iter().find(|&&label| label > 1) {
            return Err(AucError::invalid(
                "labels",
                format!("labels must be 0 or 1, found {label}"),
            ));
        }
        if labels.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(AucError::invalid(
                "labels",
                "negative labels must all precede positive labels",
            ));
        }
        if let Some(score) = scores.iter().find(|score| !score.is_finite()) {
            return Err(AucError::invalid(
                "scores",
                format!("scores must be finite, found {score}"),
            ));
        }
        Ok(Self { labels, scores })
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn positive_count(&self) -> usize {
        self.labels.iter().filter(|&&label| label == 1).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.labels.iter().copied().zip(self.scores.iter().copied())
    }
}

/// Draw one labeled sample; the generator lives only for this call.
pub fn sample(spec: &PopulationSpec) -> Result<LabeledSample> {
    spec.validate()?;
    let mut rng = seeded_rng(spec.seed);
    draw(spec, &mut rng)
}

fn draw(spec: &PopulationSpec, rng: &mut SampleRng) -> Result<LabeledSample> {
    let n_neg = spec.negative_count();
    let n_pos = spec.positive_count();

    let negatives = population(NEGATIVE_MEAN, "negative mean")?;
    let positives = population(spec.separation, "separation")?;

    let mut scores = Vec::with_capacity(n_neg + n_pos);
    scores.extend(negatives.sample_iter(&mut *rng).take(n_neg));
    scores.extend(positives.sample_iter(&mut *rng).take(n_pos));

    let mut labels = vec![0u8; n_neg];
    labels.resize(n_neg + n_pos, 1);

    Ok(LabeledSample { labels, scores })
}

fn population(mean: f64, name: &'static str) -> Result<Normal<f64>> {
    Normal::new(mean, SCORE_STD_DEV).map_err(|err| AucError::invalid(name, err.to_string()))
}
