//! Seed sweeps: repeat one population draw across a panel of seeds and keep
//! the runs with the lowest and highest AUC-ROC.
//!
//! Selection is keyed on AUC-ROC only. The AUC-PR reported on each side is the
//! one measured on the same run, so the PR curves stay paired with the ROC
//! curves they were drawn with.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::metrics::{evaluate_with, CurveOptions, MetricResult, PrPoint, RocPoint};
use crate::sampler::{sample, PopulationSpec, DEFAULT_SEPARATION};

/// Initial value of both running maxima. A run only becomes the max-side
/// record once its AUC-ROC is strictly above this floor.
pub const MAX_FLOOR: f64 = 0.0005;

/// The 20-seed reference panel, in sweep order.
pub const REFERENCE_SEEDS: [u64; 20] = [
    978, 672, 821, 445, 488, 449, 753, 962, 874, 287, 257, 598, 100, 136, 305, 376, 548, 229, 265,
    425,
];

/// Ordered, fixed list of seeds a sweep iterates over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedPanel(Vec<u64>);

impl SeedPanel {
    pub fn new(seeds: Vec<u64>) -> Self {
        Self(seeds)
    }

    pub fn reference() -> Self {
        Self(REFERENCE_SEEDS.to_vec())
    }

    pub fn seeds(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SeedPanel {
    fn default() -> Self {
        Self::reference()
    }
}

/// Everything about a sweep except the seeds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    pub size: usize,
    pub positive_weight: f64,
    pub separation: f64,
    pub curve_options: CurveOptions,
}

impl SweepParams {
    pub fn new(size: usize, positive_weight: f64) -> Self {
        Self {
            size,
            positive_weight,
            separation: DEFAULT_SEPARATION,
            curve_options: CurveOptions::default(),
        }
    }

    pub fn with_separation(mut self, separation: f64) -> Self {
        self.separation = separation;
        self
    }

    pub fn with_curve_options(mut self, curve_options: CurveOptions) -> Self {
        self.curve_options = curve_options;
        self
    }

    pub fn population(&self, seed: u64) -> PopulationSpec {
        PopulationSpec {
            size: self.size,
            positive_weight: self.positive_weight,
            separation: self.separation,
            seed,
        }
    }
}

/// Lowest and highest value reported for one metric.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: Option<f64>,
    pub max: f64,
}

impl MetricRange {
    /// `(max / min - 1) * 100`, or `None` while no minimum has been recorded.
    pub fn relative_spread_percent(&self) -> Option<f64> {
        self.min.map(|min| (self.max / min - 1.0) * 100.0)
    }
}

/// Metrics and curves of the run that set one of the extremes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtremalRun {
    pub seed: u64,
    pub auc_roc: f64,
    pub auc_pr: f64,
    pub roc_curve: Vec<RocPoint>,
    pub pr_curve: Vec<PrPoint>,
}

impl ExtremalRun {
    fn from_metrics(seed: u64, metrics: MetricResult) -> Self {
        Self {
            seed,
            auc_roc: metrics.auc_roc,
            auc_pr: metrics.auc_pr,
            roc_curve: metrics.roc_curve,
            pr_curve: metrics.pr_curve,
        }
    }
}

/// Outcome of one sweep.
///
/// `min_run` is unset only for an empty panel; `max_run` is also unset when no
/// run rose above [`MAX_FLOOR`]. Callers must not assume both are present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub roc: MetricRange,
    pub pr: MetricRange,
    pub min_run: Option<ExtremalRun>,
    pub max_run: Option<ExtremalRun>,
}

impl SweepResult {
    pub fn min_roc_curve(&self) -> Option<&[RocPoint]> {
        self.min_run.as_ref().map(|run| run.roc_curve.as_slice())
    }

    pub fn max_roc_curve(&self) -> Option<&[RocPoint]> {
        self.max_run.as_ref().map(|run| run.roc_curve.as_slice())
    }

    pub fn min_pr_curve(&self) -> Option<&[PrPoint]> {
        self.min_run.as_ref().map(|run| run.pr_curve.as_slice())
    }

    pub fn max_pr_curve(&self) -> Option<&[PrPoint]> {
        self.max_run.as_ref().map(|run| run.pr_curve.as_slice())
    }
}

/// Running min/max records. Merging an earlier tracker with a later one gives
/// the same records as observing both seed ranges in order.
#[derive(Clone, Debug, Default)]
struct ExtremeTracker {
    min: Option<ExtremalRun>,
    max: Option<ExtremalRun>,
}

impl ExtremeTracker {
    #[cfg(feature = "parallel")]
    fn from_run(run: ExtremalRun) -> Self {
        let mut tracker = Self::default();
        tracker.observe(run);
        tracker
    }

    fn max_roc(&self) -> f64 {
        self.max.as_ref().map_or(MAX_FLOOR, |run| run.auc_roc)
    }

    fn lowers_min(&self, auc_roc: f64) -> bool {
        self.min.as_ref().map_or(true, |run| auc_roc < run.auc_roc)
    }

    fn observe(&mut self, run: ExtremalRun) {
        let take_min = self.lowers_min(run.auc_roc);
        let take_max = run.auc_roc > self.max_roc();
        match (take_min, take_max) {
            (true, true) => {
                self.min = Some(run.clone());
                self.max = Some(run);
            }
            (true, false) => self.min = Some(run),
            (false, true) => self.max = Some(run),
            (false, false) => {}
        }
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn merge(mut self, later: Self) -> Self {
        if let Some(run) = later.min {
            if self.lowers_min(run.auc_roc) {
                self.min = Some(run);
            }
        }
        if let Some(run) = later.max {
            if run.auc_roc > self.max_roc() {
                self.max = Some(run);
            }
        }
        self
    }

    fn finish(self) -> SweepResult {
        SweepResult {
            roc: MetricRange {
                min: self.min.as_ref().map(|run| run.auc_roc),
                max: self.max_roc(),
            },
            pr: MetricRange {
                min: self.min.as_ref().map(|run| run.auc_pr),
                max: self.max.as_ref().map_or(MAX_FLOOR, |run| run.auc_pr),
            },
            min_run: self.min,
            max_run: self.max,
        }
    }
}

/// Sweep with default curve options.
pub fn sweep(
    size: usize,
    positive_weight: f64,
    seeds: &SeedPanel,
    separation: f64,
) -> Result<SweepResult> {
    let params = SweepParams::new(size, positive_weight).with_separation(separation);
    sweep_with(&params, seeds)
}

/// Sample and evaluate every seed in order. The first failing seed aborts the
/// sweep.
pub fn sweep_with(params: &SweepParams, seeds: &SeedPanel) -> Result<SweepResult> {
    params.population(0).validate()?;

    let mut tracker = ExtremeTracker::default();
    for &seed in seeds.seeds() {
        tracker.observe(run_seed(params, seed)?);
    }

    let result = tracker.finish();
    log_summary(params, seeds, &result);
    Ok(result)
}

/// Evaluate seeds on the rayon pool and fold the per-seed records with an
/// order-preserving reduction. Produces the same result as [`sweep_with`].
#[cfg(feature = "parallel")]
pub fn sweep_parallel(params: &SweepParams, seeds: &SeedPanel) -> Result<SweepResult> {
    use rayon::prelude::*;

    params.population(0).validate()?;

    let tracker = seeds
        .seeds()
        .par_iter()
        .map(|&seed| run_seed(params, seed).map(ExtremeTracker::from_run))
        .try_reduce(ExtremeTracker::default, |earlier, later| {
            Ok(earlier.merge(later))
        })?;

    let result = tracker.finish();
    log_summary(params, seeds, &result);
    Ok(result)
}

fn run_seed(params: &SweepParams, seed: u64) -> Result<ExtremalRun> {
    let drawn = sample(&params.population(seed))?;
    let metrics = evaluate_with(&drawn, params.curve_options)?;
    debug!(
        seed,
        auc_roc = metrics.auc_roc,
        auc_pr = metrics.auc_pr,
        "seed evaluated"
    );
    Ok(ExtremalRun::from_metrics(seed, metrics))
}

fn log_summary(params: &SweepParams, seeds: &SeedPanel, result: &SweepResult) {
    if result.min_run.is_none() {
        warn!(size = params.size, "empty seed panel; no extremal runs");
        return;
    }
    if result.max_run.is_none() {
        warn!(
            size = params.size,
            positive_weight = params.positive_weight,
            floor = MAX_FLOOR,
            "no run exceeded the AUC-ROC floor"
        );
    }
    info!(
        size = params.size,
        positive_weight = params.positive_weight,
        seeds = seeds.len(),
        roc_min = ?result.roc.min,
        roc_max = result.roc.max,
        roc_spread_pct = ?result.roc.relative_spread_percent(),
        pr_spread_pct = ?result.pr.relative_spread_percent(),
        "sweep finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AucError;
    use crate::metrics::evaluate;

    fn run(seed: u64, auc_roc: f64) -> ExtremalRun {
        ExtremalRun {
            seed,
            auc_roc,
            auc_pr: auc_roc / 2.0,
            roc_curve: Vec::new(),
            pr_curve: Vec::new(),
        }
    }

    fn tracked(runs: &[(u64, f64)]) -> ExtremeTracker {
        let mut tracker = ExtremeTracker::default();
        for &(seed, auc) in runs {
            tracker.observe(run(seed, auc));
        }
        tracker
    }

    #[test]
    fn reference_panel_is_twenty_fixed_seeds() {
        let panel = SeedPanel::reference();
        assert_eq!(panel.len(), 20);
        assert_eq!(panel.seeds()[0], 978);
        assert_eq!(panel.seeds()[19], 425);
        assert_eq!(SeedPanel::default(), panel);
    }

    #[test]
    fn ties_keep_the_earlier_seed() {
        let result = tracked(&[(1, 0.7), (2, 0.9), (3, 0.7), (4, 0.9)]).finish();
        assert_eq!(result.min_run.map(|r| r.seed), Some(1));
        assert_eq!(result.max_run.map(|r| r.seed), Some(2));
    }

    #[test]
    fn pr_values_follow_the_roc_extremes() {
        let result = tracked(&[(1, 0.8), (2, 0.6), (3, 0.95)]).finish();
        assert_eq!(result.roc.min, Some(0.6));
        assert_eq!(result.pr.min, Some(0.3));
        assert_eq!(result.roc.max, 0.95);
        assert_eq!(result.pr.max, 0.475);
    }

    #[test]
    fn merge_matches_sequential_observation() {
        let runs = [(1, 0.8), (2, 0.6), (3, 0.95), (4, 0.6), (5, 0.95), (6, 0.7)];
        let sequential = tracked(&runs).finish();
        for split in 0..=runs.len() {
            let merged = tracked(&runs[..split]).merge(tracked(&runs[split..]));
            assert_eq!(merged.finish(), sequential, "split at {split}");
        }
    }

    #[test]
    fn runs_at_or_below_floor_never_become_max() {
        let result = tracked(&[(1, 0.0), (2, MAX_FLOOR)]).finish();
        assert_eq!(result.roc.min, Some(0.0));
        assert!(result.max_run.is_none());
        assert_eq!(result.roc.max, MAX_FLOOR);
        assert_eq!(result.pr.max, MAX_FLOOR);
    }

    #[test]
    fn spread_is_relative_percentage() {
        let range = MetricRange {
            min: Some(0.8),
            max: 0.9,
        };
        let spread = range.relative_spread_percent().unwrap();
        assert!((spread - 12.5).abs() < 1e-9);
        assert_eq!(
            MetricRange {
                min: None,
                max: MAX_FLOOR
            }
            .relative_spread_percent(),
            None
        );
    }

    #[test]
    fn sweep_selects_argmin_and_argmax_seeds() {
        let panel = SeedPanel::reference();
        let result = sweep(2_000, 0.1, &panel, 10.0).unwrap();

        let per_seed: Vec<(u64, f64)> = panel
            .seeds()
            .iter()
            .map(|&seed| {
                let drawn = sample(&PopulationSpec::new(2_000, 0.1, seed)).unwrap();
                (seed, evaluate(&drawn).unwrap().auc_roc)
            })
            .collect();
        let lowest = per_seed
            .iter()
            .fold(None::<(u64, f64)>, |best, &(seed, auc)| match best {
                Some((_, b)) if b <= auc => best,
                _ => Some((seed, auc)),
            })
            .unwrap();
        let highest = per_seed
            .iter()
            .fold(None::<(u64, f64)>, |best, &(seed, auc)| match best {
                Some((_, b)) if b >= auc => best,
                _ => Some((seed, auc)),
            })
            .unwrap();

        let min_run = result.min_run.as_ref().unwrap();
        let max_run = result.max_run.as_ref().unwrap();
        assert_eq!(min_run.seed, lowest.0);
        assert_eq!(max_run.seed, highest.0);
        assert_eq!(result.roc.min, Some(lowest.1));
        assert_eq!(result.roc.max, highest.1);
        assert!(result.roc.min.unwrap() <= result.roc.max);
        assert_eq!(result.pr.min, Some(min_run.auc_pr));
        assert_eq!(result.min_roc_curve().map(<[_]>::len), Some(min_run.roc_curve.len()));
        assert!(result.max_pr_curve().is_some());
    }

    #[test]
    fn empty_panel_leaves_records_unset() {
        let result = sweep(1_000, 0.5, &SeedPanel::new(Vec::new()), 10.0).unwrap();
        assert_eq!(result.roc.min, None);
        assert_eq!(result.roc.max, MAX_FLOOR);
        assert!(result.min_roc_curve().is_none());
        assert!(result.max_roc_curve().is_none());
        assert!(result.min_pr_curve().is_none());
        assert!(result.max_pr_curve().is_none());
    }

    #[test]
    fn fully_inverted_populations_never_clear_the_floor() {
        let result = sweep(500, 0.5, &SeedPanel::new(vec![1, 2, 3]), -1_000.0).unwrap();
        assert_eq!(result.roc.min, Some(0.0));
        assert!(result.max_run.is_none());
        assert_eq!(result.roc.relative_spread_percent(), Some(f64::INFINITY));
    }

    #[test]
    fn degenerate_seed_aborts_the_sweep() {
        let err = sweep(1_000, 0.0, &SeedPanel::reference(), 10.0).unwrap_err();
        assert!(matches!(err, AucError::DegenerateLabelSet { positives: 0, .. }));

        let err = sweep(0, 0.5, &SeedPanel::new(Vec::new()), 10.0).unwrap_err();
        assert!(matches!(err, AucError::InvalidParameter { name: "size", .. }));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_sweep_matches_sequential() {
        let params = SweepParams::new(3_000, 0.05);
        let panel = SeedPanel::reference();
        let sequential = sweep_with(&params, &panel).unwrap();
        let parallel = sweep_parallel(&params, &panel).unwrap();
        assert_eq!(parallel, sequential);

        let err = sweep_parallel(&SweepParams::new(100, 1.0), &panel).unwrap_err();
        assert!(matches!(err, AucError::DegenerateLabelSet { negatives: 0, .. }));
    }
}
