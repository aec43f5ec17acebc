//! Rank metrics over a labeled sample.
//!
//! Scores are ranked once in descending order; every distinct score is a
//! threshold at which the cumulative true/false positive counts are read off.
//! Both AUCs and both curves are derived from that single sweep.

use serde::{Deserialize, Serialize};

use crate::error::{AucError, Result};
use crate::sampler::LabeledSample;

/// One (false positive rate, true positive rate) point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub fpr: f64,
    pub tpr: f64,
}

/// One (recall, precision) point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrPoint {
    pub recall: f64,
    pub precision: f64,
}

/// Controls how many threshold points end up in the returned curves.
///
/// Dropping intermediate points never changes either AUC; it only thins the
/// curves, which matters once samples reach tens of millions of scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveOptions {
    /// Skip ROC points lying on an evenly spaced straight run.
    pub drop_intermediate_roc: bool,
    /// Skip PR points not adjacent to a change in recall.
    pub drop_intermediate_pr: bool,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            drop_intermediate_roc: true,
            drop_intermediate_pr: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub auc_roc: f64,
    pub auc_pr: f64,
    pub roc_curve: Vec<RocPoint>,
    pub pr_curve: Vec<PrPoint>,
}

/// Evaluate a sample with the default [`CurveOptions`].
pub fn evaluate(sample: &LabeledSample) -> Result<MetricResult> {
    evaluate_with(sample, CurveOptions::default())
}

pub fn evaluate_with(sample: &LabeledSample, options: CurveOptions) -> Result<MetricResult> {
    let positives = sample.positive_count() as u64;
    let negatives = sample.len() as u64 - positives;
    if positives == 0 || negatives == 0 {
        return Err(AucError::DegenerateLabelSet {
            positives,
            negatives,
        });
    }

    let steps = threshold_steps(sample);
    let totals = Totals {
        positives,
        negatives,
    };

    Ok(MetricResult {
        auc_roc: roc_area(&steps, totals),
        auc_pr: average_precision(&steps, totals),
        roc_curve: roc_points(&steps, totals, options.drop_intermediate_roc),
        pr_curve: pr_points(&steps, totals, options.drop_intermediate_pr),
    })
}

/// Cumulative counts at or above one distinct score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Step {
    tp: u64,
    fp: u64,
}

#[derive(Clone, Copy, Debug)]
struct Totals {
    positives: u64,
    negatives: u64,
}

fn threshold_steps(sample: &LabeledSample) -> Vec<Step> {
    let mut ranked: Vec<(f64, bool)> = sample
        .iter()
        .map(|(label, score)| (score, label == 1))
        .collect();
    sort_descending(&mut ranked);

    let mut steps = Vec::new();
    let mut current = Step::default();
    for (i, &(score, positive)) in ranked.iter().enumerate() {
        if positive {
            current.tp += 1;
        } else {
            current.fp += 1;
        }
        let last_of_group = ranked.get(i + 1).map_or(true, |&(next, _)| next != score);
        if last_of_group {
            steps.push(current);
        }
    }
    steps
}

#[cfg(feature = "parallel")]
fn sort_descending(ranked: &mut [(f64, bool)]) {
    use rayon::prelude::*;
    ranked.par_sort_unstable_by(|a, b| b.0.total_cmp(&a.0));
}

#[cfg(not(feature = "parallel"))]
fn sort_descending(ranked: &mut [(f64, bool)]) {
    ranked.sort_unstable_by(|a, b| b.0.total_cmp(&a.0));
}

/// Trapezoidal area, accumulated as twice the area in integer units.
fn roc_area(steps: &[Step], totals: Totals) -> f64 {
    let mut twice_area: u128 = 0;
    let mut prev = Step::default();
    for &step in steps {
        twice_area += u128::from(step.fp - prev.fp) * u128::from(step.tp + prev.tp);
        prev = step;
    }
    let scale = 2 * u128::from(totals.positives) * u128::from(totals.negatives);
    twice_area as f64 / scale as f64
}

fn average_precision(steps: &[Step], totals: Totals) -> f64 {
    let mut sum = 0.0;
    let mut prev_tp = 0;
    for &step in steps {
        if step.tp > prev_tp {
            sum += (step.tp - prev_tp) as f64 * precision(step);
        }
        prev_tp = step.tp;
    }
    (sum / totals.positives as f64).min(1.0)
}

fn precision(step: Step) -> f64 {
    step.tp as f64 / (step.tp + step.fp) as f64
}

fn roc_points(steps: &[Step], totals: Totals, drop_intermediate: bool) -> Vec<RocPoint> {
    let mut points = Vec::with_capacity(steps.len() + 1);
    points.push(RocPoint { fpr: 0.0, tpr: 0.0 });
    for (i, &step) in steps.iter().enumerate() {
        if drop_intermediate
            && is_interior(steps, i)
            && on_even_run(steps[i - 1], step, steps[i + 1])
        {
            continue;
        }
        points.push(RocPoint {
            fpr: step.fp as f64 / totals.negatives as f64,
            tpr: step.tp as f64 / totals.positives as f64,
        });
    }
    points.shrink_to_fit();
    points
}

fn pr_points(steps: &[Step], totals: Totals, drop_intermediate: bool) -> Vec<PrPoint> {
    let mut points = Vec::with_capacity(steps.len() + 1);
    points.push(PrPoint {
        recall: 0.0,
        precision: 1.0,
    });
    for (i, &step) in steps.iter().enumerate() {
        if drop_intermediate
            && is_interior(steps, i)
            && steps[i - 1].tp == step.tp
            && steps[i + 1].tp == step.tp
        {
            continue;
        }
        points.push(PrPoint {
            recall: step.tp as f64 / totals.positives as f64,
            precision: precision(step),
        });
    }
    points.shrink_to_fit();
    points
}

fn is_interior(steps: &[Step], i: usize) -> bool {
    i > 0 && i + 1 < steps.len()
}

/// Zero second difference in both counts: the middle point adds nothing.
fn on_even_run(prev: Step, cur: Step, next: Step) -> bool {
    prev.fp + next.fp == 2 * cur.fp && prev.tp + next.tp == 2 * cur.tp
}
