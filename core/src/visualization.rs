//! Chart descriptions handed to whatever draws the min/max curves.
//!
//! Drawing itself happens outside this crate. A [`ChartSpec`] carries the two
//! panels (ROC on the left, precision-recall on the right) with titles,
//! legends and point series already resolved from a [`SweepResult`].

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::sweep::{MetricRange, SweepResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extreme {
    Min,
    Max,
}

impl Extreme {
    fn label(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Line colour: light for the worst run, dark for the best.
    fn color(self) -> &'static str {
        match self {
            Self::Min => "silver",
            Self::Max => "black",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub extreme: Extreme,
    pub seed: u64,
    pub label: String,
    pub color: &'static str,
    pub dashed: bool,
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<Series>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub roc: Panel,
    pub pr: Panel,
}

impl ChartSpec {
    pub fn from_sweep(result: &SweepResult) -> Self {
        let mut roc = panel("ROC", &result.roc, "FPR", "TPR");
        let mut pr = panel("PR", &result.pr, "Recall", "Precision");

        for (extreme, run) in [
            (Extreme::Min, result.min_run.as_ref()),
            (Extreme::Max, result.max_run.as_ref()),
        ] {
            let Some(run) = run else { continue };
            roc.series.push(series(
                extreme,
                run.seed,
                "ROC",
                run.auc_roc,
                run.roc_curve.iter().map(|p| (p.fpr, p.tpr)).collect(),
            ));
            pr.series.push(series(
                extreme,
                run.seed,
                "PR",
                run.auc_pr,
                run.pr_curve.iter().map(|p| (p.recall, p.precision)).collect(),
            ));
        }

        Self { roc, pr }
    }
}

fn panel(
    metric: &str,
    range: &MetricRange,
    x_label: &'static str,
    y_label: &'static str,
) -> Panel {
    let title = match range.relative_spread_percent() {
        Some(spread) => format!("AUC {metric} range: {spread:.2}%"),
        None => format!("AUC {metric} range: n/a"),
    };
    Panel {
        title,
        x_label,
        y_label,
        series: Vec::new(),
    }
}

fn series(
    extreme: Extreme,
    seed: u64,
    metric: &str,
    auc: f64,
    points: Vec<(f64, f64)>,
) -> Series {
    Series {
        extreme,
        seed,
        label: format!("AUC {metric} {}: {auc:.4}", extreme.label()),
        color: extreme.color(),
        dashed: true,
        points,
    }
}

/// Consumer of finished charts. Implementations must not mutate the sweep.
pub trait ChartSink {
    fn render(&mut self, chart: &ChartSpec) -> Result<()>;
}
