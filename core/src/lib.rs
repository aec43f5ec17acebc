//! How much do AUC-ROC and AUC-PR move when only the sampling seed changes?
//!
//! [`sample`] draws two normal score populations, [`evaluate`] ranks them into
//! both AUCs and their curves, and [`sweep`] repeats that over a seed panel,
//! keeping the worst and best AUC-ROC runs.

pub mod config;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod rng;
pub mod sampler;
pub mod sweep;
pub mod visualization;

pub use config::{load_or_init, SweepGrid, REFERENCE_CLASS_WEIGHTS};
pub use error::{AucError, Result};
pub use experiment::{ExperimentArgs, ExperimentMode};
pub use metrics::{evaluate, evaluate_with, CurveOptions, MetricResult, PrPoint, RocPoint};
pub use rng::{seeded_rng, SampleRng};
pub use sampler::{sample, LabeledSample, PopulationSpec, DEFAULT_SEPARATION, SCORE_STD_DEV};
#[cfg(feature = "parallel")]
pub use sweep::sweep_parallel;
pub use sweep::{
    sweep, sweep_with, ExtremalRun, MetricRange, SeedPanel, SweepParams, SweepResult, MAX_FLOOR,
    REFERENCE_SEEDS,
};
pub use visualization::{ChartSink, ChartSpec, Extreme, Panel, Series};
