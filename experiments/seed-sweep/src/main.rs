use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use aucspread_core::{
    load_or_init, sweep_parallel, sweep_with, ChartSink, ChartSpec, ExperimentArgs,
    ExperimentMode, SeedPanel, SweepGrid, SweepParams, SweepResult,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// One JSON line per grid point: the parameters plus the chart to draw.
#[derive(Serialize)]
struct ChartRecord<'a> {
    size: usize,
    positive_weight: f64,
    separation: f64,
    chart: &'a ChartSpec,
}

struct JsonLinesSink<W: Write> {
    out: W,
    point: Option<SweepParams>,
}

impl<W: Write> JsonLinesSink<W> {
    fn new(out: W) -> Self {
        Self { out, point: None }
    }

    fn at_point(&mut self, params: SweepParams) -> &mut Self {
        self.point = Some(params);
        self
    }
}

impl<W: Write> ChartSink for JsonLinesSink<W> {
    fn render(&mut self, chart: &ChartSpec) -> Result<()> {
        let params = self
            .point
            .context("chart rendered before its grid point was set")?;
        let record = ChartRecord {
            size: params.size,
            positive_weight: params.positive_weight,
            separation: params.separation,
            chart,
        };
        serde_json::to_writer(&mut self.out, &record).context("failed to encode chart")?;
        writeln!(self.out).context("failed to write chart record")?;
        self.out.flush().context("failed to flush chart output")
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = ExperimentArgs::parse_from_env()?;
    if args.help_requested() {
        print_usage();
        return Ok(());
    }

    let mode = args.mode();
    let config_path = args
        .config()
        .cloned()
        .unwrap_or_else(|| default_config_path(mode));
    let grid: SweepGrid = load_or_init(&config_path, || mode.default_grid())?;
    grid.validate()
        .with_context(|| format!("invalid sweep grid in {}", config_path.display()))?;

    let total = grid.sizes.len() * grid.class_weights.len();
    info!(
        mode = mode.label(),
        config = %config_path.display(),
        points = total,
        seeds = grid.seeds.len(),
        parallel = args.parallel(),
        "running seed sweep"
    );

    let stdout = io::stdout();
    let mut sink = JsonLinesSink::new(stdout.lock());

    for (index, params) in grid.points().enumerate() {
        let result = run_point(&params, &grid.seeds, args.parallel()).with_context(|| {
            format!(
                "sweep failed at size {} with positive weight {}",
                params.size, params.positive_weight
            )
        })?;

        info!(
            point = index + 1,
            total,
            size = params.size,
            positive_weight = params.positive_weight,
            roc_spread_pct = ?result.roc.relative_spread_percent(),
            pr_spread_pct = ?result.pr.relative_spread_percent(),
            "grid point done"
        );

        sink.at_point(params).render(&ChartSpec::from_sweep(&result))?;
    }

    Ok(())
}

fn run_point(params: &SweepParams, seeds: &SeedPanel, parallel: bool) -> Result<SweepResult> {
    let result = if parallel {
        sweep_parallel(params, seeds)?
    } else {
        sweep_with(params, seeds)?
    };
    Ok(result)
}

fn default_config_path(mode: ExperimentMode) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("runs")
        .join(mode.label())
        .join("grid.json")
}

fn print_usage() {
    println!(
        "Usage: cargo run -p aucspread-experiment-seed-sweep -- [--mode full|test] [--config PATH] [--parallel]"
    );
    println!();
    println!("Writes one JSON line per (size, class weight) point to stdout; logs go to stderr.");
}
