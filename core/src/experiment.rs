use std::{env, path::PathBuf};

use anyhow::{anyhow, Result};

use crate::config::SweepGrid;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExperimentMode {
    Full,
    Test,
}

impl ExperimentMode {
    pub fn from_str(value: &str) -> Result<Self> {
        match value {
            "full" => Ok(Self::Full),
            "test" => Ok(Self::Test),
            other => Err(anyhow!("invalid mode: {}", other)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Test => "test",
        }
    }

    /// Grid written to a fresh config file for this mode.
    pub fn default_grid(&self) -> SweepGrid {
        match self {
            Self::Full => SweepGrid::reference(),
            Self::Test => SweepGrid::smoke(),
        }
    }
}

/// Command line of a sweep experiment.
#[derive(Clone, Debug)]
pub struct ExperimentArgs {
    mode: ExperimentMode,
    config: Option<PathBuf>,
    parallel: bool,
    help_requested: bool,
}

impl ExperimentArgs {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut mode: Option<ExperimentMode> = None;
        let mut config: Option<PathBuf> = None;
        let mut parallel = false;
        let mut help_requested = false;
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            if arg == "--mode" || arg == "-m" {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("expected value after {}", arg))?;
                mode = Some(ExperimentMode::from_str(&value)?);
            } else if let Some(mode_value) = arg.strip_prefix("--mode=") {
                mode = Some(ExperimentMode::from_str(mode_value)?);
            } else if arg == "--config" || arg == "-c" {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("expected value after {}", arg))?;
                config = Some(PathBuf::from(value));
            } else if let Some(path) = arg.strip_prefix("--config=") {
                config = Some(PathBuf::from(path));
            } else if arg == "--parallel" || arg == "-p" {
                parallel = true;
            } else if arg == "--help" || arg == "-h" {
                help_requested = true;
            } else {
                return Err(anyhow!("unexpected argument: {}", arg));
            }
        }

        Ok(Self {
            mode: mode.unwrap_or(ExperimentMode::Full),
            config,
            parallel,
            help_requested,
        })
    }

    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    pub fn mode(&self) -> ExperimentMode {
        self.mode
    }

    pub fn config(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}
