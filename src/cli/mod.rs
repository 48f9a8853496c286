//! Command-line parsing for the saturation-curve tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! transform code and from command dispatch (`app`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::labeled::CoordValues;
use crate::prior::Prior;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mmm", version, about = "Saturation curves with priors for marketing-mix models")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered transforms with their parameters and default priors.
    List,
    /// Print a transform's dict form as JSON.
    Describe(DescribeArgs),
    /// Sample a prior curve and print mean / interval per grid point.
    Curve(CurveArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct DescribeArgs {
    /// Transform name (see `mmm list`).
    pub name: String,

    /// Override a parameter prior, e.g. `lam={"dist":"HalfNormal","kwargs":{"sigma":2}}`.
    #[arg(long = "prior", value_name = "PARAM=JSON", value_parser = parse_prior)]
    pub priors: Vec<(String, Prior)>,
}

/// Options for sampling a prior curve.
///
/// Sampling flags override `MMM_*` environment settings.
#[derive(Debug, Parser, Clone)]
pub struct CurveArgs {
    /// Transform name (see `mmm list`).
    pub name: String,

    /// Upper end of the input grid.
    #[arg(long, default_value_t = 1.0)]
    pub max_value: f64,

    /// Draws per chain.
    #[arg(long)]
    pub draws: Option<usize>,

    /// Number of chains.
    #[arg(long)]
    pub chains: Option<usize>,

    /// Random seed for reproducible draws.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of grid points on [0, max_value].
    #[arg(long)]
    pub points: Option<usize>,

    /// Override a parameter prior, e.g. `alpha={"dist":"Gamma","kwargs":{"mu":2,"sigma":1},"dims":["channel"]}`.
    #[arg(long = "prior", value_name = "PARAM=JSON", value_parser = parse_prior)]
    pub priors: Vec<(String, Prior)>,

    /// Labels for a dim used by a prior, e.g. `channel=tv,radio`.
    #[arg(long = "coord", value_name = "DIM=LABELS", value_parser = parse_coord)]
    pub coords: Vec<(String, CoordValues)>,

    /// Rows printed per band.
    #[arg(long, default_value_t = 11)]
    pub rows: usize,

    /// Export the curve summary to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

fn split_assignment(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn parse_prior(raw: &str) -> Result<(String, Prior), String> {
    let (param, json) = split_assignment(raw)?;
    let prior: Prior = serde_json::from_str(json).map_err(|e| format!("invalid prior for '{param}': {e}"))?;
    Ok((param.to_string(), prior))
}

fn parse_coord(raw: &str) -> Result<(String, CoordValues), String> {
    let (dim, labels) = split_assignment(raw)?;
    let labels: Vec<&str> = labels.split(',').map(str::trim).filter(|l| !l.is_empty()).collect();
    if labels.is_empty() {
        return Err(format!("dim '{dim}' needs at least one label"));
    }
    Ok((dim.to_string(), CoordValues::labels(labels)))
}
