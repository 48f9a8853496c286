//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves transforms and applies prior overrides
//! - samples prior curves
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, CurveArgs, DescribeArgs};
use crate::domain::{CurveRequest, SamplingConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mmm` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::List => {
            print!("{}", crate::report::format_transform_list());
            Ok(())
        }
        Command::Describe(args) => handle_describe(args),
        Command::Curve(args) => handle_curve(args),
    }
}

fn handle_describe(args: DescribeArgs) -> Result<(), AppError> {
    let mut transform = crate::transform::resolve_by_name(&args.name)?;
    transform.update_priors(args.priors)?;
    let dict = transform.to_dict()?;
    let json = serde_json::to_string_pretty(&dict)
        .map_err(|e| AppError::new(4, format!("Failed to render transform JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let request = curve_request_from_args(args, SamplingConfig::from_env()?)?;
    let run = pipeline::run_curve(&request)?;

    print!("{}", crate::report::format_transform(&run.transform));
    println!();
    print!("{}", crate::report::format_curve_summary(&run.summary, request.rows));

    if let Some(path) = &request.export {
        crate::io::curve::write_curve_json(path, &run.summary)?;
        println!("\nWrote {}", path.display());
    }
    Ok(())
}

/// Merge CLI flags over the environment-derived sampling settings.
pub fn curve_request_from_args(args: CurveArgs, base: SamplingConfig) -> Result<CurveRequest, AppError> {
    let sampling = SamplingConfig {
        draws: args.draws.unwrap_or(base.draws),
        chains: args.chains.unwrap_or(base.chains),
        seed: args.seed.or(base.seed),
        curve_points: args.points.unwrap_or(base.curve_points),
    };
    sampling.validate()?;

    Ok(CurveRequest {
        transform: args.name,
        priors: args.priors.into_iter().collect(),
        coords: args.coords.into_iter().collect(),
        max_value: args.max_value,
        sampling,
        rows: args.rows,
        export: args.export,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn curve_args(argv: &[&str]) -> CurveArgs {
        let mut full = vec!["mmm", "curve"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Curve(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_override_environment_settings() {
        let base = SamplingConfig {
            draws: 200,
            chains: 2,
            seed: Some(1),
            curve_points: 50,
        };
        let request = curve_request_from_args(curve_args(&["tanh", "--draws", "10", "--seed", "5"]), base).unwrap();
        assert_eq!(request.sampling.draws, 10);
        assert_eq!(request.sampling.chains, 2);
        assert_eq!(request.sampling.seed, Some(5));
        assert_eq!(request.sampling.curve_points, 50);
        assert_eq!(request.max_value, 1.0);
    }

    #[test]
    fn zero_points_is_rejected() {
        let err = curve_request_from_args(curve_args(&["tanh", "--points", "1"]), SamplingConfig::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
