//! Formatted terminal output.
//!
//! Formatting lives here so the transform code stays free of presentation
//! concerns.

use crate::domain::CurveFile;
use crate::transform::{SaturationTransform, registry};

/// One line per registered transform: name, parameters, default priors.
pub fn format_transform_list() -> String {
    let mut out = String::new();
    out.push_str("Registered saturation transforms:\n");
    for entry in registry().entries() {
        out.push_str(&format!(
            "- {:<24} ({})\n",
            entry.lookup_name(),
            entry.parameters().join(", ")
        ));
        for param in entry.parameters() {
            if let Some(prior) = entry.default_priors().get(*param) {
                out.push_str(&format!("    {param:<6} ~ {prior}\n"));
            }
        }
    }
    out
}

/// Header lines describing a transform.
pub fn format_transform(transform: &SaturationTransform) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} (prefix={})\n",
        transform.kind().display_name(),
        transform.prefix()
    ));
    for (param, var_name) in transform.variable_mapping() {
        if let Some(prior) = transform.priors().get(param) {
            out.push_str(&format!("- {var_name:<20} ~ {prior}\n"));
        }
    }
    out
}

/// Table of mean and interval per grid point, at most `rows` rows per band.
pub fn format_curve_summary(curve: &CurveFile, rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Prior curve: max_value={} | draws={} x chains={} | interval={:.0}%\n",
        curve.max_value,
        curve.sampling.draws,
        curve.sampling.chains,
        curve.interval * 100.0
    ));

    let picks = pick_rows(curve.x.len(), rows);
    for (label, band) in &curve.bands {
        out.push_str(&format!("\n[{label}]\n"));
        out.push_str(&format!("{:>10} {:>12} {:>12} {:>12}\n", "x", "mean", "lower", "upper"));
        for &i in &picks {
            out.push_str(&format!(
                "{:>10.4} {:>12.5} {:>12.5} {:>12.5}\n",
                curve.x[i], band.mean[i], band.lower[i], band.upper[i]
            ));
        }
    }
    out
}

/// Evenly spread indices into `0..n`, always including both ends.
fn pick_rows(n: usize, rows: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    if rows < 2 || n <= rows {
        return (0..n).collect();
    }
    let mut picks: Vec<usize> = (0..rows).map(|k| k * (n - 1) / (rows - 1)).collect();
    picks.dedup();
    picks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_rows_spans_both_ends() {
        assert_eq!(pick_rows(100, 5), vec![0, 24, 49, 74, 99]);
        assert_eq!(pick_rows(3, 10), vec![0, 1, 2]);
        assert!(pick_rows(0, 10).is_empty());
    }

    #[test]
    fn transform_list_names_every_curve() {
        let text = format_transform_list();
        for name in crate::transform::registered_names() {
            assert!(text.contains(name), "missing {name}");
        }
        assert!(text.contains("HalfNormal(sigma=1.5)"));
    }
}
