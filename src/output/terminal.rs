//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::analysis::ComplexityClass;
use crate::error::{FailureKind, RunError};
use crate::result::{Attempted, ModelFit, ProfileResult};

/// Format a ProfileResult for human-readable terminal output.
pub fn format_result(result: &ProfileResult) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str("complexity-oracle\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    output.push_str(&format!("  Work: {}\n", result.name));
    if let (Some(first), Some(last)) = (result.points.first(), result.points.last()) {
        output.push_str(&format!(
            "  Sizes: {} from {} to {}\n",
            result.points.len(),
            first.n,
            last.n
        ));
    }
    output.push_str(&format!(
        "  Samples: {} ({} per size, {} calls each, {:?} aggregation)\n",
        result.metadata.sample_count,
        result.metadata.measurements_per_size,
        result.metadata.batch_size,
        result.metadata.aggregation
    ));
    output.push_str(&format!(
        "  Noise floor: {}\n",
        format_secs(result.noise_floor_secs)
    ));
    output.push('\n');

    output.push_str(&format!(
        "  {}\n",
        format!("\u{2713} Best fit: {}", result.best_fit.class).green().bold()
    ));
    output.push_str(&format!("    {}\n\n", describe_fit(&result.best_fit)));

    output.push_str("    Candidates (ascending residual):\n");
    for (rank, fit) in result.ranked_fits.iter().enumerate() {
        let marker = if fit.flattened { " (flat)" } else { "" };
        let line = format!(
            "      {}. {:<11} residual {:.3e}{}",
            rank + 1,
            fit.class.name(),
            fit.residual,
            marker
        );
        if rank == 0 {
            output.push_str(&format!("{}\n", line.green()));
        } else if fit.flattened {
            output.push_str(&format!("{}\n", line.dimmed()));
        } else {
            output.push_str(&format!("{line}\n"));
        }
    }
    output.push('\n');

    output.push_str("    Timings:\n");
    for point in &result.points {
        output.push_str(&format!(
            "      n = {:>9}  {:>12}  \u{00B1} {}\n",
            point.n,
            format_secs(point.elapsed_secs),
            format_secs(point.spread_secs)
        ));
    }
    output.push('\n');

    for warning in &result.warnings {
        let text = warning.description();
        if warning.is_critical() {
            output.push_str(&format!("  {}\n", text.red()));
        } else {
            output.push_str(&format!("  {}\n", text.yellow()));
        }
    }
    if !result.warnings.is_empty() {
        output.push('\n');
    }

    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Runtime: {:.2}s, timer resolution {:.1} ns\n",
        result.metadata.runtime_secs, result.metadata.timer_resolution_ns
    ));

    output
}

/// Format the outcome of a resilient run: the result on success, the
/// terminal error otherwise.
pub fn format_outcome(outcome: &Result<Attempted<ProfileResult>, RunError>) -> String {
    match outcome {
        Ok(attempted) => {
            let mut output = format_result(&attempted.value);
            if attempted.attempt > 1 {
                output.push_str(&format!(
                    "{}\n",
                    format!("Succeeded on attempt {}", attempted.attempt).yellow()
                ));
            }
            output
        }
        Err(err) => {
            let headline = match err.kind() {
                FailureKind::Timeout => "\u{23F1} Timed out".yellow().bold(),
                FailureKind::Error => "\u{2717} Failed".red().bold(),
            };
            format!("complexity-oracle: {} `{}`\n  {}\n", headline, err.name(), err)
        }
    }
}

fn describe_fit(fit: &ModelFit) -> String {
    if fit.flattened {
        return format!("t(n) \u{2248} {} (no resolvable growth)", format_secs(fit.intercept));
    }
    match fit.class {
        ComplexityClass::Constant => {
            format!("t(n) \u{2248} {}", format_secs(fit.coefficient))
        }
        class => format!(
            "t(n) \u{2248} {:.3e} \u{00B7} {} + {}",
            fit.coefficient,
            basis_label(class),
            format_secs(fit.intercept)
        ),
    }
}

fn basis_label(class: ComplexityClass) -> &'static str {
    match class {
        ComplexityClass::Constant => "1",
        ComplexityClass::Logarithmic => "log n",
        ComplexityClass::Linear => "n",
        ComplexityClass::Linearithmic => "n log n",
        ComplexityClass::Quadratic => "n^2",
        ComplexityClass::Cubic => "n^3",
        ComplexityClass::Exponential => "2^(n - n_max)",
    }
}

/// Seconds with an adaptive unit.
fn format_secs(secs: f64) -> String {
    let abs = secs.abs();
    if abs >= 1.0 {
        format!("{secs:.3} s")
    } else if abs >= 1e-3 {
        format!("{:.3} ms", secs * 1e3)
    } else if abs >= 1e-6 {
        format!("{:.3} \u{00B5}s", secs * 1e6)
    } else {
        format!("{:.1} ns", secs * 1e9)
    }
}
