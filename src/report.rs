use std::io::{self, Write};

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::estimate::{draw_stats, sweep, DrawStats, Estimate};
use crate::exact;

#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    pub estimates: Vec<Estimate>,
    pub draw_stats: Option<DrawStats>,
    /// exact single-cycle probability for `draw_stats.n`, when small enough
    pub draw_stats_exact: Option<f64>,
}

impl Report {
    /// The sweep first, then the distribution table, sharing one generator.
    /// Only the settings of the parts that actually run are checked.
    pub fn run<R: Rng + ?Sized>(
        settings: &Settings,
        rng: &mut R,
        with_sweep: bool,
        with_stats: bool,
    ) -> Result<Self> {
        settings.validate_common()?;
        if with_sweep {
            settings.validate_sweep()?;
        }
        if with_stats {
            settings.validate_stats()?;
        }

        let mut report = Report::default();
        if with_sweep {
            report.estimates = sweep(settings, rng)?;
        }
        if with_stats {
            report.draw_stats = Some(draw_stats(settings.n, settings.trials, settings, rng)?);
            if settings.n <= settings.exact_up_to.min(exact::MAX_EXACT_N) {
                let p = exact::hamiltonian_probability(settings.n)?;
                info!(n = settings.n, exact = p, "exact single-cycle probability");
                report.draw_stats_exact = Some(p);
            }
        }
        Ok(report)
    }

    /// Plain lines only. Exact probabilities stay in the JSON form and the log.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for estimate in &self.estimates {
            writeln!(out, "{}", estimate_line(estimate))?;
        }
        if let Some(stats) = &self.draw_stats {
            for line in draw_stat_lines(stats) {
                writeln!(out, "{}", line)?;
            }
            writeln!(out, "Number of different draws: {}", stats.distinct())?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn estimate_line(estimate: &Estimate) -> String {
    format!("n={}, p={}", estimate.n, float_literal(estimate.probability))
}

/// Shortest decimal form, always with a fractional part (`1.0`, not `1`).
pub fn float_literal(x: f64) -> String {
    let s = x.to_string();
    if x.is_finite() && !s.contains('.') {
        s + ".0"
    } else {
        s
    }
}

pub fn draw_stat_lines(stats: &DrawStats) -> Vec<String> {
    stats
        .entries
        .iter()
        .map(|e| {
            format!(
                "{}, {}, {}, {}",
                e.permutation,
                e.is_hamiltonian,
                e.count,
                float_literal(e.frequency)
            )
        })
        .collect()
}
