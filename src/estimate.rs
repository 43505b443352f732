//! Monte Carlo over many hat draws.

use std::collections::HashMap;

use itertools::Itertools;
use rand::Rng;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{HatError, Result};
use crate::exact;
use crate::hat::{Draw, Hat};
use crate::permutation::Permutation;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Estimate {
    pub n: usize,
    pub trials: u64,
    pub completed: u64,
    /// trials that hit the restart cap and were left out
    pub aborted: u64,
    pub hamiltonian: u64,
    pub probability: f64,
    pub std_error: f64,
    pub confidence: f64,
    pub interval: (f64, f64),
    pub mean_restarts: f64,
    /// own-name draws put back, per finished trial
    pub mean_redraws: f64,
    /// filled in by `sweep` for small n
    pub exact: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrawStat {
    pub permutation: Permutation,
    pub is_hamiltonian: bool,
    pub count: u64,
    pub frequency: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrawStats {
    pub n: usize,
    pub trials: u64,
    pub aborted: u64,
    /// most frequent first
    pub entries: Vec<DrawStat>,
}

impl DrawStats {
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

fn check_run(n: usize, trials: u64) -> Result<()> {
    if n < 2 {
        return Err(HatError::invalid(format!("need at least 2 people, got n={}", n)));
    }
    if trials == 0 {
        return Err(HatError::invalid("need at least one trial"));
    }
    Ok(())
}

/// Runs `trials` draws and hands each finished one to `f`. Draws that hit the
/// restart cap are counted and skipped; if none finish, the cap error is returned.
fn run_trials<R, F>(n: usize, trials: u64, max_restarts: u64, rng: &mut R, mut f: F) -> Result<u64>
where
    R: Rng + ?Sized,
    F: FnMut(Draw) -> Result<()>,
{
    check_run(n, trials)?;
    let mut hat = Hat::new(n, max_restarts)?;
    let mut aborted = 0u64;
    let mut last_error = None;
    for _ in 0..trials {
        match hat.pass_around(rng) {
            Ok(draw) => f(draw)?,
            Err(e @ HatError::RetryLimitExceeded { .. }) => {
                aborted += 1;
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    if aborted > 0 {
        warn!(n, aborted, trials, "some draws hit the restart cap and were dropped");
    }
    if aborted == trials {
        if let Some(e) = last_error {
            return Err(e);
        }
    }
    Ok(aborted)
}

fn normal_quantile(confidence: f64) -> Result<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(HatError::invalid(format!(
            "confidence must lie in (0, 1), got {}",
            confidence
        )));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| HatError::invalid(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + confidence / 2.0))
}

/// Fraction of `trials` draws for `n` people that form a single cycle.
pub fn estimate<R: Rng + ?Sized>(
    n: usize,
    trials: u64,
    settings: &Settings,
    rng: &mut R,
) -> Result<Estimate> {
    let z = normal_quantile(settings.confidence)?;
    let mut completed = 0u64;
    let mut hamiltonian = 0u64;
    let mut restarts = 0u64;
    let mut redraws = 0u64;

    let aborted = run_trials(n, trials, settings.max_restarts, rng, |draw| {
        completed += 1;
        restarts += draw.restarts;
        redraws += draw.redraws;
        if draw.permutation.is_hamiltonian()? {
            hamiltonian += 1;
        }
        Ok(())
    })?;

    let p = hamiltonian as f64 / completed as f64;
    let std_error = (p * (1.0 - p) / completed as f64).sqrt();
    let estimate = Estimate {
        n,
        trials,
        completed,
        aborted,
        hamiltonian,
        probability: p,
        std_error,
        confidence: settings.confidence,
        interval: ((p - z * std_error).max(0.0), (p + z * std_error).min(1.0)),
        mean_restarts: restarts as f64 / completed as f64,
        mean_redraws: redraws as f64 / completed as f64,
        exact: None,
    };
    debug!(
        n,
        p = estimate.probability,
        std_error = estimate.std_error,
        mean_restarts = estimate.mean_restarts,
        mean_redraws = estimate.mean_redraws,
        "estimate done"
    );
    Ok(estimate)
}

/// One estimate per n in `[settings.n_min, settings.n_max)`.
pub fn sweep<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Result<Vec<Estimate>> {
    if settings.n_min >= settings.n_max {
        return Err(HatError::invalid(format!(
            "empty sweep range [{}, {})",
            settings.n_min, settings.n_max
        )));
    }
    (settings.n_min..settings.n_max)
        .map(|n| {
            info!(n, trials = settings.trials, "estimating");
            let mut estimate = estimate(n, settings.trials, settings, rng)?;
            if n <= settings.exact_up_to.min(exact::MAX_EXACT_N) {
                let p = exact::hamiltonian_probability(n)?;
                info!(n, exact = p, "exact single-cycle probability");
                estimate.exact = Some(p);
            }
            Ok(estimate)
        })
        .collect()
}

/// How often each distinct permutation came out of `trials` draws.
pub fn draw_stats<R: Rng + ?Sized>(
    n: usize,
    trials: u64,
    settings: &Settings,
    rng: &mut R,
) -> Result<DrawStats> {
    let mut counter: HashMap<Permutation, u64> = HashMap::new();
    let aborted = run_trials(n, trials, settings.max_restarts, rng, |draw| {
        *counter.entry(draw.permutation).or_default() += 1;
        Ok(())
    })?;

    let completed = (trials - aborted) as f64;
    let entries = counter
        .into_iter()
        .sorted_by(|(pa, ca), (pb, cb)| cb.cmp(ca).then_with(|| pa.cmp(pb)))
        .map(|(permutation, count)| {
            Ok(DrawStat {
                is_hamiltonian: permutation.is_hamiltonian()?,
                permutation,
                count,
                frequency: count as f64 / completed,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(n, distinct = entries.len(), "draw stats done");
    Ok(DrawStats {
        n,
        trials,
        aborted,
        entries,
    })
}
