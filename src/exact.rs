//! Exact outcome distribution of the hat draw, by brute force.
//!
//! Every drawer picks uniformly among the names left in the hat other than
//! their own (own-name draws are just put back). A branch where the last
//! drawer is left with their own name restarts the whole draw, so the final
//! distribution is the surviving branches' weights renormalised by their
//! total. Weights are kept as exact rationals.
//!
//! The enumeration visits every reachable draw sequence, roughly `n!` of them.

use std::collections::BTreeMap;

use num::{BigInt, BigRational, One, ToPrimitive, Zero};

use crate::cycle::follows_single_cycle;
use crate::error::{HatError, Result};
use crate::permutation::Permutation;

pub const MAX_EXACT_N: usize = 10;

pub fn draw_distribution(n: usize) -> Result<BTreeMap<Permutation, BigRational>> {
    if n < 2 {
        return Err(HatError::invalid(format!(
            "exact distribution needs at least 2 people, got {}",
            n
        )));
    }
    if n > MAX_EXACT_N {
        return Err(HatError::invalid(format!(
            "exact distribution is limited to n <= {}, got {}",
            MAX_EXACT_N, n
        )));
    }

    let mut leaves = BTreeMap::new();
    let mut result = Vec::with_capacity(n);
    let pool: Vec<usize> = (0..n).collect();
    descend(&mut result, &pool, BigRational::one(), &mut leaves);

    let total = leaves
        .values()
        .fold(BigRational::zero(), |acc, w| acc + w);
    Ok(leaves
        .into_iter()
        .map(|(draw, w)| (Permutation::from_vec_unchecked(draw), w / &total))
        .collect())
}

fn descend(
    result: &mut Vec<usize>,
    pool: &[usize],
    weight: BigRational,
    leaves: &mut BTreeMap<Vec<usize>, BigRational>,
) {
    if pool.is_empty() {
        *leaves.entry(result.clone()).or_insert_with(BigRational::zero) += weight;
        return;
    }
    let drawer = result.len();
    let choices: Vec<usize> = pool.iter().copied().filter(|&v| v != drawer).collect();
    // only the last drawer can be left with nothing but their own name
    if choices.is_empty() {
        return;
    }
    let share = weight / BigRational::from_integer(BigInt::from(choices.len()));
    for &snippet in &choices {
        let rest: Vec<usize> = pool.iter().copied().filter(|&v| v != snippet).collect();
        result.push(snippet);
        descend(result, &rest, share.clone(), leaves);
        result.pop();
    }
}

pub fn hamiltonian_probability_ratio(n: usize) -> Result<BigRational> {
    Ok(draw_distribution(n)?
        .into_iter()
        .filter(|(p, _)| follows_single_cycle(p.as_slice()))
        .fold(BigRational::zero(), |acc, (_, w)| acc + w))
}

pub fn hamiltonian_probability(n: usize) -> Result<f64> {
    let ratio = hamiltonian_probability_ratio(n)?;
    ratio
        .to_f64()
        .ok_or_else(|| HatError::invalid(format!("exact probability for n={} does not fit f64", n)))
}
