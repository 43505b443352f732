//! Does a draw close into one big loop, or several small ones?
//!
//! Every index of a permutation lies on exactly one cycle, so it is enough to
//! walk the cycle through index 0 and see whether it reaches everyone.

use crate::error::{HatError, Result};
use crate::permutation::check_bijection;

/// Follows `draw` from index 0 until a value repeats. True iff the walk
/// touched all `draw.len()` people.
///
/// `draw` must be a bijection on `0..draw.len()`; anything else (including an
/// empty slice) is rejected rather than guessed at.
pub fn is_hamiltonian(draw: &[usize]) -> Result<bool> {
    if draw.is_empty() {
        return Err(HatError::invalid("empty draw has no cycles"));
    }
    check_bijection(draw)?;
    Ok(follows_single_cycle(draw))
}

// caller guarantees a non-empty bijection.
pub(crate) fn follows_single_cycle(draw: &[usize]) -> bool {
    let n = draw.len();
    let mut visited = vec![false; n];
    let mut index = 0;
    let mut length = 0;
    while !visited[draw[index]] {
        visited[draw[index]] = true;
        index = draw[index];
        length += 1;
    }
    length == n
}
