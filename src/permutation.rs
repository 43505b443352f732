use std::fmt;

use itertools::Itertools;
use serde::{Serialize, Serializer};

use crate::cycle;
use crate::error::{HatError, Result};

/// For each person (index), the person whose snippet they drew.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// Checks that `values` is a bijection on `0..values.len()`.
    pub fn new(values: impl IntoIterator<Item = usize>) -> Result<Self> {
        let vec: Vec<usize> = values.into_iter().collect();
        check_bijection(&vec)?;
        Ok(Self(vec))
    }

    /// Only for callers that built `values` as a bijection themselves (the hat).
    pub(crate) fn from_vec_unchecked(values: Vec<usize>) -> Self {
        debug_assert!(check_bijection(&values).is_ok(), "{:?}", values);
        Self(values)
    }

    pub fn identity(size: usize) -> Self {
        Self((0..size).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn fixed_points(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(i, v)| i == *v)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_derangement(&self) -> bool {
        self.0.iter().enumerate().all(|(i, v)| i != *v)
    }

    /// Whether following successors from 0 visits everyone before coming back.
    /// The empty permutation is rejected, there is no cycle to speak of.
    pub fn is_hamiltonian(&self) -> Result<bool> {
        if self.is_empty() {
            return Err(HatError::invalid("empty permutation has no cycles"));
        }
        Ok(cycle::follows_single_cycle(&self.0))
    }

    /// Full cycle decomposition. Each cycle starts at its smallest index, and
    /// cycles are ordered by that index.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.0.len()];
        let mut cycles = Vec::new();
        for start in 0..self.0.len() {
            if visited[start] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut index = start;
            while !visited[index] {
                visited[index] = true;
                cycle.push(index);
                index = self.0[index];
            }
            cycles.push(cycle);
        }
        cycles
    }

    pub fn cycle_lengths(&self) -> Vec<usize> {
        self.cycles().iter().map(Vec::len).collect()
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

impl Serialize for Permutation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

pub(crate) fn check_bijection(values: &[usize]) -> Result<()> {
    let n = values.len();
    let mut seen = vec![false; n];
    for (i, &value) in values.iter().enumerate() {
        if value >= n {
            return Err(HatError::invalid(format!(
                "value {} at index {} is out of range for length {}",
                value, i, n
            )));
        }
        if seen[value] {
            return Err(HatError::invalid(format!(
                "value {} appears more than once",
                value
            )));
        }
        seen[value] = true;
    }
    // n values, all distinct and in range, so everything is covered.
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_valid_permutations() {
        assert!(Permutation::new([0, 1, 2]).is_ok());
        assert!(Permutation::new([2, 0, 1]).is_ok());
        assert!(Permutation::new([1, 0]).is_ok());
        assert!(Permutation::new(vec![0]).is_ok());
        assert!(Permutation::new(Vec::<usize>::new()).is_ok());
    }

    #[test]
    fn test_invalid_permutations() {
        for bad in [vec![0, 2], vec![0, 1, 1], vec![0, 1, 3], vec![1, 2, 3], vec![0, 0, 1]] {
            match Permutation::new(bad.clone()) {
                Err(HatError::InvalidInput(_)) => {}
                other => panic!("{:?} should be rejected, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_display_literal() {
        let p = Permutation::new([1, 2, 0]).unwrap();
        assert_eq!(p.to_string(), "[1, 2, 0]");
        assert_eq!(Permutation::identity(0).to_string(), "[]");
    }

    #[test]
    fn test_fixed_points() {
        let p = Permutation::new([0, 2, 1, 3]).unwrap();
        assert_eq!(p.fixed_points(), vec![0, 3]);
        assert!(!p.is_derangement());
        assert!(Permutation::new([1, 0, 3, 2]).unwrap().is_derangement());
    }

    #[test]
    fn test_cycles() {
        let p = Permutation::new([1, 0, 3, 2]).unwrap();
        assert_eq!(p.cycles(), vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(p.cycle_lengths(), vec![2, 2]);

        let p = Permutation::new([3, 0, 1, 2]).unwrap();
        assert_eq!(p.cycles(), vec![vec![0, 3, 2, 1]]);

        let p = Permutation::identity(3);
        assert_eq!(p.cycle_lengths(), vec![1, 1, 1]);
    }

    #[test]
    fn test_hamiltonian() {
        assert!(Permutation::new([1, 0]).unwrap().is_hamiltonian().unwrap());
        assert!(Permutation::new([2, 0, 1]).unwrap().is_hamiltonian().unwrap());
        assert!(!Permutation::new([1, 0, 3, 2]).unwrap().is_hamiltonian().unwrap());
        assert!(Permutation::identity(0).is_hamiltonian().is_err());
    }

    #[test]
    fn test_serialize_as_list() {
        let p = Permutation::new([2, 0, 1]).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "[2,0,1]");
    }
}
