//! Passing the hat around.
//!
//! `n` people each put their name in a hat, then take turns drawing. Drawing
//! your own name means putting it back and drawing again. If the last person
//! is left with only their own name, everything goes back in the hat and the
//! draw starts over.

use rand::Rng;
use tracing::trace;

use crate::error::{HatError, Result};
use crate::permutation::Permutation;

pub const DEFAULT_MAX_RESTARTS: u64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draw {
    pub permutation: Permutation,
    /// full start-overs caused by the last person drawing their own name.
    pub restarts: u64,
    /// own-name draws that were put back without starting over.
    pub redraws: u64,
}

#[derive(Clone, Debug)]
pub struct Hat {
    n: usize,
    max_restarts: u64,
    pool: Vec<usize>,
    result: Vec<usize>,
}

impl Hat {
    /// n = 1 is rejected: the single person can only ever draw themselves, so
    /// the draw would restart forever.
    pub fn new(n: usize, max_restarts: u64) -> Result<Self> {
        if n == 1 {
            return Err(HatError::invalid(
                "a hat with a single name can never be drawn without a self-match",
            ));
        }
        Ok(Hat {
            n,
            max_restarts,
            pool: Vec::with_capacity(n),
            result: Vec::with_capacity(n),
        })
    }

    fn refill(&mut self) {
        self.result.clear();
        self.pool.clear();
        self.pool.extend(0..self.n);
    }

    /// One complete draw. The hat can be reused for the next one.
    pub fn pass_around<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Draw> {
        self.refill();
        let mut restarts = 0u64;
        let mut redraws = 0u64;

        while !self.pool.is_empty() {
            let slot = rng.gen_range(0..self.pool.len());
            let snippet = self.pool[slot];
            let drawer = self.result.len();

            if snippet == drawer {
                if drawer == self.n - 1 {
                    restarts += 1;
                    trace!(n = self.n, restarts, "last drawer got their own name, starting over");
                    if restarts > self.max_restarts {
                        return Err(HatError::RetryLimitExceeded {
                            n: self.n,
                            restarts,
                        });
                    }
                    self.refill();
                } else {
                    redraws += 1;
                }
                continue;
            }

            // pool order carries no meaning, so swap_remove keeps draws uniform.
            self.pool.swap_remove(slot);
            self.result.push(snippet);
        }

        let permutation = Permutation::from_vec_unchecked(std::mem::take(&mut self.result));
        Ok(Draw {
            permutation,
            restarts,
            redraws,
        })
    }
}

/// A single draw with the default restart cap.
pub fn pass_around_hat<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Permutation> {
    Ok(Hat::new(n, DEFAULT_MAX_RESTARTS)?
        .pass_around(rng)?
        .permutation)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn rng() -> Pcg64 {
        Pcg64::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_empty_hat() {
        let p = pass_around_hat(0, &mut rng()).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn test_single_name_rejected() {
        assert!(matches!(Hat::new(1, 10), Err(HatError::InvalidInput(_))));
        assert!(pass_around_hat(1, &mut rng()).is_err());
    }

    #[test]
    fn test_two_names_always_swap() {
        let mut rng = rng();
        let mut hat = Hat::new(2, DEFAULT_MAX_RESTARTS).unwrap();
        for _ in 0..100 {
            let draw = hat.pass_around(&mut rng).unwrap();
            assert_eq!(draw.permutation.as_slice(), &[1, 0]);
            // with two names the last drawer is never left with only their own
            assert_eq!(draw.restarts, 0);
        }
    }

    #[test]
    fn test_redraws_counted() {
        // the first of two drawers picks their own name half the time
        let mut rng = rng();
        let mut hat = Hat::new(2, DEFAULT_MAX_RESTARTS).unwrap();
        let redraws: Vec<u64> = (0..200)
            .map(|_| hat.pass_around(&mut rng).unwrap().redraws)
            .collect();
        assert!(redraws.iter().any(|&r| r == 0));
        assert!(redraws.iter().any(|&r| r > 0));
    }

    #[test]
    fn test_no_fixed_points() {
        let mut rng = rng();
        for n in 2..10 {
            let mut hat = Hat::new(n, DEFAULT_MAX_RESTARTS).unwrap();
            for _ in 0..500 {
                let draw = hat.pass_around(&mut rng).unwrap();
                assert_eq!(draw.permutation.len(), n);
                assert!(draw.permutation.is_derangement(), "{}", draw.permutation);
            }
        }
    }

    #[test]
    fn test_restarts_happen_for_three() {
        // [1, 0, _] leaves person 2 with their own name, a quarter of the time
        let mut rng = rng();
        let mut hat = Hat::new(3, DEFAULT_MAX_RESTARTS).unwrap();
        let total: u64 = (0..1000)
            .map(|_| hat.pass_around(&mut rng).unwrap().restarts)
            .sum();
        assert!(total > 0);
    }

    #[test]
    fn test_restart_cap() {
        let mut rng = rng();
        let mut hat = Hat::new(3, 0).unwrap();
        let mut saw_cap = false;
        for _ in 0..200 {
            match hat.pass_around(&mut rng) {
                Ok(draw) => assert_eq!(draw.restarts, 0),
                Err(HatError::RetryLimitExceeded { n, restarts }) => {
                    assert_eq!((n, restarts), (3, 1));
                    saw_cap = true;
                }
                Err(e) => panic!("unexpected error {}", e),
            }
        }
        assert!(saw_cap);
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let a: Vec<_> = {
            let mut rng = rng();
            (0..20).map(|_| pass_around_hat(6, &mut rng).unwrap()).collect()
        };
        let b: Vec<_> = {
            let mut rng = rng();
            (0..20).map(|_| pass_around_hat(6, &mut rng).unwrap()).collect()
        };
        assert_eq!(a, b);
    }
}
