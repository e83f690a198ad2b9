//! Monte Carlo sampling of open-ended dice, pools and contests.

use std::collections::BTreeMap;

use bon::Builder;
use rand::rngs::ThreadRng;
use rand::{thread_rng, RngCore};

use crate::die::Die;
use crate::pool::Pool;
use crate::util::{PoolSize, Target, Total};
use crate::APPROX_SAMPLE_SIZE;

/// Monte Carlo sampler for open-ended dice, used to sanity-check the closed forms.
#[derive(Debug, Builder)]
pub struct Approx<G = ThreadRng>
where
    G: RngCore,
{
    #[builder(finish_fn)]
    rng: G,
    #[builder(default)]
    die: Die,
    #[builder(default = APPROX_SAMPLE_SIZE)]
    sample_size: u32,
}

/// Observed frequencies of a sampled quantity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Empirical {
    counts: BTreeMap<Total, u64>,
    samples: u64,
}

impl Default for Approx<ThreadRng> {
    fn default() -> Self {
        Self::builder().build(thread_rng())
    }
}

impl<G> Approx<G>
where
    G: RngCore,
{
    #[must_use]
    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    /// One roll of the sampler's die.
    pub fn roll(&mut self) -> Total {
        self.die.roll(&mut self.rng)
    }

    pub fn eval<F>(&mut self, mut op: F) -> Empirical
    where
        F: FnMut(&Die, &mut G) -> Total,
    {
        let mut counts = BTreeMap::new();
        for _ in 0..self.sample_size {
            let k = op(&self.die, &mut self.rng);
            *counts.entry(k).or_default() += 1;
        }
        tracing::debug!(
            samples = self.sample_size,
            outcomes = counts.len(),
            "sampling finished"
        );
        Empirical {
            counts,
            samples: u64::from(self.sample_size),
        }
    }

    /// Totals of single rolls.
    pub fn rolls(&mut self) -> Empirical {
        self.eval(|die, rng| die.roll(rng))
    }

    /// Success counts of `size` dice against `target`.
    pub fn successes(&mut self, size: PoolSize, target: Target) -> Empirical {
        self.eval(|die, rng| count_successes(die, size, target, rng))
    }

    /// `1` for a botched pool, `0` otherwise.
    pub fn botches(&mut self, size: PoolSize, target: Target) -> Empirical {
        self.eval(|die, rng| {
            let mut ones = 0;
            let mut hit = false;
            for _ in 0..size {
                let x = die.roll(rng);
                hit |= x >= Total::from(target);
                // A total of one is only reachable by a natural one.
                ones += u32::from(x == 1);
            }
            Total::from(!hit && ones >= 2)
        })
    }

    /// Margins of `ours` over `theirs`, each pool rolling its own die.
    pub fn margins(&mut self, ours: Pool, theirs: Pool) -> Empirical {
        self.eval(|_, rng| {
            let a = count_successes(&ours.die(), ours.size(), ours.target(), rng);
            let b = count_successes(&theirs.die(), theirs.size(), theirs.target(), rng);
            a - b
        })
    }
}

fn count_successes<G>(die: &Die, size: PoolSize, target: Target, rng: &mut G) -> Total
where
    G: RngCore,
{
    let mut n = 0;
    for _ in 0..size {
        if die.roll(rng) >= Total::from(target) {
            n += 1;
        }
    }
    n
}

impl Empirical {
    #[must_use]
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Observed frequency of `k`.
    #[must_use]
    pub fn probability(&self, k: Total) -> f64 {
        let c = self.counts.get(&k).copied().unwrap_or(0);
        c as f64 / self.samples.max(1) as f64
    }

    /// Observed frequency of values at or above `k`.
    #[must_use]
    pub fn at_least(&self, k: Total) -> f64 {
        let c: u64 = self.counts.range(k..).map(|(_, c)| c).sum();
        c as f64 / self.samples.max(1) as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (Total, f64)> + '_ {
        self.counts
            .keys()
            .map(move |&k| (k, self.probability(k)))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::contest::Contest;

    const SAMPLES: u32 = 200_000;
    const TOLERANCE: f64 = 0.006;

    fn approx(seed: u64) -> Approx<StdRng> {
        Approx::builder()
            .sample_size(SAMPLES)
            .build(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn single_rolls_match_closed_form() {
        let d = Die::d10();
        let e = approx(1).rolls();
        assert_eq!(e.samples(), u64::from(SAMPLES));
        for x in 1..35 {
            let t = x as Target;
            assert!(
                (e.probability(x) - d.eq(t)).abs() < TOLERANCE,
                "eq({x})"
            );
            assert!(
                (e.at_least(x) - d.ge(t)).abs() < TOLERANCE,
                "ge({x})"
            );
        }
        assert_eq!(e.probability(10), 0.0);
    }

    #[test]
    fn pool_successes_match_closed_form() {
        let p = Pool::new(6, 8).build();
        let e = approx(2).successes(6, 8);
        for s in 0..=6 {
            assert!((e.probability(s) - p.exact(s)).abs() < TOLERANCE, "exact {s}");
            assert!((e.at_least(s) - p.ge(s)).abs() < TOLERANCE, "ge {s}");
        }
    }

    #[test]
    fn botches_match_closed_form() {
        let p = Pool::new(4, 9).build();
        let e = approx(3).botches(4, 9);
        assert!((e.probability(1) - p.botch()).abs() < TOLERANCE);
    }

    #[test]
    fn margins_match_closed_form() {
        let c = Contest::new(Pool::new(3, 6).build(), Pool::new(4, 8).build());
        let e = approx(4).margins(c.ours(), c.theirs());
        for m in c.margins() {
            assert!((e.probability(m) - c.exact(m)).abs() < TOLERANCE, "margin {m}");
        }
    }

    #[test]
    fn iter_is_sorted_and_normalised() {
        let e = approx(5).successes(3, 6);
        let keys: Vec<_> = e.iter().map(|(k, _)| k).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        let total: f64 = e.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
