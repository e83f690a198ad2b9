//! Opposed rolls: the margin `ours - theirs` between two independent pools.

use itertools::Itertools;

use crate::pool::{Distribution, Pool};
use crate::util::{clamp_probability, Successes};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Contest {
    ours: Pool,
    theirs: Pool,
}

impl Contest {
    #[must_use]
    pub fn new(ours: Pool, theirs: Pool) -> Self {
        Self { ours, theirs }
    }

    #[must_use]
    pub fn ours(&self) -> Pool {
        self.ours
    }

    #[must_use]
    pub fn theirs(&self) -> Pool {
        self.theirs
    }

    /// Every reachable margin, from `-theirs.size()` to `ours.size()`.
    pub fn margins(&self) -> impl Iterator<Item = Successes> {
        -Successes::from(self.theirs.size())..=Successes::from(self.ours.size())
    }

    /// P(margin == m).
    #[must_use]
    pub fn exact(&self, m: Successes) -> f64 {
        let v = (0..=Successes::from(self.ours.size()))
            .map(|k| self.ours.exact(k) * self.theirs.exact(k.saturating_sub(m)))
            .sum();
        clamp_probability(v)
    }

    /// P(margin <= m): given `k` of ours, they need at least `k - m`.
    #[must_use]
    pub fn cumulative(&self, m: Successes) -> f64 {
        let v = (0..=Successes::from(self.ours.size()))
            .map(|k| self.ours.exact(k) * self.theirs.ge(k.saturating_sub(m)))
            .sum();
        clamp_probability(v)
    }

    /// P(margin < m).
    #[must_use]
    pub fn lt(&self, m: Successes) -> f64 {
        self.cumulative(m.saturating_sub(1))
    }

    /// P(margin >= m).
    #[must_use]
    pub fn ge(&self, m: Successes) -> f64 {
        1.0 - self.lt(m)
    }

    /// P(margin > m).
    #[must_use]
    pub fn gt(&self, m: Successes) -> f64 {
        1.0 - self.cumulative(m)
    }

    /// `(margin, exact, at_least)` for every margin, computed from each
    /// pool's distribution once rather than per margin.
    #[must_use]
    pub fn distribution(&self) -> Vec<(Successes, f64, f64)> {
        let ours = self.ours.distribution();
        let theirs = self.theirs.distribution();
        self.margins()
            .map(|m| {
                let exact = convolve(&ours, |k| theirs.exact_at(k - m));
                let at_least = 1.0 - convolve(&ours, |k| theirs.at_least_at(k - m + 1));
                (m, clamp_probability(exact), clamp_probability(at_least))
            })
            .collect_vec()
    }
}

fn convolve<F>(ours: &Distribution, theirs: F) -> f64
where
    F: Fn(Successes) -> f64,
{
    ours.rows().map(|(k, p, _)| p * theirs(k)).sum()
}
