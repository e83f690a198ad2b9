//! Success counts for a pool of open-ended dice rolled against one target.
//!
//! Each die succeeds independently with `p = ge(target)` and fails with
//! `q = interval(1, target)`, so the success count is binomial. Small pools are
//! counted exactly over `sides^(depth * size)` branches; large pools fall back
//! to log-space terms and the regularized incomplete beta tail,
//! `P(X <= k) = I_{1-p}(n - k, k + 1)`.

use bon::Builder;
use itertools::Itertools;
use num::integer::binomial;
use num::traits::{One, Zero};
use num::BigUint;
use statrs::function::beta::beta_reg;
use statrs::function::factorial::ln_binomial;

use crate::die::Die;
use crate::util::{clamp_probability, ratio, PoolSize, Successes, Target};
use crate::{DIRECT_MAX_DIGITS, DIRECT_MAX_POOL};

#[derive(Builder, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[builder(start_fn(name = "new"))]
pub struct Pool {
    #[builder(start_fn)]
    size: PoolSize,
    #[builder(start_fn)]
    target: Target,
    #[builder(default)]
    die: Die,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Exact outcome counts, converted to `f64` once.
    Direct,
    /// Log-space terms and the incomplete beta tail.
    Analytic,
}

/// Every success count of a pool with its exact and at-least probabilities.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    exact: Vec<f64>,
    at_least: Vec<f64>,
}

/// Per-die branch counts: `hit + miss == denom`.
struct Counts {
    hit: BigUint,
    miss: BigUint,
    denom: BigUint,
}

impl Strategy {
    #[inline]
    pub(crate) fn select(size: PoolSize, depth: u32) -> Strategy {
        if size <= DIRECT_MAX_POOL && u64::from(size) * u64::from(depth) <= DIRECT_MAX_DIGITS {
            Strategy::Direct
        } else {
            Strategy::Analytic
        }
    }
}

impl Pool {
    #[must_use]
    pub fn size(&self) -> PoolSize {
        self.size
    }

    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    #[must_use]
    pub fn die(&self) -> Die {
        self.die
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        Strategy::select(self.size, self.die.lt_depth(self.target))
    }

    /// Probability that one die succeeds.
    #[must_use]
    pub fn hit(&self) -> f64 {
        self.die.ge(self.target)
    }

    /// Probability that one die fails.
    #[must_use]
    pub fn miss(&self) -> f64 {
        self.die.interval(1, self.target)
    }

    /// P(successes == s).
    #[must_use]
    pub fn exact(&self, s: Successes) -> f64 {
        if s < 0 || s > Successes::from(self.size) {
            return 0.0;
        }
        let k = s as PoolSize;
        match self.strategy() {
            Strategy::Direct => self.exact_direct(k),
            Strategy::Analytic => self.exact_analytic(k),
        }
    }

    /// P(successes <= s).
    #[must_use]
    pub fn cumulative(&self, s: Successes) -> f64 {
        if s < 0 {
            return 0.0;
        }
        if s >= Successes::from(self.size) {
            return 1.0;
        }
        let k = s as PoolSize;
        match self.strategy() {
            Strategy::Direct => self.cumulative_direct(k),
            Strategy::Analytic => self.cumulative_analytic(k),
        }
    }

    /// P(successes < s).
    #[must_use]
    pub fn lt(&self, s: Successes) -> f64 {
        self.cumulative(s.saturating_sub(1))
    }

    /// P(successes >= s).
    #[must_use]
    pub fn ge(&self, s: Successes) -> f64 {
        1.0 - self.lt(s)
    }

    /// P(successes > s).
    #[must_use]
    pub fn gt(&self, s: Successes) -> f64 {
        1.0 - self.cumulative(s)
    }

    #[must_use]
    pub fn distribution(&self) -> Distribution {
        let strategy = self.strategy();
        tracing::debug!(size = self.size, tn = self.target, ?strategy, "pool distribution");
        match strategy {
            Strategy::Direct => self.distribution_direct(),
            Strategy::Analytic => self.distribution_analytic(),
        }
    }

    fn counts(&self) -> Counts {
        let miss = self.die.lt_exact(self.target);
        let denom = miss.denom().clone();
        let miss = miss.numer().clone();
        Counts {
            hit: &denom - &miss,
            miss,
            denom,
        }
    }

    fn term(&self, c: &Counts, k: PoolSize) -> BigUint {
        binomial(BigUint::from(self.size), BigUint::from(k)) * c.hit.pow(k) * c.miss.pow(self.size - k)
    }

    fn exact_direct(&self, k: PoolSize) -> f64 {
        let c = self.counts();
        ratio(self.term(&c, k), c.denom.pow(self.size))
    }

    fn cumulative_direct(&self, k: PoolSize) -> f64 {
        let c = self.counts();
        let total = c.denom.pow(self.size);
        let below = if k <= self.size / 2 {
            (0..=k).map(|i| self.term(&c, i)).sum::<BigUint>()
        } else {
            let above = ((k + 1)..=self.size)
                .map(|i| self.term(&c, i))
                .sum::<BigUint>();
            &total - above
        };
        ratio(below, total)
    }

    fn exact_analytic(&self, k: PoolSize) -> f64 {
        let (p, q) = (self.hit(), self.miss());
        if p <= 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if q <= 0.0 {
            return if k == self.size { 1.0 } else { 0.0 };
        }
        let (n, k) = (u64::from(self.size), u64::from(k));
        let ln = ln_binomial(n, k) + k as f64 * p.ln() + (n - k) as f64 * q.ln();
        clamp_probability(ln.exp())
    }

    /// Callers guarantee `k < size`.
    fn cumulative_analytic(&self, k: PoolSize) -> f64 {
        let p = self.hit();
        if p <= 0.0 {
            return 1.0;
        }
        if p >= 1.0 {
            return 0.0;
        }
        let (a, b) = (f64::from(self.size - k), f64::from(k) + 1.0);
        clamp_probability(beta_reg(a, b, 1.0 - p))
    }

    fn distribution_direct(&self) -> Distribution {
        let c = self.counts();
        let n = self.size;
        let total = c.denom.pow(n);

        let mut miss_pows = Vec::with_capacity(n as usize + 1);
        let mut acc = BigUint::one();
        for _ in 0..=n {
            miss_pows.push(acc.clone());
            acc *= &c.miss;
        }

        let mut terms = Vec::with_capacity(n as usize + 1);
        let mut choose = BigUint::one();
        let mut hit_pow = BigUint::one();
        for k in 0..=n {
            terms.push(&choose * &hit_pow * &miss_pows[(n - k) as usize]);
            choose = choose * BigUint::from(n - k) / BigUint::from(k + 1);
            hit_pow *= &c.hit;
        }

        let mut at_least = vec![0.0; terms.len()];
        let mut tail = BigUint::zero();
        for (k, term) in terms.iter().enumerate().rev() {
            tail += term;
            at_least[k] = ratio(tail.clone(), total.clone());
        }

        let exact = terms
            .into_iter()
            .map(|t| ratio(t, total.clone()))
            .collect_vec();

        Distribution { exact, at_least }
    }

    fn distribution_analytic(&self) -> Distribution {
        let n = self.size;
        let (p, q) = (self.hit(), self.miss());

        let exact = if p <= 0.0 || q <= 0.0 {
            (0..=n).map(|k| self.exact_analytic(k)).collect_vec()
        } else {
            // ln t(k+1) = ln t(k) + ln((n - k) / (k + 1)) + ln(p / q)
            let odds = (p / q).ln();
            let mut ln_term = f64::from(n) * q.ln();
            let mut exact = Vec::with_capacity(n as usize + 1);
            for k in 0..=n {
                exact.push(clamp_probability(ln_term.exp()));
                if k < n {
                    ln_term += (f64::from(n - k) / f64::from(k + 1)).ln() + odds;
                }
            }
            exact
        };

        let mut at_least = vec![0.0; exact.len()];
        let mut tail = 0.0_f64;
        for (k, e) in exact.iter().enumerate().rev() {
            tail += *e;
            at_least[k] = clamp_probability(tail);
        }

        Distribution { exact, at_least }
    }
}

impl Distribution {
    #[must_use]
    pub fn exact(&self) -> &[f64] {
        &self.exact
    }

    #[must_use]
    pub fn at_least(&self) -> &[f64] {
        &self.at_least
    }

    /// Largest success count with a row; the pool size.
    #[must_use]
    pub fn max(&self) -> Successes {
        self.exact.len() as Successes - 1
    }

    /// P(successes == s), 0 outside the table.
    #[must_use]
    pub fn exact_at(&self, s: Successes) -> f64 {
        usize::try_from(s)
            .ok()
            .and_then(|i| self.exact.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// P(successes >= s), 1 below the table and 0 above it.
    #[must_use]
    pub fn at_least_at(&self, s: Successes) -> f64 {
        if s <= 0 {
            return 1.0;
        }
        usize::try_from(s)
            .ok()
            .and_then(|i| self.at_least.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// `(successes, exact, at_least)` rows in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = (Successes, f64, f64)> + '_ {
        self.exact
            .iter()
            .zip(&self.at_least)
            .enumerate()
            .map(|(s, (e, a))| (s as Successes, *e, *a))
    }
}
