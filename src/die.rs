//! A single open-ended die.
//!
//! Rolling the top face adds it to the running total and rolls again, so a
//! die with `n` sides can reach any positive total. Totals that are positive
//! multiples of `n` are never final: the explosion always adds to them.

use num::rational::Ratio;
use num::traits::{One, Zero};
use num::BigUint;
use rand::{Rng, RngCore};

use crate::util::{Target, Total};
use crate::{Error, Result, DEFAULT_SIDES};

/// Unreduced probability over `sides^depth` equally likely branches.
pub type Exact = Ratio<BigUint>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Die {
    sides: u32,
}

impl Default for Die {
    fn default() -> Self {
        Self::d10()
    }
}

impl Die {
    pub fn new(sides: u32) -> Result<Self> {
        if sides < 2 {
            return Err(Error::Sides(sides));
        }
        Ok(Self { sides })
    }

    #[must_use]
    pub const fn d10() -> Self {
        Self {
            sides: DEFAULT_SIDES,
        }
    }

    #[must_use]
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// P(roll <= d).
    #[must_use]
    pub fn le(&self, d: Target) -> f64 {
        1.0 - self.gt_wide(Total::from(d))
    }

    /// P(roll < d).
    #[must_use]
    pub fn lt(&self, d: Target) -> f64 {
        1.0 - self.gt_wide(Total::from(d) - 1)
    }

    /// P(roll >= d).
    #[must_use]
    pub fn ge(&self, d: Target) -> f64 {
        self.gt_wide(Total::from(d) - 1)
    }

    /// P(roll > d).
    #[must_use]
    pub fn gt(&self, d: Target) -> f64 {
        self.gt_wide(Total::from(d))
    }

    /// P(roll == d).
    #[must_use]
    pub fn eq(&self, d: Target) -> f64 {
        let d = Total::from(d);
        self.gt_wide(d - 1) - self.gt_wide(d)
    }

    /// P(lo <= roll < hi).
    #[must_use]
    pub fn interval(&self, lo: Target, hi: Target) -> f64 {
        let v = self.gt_wide(Total::from(lo) - 1) - self.gt_wide(Total::from(hi) - 1);
        v.max(0.0)
    }

    /// Exact P(roll <= d).
    #[must_use]
    pub fn le_exact(&self, d: Target) -> Exact {
        self.le_exact_wide(Total::from(d))
    }

    /// Exact P(roll < d), over `sides^self.lt_depth(d)` branches.
    #[must_use]
    pub fn lt_exact(&self, d: Target) -> Exact {
        self.le_exact_wide(Total::from(d) - 1)
    }

    /// Number of rolls that decide whether a total stays at or below `d`.
    #[must_use]
    pub fn le_depth(&self, d: Target) -> u32 {
        self.depth_wide(Total::from(d))
    }

    #[must_use]
    pub fn lt_depth(&self, d: Target) -> u32 {
        self.depth_wide(Total::from(d) - 1)
    }

    /// Rolls the die once, exploding on the top face.
    pub fn roll<G>(&self, rng: &mut G) -> Total
    where
        G: RngCore,
    {
        let mut total = 0;
        loop {
            let face = rng.gen_range(1..=self.sides);
            total += Total::from(face);
            if face < self.sides {
                return total;
            }
        }
    }

    /// `d = sides * t + i` with `0 < i < sides`, or `None` when `d < 1`.
    fn split(&self, d: Total) -> Option<(Total, Total)> {
        if d < 1 {
            return None;
        }
        let n = Total::from(self.sides);
        let d = if d % n == 0 { d - 1 } else { d };
        Some((d / n, d % n))
    }

    fn gt_wide(&self, d: Total) -> f64 {
        match self.split(d) {
            None => 1.0,
            Some((t, i)) => {
                let n = f64::from(self.sides);
                let depth = i32::try_from(t + 1).unwrap_or(i32::MAX);
                (n - i as f64) * n.recip().powi(depth)
            }
        }
    }

    fn depth_wide(&self, d: Total) -> u32 {
        self.split(d)
            .map_or(0, |(t, _)| u32::try_from(t + 1).unwrap_or(u32::MAX))
    }

    fn le_exact_wide(&self, d: Total) -> Exact {
        match self.split(d) {
            None => Ratio::new_raw(BigUint::zero(), BigUint::one()),
            Some((t, i)) => {
                let depth = self.depth_wide(d);
                debug_assert_eq!(Total::from(depth), t + 1);
                let denom = BigUint::from(self.sides).pow(depth);
                let above = BigUint::from(self.sides) - BigUint::from(i as u64);
                Ratio::new_raw(&denom - above, denom)
            }
        }
    }
}
