//! Botches: a pool where every die fails and at least two dice show a natural one.
//!
//! With `f = lt(tn)`, `o = eq(1)` and `r = interval(2, tn)` (so `f = o + r`),
//! inclusion-exclusion over the number of natural ones gives
//!
//! ```text
//! botch = f^n - r^n - n * o * r^(n-1)
//! ```

use num::BigUint;

use crate::die::Die;
use crate::pool::{Pool, Strategy};
use crate::util::{ratio, PoolSize, Target};

/// Probability that `size` dice all miss `target` with two or more natural ones.
#[must_use]
pub fn botch(die: &Die, size: PoolSize, target: Target) -> f64 {
    if target <= 1 || size <= 1 {
        return 0.0;
    }
    match Strategy::select(size, die.lt_depth(target)) {
        Strategy::Direct => botch_direct(die, size, target),
        Strategy::Analytic => botch_analytic(die, size, target),
    }
}

impl Pool {
    #[must_use]
    pub fn botch(&self) -> f64 {
        botch(&self.die(), self.size(), self.target())
    }
}

fn botch_direct(die: &Die, size: PoolSize, target: Target) -> f64 {
    // Everything over `sides^depth` branches per die; depth >= 1 since target >= 2.
    let fail = die.lt_exact(target);
    let denom = fail.denom().clone();
    let fail = fail.numer().clone();
    let ones = &denom / BigUint::from(die.sides());
    let rest = &fail - &ones;

    let all_fail = fail.pow(size);
    let no_ones = rest.pow(size);
    let one_one = BigUint::from(size) * &ones * rest.pow(size - 1);

    ratio(all_fail - no_ones - one_one, denom.pow(size))
}

fn botch_analytic(die: &Die, size: PoolSize, target: Target) -> f64 {
    let n = i32::try_from(size).unwrap_or(i32::MAX);
    let fail = die.lt(target);
    let ones = die.eq(1);
    let rest = die.interval(2, target);

    let all_fail = fail.powi(n);
    let v = all_fail - rest.powi(n) - f64::from(size) * ones * rest.powi(n - 1);
    v.clamp(0.0, all_fail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DIRECT_MAX_POOL;

    const EPS: f64 = 1e-12;

    #[test]
    fn degenerate_pools_never_botch() {
        let d = Die::d10();
        assert_eq!(botch(&d, 0, 8), 0.0);
        assert_eq!(botch(&d, 1, 8), 0.0);
        assert_eq!(botch(&d, 5, 1), 0.0);
        assert_eq!(botch(&d, 5, -4), 0.0);
    }

    #[test]
    fn two_dice_need_two_ones() {
        // lt(6) = 0.5, eq(1) = 0.1, interval(2, 6) = 0.4
        let d = Die::d10();
        assert!((botch(&d, 2, 6) - 0.01).abs() < EPS);
        // With tn = 2 the only failure is a natural one.
        assert!((botch(&d, 3, 2) - 0.001).abs() < EPS);
    }

    #[test]
    fn three_dice_by_enumeration() {
        let d = Die::d10();
        let (f, o, r) = (d.lt(7), d.eq(1), d.interval(2, 7));
        // Exactly two ones and one other failure, or three ones.
        let expected = 3.0 * o * o * r + o * o * o;
        assert!((botch(&d, 3, 7) - expected).abs() < EPS);
        assert!(botch(&d, 3, 7) <= f.powi(3));
    }

    #[test]
    fn strategies_agree() {
        let d = Die::d10();
        for size in [2, 3, 9, 40] {
            for target in [2, 5, 10, 13, 27] {
                let direct = botch_direct(&d, size, target);
                let analytic = botch_analytic(&d, size, target);
                assert!(
                    (direct - analytic).abs() < 1e-9,
                    "size={size} target={target}: {direct} vs {analytic}"
                );
            }
        }
    }

    #[test]
    fn bounded_by_total_failure() {
        let d = Die::d10();
        for size in [2, 4, 17, DIRECT_MAX_POOL + 3] {
            for target in [2, 6, 11, 40] {
                let b = botch(&d, size, target);
                assert!(b >= 0.0);
                assert!(b <= d.lt(target).powi(size as i32) + EPS);
            }
        }
    }

    #[test]
    fn pool_botch_delegates() {
        let p = Pool::new(2, 6).build();
        assert!((p.botch() - 0.01).abs() < EPS);
    }
}
