//! Smallest pools that clear a probability bar.
//!
//! Adding a die never lowers the chance of reaching a fixed number of
//! successes, so a linear scan from zero dice finds the minimum.

use bon::Builder;

use crate::die::Die;
use crate::pool::Pool;
use crate::util::{PoolSize, Successes, Target};
use crate::{Error, Result, CASTING_SUCCESSES, SOLVER_MAX_POOL};

/// A minimal pool for one requirement and its botch risk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Requirement {
    pub successes: Successes,
    pub pool: PoolSize,
    pub chance: f64,
    pub botch: f64,
}

/// A casting ritual: one roll to cast, a second to avoid ageing.
#[derive(Builder, Clone, Copy, Debug, PartialEq)]
#[builder(start_fn(name = "new"))]
pub struct Ritual {
    #[builder(start_fn)]
    target: Target,
    #[builder(default = 0.0)]
    success: f64,
    #[builder(default = 0.0)]
    no_ageing: f64,
    /// Successes needed to avoid ageing; the casting target when unset.
    ageing_successes: Option<Successes>,
    #[builder(default)]
    die: Die,
    #[builder(default = SOLVER_MAX_POOL)]
    limit: PoolSize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RitualReport {
    pub target: Target,
    pub casting: Requirement,
    pub ageing: Requirement,
}

/// Smallest pool with P(successes >= required) strictly above `p`.
pub fn min_pool(
    die: Die,
    target: Target,
    required: Successes,
    p: f64,
    limit: PoolSize,
) -> Result<Requirement> {
    if !(0.0..1.0).contains(&p) {
        return Err(Error::Probability(p));
    }

    for size in 0..=limit {
        let pool = Pool::new(size, target).die(die).build();
        let chance = pool.ge(required);
        if chance > p {
            tracing::debug!(tn = target, required, p, size, chance, "minimal pool found");
            return Ok(Requirement {
                successes: required,
                pool: size,
                chance,
                botch: pool.botch(),
            });
        }
    }

    tracing::warn!(tn = target, required, p, limit, "no pool reached the threshold");
    Err(Error::Unreachable { p, limit })
}

impl Ritual {
    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    #[must_use]
    pub fn ageing_successes(&self) -> Successes {
        self.ageing_successes
            .unwrap_or_else(|| Successes::from(self.target))
    }

    /// Both thresholds are checked before any pool is searched.
    pub fn eval(&self) -> Result<RitualReport> {
        for p in [self.success, self.no_ageing] {
            if !(0.0..1.0).contains(&p) {
                return Err(Error::Probability(p));
            }
        }
        let casting = min_pool(
            self.die,
            self.target,
            CASTING_SUCCESSES,
            self.success,
            self.limit,
        )?;
        let ageing = min_pool(
            self.die,
            self.target,
            self.ageing_successes(),
            self.no_ageing,
            self.limit,
        )?;
        Ok(RitualReport {
            target: self.target,
            casting,
            ageing,
        })
    }
}

impl<S> RitualBuilder<S>
where
    S: ritual_builder::State,
    S: ritual_builder::IsComplete,
{
    pub fn eval(self) -> Result<RitualReport> {
        self.build().eval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dice_when_nothing_is_required() {
        let r = min_pool(Die::d10(), 6, 0, 0.99, 10).unwrap();
        assert_eq!(r.pool, 0);
        assert_eq!(r.chance, 1.0);
        assert_eq!(r.botch, 0.0);
    }

    #[test]
    fn one_success_at_five() {
        // Each die succeeds with 0.6, so 1 - 0.4^n > 0.9 first at n = 3.
        let r = min_pool(Die::d10(), 5, 1, 0.9, SOLVER_MAX_POOL).unwrap();
        assert_eq!(r.pool, 3);
        assert!((r.chance - (1.0 - 0.4f64.powi(3))).abs() < 1e-12);
        assert!((r.botch - Pool::new(3, 5).build().botch()).abs() < 1e-15);
    }

    #[test]
    fn threshold_is_strict() {
        // A single die at tn 6 succeeds with exactly 0.5.
        let r = min_pool(Die::d10(), 6, 1, 0.5, 10).unwrap();
        assert_eq!(r.pool, 2);
        let r = min_pool(Die::d10(), 6, 1, 0.49, 10).unwrap();
        assert_eq!(r.pool, 1);
    }

    #[test]
    fn rejects_bad_probabilities() {
        let d = Die::d10();
        assert_eq!(min_pool(d, 6, 1, 1.0, 10), Err(Error::Probability(1.0)));
        assert_eq!(min_pool(d, 6, 1, -0.1, 10), Err(Error::Probability(-0.1)));
        assert!(matches!(
            min_pool(d, 6, 1, f64::NAN, 10),
            Err(Error::Probability(_))
        ));
    }

    #[test]
    fn reports_unreachable_limits() {
        let r = min_pool(Die::d10(), 6, 5, 0.5, 3);
        assert_eq!(r, Err(Error::Unreachable { p: 0.5, limit: 3 }));
    }

    #[test]
    fn ritual_defaults_ageing_to_target() {
        let ritual = Ritual::new(5).success(0.9).no_ageing(0.9).build();
        assert_eq!(ritual.ageing_successes(), 5);
        let report = ritual.eval().unwrap();
        assert_eq!(report.casting.successes, 1);
        assert_eq!(report.casting.pool, 3);
        assert_eq!(report.ageing.successes, 5);

        let n = report.ageing.pool;
        assert!(Pool::new(n, 5).build().ge(5) > 0.9);
        assert!(Pool::new(n - 1, 5).build().ge(5) <= 0.9);
    }

    #[test]
    fn ritual_rejects_either_probability() {
        let r = Ritual::new(5).success(0.5).no_ageing(1.5).eval();
        assert_eq!(r, Err(Error::Probability(1.5)));
        let r = Ritual::new(5).success(-1.0).no_ageing(0.5).eval();
        assert_eq!(r, Err(Error::Probability(-1.0)));
    }

    #[test]
    fn ritual_with_explicit_ageing() {
        let report = Ritual::new(7)
            .success(0.5)
            .no_ageing(0.5)
            .ageing_successes(2)
            .eval()
            .unwrap();
        assert_eq!(report.ageing.successes, 2);
        assert!(report.ageing.pool >= report.casting.pool);
    }
}
