use num::rational::Ratio;
use num::{BigUint, ToPrimitive};

pub type Target = i32;
pub type PoolSize = u32;
pub type Successes = i64;
pub type Total = i64;

/// `numer / denom` as a probability. `denom` is never zero.
pub(crate) fn ratio(numer: BigUint, denom: BigUint) -> f64 {
    Ratio::new(numer, denom)
        .to_f64()
        .map_or(0.0, |x| x.clamp(0.0, 1.0))
}

#[inline]
pub(crate) fn clamp_probability(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_converts_huge_counts() {
        let denom = BigUint::from(10u32).pow(900);
        let numer = &denom / BigUint::from(4u32);
        assert!((ratio(numer, denom) - 0.25).abs() < 1e-15);
    }
}
