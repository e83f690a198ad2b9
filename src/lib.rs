pub mod analysis;
mod approx;
mod botch;
mod contest;
mod die;
mod pool;
pub mod print;
mod solver;
mod util;

pub use analysis::{AttrReport, ContReport, Report, Request, Row};
pub use approx::{Approx, Empirical};
pub use botch::botch;
pub use contest::Contest;
pub use die::{Die, Exact};
pub use pool::{Distribution, Pool, Strategy};
pub use solver::{min_pool, Requirement, Ritual, RitualReport};
use thiserror::Error;
pub use util::{PoolSize, Successes, Target, Total};

pub type Result<T> = ::core::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum Error {
    #[error("probability {0} is outside [0, 1)")]
    Probability(f64),
    #[error("a die needs at least two sides, got {0}")]
    Sides(u32),
    #[error("no pool of up to {limit} dice succeeds with probability above {p}")]
    Unreachable { p: f64, limit: PoolSize },
}

pub const DEFAULT_SIDES: u32 = 10;
pub const CASTING_SUCCESSES: Successes = 1;
pub const SOLVER_MAX_POOL: PoolSize = 100_000;
const DIRECT_MAX_POOL: PoolSize = 400;
const DIRECT_MAX_DIGITS: u64 = 2_048;
const APPROX_SAMPLE_SIZE: u32 = 1_000_000;
