//! The three analyses offered on the command line, as one closed set of requests.

use itertools::Itertools;

use crate::contest::Contest;
use crate::die::Die;
use crate::pool::Pool;
use crate::solver::{Ritual, RitualReport};
use crate::util::{PoolSize, Successes, Target};
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Request {
    /// Success counts and botch chance for one pool.
    Attr(Pool),
    /// Minimal pools for a casting ritual.
    Cast(Ritual),
    /// Margins of one pool against another.
    Cont(Contest),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Report {
    Attr(AttrReport),
    Cast(RitualReport),
    Cont(ContReport),
}

/// One success count or margin with its exact and at-least probabilities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Row {
    pub value: Successes,
    pub exact: f64,
    pub at_least: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttrReport {
    pub pool: Pool,
    pub botch: f64,
    pub rows: Vec<Row>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContReport {
    pub contest: Contest,
    pub our_botch: f64,
    pub their_botch: f64,
    pub rows: Vec<Row>,
}

impl Request {
    #[must_use]
    pub fn attr(die: Die, size: PoolSize, target: Target) -> Self {
        Request::Attr(Pool::new(size, target).die(die).build())
    }

    #[must_use]
    pub fn cast(
        die: Die,
        target: Target,
        success: f64,
        no_ageing: f64,
        ageing_successes: Option<Successes>,
    ) -> Self {
        Request::Cast(
            Ritual::new(target)
                .die(die)
                .success(success)
                .no_ageing(no_ageing)
                .maybe_ageing_successes(ageing_successes)
                .build(),
        )
    }

    #[must_use]
    pub fn cont(
        die: Die,
        our_size: PoolSize,
        our_target: Target,
        their_size: PoolSize,
        their_target: Target,
    ) -> Self {
        Request::Cont(Contest::new(
            Pool::new(our_size, our_target).die(die).build(),
            Pool::new(their_size, their_target).die(die).build(),
        ))
    }

    pub fn eval(&self) -> Result<Report> {
        tracing::debug!(request = ?self, "evaluating");
        match self {
            Request::Attr(pool) => Ok(Report::Attr(AttrReport::new(pool))),
            Request::Cast(ritual) => ritual.eval().map(Report::Cast),
            Request::Cont(contest) => Ok(Report::Cont(ContReport::new(contest))),
        }
    }
}

impl AttrReport {
    #[must_use]
    pub fn new(pool: &Pool) -> Self {
        let rows = pool
            .distribution()
            .rows()
            .map(|(value, exact, at_least)| Row {
                value,
                exact,
                at_least,
            })
            .collect_vec();
        Self {
            pool: *pool,
            botch: pool.botch(),
            rows,
        }
    }
}

impl ContReport {
    #[must_use]
    pub fn new(contest: &Contest) -> Self {
        let rows = contest
            .distribution()
            .into_iter()
            .map(|(value, exact, at_least)| Row {
                value,
                exact,
                at_least,
            })
            .collect_vec();
        Self {
            contest: *contest,
            our_botch: contest.ours().botch(),
            their_botch: contest.theirs().botch(),
            rows,
        }
    }
}
