// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the implementation of various cutoff heuristics that can
//! be used to interrupt a search.

use std::time::{Duration, Instant};

use crate::Cutoff;

/// _This is the default cutoff heuristic._ It imposes that the search
/// proves optimality before it stops.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn must_stop(&self) -> bool {false}
}
/// This cutoff allows one to specify a maximum time budget to solve the problem.
/// Once the time budget is elapsed, the search stops and the bounds computed
/// so far are returned. The budget starts running when the cutoff is created.
/// A zero budget is expired right away.
///
/// # Example
/// ```
/// # use probsearch::*;
/// use std::time::Duration;
///
/// let mut mdp = ExplicitMdp::new();
/// let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
/// let g = mdp.add_state(TerminationInfo::goal(0.0));
/// mdp.add_action(a, 1.0, &[(g, 1.0)]);
///
/// let evaluator = BlindEvaluator::new(0.0);
/// let mut solver = AoSearch::<_, Value>::new(&mut mdp, &evaluator, SearchConfig::default())
///     .with_cutoff(TimeBudget::new(Duration::from_secs(10)));
/// let value = solver.solve(&a); // will run for maximum 10 seconds
/// assert_eq!(Ok(Interval::exact(1.0)), value);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    deadline: Instant,
}
impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        TimeBudget { deadline: Instant::now() + budget }
    }
    /// The time remaining before the cutoff fires
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}
impl Cutoff for TimeBudget {
    fn must_stop(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
