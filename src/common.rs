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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client library is likely to work with.

use thiserror::Error;

use crate::Interval;

// ----------------------------------------------------------------------------
// --- VALUES -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The numeric type of every cost, probability and state value.
pub type Value = f64;

/// Two values closer than this are considered equal by the engines.
pub const EPSILON: Value = 5e-5;
/// The value of a state from which the goal can never be reached (when the
/// objective is to minimize the expected cost).
pub const INFINITE_VALUE: Value = Value::INFINITY;

/// Returns true iff `a` and `b` are equal up to `EPSILON`. Two infinite
/// values of the same sign are equal.
#[inline]
pub fn is_approx_equal(a: Value, b: Value) -> bool {
    a == b || (a - b).abs() < EPSILON
}
/// Returns true iff `a` is smaller than `b` by more than `EPSILON`
#[inline]
pub fn is_approx_less(a: Value, b: Value) -> bool {
    a + EPSILON < b
}
/// Returns true iff `a` is greater than `b` by more than `EPSILON`
#[inline]
pub fn is_approx_greater(a: Value, b: Value) -> bool {
    a - EPSILON > b
}

// ----------------------------------------------------------------------------
// --- IDENTIFIERS ------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a state of the MDP. The identifiers are handed out by the
/// MDP itself (see `Mdp::get_state_id`), they are dense and remain stable for
/// the whole lifetime of a search.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct StateID(pub usize);
impl StateID {
    #[inline]
    /// This function returns the id (numeric value) of the state.
    ///
    /// # Examples:
    /// ```
    /// # use probsearch::StateID;
    /// assert_eq!(0, StateID(0).id());
    /// assert_eq!(7, StateID(7).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

/// This type identifies an action. It only makes sense relative to the MDP
/// that produced it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ActionID(pub usize);
impl ActionID {
    #[inline]
    /// This function returns the id (numeric value) of the action.
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- OBJECTIVE --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The optimization sense of a search. Stochastic shortest path problems
/// minimize the expected cost to reach a goal, MaxProb problems maximize the
/// probability of reaching one.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Objective {
    #[default]
    Minimize,
    Maximize,
}
impl Objective {
    /// Returns the best of two values
    #[inline]
    pub fn best(self, a: Value, b: Value) -> Value {
        match self {
            Objective::Minimize => a.min(b),
            Objective::Maximize => a.max(b),
        }
    }
    /// Returns true iff `a` is better than `b` by more than `EPSILON`
    #[inline]
    pub fn is_better(self, a: Value, b: Value) -> bool {
        match self {
            Objective::Minimize => is_approx_less(a, b),
            Objective::Maximize => is_approx_greater(a, b),
        }
    }
    /// The bound of an interval that is driven by the heuristic (the bound
    /// which may only be refined by search).
    #[inline]
    pub fn optimistic(self, bounds: Interval) -> Value {
        match self {
            Objective::Minimize => bounds.lower,
            Objective::Maximize => bounds.upper,
        }
    }
    /// The bound of an interval that is driven by the termination costs
    #[inline]
    pub fn pessimistic(self, bounds: Interval) -> Value {
        match self {
            Objective::Minimize => bounds.upper,
            Objective::Maximize => bounds.lower,
        }
    }
}

// ----------------------------------------------------------------------------
// --- COLLABORATORS OUTPUT ---------------------------------------------------
// ----------------------------------------------------------------------------
/// What happens to the plan when it stops in a given state
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TerminationInfo {
    /// Is the state a goal
    pub is_goal: bool,
    /// The cost (or reward) collected when terminating in that state
    pub cost: Value,
}
impl TerminationInfo {
    pub fn goal(cost: Value) -> Self {
        Self { is_goal: true, cost }
    }
    pub fn non_goal(cost: Value) -> Self {
        Self { is_goal: false, cost }
    }
}

/// The verdict of an evaluator about some state
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EvaluationResult {
    /// True iff the evaluator has proven no goal can be reached from the state
    pub unsolvable: bool,
    /// The heuristic estimate of the state value
    pub estimate: Value,
}
impl EvaluationResult {
    pub fn estimate(estimate: Value) -> Self {
        Self { unsolvable: false, estimate }
    }
    pub fn unsolvable(estimate: Value) -> Self {
        Self { unsolvable: true, estimate }
    }
}

// ----------------------------------------------------------------------------
// --- Results ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The reasons why a search may stop without having solved its initial state.
/// In both cases, the bounds that are reported remain sound.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum SearchError {
    /// It stopped because the configured cutoff criterion was met
    #[error("the search was interrupted by its cutoff (bounds {bounds})")]
    Timeout { bounds: Interval },
    /// The open list ran dry while some states still depend on each other
    /// through a cycle.
    #[error("the open list is exhausted but cycles remain unresolved (bounds {bounds})")]
    UnresolvedCycles { bounds: Interval },
}
impl SearchError {
    /// The bounds of the initial state at the moment the search stopped
    pub fn bounds(&self) -> Interval {
        match self {
            SearchError::Timeout { bounds } => *bounds,
            SearchError::UnresolvedCycles { bounds } => *bounds,
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
