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

//! The capability interface shared by the two kinds of state values the
//! engines can track: a single scalar estimate, or an interval holding both
//! a lower and an upper bound.

use std::{fmt::Debug, ops::{Add, Mul}};

use crate::{is_approx_equal, Interval, Objective, Value};

/// The operations a search engine needs to perform on state values. The
/// engines are generic over this trait, so the choice between scalar values
/// and interval bounds is made once, when the engine is created.
pub trait EngineValue: Copy + Debug + Add<Output = Self> + Mul<Value, Output = Self> {
    /// True iff the pessimistic bound is tracked as well
    const DUAL_BOUNDS: bool;
    /// The exact value `v`
    fn from_value(v: Value) -> Self;
    /// The value of a state that was freshly evaluated. The heuristic
    /// `estimate` is the optimistic bound and `termination_cost` the
    /// pessimistic one (it is always possible to give up).
    fn from_estimate(estimate: Value, termination_cost: Value, objective: Objective) -> Self;
    /// The bounds represented by this value
    fn bounds(&self) -> Interval;
    /// The bound that may only be refined by the search
    fn optimistic(&self, objective: Objective) -> Value {
        objective.optimistic(self.bounds())
    }
    /// Keeps the best of both values (componentwise when applicable)
    fn set_best(&mut self, other: Self, objective: Objective);
    /// Assigns the tighter of the current and `other` value and tells whether
    /// that changed the value by more than epsilon. When `interval_comparison`
    /// is false, only the movement of the optimistic bound is considered a
    /// change.
    ///
    /// # Panics
    /// In debug builds, when a scalar value would regress (move back toward
    /// the optimistic side).
    fn update(&mut self, other: Self, objective: Objective, interval_comparison: bool) -> bool;
}

impl EngineValue for Value {
    const DUAL_BOUNDS: bool = false;

    fn from_value(v: Value) -> Self {
        v
    }
    fn from_estimate(estimate: Value, termination_cost: Value, objective: Objective) -> Self {
        objective.best(estimate, termination_cost)
    }
    fn bounds(&self) -> Interval {
        Interval::exact(*self)
    }
    fn set_best(&mut self, other: Self, objective: Objective) {
        *self = objective.best(*self, other);
    }
    fn update(&mut self, other: Self, objective: Objective, _: bool) -> bool {
        let old = *self;
        debug_assert!(!objective.is_better(other, old), "the value regressed from {old} to {other}");
        // noise below epsilon must not undo the progress already made
        *self = match objective {
            Objective::Minimize => old.max(other),
            Objective::Maximize => old.min(other),
        };
        !is_approx_equal(old, *self)
    }
}

impl EngineValue for Interval {
    const DUAL_BOUNDS: bool = true;

    fn from_value(v: Value) -> Self {
        Interval::exact(v)
    }
    fn from_estimate(estimate: Value, termination_cost: Value, objective: Objective) -> Self {
        let estimate = objective.best(estimate, termination_cost);
        match objective {
            Objective::Minimize => Interval::new(estimate, termination_cost),
            Objective::Maximize => Interval::new(termination_cost, estimate),
        }
    }
    fn bounds(&self) -> Interval {
        *self
    }
    fn set_best(&mut self, other: Self, objective: Objective) {
        *self = match objective {
            Objective::Minimize => self.min(other),
            Objective::Maximize => self.max(other),
        };
    }
    fn update(&mut self, other: Self, objective: Objective, interval_comparison: bool) -> bool {
        let old = *self;
        *self = old.intersect(other);

        let optimistic = !is_approx_equal(objective.optimistic(old), objective.optimistic(*self));
        let pessimistic = !is_approx_equal(objective.pessimistic(old), objective.pessimistic(*self));
        optimistic || (interval_comparison && pessimistic)
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_engine_value {
    use crate::*;

    #[test]
    fn scalar_estimate_is_clamped_by_termination_cost() {
        assert_eq!(3.0, <Value as EngineValue>::from_estimate(3.0, 10.0, Objective::Minimize));
        assert_eq!(10.0, <Value as EngineValue>::from_estimate(12.0, 10.0, Objective::Minimize));
        assert_eq!(0.5, <Value as EngineValue>::from_estimate(0.5, 0.0, Objective::Maximize));
    }
    #[test]
    fn interval_estimate_spans_heuristic_and_termination() {
        let min = Interval::from_estimate(3.0, 10.0, Objective::Minimize);
        assert_eq!(Interval::new(3.0, 10.0), min);
        let max = Interval::from_estimate(0.75, 0.0, Objective::Maximize);
        assert_eq!(Interval::new(0.0, 0.75), max);
        assert_eq!(0.75, max.optimistic(Objective::Maximize));
    }
    #[test]
    fn scalar_update_moves_toward_the_pessimistic_side() {
        let mut v: Value = 2.0;
        assert!(v.update(3.0, Objective::Minimize, false));
        assert_eq!(3.0, v);

        let mut p: Value = 1.0;
        assert!(p.update(0.5, Objective::Maximize, false));
        assert_eq!(0.5, p);
    }
    #[test]
    #[should_panic]
    fn scalar_cost_regression_is_a_contract_violation() {
        let mut v: Value = 3.0;
        v.update(1.0, Objective::Minimize, false);
    }
    #[test]
    #[should_panic]
    fn scalar_probability_regression_is_a_contract_violation() {
        let mut p: Value = 0.5;
        p.update(0.9, Objective::Maximize, false);
    }
    #[test]
    fn scalar_update_ignores_changes_below_epsilon() {
        let mut v: Value = 2.0;
        assert!(!v.update(2.0 + EPSILON / 10.0, Objective::Minimize, false));
    }
    #[test]
    fn interval_update_narrows_monotonically() {
        let mut v = Interval::new(0.0, 10.0);
        assert!(v.update(Interval::new(2.0, 12.0), Objective::Minimize, false));
        assert_eq!(Interval::new(2.0, 10.0), v);
        assert!(!v.update(Interval::new(1.0, 8.0), Objective::Minimize, false));
        assert_eq!(Interval::new(2.0, 8.0), v);
    }
    #[test]
    fn interval_comparison_also_reports_pessimistic_changes() {
        let mut v = Interval::new(0.0, 10.0);
        assert!(v.update(Interval::new(0.0, 8.0), Objective::Minimize, true));
        let mut w = Interval::new(0.0, 10.0);
        assert!(!w.update(Interval::new(0.0, 8.0), Objective::Minimize, false));
    }
    #[test]
    #[should_panic]
    fn interval_update_with_disjoint_value_is_a_contract_violation() {
        let mut v = Interval::new(0.0, 1.0);
        v.update(Interval::new(5.0, 6.0), Objective::Minimize, false);
    }
    #[test]
    fn set_best_is_componentwise() {
        let mut v = Interval::new(1.0, 5.0);
        v.set_best(Interval::new(2.0, 3.0), Objective::Minimize);
        assert_eq!(Interval::new(1.0, 3.0), v);

        let mut w = Interval::new(0.1, 0.5);
        w.set_best(Interval::new(0.2, 0.4), Objective::Maximize);
        assert_eq!(Interval::new(0.2, 0.5), w);
    }
}
