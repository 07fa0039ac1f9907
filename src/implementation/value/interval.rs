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

//! Closed intervals of values. They are used to keep track of a lower and an
//! upper bound on the value of a state at the same time.

use std::{fmt::Display, ops::{Add, Mul}};

use crate::{Value, EPSILON};

/// A pair of bounds `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: Value,
    pub upper: Value,
}
impl Interval {
    /// Creates a new interval.
    ///
    /// # Panics
    /// When `lower` is greater than `upper`.
    pub fn new(lower: Value, upper: Value) -> Self {
        assert!(lower <= upper, "malformed interval [{lower}, {upper}]");
        Self { lower, upper }
    }
    /// Creates the degenerate interval `[value, value]`
    pub fn exact(value: Value) -> Self {
        Self { lower: value, upper: value }
    }
    /// The distance between both bounds
    pub fn length(&self) -> Value {
        if self.lower == self.upper {
            0.0
        } else {
            self.upper - self.lower
        }
    }
    /// Returns true iff both bounds have met (up to epsilon)
    pub fn is_exact(&self) -> bool {
        self.length() < EPSILON
    }
    /// Returns true iff value lies within the bounds
    pub fn contains(&self, value: Value) -> bool {
        self.lower <= value && value <= self.upper
    }
    /// Componentwise minimum
    pub fn min(self, other: Self) -> Self {
        Self { lower: self.lower.min(other.lower), upper: self.upper.min(other.upper) }
    }
    /// Componentwise maximum
    pub fn max(self, other: Self) -> Self {
        Self { lower: self.lower.max(other.lower), upper: self.upper.max(other.upper) }
    }
    /// Returns the intersection of two overlapping intervals. A gap smaller
    /// than epsilon between the two intervals is tolerated: the result is
    /// then the degenerate interval at the lower bound.
    ///
    /// # Panics
    /// When the two intervals do not overlap.
    pub fn intersect(self, other: Self) -> Self {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        assert!(
            lower <= upper || lower - upper < EPSILON,
            "cannot intersect disjoint intervals {self} and {other}"
        );
        Self { lower, upper: upper.max(lower) }
    }
}
impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Self) -> Self::Output {
        Interval { lower: self.lower + rhs.lower, upper: self.upper + rhs.upper }
    }
}
impl Add<Value> for Interval {
    type Output = Interval;

    fn add(self, rhs: Value) -> Self::Output {
        Interval { lower: self.lower + rhs, upper: self.upper + rhs }
    }
}
impl Mul<Value> for Interval {
    type Output = Interval;

    fn mul(self, rhs: Value) -> Self::Output {
        Interval { lower: self.lower * rhs, upper: self.upper * rhs }
    }
}
impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
