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

use crate::{Interval, MapPolicy, SearchError, Statistics};

/// This is the solver abstraction. It is implemented by the engines that
/// compute the optimal value of an MDP state.
pub trait MdpSolver {
    /// The type of the states of the solved MDP
    type State;
    /// The type of the actions in the computed policies
    type Action;

    /// Computes the value of the given state. Upon success, the returned
    /// interval holds the optimal value (a degenerate interval when the
    /// engine only tracks one bound). Upon failure, the error still carries
    /// sound bounds.
    fn solve(&mut self, state: &Self::State) -> Result<Interval, SearchError>;
    /// Extracts the greedy policy from the given state, following the
    /// current estimates.
    fn compute_policy(&mut self, state: &Self::State) -> MapPolicy<Self::Action>;
    /// Returns the current bounds of the given state (if it was ever evaluated)
    fn lookup_bounds(&mut self, state: &Self::State) -> Option<Interval>;
    /// The counters collected by the search
    fn statistics(&self) -> &Statistics;
}
