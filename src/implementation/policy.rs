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

//! The explicit partial policies extracted from a search.

use fxhash::FxHashMap;

use crate::{Interval, StateID};

/// The decision taken in one state along with the bounds on the value of
/// that state when the decision was extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDecision<A> {
    pub action: A,
    pub bounds: Interval,
}

/// A partial policy: it maps each state reachable from some initial state
/// (under the policy itself) to the decision taken there. Goals and dead
/// ends have no decision.
#[derive(Debug, Clone)]
pub struct MapPolicy<A> {
    decisions: FxHashMap<StateID, PolicyDecision<A>>,
}
impl<A> Default for MapPolicy<A> {
    fn default() -> Self {
        Self::new()
    }
}
impl<A> MapPolicy<A> {
    pub fn new() -> Self {
        Self { decisions: FxHashMap::default() }
    }
    /// Records the decision taken in the given state. It returns the decision
    /// that was previously recorded for that state, if any.
    pub fn insert(&mut self, state: StateID, decision: PolicyDecision<A>) -> Option<PolicyDecision<A>> {
        self.decisions.insert(state, decision)
    }
    /// The decision taken in the given state
    pub fn get(&self, state: StateID) -> Option<&PolicyDecision<A>> {
        self.decisions.get(&state)
    }
    /// The action chosen in the given state
    pub fn action(&self, state: StateID) -> Option<&A> {
        self.get(state).map(|d| &d.action)
    }
    pub fn contains(&self, state: StateID) -> bool {
        self.decisions.contains_key(&state)
    }
    pub fn len(&self) -> usize {
        self.decisions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
    /// Iterates over all decisions (in no particular order)
    pub fn iter(&self) -> impl Iterator<Item = (StateID, &PolicyDecision<A>)> {
        self.decisions.iter().map(|(s, d)| (*s, d))
    }
}
