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

use crate::{StateID, Transition};

/// The transitions of each concrete state, cached the first time they are
/// generated. The cache is indexed by `StateID` and its entries are only
/// ever replaced as a whole.
#[derive(Debug, Clone)]
pub struct TransitionCache<A> {
    entries: Vec<Option<Vec<Transition<A>>>>,
}
impl<A> Default for TransitionCache<A> {
    fn default() -> Self {
        Self::new()
    }
}
impl<A> TransitionCache<A> {
    pub fn new() -> Self {
        Self { entries: vec![] }
    }
    /// Returns true iff the transitions of `state` are cached
    pub fn contains(&self, state: StateID) -> bool {
        matches!(self.entries.get(state.id()), Some(Some(_)))
    }
    /// The cached transitions of `state`
    pub fn get(&self, state: StateID) -> Option<&[Transition<A>]> {
        self.entries.get(state.id())
            .and_then(|e| e.as_deref())
    }
    /// Replaces the entry of `state` and returns the previous one
    pub fn insert(&mut self, state: StateID, transitions: Vec<Transition<A>>) -> Option<Vec<Transition<A>>> {
        let id = state.id();
        if id >= self.entries.len() {
            self.entries.resize_with(id + 1, || None);
        }
        self.entries[id].replace(transitions)
    }
    /// Replaces the entry of `state` (when it exists) by the result of
    /// `rewrite` applied to each of its transitions. The transitions for
    /// which `rewrite` yields None are dropped.
    pub fn rewrite<F>(&mut self, state: StateID, rewrite: F)
    where F: FnMut(&Transition<A>) -> Option<Transition<A>>
    {
        let rewritten = self.get(state)
            .map(|transitions| transitions.iter().filter_map(rewrite).collect::<Vec<_>>());
        if let Some(rewritten) = rewritten {
            self.insert(state, rewritten);
        }
    }
}
