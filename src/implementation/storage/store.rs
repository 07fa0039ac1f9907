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

//! The per-state record store of the search engines.

use crate::{EngineValue, Interval, StateID, StateInfo, StateProperties};

/// A dense, growable, index-addressed mapping from `StateID` to `StateInfo`.
/// Records are created lazily upon first access and are never removed while
/// a search runs.
#[derive(Debug, Clone)]
pub struct StateStore<A, V> {
    infos: Vec<StateInfo<A, V>>,
}
impl<A, V: EngineValue> Default for StateStore<A, V> {
    fn default() -> Self {
        Self::new()
    }
}
impl<A, V: EngineValue> StateStore<A, V> {
    pub fn new() -> Self {
        Self { infos: vec![] }
    }
    /// Returns the record of the given state, creating it (and all the ones
    /// with a smaller id) when needed.
    pub fn get_or_create(&mut self, state: StateID) -> &mut StateInfo<A, V> {
        let id = state.id();
        if id >= self.infos.len() {
            self.infos.resize_with(id + 1, StateInfo::default);
        }
        &mut self.infos[id]
    }
    /// Returns the record of the given state if it exists
    pub fn get(&self, state: StateID) -> Option<&StateInfo<A, V>> {
        self.infos.get(state.id())
    }
    /// The number of records in the store
    pub fn len(&self) -> usize {
        self.infos.len()
    }
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
    /// Forgets about all states
    pub fn clear(&mut self) {
        self.infos.clear();
    }
}
impl<A, V: EngineValue> StateProperties for StateStore<A, V> {
    fn lookup_bounds(&self, state: StateID) -> Option<Interval> {
        self.get(state)
            .filter(|info| info.flags.is_initialized())
            .map(|info| info.bounds())
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
