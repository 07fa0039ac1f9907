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

use crate::{Interval, StateID, Transition};

/// A read-only view over the current bounds of the states known by a search
pub trait StateProperties {
    /// The bounds of the given state, if it has been evaluated
    fn lookup_bounds(&self, state: StateID) -> Option<Interval>;
}

/// A policy picker breaks the ties between the actions that are all optimal
/// in a given state (w.r.t. the current estimates).
pub trait PolicyPicker<A> {
    /// Returns the index (in `candidates`) of the chosen transition.
    /// `candidates` is never empty. `previous` is the action that was
    /// selected for that state last time (if any): keeping it yields more
    /// stable policies.
    fn pick_index(
        &mut self,
        state: StateID,
        previous: Option<&A>,
        candidates: &[Transition<A>],
        properties: &dyn StateProperties,
    ) -> usize;
}
