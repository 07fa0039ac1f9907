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

//! This module provides some utilities to order the states that must be
//! revisited when values are propagated back.

use std::cmp::Ordering;

use compare::Compare;

use crate::StateID;

/// An entry of the backpropagation queue: a state along with its update
/// order at the time it was pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueueEntry {
    pub order: u32,
    pub state: StateID,
}

/// This is a thin adapter which makes a binary heap (a max-heap) pop the
/// entries having the *smallest* update order first. That is, the states are
/// revisited in dependency order: successors before their parents.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CompareUpdateOrder;
impl Compare<QueueEntry> for CompareUpdateOrder {
    fn compare(&self, l: &QueueEntry, r: &QueueEntry) -> Ordering {
        r.order.cmp(&l.order).then_with(|| r.state.cmp(&l.state))
    }
}
