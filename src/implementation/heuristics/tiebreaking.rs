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

//! This module provides the policy pickers: the heuristics used to choose
//! among several actions that are all optimal w.r.t. the current estimates.

use crate::{PolicyPicker, StateID, StateProperties, Transition, Value};

/// _This is the default policy picker._ It picks the first candidate unless
/// it is configured to be stable: then, it keeps the previously selected
/// action for as long as it remains optimal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArbitraryTiebreaker {
    stable: bool,
}
impl ArbitraryTiebreaker {
    pub fn new(stable: bool) -> Self {
        Self { stable }
    }
}
impl<A: PartialEq> PolicyPicker<A> for ArbitraryTiebreaker {
    fn pick_index(
        &mut self,
        _: StateID,
        previous: Option<&A>,
        candidates: &[Transition<A>],
        _: &dyn StateProperties,
    ) -> usize {
        if self.stable {
            stable_choice(previous, candidates).unwrap_or(0)
        } else {
            0
        }
    }
}

/// This picker prefers the action whose successors have the tightest bounds
/// on average (the width of the successor bounds, weighted by the outcome
/// probabilities). When `favor_large_gaps` is set, the order is reversed:
/// it prefers the action leading to the least known states.
#[derive(Debug, Default, Clone, Copy)]
pub struct VDiffTiebreaker {
    favor_large_gaps: bool,
    stable: bool,
}
impl VDiffTiebreaker {
    pub fn new(favor_large_gaps: bool, stable: bool) -> Self {
        Self { favor_large_gaps, stable }
    }

    fn gap<A>(&self, candidate: &Transition<A>, properties: &dyn StateProperties) -> Value {
        candidate.successors.iter()
            .map(|o| {
                let width = properties.lookup_bounds(o.item).map_or(0.0, |b| b.length());
                o.probability * width
            })
            .sum()
    }
}
impl<A: PartialEq> PolicyPicker<A> for VDiffTiebreaker {
    fn pick_index(
        &mut self,
        _: StateID,
        previous: Option<&A>,
        candidates: &[Transition<A>],
        properties: &dyn StateProperties,
    ) -> usize {
        if self.stable {
            if let Some(index) = stable_choice(previous, candidates) {
                return index;
            }
        }

        let mut best = 0;
        let mut best_gap = self.gap(&candidates[0], properties);
        for (i, candidate) in candidates.iter().enumerate().skip(1) {
            let gap = self.gap(candidate, properties);
            let better = if self.favor_large_gaps { gap > best_gap } else { gap < best_gap };
            if better {
                best = i;
                best_gap = gap;
            }
        }
        best
    }
}

fn stable_choice<A: PartialEq>(previous: Option<&A>, candidates: &[Transition<A>]) -> Option<usize> {
    let previous = previous?;
    candidates.iter().position(|t| t.action == *previous)
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
