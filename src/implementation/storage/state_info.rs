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

use crate::{EngineValue, Interval, StateFlags, StateID, Value};

/// The bookkeeping a search maintains about one single state.
#[derive(Debug, Clone)]
pub struct StateInfo<A, V> {
    /// The current estimate of the state value
    pub value: V,
    /// The cost of terminating in this state (cached upon initialization)
    pub termination_cost: Value,
    /// The status of the state
    pub flags: StateFlags,
    /// The greedy action currently selected for this state (only when the
    /// engine stores its policy). It is frozen once the state is solved.
    pub policy: Option<A>,
    /// The states that must be revisited whenever this one changes. There
    /// are no duplicates in this list.
    pub parents: Vec<StateID>,
    /// The position of the state in the order values are propagated back
    pub update_order: u32,
    /// The number of distinct successors that were unsolved when the state
    /// was expanded and which have not been solved since.
    pub unsolved: u32,
    /// Whether some successor that was solved so far is not a dead end
    pub alive: bool,
}
impl<A, V: EngineValue> Default for StateInfo<A, V> {
    fn default() -> Self {
        Self {
            value: V::from_value(0.0),
            termination_cost: 0.0,
            flags: StateFlags::default(),
            policy: None,
            parents: vec![],
            update_order: 0,
            unsolved: 0,
            alive: false,
        }
    }
}
impl<A, V: EngineValue> StateInfo<A, V> {
    /// The current bounds on the value of the state
    pub fn bounds(&self) -> Interval {
        self.value.bounds()
    }
    /// Registers a parent unless it is already known. Returns true iff the
    /// parent was actually added.
    pub fn add_parent(&mut self, parent: StateID) -> bool {
        if self.parents.contains(&parent) {
            false
        } else {
            self.parents.push(parent);
            true
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_state_info {
    use crate::*;

    #[test]
    fn default_info_is_blank() {
        let info = StateInfo::<ActionID, Interval>::default();
        assert_eq!(StateFlags::default(), info.flags);
        assert!(info.policy.is_none());
        assert!(info.parents.is_empty());
        assert_eq!(0, info.unsolved);
        assert!(!info.alive);
    }
    #[test]
    fn parents_are_never_duplicated() {
        let mut info = StateInfo::<ActionID, Value>::default();
        assert!(info.add_parent(StateID(3)));
        assert!(info.add_parent(StateID(1)));
        assert!(!info.add_parent(StateID(3)));
        assert_eq!(vec![StateID(3), StateID(1)], info.parents);
    }
}
