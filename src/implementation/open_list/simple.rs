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

//! This module provides the simplest open lists: stacks and queues.

use std::collections::VecDeque;

use crate::{OpenList, StateID};

/// _This is the default open list._ It expands the most recently pushed state
/// first, which makes the search dive depth first.
#[derive(Debug, Default, Clone)]
pub struct LifoOpenList {
    stack: Vec<StateID>,
}
impl LifoOpenList {
    pub fn new() -> Self {
        Self::default()
    }
}
impl OpenList for LifoOpenList {
    fn push(&mut self, state: StateID) {
        self.stack.push(state)
    }
    fn pop(&mut self) -> Option<StateID> {
        self.stack.pop()
    }
    fn clear(&mut self) {
        self.stack.clear()
    }
    fn len(&self) -> usize {
        self.stack.len()
    }
}

/// This open list expands the states in the order they were pushed, which
/// makes the search proceed breadth first.
#[derive(Debug, Default, Clone)]
pub struct FifoOpenList {
    queue: VecDeque<StateID>,
}
impl FifoOpenList {
    pub fn new() -> Self {
        Self::default()
    }
}
impl OpenList for FifoOpenList {
    fn push(&mut self, state: StateID) {
        self.queue.push_back(state)
    }
    fn pop(&mut self) -> Option<StateID> {
        self.queue.pop_front()
    }
    fn clear(&mut self) {
        self.queue.clear()
    }
    fn len(&self) -> usize {
        self.queue.len()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_simple_open_lists {
    use crate::*;

    #[test]
    fn by_default_lists_are_empty() {
        assert!(LifoOpenList::new().is_empty());
        assert!(FifoOpenList::new().is_empty());
    }
    #[test]
    fn lifo_pops_the_last_pushed_state() {
        let mut list = LifoOpenList::new();
        list.push(StateID(1));
        list.push(StateID(2));
        list.push(StateID(3));
        assert_eq!(3, list.len());
        assert_eq!(Some(StateID(3)), list.pop());
        assert_eq!(Some(StateID(2)), list.pop());
        assert_eq!(Some(StateID(1)), list.pop());
        assert_eq!(None, list.pop());
    }
    #[test]
    fn fifo_pops_the_first_pushed_state() {
        let mut list = FifoOpenList::new();
        list.push(StateID(1));
        list.push(StateID(2));
        assert_eq!(Some(StateID(1)), list.pop());
        assert_eq!(Some(StateID(2)), list.pop());
        assert!(list.is_empty());
    }
    #[test]
    fn clear_makes_the_list_empty() {
        let mut lifo = LifoOpenList::new();
        lifo.push(StateID(1));
        lifo.clear();
        assert!(lifo.is_empty());

        let mut fifo = FifoOpenList::new();
        fifo.push(StateID(1));
        fifo.clear();
        assert_eq!(0, fifo.len());
    }
}
