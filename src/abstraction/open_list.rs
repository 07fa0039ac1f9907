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

use crate::StateID;

/// This trait abstracts away the implementation details of the open list.
/// That is, an open list stores the states waiting to be expanded. The order
/// in which it pops them is a matter of strategy: it never affects the
/// correctness of a search.
pub trait OpenList {
    /// This is how you push a state onto the open list.
    fn push(&mut self, state: StateID);
    /// This method yields the next state to expand.
    fn pop(&mut self) -> Option<StateID>;
    /// This method clears the open list: it removes all states from it.
    fn clear(&mut self);
    /// Yields the number of states in the list.
    fn len(&self) -> usize;
    /// Returns true iff the open list is empty (len == 0)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
