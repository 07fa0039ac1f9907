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

/// This structure stores a compact set of flags relating to a given state.
/// So far, it maintains the following:
/// - Initialized  the state was goal-tested and evaluated
/// - Goal         the state is a goal
/// - Dead         no goal can be reached from the state
/// - Fringe       the state was never expanded
/// - Solved       the value of the state is final
/// - Marked       the state is already registered in some worklist
///
/// A state is terminal iff it is either a goal or a dead end.
///
/// # Default
/// By default, no flag is set.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct StateFlags(u8);
impl StateFlags {
    /// The position of the initialized flag
    pub const F_INITIALIZED: u8 = 1;
    /// The position of the goal flag
    pub const F_GOAL: u8 = 2;
    /// The position of the dead end flag
    pub const F_DEAD: u8 = 4;
    /// The position of the fringe flag
    pub const F_FRINGE: u8 = 8;
    /// The position of the solved flag
    pub const F_SOLVED: u8 = 16;
    /// The position of the marked flag
    pub const F_MARKED: u8 = 32;

    #[inline]
    pub fn is_initialized(self) -> bool {
        self.test(StateFlags::F_INITIALIZED)
    }
    #[inline]
    pub fn is_goal(self) -> bool {
        self.test(StateFlags::F_GOAL)
    }
    #[inline]
    pub fn is_dead_end(self) -> bool {
        self.test(StateFlags::F_DEAD)
    }
    /// Returns true iff the state is either a goal or a dead end
    #[inline]
    pub fn is_terminal(self) -> bool {
        self.is_goal() || self.is_dead_end()
    }
    #[inline]
    pub fn is_on_fringe(self) -> bool {
        self.test(StateFlags::F_FRINGE)
    }
    #[inline]
    pub fn is_solved(self) -> bool {
        self.test(StateFlags::F_SOLVED)
    }
    #[inline]
    pub fn is_marked(self) -> bool {
        self.test(StateFlags::F_MARKED)
    }
    #[inline]
    pub fn set_initialized(&mut self, value: bool) {
        self.set(StateFlags::F_INITIALIZED, value)
    }
    #[inline]
    pub fn set_goal(&mut self, value: bool) {
        self.set(StateFlags::F_GOAL, value)
    }
    #[inline]
    pub fn set_dead_end(&mut self, value: bool) {
        self.set(StateFlags::F_DEAD, value)
    }
    #[inline]
    pub fn set_on_fringe(&mut self, value: bool) {
        self.set(StateFlags::F_FRINGE, value)
    }
    #[inline]
    pub fn set_solved(&mut self, value: bool) {
        self.set(StateFlags::F_SOLVED, value)
    }
    #[inline]
    pub fn set_marked(&mut self, value: bool) {
        self.set(StateFlags::F_MARKED, value)
    }
    /// Checks whether all the flags encoded in the given mask are turned on.
    /// Otherwise, it returns false
    #[inline]
    pub fn test(self, mask: u8) -> bool {
        self.0 & mask == mask
    }
    /// Sets the value of a given flag to the selected polarity
    #[inline]
    pub fn set(&mut self, flag: u8, value: bool) {
        if value {
            self.add(flag)
        } else {
            self.remove(flag)
        }
    }
    /// Turns the given flag(s) on.
    #[inline]
    pub fn add(&mut self, flags: u8) {
        self.0 |= flags;
    }
    /// Turns the given flag(s) off.
    #[inline]
    pub fn remove(&mut self, flags: u8) {
        self.0 &= !flags;
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
#[allow(clippy::bool_assert_comparison)]
mod test_state_flags {
    use super::StateFlags;

    #[test]
    fn by_default_no_flag_is_set() {
        let tested = StateFlags::default();
        assert_eq!(StateFlags(0), tested);
        assert_eq!(false, tested.is_initialized());
        assert_eq!(false, tested.is_terminal());
        assert_eq!(false, tested.is_on_fringe());
        assert_eq!(false, tested.is_solved());
        assert_eq!(false, tested.is_marked());
    }
    #[test]
    fn is_terminal_iff_goal_or_dead_end() {
        let mut tested = StateFlags::default();
        tested.set_goal(true);
        assert_eq!(true, tested.is_terminal());
        tested.set_goal(false);
        assert_eq!(false, tested.is_terminal());
        tested.set_dead_end(true);
        assert_eq!(true, tested.is_terminal());
        assert_eq!(false, tested.is_goal());
    }
    #[test]
    fn flags_are_independent_from_one_another() {
        let mut tested = StateFlags::default();
        tested.set_on_fringe(true);
        tested.set_marked(true);
        assert_eq!(true, tested.is_on_fringe());
        assert_eq!(true, tested.is_marked());
        assert_eq!(false, tested.is_solved());

        tested.set_marked(false);
        assert_eq!(true, tested.is_on_fringe());
        assert_eq!(false, tested.is_marked());
    }
    #[test]
    fn test_yields_true_iff_all_flags_of_the_mask_are_set() {
        let mut tested = StateFlags::default();
        tested.add(StateFlags::F_SOLVED | StateFlags::F_GOAL);
        assert_eq!(true, tested.test(StateFlags::F_SOLVED));
        assert_eq!(true, tested.test(StateFlags::F_SOLVED | StateFlags::F_GOAL));
        assert_eq!(false, tested.test(StateFlags::F_SOLVED | StateFlags::F_DEAD));
        tested.remove(StateFlags::F_GOAL);
        assert_eq!(false, tested.is_goal());
        assert_eq!(true, tested.is_solved());
    }
}
