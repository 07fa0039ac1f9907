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

//! The counters maintained by the search engines. They are purely
//! informative: nothing in the search depends on them.

use std::fmt::Display;

use crate::Interval;

/// The counters updated by the backup engine
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoreStatistics {
    /// States that were handed to the evaluator
    pub evaluated_states: u64,
    /// States the evaluator proved unsolvable
    pub pruned_states: u64,
    /// Goal states encountered
    pub goal_states: u64,
    /// Non-goal states without any applicable action
    pub terminal_states: u64,
    /// States whose actions all loop back to the state itself
    pub self_loop_states: u64,
    /// States where terminating is strictly better than any action
    pub terminated_states: u64,
    /// Solved states from which no goal can be reached
    pub dead_end_states: u64,
    /// States that were backed up at least once
    pub backed_up_states: u64,
    /// Bellman backups
    pub backups: u64,
    /// Backups that changed the value of a state
    pub value_changes: u64,
    /// Backups that changed the greedy action of a state
    pub policy_updates: u64,
}

/// All the counters of a search
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Statistics {
    pub core: CoreStatistics,
    /// A snapshot of `core` taken the last time the value of the initial
    /// state changed
    pub before_last_update: CoreStatistics,
    /// The first estimate of the initial state
    pub initial_state_estimate: Option<Interval>,
    /// How many times the value of the initial state changed
    pub initial_state_value_changes: u64,
    /// Iterations of the main loop
    pub iterations: u64,
    /// States that were expanded
    pub expansions: u64,
    /// Restarts caused by the elimination of traps
    pub trap_iterations: u64,
    /// Traps that were collapsed
    pub traps: u64,
    /// States that were absorbed in the collapsed traps
    pub trap_states: u64,
}
impl Statistics {
    /// Records the fact that the value of the initial state just changed
    pub(crate) fn jump(&mut self) {
        self.initial_state_value_changes += 1;
        self.before_last_update = self.core;
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = &self.core;
        if let Some(estimate) = self.initial_state_estimate {
            writeln!(f, "  Initial state value estimation: {estimate}")?;
        }
        writeln!(f, "  Initial state value changes: {}", self.initial_state_value_changes)?;
        writeln!(f, "  Evaluated state(s): {}", core.evaluated_states)?;
        writeln!(f, "  Pruned state(s): {}", core.pruned_states)?;
        writeln!(f, "  Goal state(s): {}", core.goal_states)?;
        writeln!(f, "  Terminal state(s): {}", core.terminal_states)?;
        writeln!(f, "  Self-loop only state(s): {}", core.self_loop_states)?;
        writeln!(f, "  Terminated state(s): {}", core.terminated_states)?;
        writeln!(f, "  Dead end state(s): {}", core.dead_end_states)?;
        writeln!(f, "  Backed up state(s): {}", core.backed_up_states)?;
        writeln!(f, "  Number of backups: {}", core.backups)?;
        writeln!(f, "  Number of value changes: {}", core.value_changes)?;
        writeln!(f, "  Number of policy updates: {}", core.policy_updates)?;
        writeln!(f, "  Evaluated state(s) until last value change: {}", self.before_last_update.evaluated_states)?;
        writeln!(f, "  Backups until last value change: {}", self.before_last_update.backups)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Expansions: {}", self.expansions)?;
        if self.trap_iterations > 0 {
            writeln!(f, "  Trap elimination iterations: {}", self.trap_iterations)?;
            writeln!(f, "  Traps: {}", self.traps)?;
            writeln!(f, "  Trap state(s): {}", self.trap_states)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_statistics {
    use crate::*;

    #[test]
    fn jump_takes_a_snapshot_of_the_core_counters() {
        let mut stats = Statistics::default();
        stats.core.backups = 4;
        stats.jump();
        stats.core.backups = 9;
        assert_eq!(1, stats.initial_state_value_changes);
        assert_eq!(4, stats.before_last_update.backups);
    }
    #[test]
    fn trap_counters_are_only_displayed_when_relevant() {
        let mut stats = Statistics::default();
        assert!(!format!("{stats}").contains("Traps"));
        stats.trap_iterations = 2;
        assert!(format!("{stats}").contains("Traps: 0"));
    }
}
