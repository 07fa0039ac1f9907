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

//! This module provides an MDP whose states and actions are all enumerated
//! up front. It is mostly convenient to describe small models by hand.

use crate::{ActionID, Distribution, Mdp, StateID, TerminationInfo, Value, EPSILON};

#[derive(Debug, Clone)]
struct ExplicitState {
    termination: TerminationInfo,
    actions: Vec<ActionID>,
}

#[derive(Debug, Clone)]
struct ExplicitAction {
    source: StateID,
    cost: Value,
    successors: Distribution<StateID>,
}

/// A tabular MDP. The states are identified by their `StateID` and the
/// actions by their `ActionID` (which are unique across the whole model).
///
/// # Example
/// ```
/// # use probsearch::*;
/// let mut mdp = ExplicitMdp::new();
/// let start = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
/// let goal  = mdp.add_state(TerminationInfo::goal(0.0));
/// let flip  = mdp.add_action(start, 1.0, &[(goal, 0.5), (start, 0.5)]);
///
/// assert_eq!(vec![flip], mdp.generate_applicable_actions(start));
/// assert_eq!(1.0, mdp.get_action_cost(&flip));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExplicitMdp {
    states: Vec<ExplicitState>,
    actions: Vec<ExplicitAction>,
}

impl ExplicitMdp {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds a new state to the model and returns its id
    pub fn add_state(&mut self, termination: TerminationInfo) -> StateID {
        self.states.push(ExplicitState { termination, actions: vec![] });
        StateID(self.states.len() - 1)
    }
    /// Adds an action applicable in `source` and returns its id.
    ///
    /// # Panics
    /// When a state is unknown, or when the probabilities of the outcomes
    /// are not positive or do not sum up to one.
    pub fn add_action(&mut self, source: StateID, cost: Value, outcomes: &[(StateID, Value)]) -> ActionID {
        assert!(source.id() < self.states.len(), "unknown state {source:?}");
        let mut successors = Distribution::new();
        for (succ, probability) in outcomes.iter().copied() {
            assert!(succ.id() < self.states.len(), "unknown state {succ:?}");
            successors.add_unique(succ, probability);
        }
        assert!(
            (successors.total_probability() - 1.0).abs() < EPSILON,
            "the outcomes of an action must sum up to one"
        );

        let id = ActionID(self.actions.len());
        self.actions.push(ExplicitAction { source, cost, successors });
        self.states[source.id()].actions.push(id);
        id
    }
    pub fn nb_states(&self) -> usize {
        self.states.len()
    }
    pub fn nb_actions(&self) -> usize {
        self.actions.len()
    }
    /// The state in which the given action is applicable
    pub fn source_of(&self, action: ActionID) -> Option<StateID> {
        self.actions.get(action.id()).map(|a| a.source)
    }
}

impl Mdp for ExplicitMdp {
    type State = StateID;
    type Action = ActionID;

    fn get_state_id(&mut self, state: &StateID) -> StateID {
        *state
    }
    fn get_state(&self, state: StateID) -> StateID {
        state
    }
    fn generate_applicable_actions(&mut self, state: StateID) -> Vec<ActionID> {
        self.states.get(state.id())
            .map(|s| s.actions.clone())
            .unwrap_or_default()
    }
    fn generate_action_transitions(&mut self, _: StateID, action: &ActionID) -> Distribution<StateID> {
        self.actions.get(action.id())
            .map(|a| a.successors.clone())
            .unwrap_or_default()
    }
    fn get_termination_info(&self, state: &StateID) -> TerminationInfo {
        self.states.get(state.id())
            .map_or(TerminationInfo::non_goal(Value::INFINITY), |s| s.termination)
    }
    fn get_action_cost(&self, action: &ActionID) -> Value {
        self.actions.get(action.id()).map_or(0.0, |a| a.cost)
    }
}

#[cfg(test)]
mod test_explicit_mdp {
    use crate::*;

    #[test]
    fn states_and_actions_get_dense_ids() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(1.0));
        let b = mdp.add_state(TerminationInfo::goal(0.0));
        assert_eq!((StateID(0), StateID(1)), (a, b));
        let x = mdp.add_action(a, 2.0, &[(b, 1.0)]);
        let y = mdp.add_action(b, 3.0, &[(a, 1.0)]);
        assert_eq!((ActionID(0), ActionID(1)), (x, y));
        assert_eq!(2, mdp.nb_states());
        assert_eq!(2, mdp.nb_actions());
        assert_eq!(Some(b), mdp.source_of(y));
    }
    #[test]
    fn all_transitions_list_every_action() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(1.0));
        let b = mdp.add_state(TerminationInfo::goal(0.0));
        let x = mdp.add_action(a, 2.0, &[(b, 0.25), (a, 0.75)]);
        let y = mdp.add_action(a, 3.0, &[(b, 1.0)]);

        let transitions = mdp.generate_all_transitions(a);
        assert_eq!(2, transitions.len());
        assert_eq!(x, transitions[0].action);
        assert_eq!(0.75, transitions[0].successors.probability_of(&a));
        assert_eq!(y, transitions[1].action);
        assert!(transitions[1].successors.is_dirac(&b));
        assert!(mdp.generate_all_transitions(b).is_empty());
    }
    #[test]
    fn termination_info_is_the_configured_one() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(4.0));
        assert_eq!(TerminationInfo::non_goal(4.0), mdp.get_termination_info(&a));
        assert_eq!(a, mdp.get_state_id(&a));
    }
    #[test]
    #[should_panic]
    fn actions_must_have_normalized_outcomes() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(4.0));
        mdp.add_action(a, 1.0, &[(a, 0.5)]);
    }
}
