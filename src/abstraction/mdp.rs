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

//! This module defines the `Mdp` trait: the abstraction through which the
//! search engines discover the state space of the problem they solve.

use std::fmt::Debug;

use crate::{Distribution, StateID, TerminationInfo, Value};

/// One applicable action along with the distribution over the states it
/// leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<A> {
    pub action: A,
    pub successors: Distribution<StateID>,
}

/// This is the main abstraction that should be provided by any user of our
/// library. It describes a Markov decision process which is explored lazily
/// by the search engines: states are only generated when they are reached.
///
/// The engines never manipulate the states themselves: they only work with
/// the `StateID`s handed out by `get_state_id`. These ids must be dense
/// (small non-negative integers) and stable for the whole lifetime of a
/// search.
pub trait Mdp {
    /// The type of the states of the problem
    type State;
    /// The type of the actions of the problem
    type Action: Clone + PartialEq + Debug;

    /// Returns the identifier of the given state
    fn get_state_id(&mut self, state: &Self::State) -> StateID;
    /// Returns the state having the given identifier
    fn get_state(&self, state: StateID) -> Self::State;
    /// Lists the actions that are applicable in the given state
    fn generate_applicable_actions(&mut self, state: StateID) -> Vec<Self::Action>;
    /// Yields the distribution over the successors reached when applying
    /// `action` in `state`. The distribution may mention `state` itself.
    fn generate_action_transitions(&mut self, state: StateID, action: &Self::Action) -> Distribution<StateID>;
    /// Lists all applicable actions of the given state along with their
    /// outcomes.
    fn generate_all_transitions(&mut self, state: StateID) -> Vec<Transition<Self::Action>> {
        self.generate_applicable_actions(state)
            .into_iter()
            .map(|action| {
                let successors = self.generate_action_transitions(state, &action);
                Transition { action, successors }
            })
            .collect()
    }
    /// Tells whether the state is a goal and what it costs to terminate in it
    fn get_termination_info(&self, state: &Self::State) -> TerminationInfo;
    /// The cost of applying the given action
    fn get_action_cost(&self, action: &Self::Action) -> Value;
}

impl<M: Mdp + ?Sized> Mdp for &mut M {
    type State = M::State;
    type Action = M::Action;

    fn get_state_id(&mut self, state: &Self::State) -> StateID {
        (**self).get_state_id(state)
    }
    fn get_state(&self, state: StateID) -> Self::State {
        (**self).get_state(state)
    }
    fn generate_applicable_actions(&mut self, state: StateID) -> Vec<Self::Action> {
        (**self).generate_applicable_actions(state)
    }
    fn generate_action_transitions(&mut self, state: StateID, action: &Self::Action) -> Distribution<StateID> {
        (**self).generate_action_transitions(state, action)
    }
    fn generate_all_transitions(&mut self, state: StateID) -> Vec<Transition<Self::Action>> {
        (**self).generate_all_transitions(state)
    }
    fn get_termination_info(&self, state: &Self::State) -> TerminationInfo {
        (**self).get_termination_info(state)
    }
    fn get_action_cost(&self, action: &Self::Action) -> Value {
        (**self).get_action_cost(action)
    }
}
