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

//! This module provides the backup engine: the Bellman update and the
//! bookkeeping every search algorithm of this crate is built upon.

use std::collections::VecDeque;

use fxhash::FxHashSet;
use log::trace;

use crate::{
    is_approx_equal, ArbitraryTiebreaker, EngineValue, Evaluator, Interval, MapPolicy, Mdp,
    NewStateObserver, NoObserver, PolicyDecision, PolicyPicker, SearchConfig, StateID, StateInfo,
    StateProperties, StateStore, Statistics, Transition,
};

/// What a backup did to the state it was applied to
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BackupOutcome {
    pub value_changed: bool,
    pub policy_changed: bool,
    /// The index of the greedy transition among those that were backed up.
    /// It is only picked when the engine stores its policy or runs greedily.
    pub selected: Option<usize>,
}

/// The reason why a state was recognized as a dead end during a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeadEnd {
    /// No action is applicable
    NoAction,
    /// All actions loop back to the state itself
    SelfLoops,
    /// Terminating is strictly better than applying any action
    Termination,
}

/// The state of a heuristic search: the explored part of the MDP together
/// with the collaborators that are consulted to explore it.
///
/// The engine is generic over the kind of value `V` it tracks for each state:
/// a scalar `Value` (one single bound) or an `Interval` (dual bounds).
pub struct HeuristicSearch<'a, M: Mdp, V> {
    /// The problem being solved
    pub(crate) mdp: M,
    /// The heuristic which provides the initial estimate of each state
    evaluator: &'a dyn Evaluator<M::State>,
    /// The heuristic which breaks the ties among optimal actions
    picker: Box<dyn PolicyPicker<M::Action> + 'a>,
    /// Notified whenever a new state is discovered
    observer: Box<dyn NewStateObserver<M::State> + 'a>,
    pub(crate) config: SearchConfig,
    pub(crate) store: StateStore<M::Action, V>,
    pub(crate) stats: Statistics,
    pub(crate) initial_state: Option<StateID>,
}

impl<'a, M, V> HeuristicSearch<'a, M, V>
where
    M: Mdp,
    V: EngineValue,
{
    pub fn new(mdp: M, evaluator: &'a dyn Evaluator<M::State>, config: SearchConfig) -> Self {
        Self {
            mdp,
            evaluator,
            picker: Box::new(ArbitraryTiebreaker::default()),
            observer: Box::new(NoObserver),
            config,
            store: StateStore::new(),
            stats: Statistics::default(),
            initial_state: None,
        }
    }
    pub fn set_picker<P: PolicyPicker<M::Action> + 'a>(&mut self, picker: P) {
        self.picker = Box::new(picker);
    }
    pub fn set_observer<O: NewStateObserver<M::State> + 'a>(&mut self, observer: O) {
        self.observer = Box::new(observer);
    }
    pub fn mdp(&self) -> &M {
        &self.mdp
    }
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }
    /// The record of the given state, if it was ever touched
    pub fn state_info(&self, state: StateID) -> Option<&StateInfo<M::Action, V>> {
        self.store.get(state)
    }
    /// The current bounds of the given state, if it was ever evaluated
    pub fn bounds_of(&self, state: StateID) -> Option<Interval> {
        self.store.lookup_bounds(state)
    }
    /// Returns true iff the value of the given state is final
    pub fn is_solved(&self, state: StateID) -> bool {
        self.store.get(state).map_or(false, |info| info.flags.is_solved())
    }
    /// Returns the greedy action stored for the given state.
    ///
    /// # Panics
    /// When the engine is configured not to store its policy.
    pub fn get_policy(&self, state: StateID) -> Option<&M::Action> {
        assert!(self.config.store_policy, "this engine does not store its policy");
        self.store.get(state).and_then(|info| info.policy.as_ref())
    }

    pub(crate) fn set_initial_state(&mut self, state: StateID) {
        if self.initial_state != Some(state) {
            self.initial_state = Some(state);
            self.stats.initial_state_estimate = self.store.lookup_bounds(state);
        }
    }
    /// Forgets everything that was learned about the states
    pub(crate) fn reset_search_state(&mut self) {
        self.store.clear();
        self.initial_state = None;
    }

    /// Performs the goal test and evaluates the given state unless it was
    /// already done.
    pub(crate) fn initialize_if_needed(&mut self, id: StateID) {
        if self.store.get_or_create(id).flags.is_initialized() {
            return;
        }

        let objective = self.config.objective;
        let state = self.mdp.get_state(id);
        let termination = self.mdp.get_termination_info(&state);

        let info = self.store.get_or_create(id);
        info.flags.set_initialized(true);
        info.termination_cost = termination.cost;

        if termination.is_goal {
            info.flags.set_goal(true);
            info.value = V::from_value(termination.cost);
            self.stats.core.goal_states += 1;
            self.observer.notify_goal(&state);
        } else {
            let eval = self.evaluator.evaluate(&state);
            self.stats.core.evaluated_states += 1;
            if eval.unsolvable {
                info.flags.set_dead_end(true);
                info.value = V::from_value(termination.cost);
                self.stats.core.pruned_states += 1;
                self.observer.notify_dead(&state);
            } else {
                info.flags.set_on_fringe(true);
                info.value = V::from_estimate(eval.estimate, termination.cost, objective);
                self.observer.notify_state(&state);
            }
        }

        if self.initial_state == Some(id) {
            self.stats.initial_state_estimate = Some(info.bounds());
        }
    }

    /// Generates all transitions of the given state and makes sure each of
    /// their successors is initialized.
    pub(crate) fn generate_transitions_initialized(&mut self, state: StateID) -> Vec<Transition<M::Action>> {
        let transitions = self.mdp.generate_all_transitions(state);
        for t in transitions.iter() {
            for succ in t.successors.support() {
                self.initialize_if_needed(*succ);
            }
        }
        transitions
    }

    /// Re-computes the value of the given state unless it is terminal or
    /// solved.
    pub(crate) fn async_update(&mut self, state: StateID) -> BackupOutcome {
        let flags = self.store.get_or_create(state).flags;
        if flags.is_terminal() || flags.is_solved() {
            return BackupOutcome::default();
        }
        let transitions = self.generate_transitions_initialized(state);
        self.bellman_update(state, &transitions)
    }

    /// Applies the Bellman update to the given state, knowing its
    /// transitions (whose successors have all been initialized).
    pub(crate) fn bellman_update(&mut self, state: StateID, transitions: &[Transition<M::Action>]) -> BackupOutcome {
        let objective = self.config.objective;
        let (flags, termination_cost) = {
            let info = self.store.get_or_create(state);
            (info.flags, info.termination_cost)
        };
        if flags.is_terminal() || flags.is_solved() {
            return BackupOutcome::default();
        }

        self.stats.core.backups += 1;
        if flags.is_on_fringe() {
            self.stats.core.backed_up_states += 1;
            self.store.get_or_create(state).flags.set_on_fringe(false);
        }

        if transitions.is_empty() {
            return self.notify_dead_end(state, DeadEnd::NoAction);
        }
        let qvalues = self.qvalues(state, transitions);
        if qvalues.is_empty() {
            return self.notify_dead_end(state, DeadEnd::SelfLoops);
        }
        if qvalues.iter().all(|(_, q)| objective.is_better(termination_cost, q.optimistic(objective))) {
            return self.notify_dead_end(state, DeadEnd::Termination);
        }

        let mut best = V::from_value(termination_cost);
        for (_, q) in qvalues.iter() {
            best.set_best(*q, objective);
        }

        let mut policy_changed = false;
        let mut selected = None;
        if self.config.store_policy || self.config.greedy {
            let candidates = self.optimal_candidate_indices(&qvalues);
            let options = candidates.iter().map(|i| transitions[*i].clone()).collect::<Vec<_>>();
            let previous = self.store.get_or_create(state).policy.clone();
            let index = candidates[self.picker.pick_index(state, previous.as_ref(), &options, &self.store)];
            selected = Some(index);

            if self.config.store_policy {
                let chosen = transitions[index].action.clone();
                policy_changed = previous.as_ref() != Some(&chosen);
                if policy_changed {
                    self.stats.core.policy_updates += 1;
                }
                self.store.get_or_create(state).policy = Some(chosen);
            }
        }

        let info = self.store.get_or_create(state);
        let value_changed = info.value.update(best, objective, self.config.interval_comparison);
        if value_changed {
            self.stats.core.value_changes += 1;
            if self.initial_state == Some(state) {
                self.stats.jump();
            }
        }
        BackupOutcome { value_changed, policy_changed, selected }
    }

    /// Returns the transitions of the given state that are optimal with
    /// respect to the current estimates.
    pub(crate) fn greedy_transitions(&mut self, state: StateID) -> Vec<Transition<M::Action>> {
        let transitions = self.generate_transitions_initialized(state);
        let qvalues = self.qvalues(state, &transitions);
        if qvalues.is_empty() {
            vec![]
        } else {
            self.optimal_candidates(&transitions, &qvalues)
        }
    }

    /// Selects the greedy action of the given state (w.r.t. the current
    /// estimates) without modifying its value.
    pub(crate) fn greedy_action(&mut self, state: StateID) -> Option<M::Action> {
        let mut candidates = self.greedy_transitions(state);
        if candidates.is_empty() {
            return None;
        }
        let previous = self.store.get(state).and_then(|info| info.policy.clone());
        let index = self.picker.pick_index(state, previous.as_ref(), &candidates, &self.store);
        Some(candidates.swap_remove(index).action)
    }

    /// Builds the partial policy reachable from `initial` by following the
    /// greedy actions (the stored ones when available).
    pub(crate) fn compute_policy_from(&mut self, initial: StateID) -> MapPolicy<M::Action> {
        let mut policy = MapPolicy::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(initial);
        queue.push_back(initial);

        while let Some(state) = queue.pop_front() {
            self.initialize_if_needed(state);
            let info = self.store.get_or_create(state);
            if info.flags.is_terminal() {
                continue;
            }
            let bounds = info.bounds();
            let stored = if self.config.store_policy { info.policy.clone() } else { None };

            let action = match stored {
                Some(action) => action,
                None => match self.greedy_action(state) {
                    Some(action) => action,
                    None => {
                        // nothing makes progress from here: seal it as a dead end
                        self.async_update(state);
                        continue;
                    }
                },
            };

            let successors = self.mdp.generate_action_transitions(state, &action);
            for succ in successors.support() {
                if visited.insert(*succ) {
                    queue.push_back(*succ);
                }
            }
            policy.insert(state, PolicyDecision { action, bounds });
        }
        policy
    }

    /// Computes the Q-value of every transition that makes progress (that is
    /// not a pure self-loop).
    fn qvalues(&self, state: StateID, transitions: &[Transition<M::Action>]) -> Vec<(usize, V)> {
        transitions.iter()
            .enumerate()
            .filter_map(|(i, t)| self.qvalue(state, t).map(|q| (i, q)))
            .collect()
    }

    /// `Q = (cost + sum_{s' != s} p(s') * V(s')) / (1 - p(s))`
    fn qvalue(&self, state: StateID, transition: &Transition<M::Action>) -> Option<V> {
        let mut q = V::from_value(self.mdp.get_action_cost(&transition.action));
        let mut self_loop = 0.0;
        let mut progress = false;
        for outcome in transition.successors.iter() {
            if outcome.item == state {
                self_loop += outcome.probability;
            } else {
                let value = self.store.get(outcome.item).map(|info| info.value);
                debug_assert!(value.is_some(), "successor {:?} was not initialized", outcome.item);
                q = q + value.unwrap_or_else(|| V::from_value(0.0)) * outcome.probability;
                progress = true;
            }
        }

        if !progress {
            None
        } else if self_loop > 0.0 {
            Some(q * (1.0 / (1.0 - self_loop)))
        } else {
            Some(q)
        }
    }

    fn optimal_candidates(&self, transitions: &[Transition<M::Action>], qvalues: &[(usize, V)]) -> Vec<Transition<M::Action>> {
        self.optimal_candidate_indices(qvalues)
            .into_iter()
            .map(|i| transitions[i].clone())
            .collect()
    }

    /// The indices of the transitions whose Q-value is optimal
    fn optimal_candidate_indices(&self, qvalues: &[(usize, V)]) -> Vec<usize> {
        let objective = self.config.objective;
        let best = qvalues.iter()
            .map(|(_, q)| q.optimistic(objective))
            .reduce(|a, b| objective.best(a, b));
        let Some(best) = best else {
            return vec![];
        };

        qvalues.iter()
            .filter(|(_, q)| is_approx_equal(q.optimistic(objective), best))
            .map(|(i, _)| *i)
            .collect()
    }

    fn notify_dead_end(&mut self, id: StateID, reason: DeadEnd) -> BackupOutcome {
        match reason {
            DeadEnd::NoAction => self.stats.core.terminal_states += 1,
            DeadEnd::SelfLoops => self.stats.core.self_loop_states += 1,
            DeadEnd::Termination => self.stats.core.terminated_states += 1,
        }
        trace!("state {} is a dead end ({reason:?})", id.id());

        let objective = self.config.objective;
        let info = self.store.get_or_create(id);
        let old = info.bounds();
        info.flags.set_dead_end(true);
        info.flags.set_on_fringe(false);
        info.value = V::from_value(info.termination_cost);

        let new = info.bounds();
        let value_changed = !is_approx_equal(objective.optimistic(old), objective.optimistic(new))
            || (self.config.interval_comparison && !is_approx_equal(objective.pessimistic(old), objective.pessimistic(new)));
        if value_changed {
            self.stats.core.value_changes += 1;
            if self.initial_state == Some(id) {
                self.stats.jump();
            }
        }

        // the observer already heard of this state when it was discovered
        BackupOutcome { value_changed, policy_changed: false, selected: None }
    }
}
