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

//! This module provides the implementation of AO*. By default, the search is
//! exhaustive: it expands every unsolved state reachable from the initial
//! state and a state is sealed (solved) as soon as all its successors are
//! solved. In greedy mode, only the successors of the greedy transition of
//! each state are explored and a state is sealed as soon as these are solved.
//! Either way, the value changes are propagated back to the parents in
//! topological order.
//!
//! A solved state none of whose successors can lead to a goal is a dead end.
//! The same holds for the states of a cycle that no policy can leave for a
//! goal, a fringe state or a state where terminating has a finite cost: they
//! are sealed as soon as a value change travels around that cycle.
//!
//! On other graphs with cycles, the states of a cycle may wait on each other
//! forever. When that happens, the open list runs dry before the initial
//! state gets solved and the search reports `SearchError::UnresolvedCycles`.
//! Wrap the engine in a `TrapElimination` to deal with such graphs.

use binary_heap_plus::BinaryHeap;
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info, trace};

use crate::{
    Cutoff, EngineValue, Evaluator, HeuristicSearch, Interval, LifoOpenList, MapPolicy, Mdp,
    MdpSolver, NewStateObserver, NoCutoff, OpenList, PolicyPicker, SearchConfig, SearchError,
    StateID, Statistics, Transition,
};

use super::utils::{CompareUpdateOrder, QueueEntry};

pub struct AoSearch<'a, M: Mdp, V> {
    /// The backup engine and the per-state information
    pub(crate) base: HeuristicSearch<'a, M, V>,
    /// The states that are waiting to be expanded
    open_list: Box<dyn OpenList + 'a>,
    /// A cutoff heuristic meant to decide when to stop the search
    cutoff: Box<dyn Cutoff + 'a>,
    /// The states whose value must be revisited (lowest update order first)
    queue: BinaryHeap<QueueEntry, CompareUpdateOrder>,
}

impl<'a, M, V> AoSearch<'a, M, V>
where
    M: Mdp,
    V: EngineValue,
{
    /// Creates a new search. By default, it explores the states depth first,
    /// never gives up and breaks the ties among optimal actions arbitrarily.
    pub fn new(mdp: M, evaluator: &'a dyn Evaluator<M::State>, config: SearchConfig) -> Self {
        Self {
            base: HeuristicSearch::new(mdp, evaluator, config),
            open_list: Box::new(LifoOpenList::new()),
            cutoff: Box::new(NoCutoff),
            queue: BinaryHeap::from_vec_cmp(vec![], CompareUpdateOrder),
        }
    }
    pub fn with_cutoff<C: Cutoff + 'a>(mut self, cutoff: C) -> Self {
        self.cutoff = Box::new(cutoff);
        self
    }
    pub fn with_open_list<O: OpenList + 'a>(mut self, open_list: O) -> Self {
        self.open_list = Box::new(open_list);
        self
    }
    pub fn with_picker<P: PolicyPicker<M::Action> + 'a>(mut self, picker: P) -> Self {
        self.base.set_picker(picker);
        self
    }
    pub fn with_observer<O: NewStateObserver<M::State> + 'a>(mut self, observer: O) -> Self {
        self.base.set_observer(observer);
        self
    }
    /// Gives access to the backup engine (and through it, to the state
    /// information)
    pub fn base(&self) -> &HeuristicSearch<'a, M, V> {
        &self.base
    }

    /// Forgets everything that was learned about the states
    pub(crate) fn reset_search_state(&mut self) {
        self.base.reset_search_state();
        self.open_list.clear();
        self.queue.clear();
    }

    /// Runs the search until the given initial state is solved, the cutoff
    /// fires or the open list runs dry.
    pub(crate) fn solve_from(&mut self, initial: StateID) -> Result<Interval, SearchError> {
        if self.base.is_solved(initial) {
            return Ok(self.initial_bounds());
        }
        self.reset_search_state();
        self.base.set_initial_state(initial);
        self.base.initialize_if_needed(initial);
        debug!("ao* search starts from state {} with bounds {}", initial.id(), self.initial_bounds());

        let info = self.base.store.get_or_create(initial);
        if info.flags.is_terminal() {
            info.flags.set_solved(true);
        } else {
            self.open_list.push(initial);
        }

        while !self.base.is_solved(initial) {
            if self.cutoff.must_stop() {
                return Err(self.timeout());
            }
            let Some(state) = self.open_list.pop() else {
                debug!("ao* open list exhausted with unresolved cycles");
                return Err(SearchError::UnresolvedCycles { bounds: self.initial_bounds() });
            };
            self.base.stats.iterations += 1;

            let flags = self.base.store.get_or_create(state).flags;
            if !flags.is_on_fringe() || flags.is_solved() {
                continue;
            }
            self.expand(state)?;
        }

        info!("ao* search completed\n{}", self.base.stats);
        Ok(self.initial_bounds())
    }

    /// Expands a fringe state: backs it up, registers it as the parent of its
    /// unsolved successors and propagates the consequences.
    fn expand(&mut self, state: StateID) -> Result<(), SearchError> {
        self.base.stats.expansions += 1;
        let transitions = self.base.generate_transitions_initialized(state);
        let outcome = self.base.bellman_update(state, &transitions);
        trace!("expanded state {} ({} transitions)", state.id(), transitions.len());

        let info = self.base.store.get_or_create(state);
        if info.flags.is_terminal() {
            info.flags.set_solved(true);
            return self.backpropagate(state);
        }

        let mut unsolved = 0;
        let mut alive = false;
        let mut min_succ_order = u32::MAX;
        let mut marked = vec![];
        for succ in transitions.iter().flat_map(|t| t.successors.support()) {
            if *succ == state {
                continue;
            }
            let succ_info = self.base.store.get_or_create(*succ);
            if succ_info.flags.is_terminal() {
                succ_info.flags.set_solved(true);
            }
            if succ_info.flags.is_solved() {
                alive |= !succ_info.flags.is_dead_end();
                continue;
            }
            if succ_info.flags.is_marked() {
                continue;
            }
            succ_info.flags.set_marked(true);
            succ_info.add_parent(state);
            min_succ_order = min_succ_order.min(succ_info.update_order);
            marked.push(*succ);
            unsolved += 1;
        }
        for succ in marked {
            self.base.store.get_or_create(succ).flags.set_marked(false);
        }
        self.push_fringe_successors(state, &transitions, outcome.selected);

        let info = self.base.store.get_or_create(state);
        info.unsolved = unsolved;
        info.alive = alive;
        if self.seal_if_solved(state, &transitions, outcome.selected) {
            self.backpropagate(state)
        } else {
            let info = self.base.store.get_or_create(state);
            info.update_order = info.update_order.max(min_succ_order.saturating_add(1));
            self.propagate_update_order(state)?;
            if outcome.value_changed {
                self.backpropagate(state)
            } else {
                Ok(())
            }
        }
    }

    /// Pushes the fringe successors of `state` that must be explored: those
    /// of the selected transition in greedy mode, all of them otherwise.
    fn push_fringe_successors(&mut self, state: StateID, transitions: &[Transition<M::Action>], selected: Option<usize>) {
        let explored = if self.base.config.greedy {
            selected.and_then(|i| transitions.get(i..=i)).unwrap_or_default()
        } else {
            transitions
        };

        let mut pushed = vec![];
        for succ in explored.iter().flat_map(|t| t.successors.support()) {
            let flags = &mut self.base.store.get_or_create(*succ).flags;
            if *succ != state && flags.is_on_fringe() && !flags.is_solved() && !flags.is_marked() {
                flags.set_marked(true);
                self.open_list.push(*succ);
                pushed.push(*succ);
            }
        }
        for succ in pushed {
            self.base.store.get_or_create(succ).flags.set_marked(false);
        }
    }

    /// Decides whether `state` is solved, given its transitions and the one
    /// its latest backup selected. When it is, the state gets sealed and
    /// possibly recognized as a dead end.
    fn seal_if_solved(&mut self, state: StateID, transitions: &[Transition<M::Action>], selected: Option<usize>) -> bool {
        let objective = self.base.config.objective;
        let info = self.base.store.get_or_create(state);
        if info.flags.is_solved() {
            return true;
        }
        if info.flags.is_terminal() {
            info.flags.set_solved(true);
            return true;
        }

        let perfect = V::DUAL_BOUNDS && self.base.config.perfect_value
            .map_or(false, |best| !objective.is_better(best, objective.pessimistic(info.bounds())));
        let (solved, dead) = if perfect {
            (true, false)
        } else if self.base.config.greedy {
            match selected.and_then(|i| transitions.get(i)) {
                None => (false, false),
                Some(greedy) => {
                    let mut solved = true;
                    let mut dead = true;
                    for succ in greedy.successors.support().filter(|s| **s != state) {
                        let flags = self.base.store.get_or_create(*succ).flags;
                        solved &= flags.is_solved() || flags.is_terminal();
                        dead &= flags.is_dead_end();
                    }
                    (solved, solved && dead)
                }
            }
        } else {
            (info.unsolved == 0, info.unsolved == 0 && !info.alive)
        };

        if !solved {
            return false;
        }
        let info = self.base.store.get_or_create(state);
        info.flags.set_solved(true);
        // acting may still beat terminating even though no goal is in sight
        if dead && !objective.is_better(info.value.optimistic(objective), info.termination_cost) {
            self.mark_dead_end(state);
        }
        true
    }

    /// Seals the given state as a dead end: no goal can be reached from it
    fn mark_dead_end(&mut self, state: StateID) {
        let info = self.base.store.get_or_create(state);
        info.flags.set_dead_end(true);
        info.flags.set_on_fringe(false);
        info.flags.set_solved(true);
        info.value = V::from_value(info.termination_cost);
        self.base.stats.core.dead_end_states += 1;
        if self.base.initial_state == Some(state) {
            self.base.stats.jump();
        }
        trace!("state {} cannot reach any goal", state.id());
    }

    /// Makes sure every ancestor of `state` comes after it in the update
    /// order. An ancestor is revisited whenever its order rises, unless it is
    /// on the path being followed (that is, on a cycle).
    fn propagate_update_order(&mut self, state: StateID) -> Result<(), SearchError> {
        let mut path = FxHashSet::default();
        let mut stack = vec![(state, 0_usize)];
        path.insert(state);

        while let Some((current, next)) = stack.last().copied() {
            if self.cutoff.must_stop() {
                return Err(self.timeout());
            }
            let info = self.base.store.get_or_create(current);
            let Some(parent) = info.parents.get(next).copied() else {
                stack.pop();
                path.remove(&current);
                continue;
            };
            let order = info.update_order.saturating_add(1);
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let parent_info = self.base.store.get_or_create(parent);
            if parent_info.update_order < order {
                parent_info.update_order = order;
                if path.insert(parent) {
                    stack.push((parent, 0));
                }
            }
        }
        Ok(())
    }

    /// Propagates the change of `state` (its value changed or it got solved)
    /// to all the ancestors that are affected.
    fn backpropagate(&mut self, state: StateID) -> Result<(), SearchError> {
        self.push_parents_to_queue(state);

        // how many times the value of each state changed so far
        let mut changes = FxHashMap::default();
        let mut inspected = FxHashSet::default();

        while let Some(QueueEntry { state, .. }) = self.queue.pop() {
            if self.cutoff.must_stop() {
                self.base.store.get_or_create(state).flags.set_marked(false);
                return Err(self.timeout());
            }

            let info = self.base.store.get_or_create(state);
            info.flags.set_marked(false);
            if info.flags.is_solved() {
                continue;
            }

            let transitions = self.base.generate_transitions_initialized(state);
            let outcome = self.base.bellman_update(state, &transitions);
            if self.seal_if_solved(state, &transitions, outcome.selected) {
                self.push_parents_to_queue(state);
                continue;
            }
            if self.base.config.greedy {
                self.push_fringe_successors(state, &transitions, outcome.selected);
            }
            if !outcome.value_changed {
                continue;
            }

            let count = changes.entry(state).or_insert(0_u32);
            *count += 1;
            if *count > 1 && !inspected.contains(&state) {
                // the change went around a cycle
                for sealed in self.seal_hopeless_states(state, &mut inspected) {
                    self.push_parents_to_queue(sealed);
                }
                if self.base.is_solved(state) {
                    continue;
                }
            }
            self.push_parents_to_queue(state);
        }
        Ok(())
    }

    /// Enqueues the parents of `state` that are not queued yet. When `state`
    /// is solved, its parents have one less unsolved successor and it will
    /// never need to notify them again.
    fn push_parents_to_queue(&mut self, state: StateID) {
        let info = self.base.store.get_or_create(state);
        let solved = info.flags.is_solved();
        let alive = solved && !info.flags.is_dead_end();
        let parents = if solved {
            std::mem::take(&mut info.parents)
        } else {
            info.parents.clone()
        };

        for parent in parents {
            let parent_info = self.base.store.get_or_create(parent);
            if solved {
                debug_assert!(parent_info.unsolved > 0);
                parent_info.unsolved = parent_info.unsolved.saturating_sub(1);
                parent_info.alive |= alive;
            }
            if !parent_info.flags.is_marked() && !parent_info.flags.is_solved() {
                parent_info.flags.set_marked(true);
                self.queue.push(QueueEntry { order: parent_info.update_order, state: parent });
            }
        }
    }

    /// Seals the unsolved states around `root` from which no policy is
    /// certain to reach a goal, a fringe state or some state where
    /// terminating has a finite cost. Such states are stuck for good and
    /// their value would otherwise keep growing. Returns the sealed states.
    fn seal_hopeless_states(&mut self, root: StateID, inspected: &mut FxHashSet<StateID>) -> Vec<StateID> {
        let objective = self.base.config.objective;
        // the supports of the transitions of the unsolved states around root
        let mut nodes: FxHashMap<StateID, Vec<Vec<StateID>>> = FxHashMap::default();
        let mut anchors = FxHashSet::default();
        let mut visited = FxHashSet::default();
        let mut stack = vec![root];
        visited.insert(root);

        while let Some(state) = stack.pop() {
            let info = self.base.store.get_or_create(state);
            let flags = info.flags;
            let anchored = flags.is_goal()
                || flags.is_on_fringe()
                || info.termination_cost.is_finite()
                || (flags.is_solved() && info.value.optimistic(objective).is_finite());
            if anchored {
                anchors.insert(state);
                continue;
            }
            if flags.is_solved() || flags.is_terminal() || !flags.is_initialized() {
                continue;
            }

            let supports = self.base.generate_transitions_initialized(state)
                .iter()
                .map(|t| t.successors.support().copied().filter(|s| *s != state).collect::<Vec<_>>())
                .filter(|support| !support.is_empty())
                .collect::<Vec<_>>();
            for succ in supports.iter().flatten() {
                if visited.insert(*succ) {
                    stack.push(*succ);
                }
            }
            nodes.insert(state, supports);
        }

        // the states having a policy which surely reaches an anchor
        let mut allowed: FxHashSet<StateID> = nodes.keys().copied().collect();
        loop {
            let mut reaching = FxHashSet::default();
            let mut grown = true;
            while grown {
                grown = false;
                for (state, supports) in nodes.iter() {
                    if !allowed.contains(state) || reaching.contains(state) {
                        continue;
                    }
                    let escapes = supports.iter().any(|support| {
                        support.iter().all(|s| anchors.contains(s) || allowed.contains(s))
                            && support.iter().any(|s| anchors.contains(s) || reaching.contains(s))
                    });
                    if escapes {
                        reaching.insert(*state);
                        grown = true;
                    }
                }
            }
            if reaching.len() == allowed.len() {
                break;
            }
            allowed = reaching;
        }

        inspected.insert(root);
        inspected.extend(nodes.keys().copied());
        let mut sealed = nodes.into_keys()
            .filter(|s| !allowed.contains(s))
            .collect::<Vec<_>>();
        sealed.sort_unstable();
        if !sealed.is_empty() {
            debug!("{} states around state {} cannot reach any goal", sealed.len(), root.id());
        }
        for state in sealed.iter().copied() {
            self.mark_dead_end(state);
        }
        sealed
    }

    /// Empties the backpropagation queue and reports the timeout
    fn timeout(&mut self) -> SearchError {
        while let Some(QueueEntry { state, .. }) = self.queue.pop() {
            self.base.store.get_or_create(state).flags.set_marked(false);
        }
        debug!("ao* search interrupted by its cutoff");
        SearchError::Timeout { bounds: self.initial_bounds() }
    }

    pub(crate) fn initial_bounds(&self) -> Interval {
        self.base.initial_state
            .and_then(|s| self.base.bounds_of(s))
            .unwrap_or_else(|| V::from_value(0.0).bounds())
    }
}

impl<'a, M, V> MdpSolver for AoSearch<'a, M, V>
where
    M: Mdp,
    V: EngineValue,
{
    type State = M::State;
    type Action = M::Action;

    fn solve(&mut self, state: &Self::State) -> Result<Interval, SearchError> {
        let initial = self.base.mdp.get_state_id(state);
        self.solve_from(initial)
    }
    fn compute_policy(&mut self, state: &Self::State) -> MapPolicy<Self::Action> {
        let initial = self.base.mdp.get_state_id(state);
        self.base.compute_policy_from(initial)
    }
    fn lookup_bounds(&mut self, state: &Self::State) -> Option<Interval> {
        let id = self.base.mdp.get_state_id(state);
        self.base.bounds_of(id)
    }
    fn statistics(&self) -> &Statistics {
        &self.base.stats
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_ao_search {
    use std::time::Duration;

    use crate::*;

    /// A -> B -> C where C is a goal and both actions cost 1
    fn chain() -> (ExplicitMdp, [StateID; 3], [ActionID; 2]) {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let c = mdp.add_state(TerminationInfo::goal(0.0));
        let ab = mdp.add_action(a, 1.0, &[(b, 1.0)]);
        let bc = mdp.add_action(b, 1.0, &[(c, 1.0)]);
        (mdp, [a, b, c], [ab, bc])
    }

    #[test]
    fn chain_is_solved_with_exact_values() {
        let (mut mdp, [a, b, c], [ab, bc]) = chain();
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(2.0)), solver.solve(&a));
        assert_eq!(Some(Interval::exact(1.0)), solver.lookup_bounds(&b));
        assert_eq!(Some(Interval::exact(0.0)), solver.lookup_bounds(&c));
        assert_eq!(Some(&ab), solver.base().get_policy(a));
        assert_eq!(Some(&bc), solver.base().get_policy(b));
        assert!(solver.base().is_solved(a));
        assert!(solver.base().is_solved(b));
    }
    #[test]
    fn interval_bounds_converge_on_acyclic_graphs() {
        let (mut mdp, [a, b, _], _) = chain();
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Interval>::new(&mut mdp, &blind, SearchConfig::default());

        let bounds = solver.solve(&a).unwrap();
        assert!(bounds.is_exact());
        assert_eq!(2.0, bounds.lower);
        assert_eq!(Some(Interval::exact(1.0)), solver.lookup_bounds(&b));
    }
    #[test]
    fn goal_initial_state_is_sealed_immediately() {
        let (mut mdp, [_, _, c], _) = chain();
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(0.0)), solver.solve(&c));
        assert_eq!(0, solver.statistics().expansions);
        assert_eq!(1, solver.statistics().core.goal_states);
    }
    #[test]
    fn self_loop_only_state_is_a_dead_end() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(100.0));
        mdp.add_action(a, 1.0, &[(a, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(100.0)), solver.solve(&a));
        assert_eq!(1, solver.statistics().core.self_loop_states);
        assert!(solver.base().state_info(a).unwrap().flags.is_dead_end());
    }
    #[test]
    fn state_without_action_is_a_dead_end() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(7.0));
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(7.0)), solver.solve(&a));
        assert_eq!(1, solver.statistics().core.terminal_states);
    }
    #[test]
    fn termination_is_preferred_when_every_action_is_worse() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(3.0));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 5.0, &[(g, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(3.0)), solver.solve(&a));
        assert_eq!(1, solver.statistics().core.terminated_states);
    }
    #[test]
    fn unsolvable_states_are_pruned() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(50.0));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 1.0, &[(b, 0.5), (g, 0.5)]);
        mdp.add_action(b, 1.0, &[(g, 1.0)]);
        let eval = move |s: &StateID| if *s == b {
            EvaluationResult::unsolvable(0.0)
        } else {
            EvaluationResult::estimate(0.0)
        };
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &eval, SearchConfig::default());

        // b is pruned even though it could reach the goal
        assert_eq!(Ok(Interval::exact(26.0)), solver.solve(&a));
        assert_eq!(1, solver.statistics().core.pruned_states);
    }
    #[test]
    fn probabilistic_outcomes_are_weighted() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        let risky = mdp.add_action(a, 1.0, &[(g, 0.5), (b, 0.5)]);
        mdp.add_action(a, 2.5, &[(g, 1.0)]);
        mdp.add_action(b, 2.0, &[(g, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(2.0)), solver.solve(&a));
        assert_eq!(Some(&risky), solver.base().get_policy(a));
    }
    #[test]
    fn partial_self_loops_are_rescaled() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        // expected number of trials is 4
        mdp.add_action(a, 1.0, &[(a, 0.75), (g, 0.25)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        let value = solver.solve(&a).unwrap();
        assert!((value.lower - 4.0).abs() < EPSILON);
    }
    #[test]
    fn maxprob_maximizes_the_goal_probability() {
        let mut mdp = ExplicitMdp::new();
        let s = mdp.add_state(TerminationInfo::non_goal(0.0));
        let t = mdp.add_state(TerminationInfo::non_goal(0.0));
        let f = mdp.add_state(TerminationInfo::non_goal(0.0));
        let g = mdp.add_state(TerminationInfo::goal(1.0));
        mdp.add_action(s, 0.0, &[(g, 0.5), (f, 0.5)]);
        let safe = mdp.add_action(s, 0.0, &[(g, 0.3), (t, 0.7)]);
        mdp.add_action(t, 0.0, &[(g, 0.8), (f, 0.2)]);
        let blind = BlindEvaluator::new(1.0);
        let config = SearchConfigBuilder::default()
            .objective(Objective::Maximize)
            .build()
            .unwrap();
        let mut solver = AoSearch::<_, Interval>::new(&mut mdp, &blind, config);

        let bounds = solver.solve(&s).unwrap();
        assert!((bounds.lower - 0.86).abs() < EPSILON);
        assert!((bounds.upper - 0.86).abs() < EPSILON);
        assert_eq!(Some(&safe), solver.base().get_policy(s));
        assert_eq!(Some(Interval::exact(0.0)), solver.lookup_bounds(&f));
    }
    #[test]
    fn solved_states_are_never_updated_again() {
        let (mut mdp, [a, b, _], _) = chain();
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());
        solver.solve(&a).unwrap();

        let backups = solver.statistics().core.backups;
        let outcome = solver.base.async_update(b);
        assert!(!outcome.value_changed);
        assert_eq!(backups, solver.statistics().core.backups);
        // solving again returns right away
        assert_eq!(Ok(Interval::exact(2.0)), solver.solve(&a));
    }
    #[test]
    fn solved_states_have_no_pending_successor() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let c = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 1.0, &[(b, 0.5), (c, 0.5)]);
        mdp.add_action(b, 1.0, &[(c, 1.0)]);
        mdp.add_action(c, 1.0, &[(g, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default())
            .with_open_list(FifoOpenList::new());

        assert_eq!(Ok(Interval::exact(2.5)), solver.solve(&a));
        for s in [a, b, c] {
            let info = solver.base().state_info(s).unwrap();
            assert!(info.flags.is_solved());
            assert_eq!(0, info.unsolved);
            assert!(!info.flags.is_marked());
            assert!(info.parents.is_empty());
        }
    }
    #[test]
    fn update_order_is_raised_again_along_every_path() {
        let mut mdp = ExplicitMdp::new();
        let [t, a, b, r] = [(); 4].map(|_| mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE)));
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        // t <- a <- b <- r and t <- b: b must come after a, hence r after b
        let store = &mut solver.base.store;
        store.get_or_create(t).parents = vec![a, b];
        store.get_or_create(a).parents = vec![b];
        store.get_or_create(b).parents = vec![r];
        store.get_or_create(r);
        solver.propagate_update_order(t).unwrap();

        let order = |s| solver.base().state_info(s).unwrap().update_order;
        assert!(order(a) > order(t));
        assert!(order(b) > order(a));
        assert!(order(r) > order(b));
    }
    #[test]
    fn update_order_terminates_on_cycles() {
        let mut mdp = ExplicitMdp::new();
        let [a, b, c] = [(); 3].map(|_| mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE)));
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        let store = &mut solver.base.store;
        store.get_or_create(c).parents = vec![b];
        store.get_or_create(b).parents = vec![a, c];
        store.get_or_create(a).parents = vec![];
        solver.propagate_update_order(c).unwrap();

        let order = |s| solver.base().state_info(s).unwrap().update_order;
        assert!(order(b) > 0);
        assert!(order(a) > order(b));
    }
    #[test]
    fn positive_cost_cycle_without_exit_is_a_dead_end() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let c = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        mdp.add_action(a, 1.0, &[(b, 1.0)]);
        mdp.add_action(b, 1.0, &[(c, 1.0)]);
        mdp.add_action(c, 1.0, &[(b, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Interval>::new(&mut mdp, &blind, SearchConfig::default());

        // b <-> c never reaches a goal: both are sealed instead of growing forever
        assert_eq!(Ok(Interval::exact(INFINITE_VALUE)), solver.solve(&a));
        for s in [b, c] {
            let info = solver.base().state_info(s).unwrap();
            assert!(info.flags.is_dead_end());
            assert!(info.flags.is_solved());
        }
        assert!(solver.base().is_solved(a));
        assert!(solver.statistics().core.dead_end_states >= 2);
    }
    #[test]
    fn cycle_that_may_only_exit_to_a_dead_end_is_sealed() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let x = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 1.0, &[(b, 1.0)]);
        // reaches the goal half of the time only
        mdp.add_action(a, 1.0, &[(g, 0.5), (x, 0.5)]);
        mdp.add_action(b, 1.0, &[(a, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(INFINITE_VALUE)), solver.solve(&a));
        assert!(solver.base().state_info(b).unwrap().flags.is_dead_end());
    }
    #[test]
    fn cycle_with_a_finite_way_out_is_not_sealed() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(20.0));
        mdp.add_action(a, 1.0, &[(b, 1.0)]);
        mdp.add_action(b, 1.0, &[(a, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        // going around the cycle costs more and more until giving up in b wins
        assert_eq!(Ok(Interval::exact(21.0)), solver.solve(&a));
        assert_eq!(Some(Interval::exact(20.0)), solver.lookup_bounds(&b));
        assert!(!solver.base().state_info(a).unwrap().flags.is_dead_end());
    }
    #[test]
    fn zero_cost_cycle_leaves_unresolved_states() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 0.0, &[(b, 1.0)]);
        mdp.add_action(a, 5.0, &[(g, 1.0)]);
        mdp.add_action(b, 0.0, &[(a, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        match solver.solve(&a) {
            Err(SearchError::UnresolvedCycles { bounds }) => assert_eq!(0.0, bounds.lower),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    #[test]
    fn zero_deadline_times_out_before_solving_anything() {
        let (mut mdp, [a, ..], _) = chain();
        let admissible = |_: &StateID| EvaluationResult::estimate(0.5);
        let mut solver = AoSearch::<_, Interval>::new(&mut mdp, &admissible, SearchConfig::default())
            .with_cutoff(TimeBudget::new(Duration::ZERO));

        match solver.solve(&a) {
            Err(SearchError::Timeout { bounds }) => {
                assert_eq!(0.5, bounds.lower);
                assert!(bounds.lower <= 2.0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!solver.base().is_solved(a));
        assert_eq!(0, solver.statistics().expansions);
    }
    #[test]
    #[should_panic]
    fn asking_the_policy_of_a_policyless_engine_is_a_contract_violation() {
        let (mut mdp, [a, ..], _) = chain();
        let blind = BlindEvaluator::new(0.0);
        let config = SearchConfigBuilder::default().store_policy(false).build().unwrap();
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, config);
        solver.solve(&a).unwrap();
        solver.base().get_policy(a);
    }
    #[test]
    fn observer_hears_of_each_state_once() {
        #[derive(Default)]
        struct Counter { goals: usize, dead: usize, states: usize }
        impl NewStateObserver<StateID> for &mut Counter {
            fn notify_goal(&mut self, _: &StateID) { self.goals += 1 }
            fn notify_dead(&mut self, _: &StateID) { self.dead += 1 }
            fn notify_state(&mut self, _: &StateID) { self.states += 1 }
        }

        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let d = mdp.add_state(TerminationInfo::non_goal(10.0));
        let e = mdp.add_state(TerminationInfo::non_goal(10.0));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 1.0, &[(g, 0.5), (d, 0.25), (e, 0.25)]);
        let eval = move |s: &StateID| if *s == d {
            EvaluationResult::unsolvable(0.0)
        } else {
            EvaluationResult::estimate(0.0)
        };
        let mut counter = Counter::default();
        {
            let mut solver = AoSearch::<_, Value>::new(&mut mdp, &eval, SearchConfig::default())
                .with_observer(&mut counter);
            assert_eq!(Ok(Interval::exact(6.0)), solver.solve(&a));
            // e turns out to be a dead end after it was announced
            assert!(solver.base().state_info(e).unwrap().flags.is_dead_end());
        }
        assert_eq!(1, counter.goals);
        assert_eq!(1, counter.dead);
        assert_eq!(2, counter.states);
    }
    #[test]
    fn solved_states_without_live_successor_are_dead_ends() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let c = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        mdp.add_action(a, 1.0, &[(b, 1.0)]);
        mdp.add_action(b, 1.0, &[(c, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(INFINITE_VALUE)), solver.solve(&a));
        assert_eq!(1, solver.statistics().core.terminal_states);
        assert_eq!(2, solver.statistics().core.dead_end_states);
        assert!(solver.base().state_info(a).unwrap().flags.is_dead_end());
        assert!(solver.base().state_info(b).unwrap().flags.is_dead_end());
    }
    #[test]
    fn a_live_successor_keeps_its_parent_alive() {
        let mut mdp = ExplicitMdp::new();
        let s = mdp.add_state(TerminationInfo::non_goal(0.0));
        let f = mdp.add_state(TerminationInfo::non_goal(0.0));
        let g = mdp.add_state(TerminationInfo::goal(1.0));
        let t = mdp.add_state(TerminationInfo::non_goal(0.0));
        mdp.add_action(s, 0.0, &[(f, 0.5), (t, 0.5)]);
        mdp.add_action(t, 0.0, &[(g, 0.5), (f, 0.5)]);
        let blind = BlindEvaluator::new(1.0);
        let config = SearchConfigBuilder::default()
            .objective(Objective::Maximize)
            .build()
            .unwrap();
        let mut solver = AoSearch::<_, Interval>::new(&mut mdp, &blind, config);

        assert_eq!(Ok(Interval::exact(0.25)), solver.solve(&s));
        assert!(!solver.base().state_info(s).unwrap().flags.is_dead_end());
        assert!(!solver.base().state_info(t).unwrap().flags.is_dead_end());
        assert_eq!(0, solver.statistics().core.dead_end_states);
    }
    #[test]
    fn a_state_worth_acting_in_is_not_a_dead_end() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(100.0));
        let b = mdp.add_state(TerminationInfo::non_goal(3.0));
        mdp.add_action(a, 1.0, &[(b, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        // no goal in sight, but giving up in b is cheaper than giving up in a
        assert_eq!(Ok(Interval::exact(4.0)), solver.solve(&a));
        assert!(!solver.base().state_info(a).unwrap().flags.is_dead_end());
        assert!(solver.base().get_policy(a).is_some());
    }
    #[test]
    fn greedy_search_leaves_suboptimal_branches_unexplored() {
        let mut mdp = ExplicitMdp::new();
        let s = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let x = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        let short = mdp.add_action(s, 1.0, &[(g, 1.0)]);
        mdp.add_action(s, 5.0, &[(x, 1.0)]);
        mdp.add_action(x, 1.0, &[(g, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        {
            let config = SearchConfigBuilder::default().greedy(true).build().unwrap();
            let mut greedy = AoSearch::<_, Value>::new(&mut mdp, &blind, config);
            assert_eq!(Ok(Interval::exact(1.0)), greedy.solve(&s));
            assert_eq!(1, greedy.statistics().expansions);
            assert_eq!(Some(&short), greedy.base().get_policy(s));
            assert!(greedy.base().state_info(x).unwrap().flags.is_on_fringe());
        }
        let mut exhaustive = AoSearch::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());
        assert_eq!(Ok(Interval::exact(1.0)), exhaustive.solve(&s));
        assert_eq!(2, exhaustive.statistics().expansions);
    }
    #[test]
    fn greedy_search_follows_the_greedy_transition_when_it_changes() {
        let mut mdp = ExplicitMdp::new();
        let s = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let m = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(s, 1.0, &[(m, 1.0)]);
        let direct = mdp.add_action(s, 3.0, &[(g, 1.0)]);
        mdp.add_action(m, 5.0, &[(g, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let config = SearchConfigBuilder::default().greedy(true).build().unwrap();
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, config);

        assert_eq!(Ok(Interval::exact(3.0)), solver.solve(&s));
        assert_eq!(Some(&direct), solver.base().get_policy(s));
        assert!(solver.base().is_solved(m));
    }
    #[test]
    fn greedy_search_works_without_storing_the_policy() {
        let (mut mdp, [a, ..], _) = chain();
        let blind = BlindEvaluator::new(0.0);
        let config = SearchConfigBuilder::default()
            .greedy(true)
            .store_policy(false)
            .build()
            .unwrap();
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, config);

        assert_eq!(Ok(Interval::exact(2.0)), solver.solve(&a));
        assert_eq!(0, solver.statistics().core.policy_updates);
    }
    #[test]
    fn reaching_the_perfect_value_seals_a_state() {
        let mut mdp = ExplicitMdp::new();
        let s = mdp.add_state(TerminationInfo::non_goal(0.0));
        let m = mdp.add_state(TerminationInfo::non_goal(0.0));
        let g = mdp.add_state(TerminationInfo::goal(1.0));
        mdp.add_action(s, 0.0, &[(g, 1.0)]);
        mdp.add_action(s, 0.0, &[(m, 1.0)]);
        mdp.add_action(m, 0.0, &[(g, 1.0)]);
        let blind = BlindEvaluator::new(1.0);
        let config = SearchConfigBuilder::default()
            .objective(Objective::Maximize)
            .perfect_value(1.0)
            .build()
            .unwrap();
        {
            let mut solver = AoSearch::<_, Interval>::new(&mut mdp, &blind, config);
            assert_eq!(Ok(Interval::exact(1.0)), solver.solve(&s));
            assert_eq!(1, solver.statistics().expansions);
            assert!(solver.base().state_info(m).unwrap().flags.is_on_fringe());
            assert!(!solver.base().state_info(s).unwrap().flags.is_dead_end());
        }
        let config = SearchConfigBuilder::default().objective(Objective::Maximize).build().unwrap();
        let mut without = AoSearch::<_, Interval>::new(&mut mdp, &blind, config);
        assert_eq!(Ok(Interval::exact(1.0)), without.solve(&s));
        assert_eq!(2, without.statistics().expansions);
    }
    #[test]
    fn perfect_value_is_ignored_with_a_single_bound() {
        let mut mdp = ExplicitMdp::new();
        let s = mdp.add_state(TerminationInfo::non_goal(0.0));
        let f = mdp.add_state(TerminationInfo::non_goal(0.0));
        let g = mdp.add_state(TerminationInfo::goal(1.0));
        mdp.add_action(s, 0.0, &[(g, 0.5), (f, 0.5)]);
        let blind = BlindEvaluator::new(1.0);
        let config = SearchConfigBuilder::default()
            .objective(Objective::Maximize)
            .perfect_value(1.0)
            .build()
            .unwrap();
        let mut solver = AoSearch::<_, Value>::new(&mut mdp, &blind, config);

        // the optimistic estimate of f says 1, which proves nothing
        assert_eq!(Ok(Interval::exact(0.5)), solver.solve(&s));
    }
}
