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

//! This module provides a search that eliminates the traps of the state
//! space. It runs an AO* search over a quotient of the MDP. Whenever that
//! search gets stuck on cycles, the strongly connected components of the
//! greedy graph that have no way out (the traps) are collapsed into a single
//! state and the search starts over. When no trap remains, the states the
//! search was waiting for are consistent and the search is over.
//!
//! The policy of the quotient is mapped back onto the concrete states: in a
//! collapsed trap, the member owning the chosen action applies it, and the
//! other members walk towards it.

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info};

use crate::{
    AoSearch, Cutoff, EngineValue, Evaluator, Interval, MapPolicy, Mdp, MdpSolver,
    NewStateObserver, OpenList, PolicyDecision, PolicyPicker, QuotientAction, QuotientSystem,
    SearchConfig, SearchError, StateID, Statistics,
};

pub struct TrapElimination<'a, M: Mdp, V> {
    search: AoSearch<'a, QuotientSystem<M>, V>,
}

/// The greedy graph: the unsolved states reachable from some root when only
/// following optimal actions, along with the edges among them.
struct GreedyGraph {
    nodes: Vec<StateID>,
    edges: FxHashMap<StateID, Vec<StateID>>,
}

impl<'a, M, V> TrapElimination<'a, M, V>
where
    M: Mdp,
    V: EngineValue,
{
    pub fn new(mdp: M, evaluator: &'a dyn Evaluator<M::State>, config: SearchConfig) -> Self {
        Self { search: AoSearch::new(QuotientSystem::new(mdp), evaluator, config) }
    }
    pub fn with_cutoff<C: Cutoff + 'a>(self, cutoff: C) -> Self {
        Self { search: self.search.with_cutoff(cutoff) }
    }
    pub fn with_open_list<O: OpenList + 'a>(self, open_list: O) -> Self {
        Self { search: self.search.with_open_list(open_list) }
    }
    pub fn with_picker<P: PolicyPicker<QuotientAction<M::Action>> + 'a>(self, picker: P) -> Self {
        Self { search: self.search.with_picker(picker) }
    }
    pub fn with_observer<O: NewStateObserver<M::State> + 'a>(self, observer: O) -> Self {
        Self { search: self.search.with_observer(observer) }
    }
    /// The underlying AO* search
    pub fn search(&self) -> &AoSearch<'a, QuotientSystem<M>, V> {
        &self.search
    }
    /// The quotient of the MDP, as it stands after the traps collapsed so far
    pub fn quotient(&self) -> &QuotientSystem<M> {
        &self.search.base.mdp
    }

    fn solve_from(&mut self, initial: StateID) -> Result<Interval, SearchError> {
        loop {
            let root = self.quotient().representative(initial);
            match self.search.solve_from(root) {
                Err(SearchError::UnresolvedCycles { .. }) => {
                    let graph = self.greedy_graph(root);
                    let traps = find_traps(&graph);
                    if traps.is_empty() {
                        for state in graph.nodes {
                            self.search.base.store.get_or_create(state).flags.set_solved(true);
                        }
                        info!("trap elimination completed\n{}", self.search.base.stats);
                        return Ok(self.search.initial_bounds());
                    }
                    self.collapse(traps);
                    self.search.reset_search_state();
                }
                outcome => return outcome,
            }
        }
    }

    /// Collapses each trap into its first member
    fn collapse(&mut self, traps: Vec<Vec<StateID>>) {
        let stats = &mut self.search.base.stats;
        stats.trap_iterations += 1;
        for trap in traps {
            let representative = trap[0];
            debug!("collapsing a trap of {} states into state {}", trap.len(), representative.id());
            stats.traps += 1;
            stats.trap_states += trap.len() as u64;
            self.search.base.mdp.build_quotient(&trap, representative);
        }
    }

    /// Turns a policy of the quotient into a policy of the underlying MDP.
    /// In a collapsed trap, the member owning the chosen action applies it
    /// and every other member heads for that one without leaving the trap.
    fn concrete_policy(&mut self, quotient_policy: MapPolicy<QuotientAction<M::Action>>) -> MapPolicy<M::Action> {
        let mut policy = MapPolicy::new();
        for (representative, decision) in quotient_policy.iter() {
            let QuotientAction { state: owner, action } = decision.action.clone();
            let bounds = decision.bounds;
            policy.insert(owner, PolicyDecision { action, bounds });

            let members = self.quotient().quotient(representative)
                .map_or_else(Vec::new, |q| q.states().to_vec());
            if members.len() > 1 {
                self.route_to_owner(&members, owner, bounds, &mut policy);
            }
        }
        policy
    }

    /// Backward breadth first search from `owner` over the actions which
    /// surely keep the members of the trap inside of it.
    fn route_to_owner(&mut self, members: &[StateID], owner: StateID, bounds: Interval, policy: &mut MapPolicy<M::Action>) {
        let inside: FxHashSet<StateID> = members.iter().copied().collect();
        let mut routed = FxHashSet::default();
        routed.insert(owner);

        let mut pending = vec![];
        for member in members.iter().copied().filter(|m| *m != owner) {
            pending.push((member, self.search.base.mdp.concrete_transitions(member)));
        }
        while !pending.is_empty() {
            let mut frontier = vec![];
            pending.retain(|(member, transitions)| {
                let route = transitions.iter().find(|t| {
                    t.successors.support().all(|s| inside.contains(s))
                        && t.successors.support().any(|s| routed.contains(s))
                });
                match route {
                    Some(t) => {
                        frontier.push((*member, t.action.clone()));
                        false
                    }
                    None => true,
                }
            });
            if frontier.is_empty() {
                debug!("{} members of the trap of state {} cannot reach it", pending.len(), owner.id());
                break;
            }
            for (member, action) in frontier {
                routed.insert(member);
                policy.insert(member, PolicyDecision { action, bounds });
            }
        }
    }

    fn greedy_graph(&mut self, root: StateID) -> GreedyGraph {
        let mut nodes = vec![];
        let mut edges = FxHashMap::default();
        let mut visited = FxHashSet::default();
        let mut stack = vec![root];
        visited.insert(root);

        while let Some(state) = stack.pop() {
            let flags = self.search.base.store.get_or_create(state).flags;
            if !flags.is_initialized() || flags.is_terminal() || flags.is_solved() || flags.is_on_fringe() {
                continue;
            }
            let mut succs = vec![];
            for transition in self.search.base.greedy_transitions(state) {
                for succ in transition.successors.support().copied() {
                    if succ != state && !succs.contains(&succ) {
                        succs.push(succ);
                    }
                }
            }
            for succ in succs.iter().copied() {
                if visited.insert(succ) {
                    stack.push(succ);
                }
            }
            nodes.push(state);
            edges.insert(state, succs);
        }
        GreedyGraph { nodes, edges }
    }
}

/// The strongly connected components of the greedy graph that comprise two
/// states or more and which no greedy edge leaves.
fn find_traps(graph: &GreedyGraph) -> Vec<Vec<StateID>> {
    let mut traps = vec![];
    for component in strongly_connected_components(graph) {
        if component.len() < 2 {
            continue;
        }
        let members: FxHashSet<StateID> = component.iter().copied().collect();
        let closed = component.iter()
            .flat_map(|s| graph.edges.get(s).into_iter().flatten())
            .all(|succ| members.contains(succ));
        if closed {
            traps.push(component);
        }
    }
    traps
}

/// Tarjan's algorithm, with an explicit call stack. Edges towards states that
/// are not nodes of the graph are ignored.
fn strongly_connected_components(graph: &GreedyGraph) -> Vec<Vec<StateID>> {
    const UNVISITED: usize = usize::MAX;

    let n = graph.nodes.len();
    let position: FxHashMap<StateID, usize> = graph.nodes.iter()
        .enumerate()
        .map(|(i, s)| (*s, i))
        .collect();
    let succs: Vec<Vec<usize>> = graph.nodes.iter()
        .map(|s| graph.edges.get(s)
            .into_iter()
            .flatten()
            .filter_map(|t| position.get(t).copied())
            .collect())
        .collect();

    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = vec![];
    let mut counter = 0;
    let mut components = vec![];

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = counter;
        lowlink[root] = counter;
        counter += 1;
        stack.push(root);
        on_stack[root] = true;
        let mut calls = vec![(root, 0_usize)];

        while let Some((v, next)) = calls.last().copied() {
            if next < succs[v].len() {
                if let Some(top) = calls.last_mut() {
                    top.1 += 1;
                }
                let w = succs[v][next];
                if index[w] == UNVISITED {
                    index[w] = counter;
                    lowlink[w] = counter;
                    counter += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    calls.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
            } else {
                calls.pop();
                if let Some(&(parent, _)) = calls.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }
                if lowlink[v] == index[v] {
                    let mut component = vec![];
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        component.push(graph.nodes[w]);
                        if w == v {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }
    }
    components
}

impl<'a, M, V> MdpSolver for TrapElimination<'a, M, V>
where
    M: Mdp,
    V: EngineValue,
{
    type State = M::State;
    type Action = M::Action;

    fn solve(&mut self, state: &Self::State) -> Result<Interval, SearchError> {
        let initial = self.search.base.mdp.get_state_id(state);
        self.solve_from(initial)
    }
    /// The decisions are keyed by the concrete states of the MDP
    fn compute_policy(&mut self, state: &Self::State) -> MapPolicy<Self::Action> {
        let quotient_policy = self.search.compute_policy(state);
        self.concrete_policy(quotient_policy)
    }
    fn lookup_bounds(&mut self, state: &Self::State) -> Option<Interval> {
        self.search.lookup_bounds(state)
    }
    fn statistics(&self) -> &Statistics {
        self.search.statistics()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_traps {
    use fxhash::FxHashMap;

    use crate::*;
    use super::{find_traps, strongly_connected_components, GreedyGraph};

    fn graph(edges: &[(usize, &[usize])]) -> GreedyGraph {
        let nodes = edges.iter().map(|(s, _)| StateID(*s)).collect();
        let edges: FxHashMap<StateID, Vec<StateID>> = edges.iter()
            .map(|(s, succs)| (StateID(*s), succs.iter().map(|t| StateID(*t)).collect()))
            .collect();
        GreedyGraph { nodes, edges }
    }
    fn sorted(mut components: Vec<Vec<StateID>>) -> Vec<Vec<StateID>> {
        components.iter_mut().for_each(|c| c.sort());
        components.sort();
        components
    }

    #[test]
    fn tarjan_finds_every_component() {
        let g = graph(&[(0, &[1]), (1, &[2]), (2, &[0, 3]), (3, &[4]), (4, &[3]), (5, &[])]);
        let components = sorted(strongly_connected_components(&g));
        assert_eq!(vec![
            vec![StateID(0), StateID(1), StateID(2)],
            vec![StateID(3), StateID(4)],
            vec![StateID(5)],
        ], components);
    }
    #[test]
    fn only_closed_components_are_traps() {
        let g = graph(&[(0, &[1]), (1, &[2]), (2, &[0, 3]), (3, &[4]), (4, &[3])]);
        assert_eq!(vec![vec![StateID(3), StateID(4)]], sorted(find_traps(&g)));
        // an edge towards a state outside of the graph is a way out
        let g = graph(&[(0, &[1]), (1, &[0, 9])]);
        assert!(find_traps(&g).is_empty());
    }
    #[test]
    fn a_zero_cost_cycle_is_collapsed_and_its_exit_is_found() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 0.0, &[(b, 1.0)]);
        mdp.add_action(b, 0.0, &[(a, 1.0)]);
        mdp.add_action(b, 5.0, &[(g, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = TrapElimination::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(5.0)), solver.solve(&a));
        assert_eq!(solver.quotient().representative(a), solver.quotient().representative(b));
        let stats = solver.statistics();
        assert_eq!(1, stats.trap_iterations);
        assert_eq!(1, stats.traps);
        assert_eq!(2, stats.trap_states);
    }
    #[test]
    fn a_cycle_off_the_greedy_graph_is_not_collapsed() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 1.0, &[(g, 1.0)]);
        mdp.add_action(a, 2.0, &[(b, 1.0)]);
        mdp.add_action(b, 1.0, &[(a, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = TrapElimination::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(1.0)), solver.solve(&a));
        assert_eq!(0, solver.statistics().traps);
        assert_ne!(solver.quotient().representative(a), solver.quotient().representative(b));
        assert!(solver.search().base().is_solved(a));
    }
    #[test]
    fn cycles_with_an_exit_converge_without_collapsing() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let d = mdp.add_state(TerminationInfo::goal(10.0));
        mdp.add_action(a, 0.0, &[(b, 0.6), (d, 0.4)]);
        mdp.add_action(b, 0.0, &[(a, 0.3), (d, 0.7)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = TrapElimination::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        let bounds = solver.solve(&a).unwrap();
        assert!((bounds.lower - 10.0).abs() < 1e-3);
        assert_eq!(0, solver.statistics().traps);
    }
    #[test]
    fn every_member_of_a_collapsed_trap_gets_a_decision() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let c = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        let ab = mdp.add_action(a, 0.0, &[(b, 1.0)]);
        let bc = mdp.add_action(b, 0.0, &[(c, 1.0)]);
        mdp.add_action(c, 0.0, &[(a, 1.0)]);
        let exit = mdp.add_action(c, 5.0, &[(g, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = TrapElimination::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(5.0)), solver.solve(&a));
        assert_eq!(3, solver.statistics().trap_states);
        let policy = solver.compute_policy(&a);
        assert_eq!(3, policy.len());
        assert_eq!(Some(&exit), policy.action(c));
        assert_eq!(Some(&bc), policy.action(b));
        assert_eq!(Some(&ab), policy.action(a));
        assert_eq!(Some(Interval::exact(5.0)), policy.get(a).map(|d| d.bounds));
    }
    #[test]
    fn positive_cost_cycle_without_exit_is_a_dead_end() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        mdp.add_action(a, 1.0, &[(b, 1.0)]);
        mdp.add_action(b, 1.0, &[(a, 1.0)]);
        let blind = BlindEvaluator::new(0.0);
        let mut solver = TrapElimination::<_, Value>::new(&mut mdp, &blind, SearchConfig::default());

        assert_eq!(Ok(Interval::exact(INFINITE_VALUE)), solver.solve(&a));
        assert_eq!(0, solver.statistics().traps);
        assert_eq!(2, solver.statistics().core.dead_end_states);
        assert!(solver.compute_policy(&a).is_empty());
    }
}
