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

//! This module provides the quotient system: a view of some MDP in which
//! groups of states have been collapsed into a single representative. Search
//! engines run on a quotient system exactly as they would on the underlying
//! MDP, which is how traps get eliminated from the state space.

use fxhash::FxHashSet;

use crate::{Distribution, Mdp, StateID, TerminationInfo, Transition, TransitionCache, Value};

/// An action of the quotient: the original action along with the concrete
/// member state in which it is applicable.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotientAction<A> {
    pub state: StateID,
    pub action: A,
}

/// What the quotient system knows about one concrete state. For a
/// representative, `states` lists every concrete state it stands for (itself
/// included) and `parents` lists the concrete states outside of the quotient
/// which have an action leading into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotientInformation {
    representative: StateID,
    states: Vec<StateID>,
    parents: Vec<StateID>,
}
impl QuotientInformation {
    fn singleton(state: StateID) -> Self {
        Self { representative: state, states: vec![state], parents: vec![] }
    }
    pub fn representative(&self) -> StateID {
        self.representative
    }
    pub fn states(&self) -> &[StateID] {
        &self.states
    }
    /// The parents, sorted by increasing id
    pub fn parents(&self) -> &[StateID] {
        &self.parents
    }
}

/// The quotient of an MDP. The transitions of every concrete state are
/// generated once and cached; collapsing states rewrites the cached entries.
#[derive(Debug, Clone)]
pub struct QuotientSystem<M: Mdp> {
    mdp: M,
    cache: TransitionCache<M::Action>,
    infos: Vec<QuotientInformation>,
}

impl<M: Mdp> QuotientSystem<M> {
    pub fn new(mdp: M) -> Self {
        Self { mdp, cache: TransitionCache::new(), infos: vec![] }
    }
    /// The underlying MDP
    pub fn mdp(&self) -> &M {
        &self.mdp
    }
    /// Returns the representative of the quotient `state` belongs to
    pub fn representative(&self, state: StateID) -> StateID {
        self.infos.get(state.id()).map_or(state, |info| info.representative)
    }
    /// The information recorded about `state` (if it was ever touched)
    pub fn quotient(&self, state: StateID) -> Option<&QuotientInformation> {
        self.infos.get(state.id())
    }
    /// The transitions of the concrete state `state`, as the underlying MDP
    /// generates them
    pub(crate) fn concrete_transitions(&mut self, state: StateID) -> Vec<Transition<M::Action>> {
        self.mdp.generate_all_transitions(state)
    }
    /// The concrete states of the quotient represented by `state`
    fn members(&self, state: StateID) -> Vec<StateID> {
        self.infos.get(state.id()).map_or_else(|| vec![state], |info| info.states.clone())
    }
    fn info_mut(&mut self, state: StateID) -> &mut QuotientInformation {
        let id = state.id();
        if id >= self.infos.len() {
            let from = self.infos.len();
            self.infos.extend((from..=id).map(|i| QuotientInformation::singleton(StateID(i))));
        }
        &mut self.infos[id]
    }
    /// Generates and caches the transitions of the concrete state `state`.
    /// The successors are expressed in terms of representatives and `state`
    /// is registered as a parent of each of them.
    fn ensure_cached(&mut self, state: StateID) {
        if self.cache.contains(state) {
            return;
        }
        let own = self.representative(state);
        let mut children = vec![];
        let mut entry = vec![];
        for transition in self.mdp.generate_all_transitions(state) {
            let mut successors = transition.successors.map(|s| self.representative(*s));
            successors.make_unique();
            children.extend(successors.support().copied().filter(|s| *s != own));
            entry.push(Transition { action: transition.action, successors });
        }
        self.info_mut(state);
        for child in children {
            insert_sorted(&mut self.info_mut(child).parents, state);
        }
        self.cache.insert(state, entry);
    }

    /// Collapses the quotient states `members` into a single quotient state
    /// represented by `representative`. The members may themselves be the
    /// result of earlier collapses.
    ///
    /// # Panics
    /// When `representative` is not one of the `members`.
    pub fn build_quotient(&mut self, members: &[StateID], representative: StateID) {
        assert!(members.contains(&representative),
            "the representative {representative:?} is not one of the members");
        let rid = representative;

        for member in members {
            for state in self.members(*member) {
                self.ensure_cached(state);
            }
        }

        let mut states = self.info_mut(rid).states.clone();
        let mut parents = std::mem::take(&mut self.info_mut(rid).parents);
        for member in members.iter().copied().filter(|m| *m != rid) {
            let donor = self.info_mut(member);
            parents.append(&mut donor.parents);
            for state in std::mem::take(&mut donor.states) {
                if !states.contains(&state) {
                    states.push(state);
                }
            }
        }
        let inside: FxHashSet<StateID> = states.iter().copied().collect();
        let to_rep = |s: &StateID| if inside.contains(s) { rid } else { *s };

        // transitions inside the quotient now lead to the representative
        for state in states.iter().copied() {
            self.cache.rewrite(state, |t| {
                let mut successors = t.successors.map(to_rep);
                successors.make_unique();
                if successors.is_dirac(&rid) {
                    None
                } else {
                    Some(Transition { action: t.action.clone(), successors })
                }
            });
        }
        for state in states.iter().copied().filter(|s| *s != rid) {
            let info = self.info_mut(state);
            info.representative = rid;
            info.states = vec![state];
            info.parents.clear();
        }

        parents.retain(|p| !inside.contains(p));
        parents.sort_unstable();
        parents.dedup();

        for parent in parents.iter().copied() {
            self.cache.rewrite(parent, |t| {
                let mut successors = t.successors.map(to_rep);
                successors.make_unique();
                Some(Transition { action: t.action.clone(), successors })
            });
        }

        let info = self.info_mut(rid);
        info.representative = rid;
        info.states = states;
        info.parents = parents;
    }
}

fn insert_sorted(list: &mut Vec<StateID>, state: StateID) {
    if let Err(pos) = list.binary_search(&state) {
        list.insert(pos, state);
    }
}

impl<M: Mdp> Mdp for QuotientSystem<M> {
    type State = M::State;
    type Action = QuotientAction<M::Action>;

    fn get_state_id(&mut self, state: &Self::State) -> StateID {
        let id = self.mdp.get_state_id(state);
        self.representative(id)
    }
    fn get_state(&self, state: StateID) -> Self::State {
        self.mdp.get_state(state)
    }
    fn generate_applicable_actions(&mut self, state: StateID) -> Vec<Self::Action> {
        self.generate_all_transitions(state)
            .into_iter()
            .map(|t| t.action)
            .collect()
    }
    fn generate_action_transitions(&mut self, _state: StateID, action: &Self::Action) -> Distribution<StateID> {
        self.ensure_cached(action.state);
        self.cache.get(action.state)
            .and_then(|entry| entry.iter().find(|t| t.action == action.action))
            .map(|t| t.successors.clone())
            .unwrap_or_default()
    }
    fn generate_all_transitions(&mut self, state: StateID) -> Vec<Transition<Self::Action>> {
        let mut transitions = vec![];
        for member in self.members(state) {
            self.ensure_cached(member);
            if let Some(entry) = self.cache.get(member) {
                transitions.extend(entry.iter().map(|t| Transition {
                    action: QuotientAction { state: member, action: t.action.clone() },
                    successors: t.successors.clone(),
                }));
            }
        }
        transitions
    }
    fn get_termination_info(&self, state: &Self::State) -> TerminationInfo {
        self.mdp.get_termination_info(state)
    }
    fn get_action_cost(&self, action: &Self::Action) -> Value {
        self.mdp.get_action_cost(&action.action)
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_quotient_system {
    use crate::*;

    /// A and B exchange probability mass for free, both may reach the goal
    /// D and E leads to A at cost 1.
    struct Fixture {
        mdp: ExplicitMdp,
        a: StateID,
        b: StateID,
        d: StateID,
        e: StateID,
    }
    fn fixture() -> Fixture {
        let mut mdp = ExplicitMdp::new();
        let e = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let d = mdp.add_state(TerminationInfo::goal(10.0));
        mdp.add_action(a, 0.0, &[(b, 0.6), (d, 0.4)]);
        mdp.add_action(b, 0.0, &[(a, 0.3), (d, 0.7)]);
        mdp.add_action(e, 1.0, &[(a, 1.0)]);
        Fixture { mdp, a, b, d, e }
    }
    fn successors_of<M: Mdp>(quotient: &mut QuotientSystem<M>, state: StateID) -> Vec<Vec<StateID>> {
        quotient.generate_all_transitions(state)
            .iter()
            .map(|t| t.successors.support().copied().collect())
            .collect()
    }

    #[test]
    fn untouched_states_are_their_own_representative() {
        let f = fixture();
        let quotient = QuotientSystem::new(f.mdp);
        assert_eq!(f.a, quotient.representative(f.a));
        assert!(quotient.quotient(f.a).is_none());
    }
    #[test]
    fn caching_a_state_records_it_as_parent_of_its_successors() {
        let mut f = fixture();
        let mut quotient = QuotientSystem::new(&mut f.mdp);
        quotient.generate_all_transitions(f.a);
        quotient.generate_all_transitions(f.e);
        assert_eq!(Some(&[f.e][..]), quotient.quotient(f.a).map(|q| q.parents()));
        assert_eq!(Some(&[f.a][..]), quotient.quotient(f.b).map(|q| q.parents()));
        assert_eq!(Some(&[f.a][..]), quotient.quotient(f.d).map(|q| q.parents()));
    }
    #[test]
    fn two_states_collapse_into_their_representative() {
        let mut f = fixture();
        let mut quotient = QuotientSystem::new(&mut f.mdp);
        quotient.generate_all_transitions(f.e);
        quotient.build_quotient(&[f.a, f.b], f.b);

        assert_eq!(f.b, quotient.representative(f.a));
        assert_eq!(f.b, quotient.representative(f.b));
        let info = quotient.quotient(f.b).cloned().unwrap();
        assert_eq!(2, info.states().len());
        assert!(info.states().contains(&f.a));
        assert!(info.states().contains(&f.b));
        assert_eq!(&[f.e], info.parents());
        assert_eq!(Some(&[f.a][..]), quotient.quotient(f.a).map(|q| q.states()));
        assert_eq!(Some(0), quotient.quotient(f.a).map(|q| q.parents().len()));

        // the parent now leads to the representative
        assert_eq!(vec![vec![f.b]], successors_of(&mut quotient, f.e));
        // both actions of the quotient state lead to itself and to the goal
        let mut merged = successors_of(&mut quotient, f.b);
        merged.sort();
        assert_eq!(vec![vec![f.b, f.d], vec![f.b, f.d]], merged);
    }
    #[test]
    fn quotient_actions_remember_their_member_state() {
        let mut f = fixture();
        let mut quotient = QuotientSystem::new(&mut f.mdp);
        quotient.build_quotient(&[f.a, f.b], f.b);
        let actions = quotient.generate_applicable_actions(f.b);
        assert_eq!(2, actions.len());
        let from_a = actions.iter().find(|a| a.state == f.a).cloned().unwrap();
        let outcomes = quotient.generate_action_transitions(f.b, &from_a);
        assert!((outcomes.probability_of(&f.b) - 0.6).abs() < EPSILON);
        assert!((outcomes.probability_of(&f.d) - 0.4).abs() < EPSILON);
        assert_eq!(0.0, quotient.get_action_cost(&from_a));
    }
    #[test]
    fn state_ids_are_mapped_to_representatives() {
        let mut f = fixture();
        let mut quotient = QuotientSystem::new(&mut f.mdp);
        quotient.build_quotient(&[f.a, f.b], f.b);
        assert_eq!(f.b, quotient.get_state_id(&f.a));
        assert_eq!(f.e, quotient.get_state_id(&f.e));
    }
    #[test]
    fn collapsing_a_singleton_twice_changes_nothing() {
        let mut f = fixture();
        let mut quotient = QuotientSystem::new(&mut f.mdp);
        quotient.generate_all_transitions(f.e);
        quotient.build_quotient(&[f.a], f.a);
        let first = quotient.quotient(f.a).cloned();
        quotient.build_quotient(&[f.a], f.a);
        assert_eq!(first, quotient.quotient(f.a).cloned());
        assert_eq!(Some(&[f.e][..]), first.as_ref().map(|q| q.parents()));
        assert_eq!(Some(&[f.a][..]), first.as_ref().map(|q| q.states()));
    }
    #[test]
    fn pure_self_loops_are_dropped_from_the_quotient() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        mdp.add_action(a, 0.0, &[(b, 1.0)]);
        mdp.add_action(b, 0.0, &[(a, 1.0)]);
        let mut quotient = QuotientSystem::new(mdp);
        quotient.build_quotient(&[a, b], a);
        assert!(quotient.generate_all_transitions(a).is_empty());
    }
    #[test]
    fn quotients_can_grow_incrementally() {
        let mut mdp = ExplicitMdp::new();
        let a = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let b = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let c = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
        let g = mdp.add_state(TerminationInfo::goal(0.0));
        mdp.add_action(a, 0.0, &[(b, 1.0)]);
        mdp.add_action(b, 0.0, &[(a, 0.5), (c, 0.5)]);
        mdp.add_action(c, 0.0, &[(a, 0.5), (g, 0.5)]);
        let mut quotient = QuotientSystem::new(mdp);
        quotient.build_quotient(&[a, b], a);
        quotient.build_quotient(&[a, c], c);

        for s in [a, b, c] {
            assert_eq!(c, quotient.representative(s));
        }
        let info = quotient.quotient(c).cloned().unwrap();
        assert_eq!(3, info.states().len());
        assert!(info.parents().is_empty());
        assert_eq!(vec![vec![c, g]], successors_of(&mut quotient, c));
    }
    #[test]
    #[should_panic]
    fn the_representative_must_be_a_member() {
        let f = fixture();
        let mut quotient = QuotientSystem::new(f.mdp);
        quotient.build_quotient(&[f.a, f.b], f.d);
    }
}
