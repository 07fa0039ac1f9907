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

//! # PROBSEARCH
//! Probsearch is a generic framework to compute optimal policies for Markov
//! decision processes by means of heuristic search. It solves stochastic
//! shortest path problems (minimize the expected cost of reaching a goal) as
//! well as MaxProb problems (maximize the probability of reaching one).
//!
//! The state space is never enumerated up front. Instead, you describe your
//! problem by implementing the `Mdp` trait which lets the engines discover
//! the states lazily, starting from the initial state. Along with an
//! `Evaluator` estimating the value of the states, this is all the engines
//! need to compute the value of the initial state.
//!
//! ## Engines
//! * `AoSearch` expands the states reachable from the initial state and
//!   backs the values up in topological order. It is exact on acyclic graphs.
//!   The cycles from which no policy surely reaches a goal are sealed as dead
//!   ends; the other cycles may leave it with `SearchError::UnresolvedCycles`.
//!   It is exhaustive by default, and greedy on demand.
//! * `TrapElimination` runs an AO* search over a `QuotientSystem` and
//!   collapses the cycles that trap the greedy policy, so that the cycles
//!   never stop it. Its policies are expressed in terms of the states and
//!   actions of the original MDP.
//!
//! Both engines either track a single value per state (`Value`) or a pair of
//! bounds (`Interval`) which narrows down as the search progresses.
//!
//! ## Quick Example
//! The following solves a tiny explicit MDP. From the initial state, one can
//! either pay 10 to reach the goal for sure, or pay 1 for a coin toss which
//! either reaches the goal or brings us back where we started.
//!
//! ```
//! # use probsearch::*;
//! let mut mdp = ExplicitMdp::new();
//! let start = mdp.add_state(TerminationInfo::non_goal(INFINITE_VALUE));
//! let goal  = mdp.add_state(TerminationInfo::goal(0.0));
//! let _safe = mdp.add_action(start, 10.0, &[(goal, 1.0)]);
//! let toss  = mdp.add_action(start,  1.0, &[(goal, 0.5), (start, 0.5)]);
//!
//! let heuristic = BlindEvaluator::new(0.0);
//! let mut solver = AoSearch::<_, Interval>::new(&mut mdp, &heuristic, SearchConfig::default());
//!
//! let bounds = solver.solve(&start).unwrap();
//! assert!((bounds.lower - 2.0).abs() < EPSILON);
//!
//! let policy = solver.compute_policy(&start);
//! assert_eq!(Some(&toss), policy.action(start));
//! ```
//!
//! ## Configuration
//! The behavior of an engine is tuned through its `SearchConfig` (see the
//! `SearchConfigBuilder`): the objective, whether the pessimistic bound
//! counts when deciding that a value changed, whether the greedy actions
//! are stored, whether AO* only explores the greedy transitions and the best
//! value a state could possibly get.
//!
//! ## Logging
//! The engines report their progress through the `log` facade. No logger is
//! installed by the library: pick the one that suits your application.

mod common;
mod abstraction;
mod implementation;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
