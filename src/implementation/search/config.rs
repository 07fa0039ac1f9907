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

use derive_builder::Builder;

use crate::{Objective, Value};

/// This is how you configure the behavior of a search engine, e.g.
///
/// ```
/// # use probsearch::*;
/// let config = SearchConfigBuilder::default()
///     .objective(Objective::Maximize)
///     .interval_comparison(true)
///     .build()
///     .unwrap();
/// assert!(config.store_policy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct SearchConfig {
    /// Whether the engine minimizes the expected cost of reaching a goal
    /// (default) or maximizes the probability of reaching one.
    #[builder(default)]
    pub objective: Objective,
    /// When tracking interval bounds, this flag must be true if a movement of
    /// the pessimistic bound is to be considered a value change (hence
    /// propagated to the parents). By default, only the optimistic bound is
    /// considered.
    #[builder(default="false")]
    pub interval_comparison: bool,
    /// This flag must be true (default) if the greedy action of each state
    /// is to be remembered during the search.
    #[builder(default="true")]
    pub store_policy: bool,
    /// When this flag is true, AO* only explores the successors of the
    /// greedy transition of each state, and a state is solved as soon as
    /// these successors are solved. By default, every successor is explored.
    #[builder(default="false")]
    pub greedy: bool,
    /// The best value a state could possibly have (e.g. 1 when maximizing
    /// the goal probability). With interval bounds, a state whose
    /// pessimistic bound reaches it is solved right away.
    #[builder(default, setter(strip_option))]
    pub perfect_value: Option<Value>,
}
impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            objective: Objective::Minimize,
            interval_comparison: false,
            store_policy: true,
            greedy: false,
            perfect_value: None,
        }
    }
}

#[cfg(test)]
mod test_config {
    use crate::*;

    #[test]
    fn builder_defaults_match_default_config() {
        let built = SearchConfigBuilder::default().build().unwrap();
        assert_eq!(SearchConfig::default(), built);
    }
    #[test]
    fn builder_overrides_the_defaults() {
        let built = SearchConfigBuilder::default()
            .objective(Objective::Maximize)
            .store_policy(false)
            .build()
            .unwrap();
        assert_eq!(Objective::Maximize, built.objective);
        assert!(!built.store_policy);
        assert!(!built.interval_comparison);
        assert!(!built.greedy);
        assert_eq!(None, built.perfect_value);
    }
    #[test]
    fn perfect_value_is_set_without_wrapping() {
        let built = SearchConfigBuilder::default()
            .objective(Objective::Maximize)
            .greedy(true)
            .perfect_value(1.0)
            .build()
            .unwrap();
        assert!(built.greedy);
        assert_eq!(Some(1.0), built.perfect_value);
    }
}
