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

//! Trivial evaluators. They are mostly useful to solve small problems
//! exhaustively or to debug a model.

use crate::{EvaluationResult, Evaluator, Value};

/// This evaluator returns the same estimate for every state. It is
/// admissible as long as the estimate is a lower bound on the cost of all
/// states (an upper bound on their probability in a MaxProb problem): zero
/// for the cost minimization and one for MaxProb are always fine.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlindEvaluator {
    estimate: Value,
}
impl BlindEvaluator {
    pub fn new(estimate: Value) -> Self {
        Self { estimate }
    }
}
impl<S> Evaluator<S> for BlindEvaluator {
    fn evaluate(&self, _: &S) -> EvaluationResult {
        EvaluationResult::estimate(self.estimate)
    }
}

#[cfg(test)]
mod test_evaluators {
    use crate::*;

    #[test]
    fn blind_evaluator_yields_its_estimate() {
        let blind = BlindEvaluator::new(2.5);
        assert_eq!(EvaluationResult::estimate(2.5), blind.evaluate(&"anything"));
    }
    #[test]
    fn closures_are_evaluators() {
        let eval = |s: &usize| if *s == 0 {
            EvaluationResult::unsolvable(0.0)
        } else {
            EvaluationResult::estimate(*s as Value)
        };
        assert!(eval.evaluate(&0).unsolvable);
        assert_eq!(3.0, eval.evaluate(&3).estimate);
    }
}
