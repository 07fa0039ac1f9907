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

use crate::EvaluationResult;

/// An evaluator provides the heuristic estimate of the value of a state. To
/// guarantee optimality, that estimate must be admissible: it never
/// overestimates the true cost (or underestimates the true probability) of
/// the state.
///
/// Any closure `Fn(&S) -> EvaluationResult` is an evaluator.
pub trait Evaluator<S> {
    /// Evaluates the given state. The verdict `unsolvable` must only be
    /// returned when it has been proven that no goal can be reached from it.
    fn evaluate(&self, state: &S) -> EvaluationResult;
}

impl<S, F: Fn(&S) -> EvaluationResult> Evaluator<S> for F {
    fn evaluate(&self, state: &S) -> EvaluationResult {
        self(state)
    }
}
