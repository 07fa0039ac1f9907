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

//! This module provides the sparse probability distributions that describe
//! the outcomes of an action.

use rand::Rng;

use crate::{Value, EPSILON};

/// One possible outcome of a distribution along with its probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome<T> {
    pub item: T,
    pub probability: Value,
}

/// A sparse list of (item, probability) pairs. Once it has been completely
/// built, the probabilities of a distribution sum up to one (within
/// `EPSILON`) and each of them is strictly positive. A distribution may
/// mention the state it was generated from (a self-loop): the engines are
/// aware of that situation and handle it specifically.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<T> {
    outcomes: Vec<Outcome<T>>,
}
impl<T> Default for Distribution<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> Distribution<T> {
    /// Creates an empty distribution
    pub fn new() -> Self {
        Self { outcomes: vec![] }
    }
    /// Creates a distribution where `item` happens with certainty
    pub fn dirac(item: T) -> Self {
        Self { outcomes: vec![Outcome { item, probability: 1.0 }] }
    }
    /// Appends an outcome to the distribution (without checking whether the
    /// same item was already present).
    pub fn add(&mut self, item: T, probability: Value) {
        assert!(probability > 0.0, "outcomes must have a strictly positive probability");
        self.outcomes.push(Outcome { item, probability });
    }
    /// The number of outcomes
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }
    /// Returns true iff the distribution has no outcome at all
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
    /// Iterates over the outcomes of the distribution
    pub fn iter(&self) -> impl Iterator<Item = &Outcome<T>> {
        self.outcomes.iter()
    }
    /// Iterates over the items having a non-zero probability
    pub fn support(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().map(|o| &o.item)
    }
    /// The sum of all probabilities
    pub fn total_probability(&self) -> Value {
        self.outcomes.iter().map(|o| o.probability).sum()
    }
    /// Returns true iff the probabilities sum up to one
    pub fn is_normalized(&self) -> bool {
        (self.total_probability() - 1.0).abs() < EPSILON
    }
    /// Scales all probabilities so that they sum up to one
    pub fn normalize(&mut self) {
        let total = self.total_probability();
        if total > 0.0 {
            for o in self.outcomes.iter_mut() {
                o.probability /= total;
            }
        }
    }
    /// Draws one item from the distribution. It returns None iff the
    /// distribution is empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let last = self.outcomes.last()?;
        let mut draw = rng.gen::<Value>() * self.total_probability();
        for o in self.outcomes.iter() {
            if draw < o.probability {
                return Some(&o.item);
            }
            draw -= o.probability;
        }
        Some(&last.item)
    }
    /// Transforms each item of the distribution. The resulting distribution
    /// may contain duplicate items (see `make_unique`).
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Distribution<U> {
        Distribution {
            outcomes: self.outcomes.iter()
                .map(|o| Outcome { item: f(&o.item), probability: o.probability })
                .collect(),
        }
    }
}
impl<T: PartialEq> Distribution<T> {
    /// Adds the probability mass to the existing outcome if `item` is already
    /// part of the distribution. Otherwise, it appends a new outcome.
    pub fn add_unique(&mut self, item: T, probability: Value) {
        assert!(probability > 0.0, "outcomes must have a strictly positive probability");
        match self.outcomes.iter_mut().find(|o| o.item == item) {
            Some(o) => o.probability += probability,
            None => self.outcomes.push(Outcome { item, probability }),
        }
    }
    /// Returns true iff `item` is the one and only outcome of the distribution
    pub fn is_dirac(&self, item: &T) -> bool {
        self.outcomes.len() == 1 && self.outcomes[0].item == *item
    }
    /// Returns the probability of the given item
    pub fn probability_of(&self, item: &T) -> Value {
        self.outcomes.iter()
            .filter(|o| o.item == *item)
            .map(|o| o.probability)
            .sum()
    }
}
impl<T: Ord> Distribution<T> {
    /// Merges the outcomes pertaining to the same item. After this call, the
    /// outcomes are sorted by item.
    pub fn make_unique(&mut self) {
        self.outcomes.sort_by(|a, b| a.item.cmp(&b.item));
        let mut merged: Vec<Outcome<T>> = Vec::with_capacity(self.outcomes.len());
        for o in self.outcomes.drain(..) {
            match merged.last_mut() {
                Some(last) if last.item == o.item => last.probability += o.probability,
                _ => merged.push(o),
            }
        }
        self.outcomes = merged;
    }
}
impl<T: PartialEq> FromIterator<(T, Value)> for Distribution<T> {
    fn from_iter<I: IntoIterator<Item = (T, Value)>>(iter: I) -> Self {
        let mut d = Distribution::new();
        for (item, probability) in iter {
            d.add_unique(item, probability);
        }
        d
    }
}
impl<T> IntoIterator for Distribution<T> {
    type Item = Outcome<T>;
    type IntoIter = std::vec::IntoIter<Outcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
