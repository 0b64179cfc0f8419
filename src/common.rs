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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client code is likely to work with.

use std::fmt;

use fxhash::FxHashMap;
use ordered_float::OrderedFloat;

// ----------------------------------------------------------------------------
// --- VARIABLE ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a binary variable of an encoded knapsack model. It is
/// either the variable telling whether a given item is selected, or one of
/// the bits of the binary expansion of the slack that turns the capacity
/// inequality into an equality.
///
/// Variables are totally ordered: all item variables come before all slack
/// variables, and each kind is ordered by its index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Variable {
    /// `x_i`: equals 1 iff item `i` is selected
    Item(usize),
    /// `s_j`: the j-th bit of the slack (weighted by `2^j`)
    Slack(usize),
}
impl Variable {
    #[inline]
    /// This function returns the index of the variable among the variables
    /// of the same kind.
    ///
    /// # Examples:
    /// ```
    /// # use knapsack_bqm::Variable;
    /// assert_eq!(0, Variable::Item(0).id());
    /// assert_eq!(3, Variable::Slack(3).id());
    /// ```
    pub fn id(self) -> usize {
        match self {
            Variable::Item(i)  => i,
            Variable::Slack(j) => j,
        }
    }
    /// Returns true iff this is an item variable
    #[inline]
    pub fn is_item(self) -> bool {
        matches!(self, Variable::Item(_))
    }
}
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Item(i)  => write!(f, "x{}", i),
            Variable::Slack(j) => write!(f, "s{}", j),
        }
    }
}

// ----------------------------------------------------------------------------
// --- ITEM & INSTANCE --------------------------------------------------------
// ----------------------------------------------------------------------------
/// One item that may be put in the sack
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Item {
    /// The profit earned when the item is selected
    pub cost: f64,
    /// The room the item takes in the sack
    pub weight: i64,
}

/// A complete knapsack instance: the items and the capacity of the sack.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub items: Vec<Item>,
    pub capacity: i64,
}
impl Instance {
    pub fn new(items: Vec<Item>, capacity: i64) -> Self {
        Self { items, capacity }
    }
    /// Creates an instance from two parallel columns. Both columns are
    /// expected to have the same length; the encoder reports the mismatch
    /// otherwise, so here we simply zip them.
    pub fn from_columns(costs: &[f64], weights: &[i64], capacity: i64) -> Self {
        let items = costs.iter().zip(weights.iter())
            .map(|(&cost, &weight)| Item { cost, weight })
            .collect();
        Self { items, capacity }
    }
    /// This is the capacity that is used when the user did not specify any:
    /// 80% of the total weight of the items (rounded down).
    pub fn default_capacity(items: &[Item]) -> i64 {
        let total = saturating_weight(items.iter().map(|i| i.weight));
        (0.8 * total as f64) as i64
    }
    pub fn nb_items(&self) -> usize {
        self.items.len()
    }
    pub fn costs(&self) -> Vec<f64> {
        self.items.iter().map(|i| i.cost).collect()
    }
    pub fn weights(&self) -> Vec<i64> {
        self.items.iter().map(|i| i.weight).collect()
    }
    /// The total weight of all items. It saturates at the bounds of `i64`.
    pub fn total_weight(&self) -> i64 {
        saturating_weight(self.items.iter().map(|i| i.weight))
    }
}

/// Sums weights without ever overflowing
pub(crate) fn saturating_weight<I: IntoIterator<Item = i64>>(weights: I) -> i64 {
    weights.into_iter().fold(0, i64::saturating_add)
}

// ----------------------------------------------------------------------------
// --- SAMPLES ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// An assignment of binary values to (some of) the variables of a model.
/// A variable that has no entry in the sample is considered to be zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    values: FxHashMap<Variable, u8>,
}
impl Sample {
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the value of the given variable (0 when it is absent)
    #[inline]
    pub fn get(&self, v: Variable) -> u8 {
        self.values.get(&v).copied().unwrap_or(0)
    }
    /// Returns true iff the sample explicitly assigns a value to `v`
    pub fn contains(&self, v: Variable) -> bool {
        self.values.contains_key(&v)
    }
    /// Assigns `v`. Any non zero value is stored as 1.
    pub fn set(&mut self, v: Variable, value: u8) {
        self.values.insert(v, u8::from(value != 0));
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Iterates over the explicit entries (in no particular order)
    pub fn iter(&self) -> impl Iterator<Item = (Variable, u8)> + '_ {
        self.values.iter().map(|(v, x)| (*v, *x))
    }
}
impl FromIterator<(Variable, u8)> for Sample {
    fn from_iter<T: IntoIterator<Item = (Variable, u8)>>(iter: T) -> Self {
        let mut sample = Sample::new();
        for (v, x) in iter {
            sample.set(v, x);
        }
        sample
    }
}

/// One of the assignments returned by a sampler, along with its energy
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub sample: Sample,
    pub energy: f64,
}

/// The outcome of a sampling run: a sequence of candidates ranked by
/// ascending energy (the lower the better).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    candidates: Vec<Candidate>,
}
impl SampleSet {
    /// Ranks the given candidates. The sort is stable: candidates having the
    /// same energy keep the order in which they were given.
    pub fn from_candidates(mut candidates: Vec<Candidate>) -> Self {
        candidates.sort_by_key(|c| OrderedFloat(c.energy));
        Self { candidates }
    }
    /// The lowest energy candidate (if any)
    pub fn first(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
    pub fn len(&self) -> usize {
        self.candidates.len()
    }
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }
    /// The lowest energy that was observed (if any)
    pub fn lowest_energy(&self) -> Option<f64> {
        self.first().map(|c| c.energy)
    }
}
impl IntoIterator for SampleSet {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

// ----------------------------------------------------------------------------
// --- ERRORS -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This enumeration groups the kind of errors that may occur when encoding a
/// knapsack instance or when sampling a model. The first five variants all
/// denote an invalid input: they are raised before anything gets built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// There must be exactly one weight per cost
    #[error("invalid input: {costs} costs but {weights} weights")]
    LengthMismatch { costs: usize, weights: usize },
    /// Weights are non negative integers
    #[error("invalid input: item {item} has negative weight {weight}")]
    NegativeWeight { item: usize, weight: i64 },
    /// The capacity is a non negative integer
    #[error("invalid input: negative capacity {0}")]
    NegativeCapacity(i64),
    /// The penalty strength must be a finite, strictly positive number
    #[error("invalid input: penalty must be finite and > 0 (got {0})")]
    InvalidPenalty(f64),
    /// Costs must be finite numbers
    #[error("invalid input: item {item} has non finite cost {cost}")]
    NonFiniteCost { item: usize, cost: f64 },
    /// A sampler must be asked for at least one read
    #[error("the number of reads must be positive")]
    NoReads,
    /// Quadratic terms relate two distinct variables
    #[error("cannot add an interaction between {0} and itself")]
    SelfInteraction(Variable),
    /// The model is too large for the exhaustive sampler
    #[error("{actual} variables exceed the limit of {limit} for exhaustive sampling")]
    TooManyVariables { actual: usize, limit: usize },
    /// The cutoff stopped the sampler before it completed a single read
    #[error("sampling aborted before any read completed")]
    Aborted,
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################



#[cfg(test)]
mod test_samples {
    use crate::{Candidate, Sample, SampleSet, Variable};

    fn candidate(x0: u8, energy: f64) -> Candidate {
        Candidate { sample: [(Variable::Item(0), x0)].into_iter().collect(), energy }
    }

    #[test]
    fn missing_variables_read_as_zero() {
        let sample = Sample::new();
        assert_eq!(0, sample.get(Variable::Item(4)));
        assert!(!sample.contains(Variable::Item(4)));
    }
    #[test]
    fn set_normalizes_values_to_bits() {
        let mut sample = Sample::new();
        sample.set(Variable::Slack(1), 7);
        assert_eq!(1, sample.get(Variable::Slack(1)));
    }
    #[test]
    fn sample_set_is_ranked_by_ascending_energy() {
        let set = SampleSet::from_candidates(vec![
            candidate(0, 3.0), candidate(1, -2.0), candidate(0, 0.5)]);
        let energies = set.iter().map(|c| c.energy).collect::<Vec<_>>();
        assert_eq!(vec![-2.0, 0.5, 3.0], energies);
        assert_eq!(Some(-2.0), set.lowest_energy());
    }
    #[test]
    fn ties_keep_their_original_order() {
        let set = SampleSet::from_candidates(vec![candidate(1, 1.0), candidate(0, 1.0)]);
        assert_eq!(1, set.first().unwrap().sample.get(Variable::Item(0)));
    }
    #[test]
    fn empty_sample_set_has_no_first() {
        let set = SampleSet::default();
        assert!(set.is_empty());
        assert!(set.first().is_none());
    }
}
