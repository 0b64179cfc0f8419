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

//! This module reads sampled assignments back as selections of items.
//!
//! # Note
//! Decoding never checks that the selected items actually fit in the sack.
//! The capacity constraint is only enforced through the penalty term of the
//! encoded model: when the penalty is too weak (or the sampler did not
//! converge) the best candidate may well be overweight. Callers who need that
//! guarantee should check it with `Selection::fits`.

use serde::Serialize;

use crate::{common::saturating_weight, Instance, Sample, SampleSet, Variable};

/// Returns the (ascending) indices `i` in `0..n` of the items selected by the
/// given sample. An item whose variable is absent from the sample is not
/// selected.
///
/// # Example
/// ```
/// # use knapsack_bqm::*;
/// let sample: Sample = [(Variable::Item(1), 1), (Variable::Slack(0), 1)].into_iter().collect();
/// assert_eq!(vec![1], decode(&sample, 3));
/// ```
pub fn decode(sample: &Sample, n: usize) -> Vec<usize> {
    (0..n).filter(|&i| sample.get(Variable::Item(i)) == 1).collect()
}

/// The items that were picked in the best candidate of a sample set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// The indices of the selected items in ascending order
    pub items: Vec<usize>,
    /// The energy of the candidate this selection was read from
    pub energy: f64,
}
impl Selection {
    /// The total weight of the selected items. It saturates at the bounds
    /// of `i64`.
    ///
    /// # Panics
    /// When the selection holds an index that is out of bounds of `weights`,
    /// that is when it was not decoded from the instance these weights
    /// belong to.
    pub fn total_weight(&self, weights: &[i64]) -> i64 {
        saturating_weight(self.items.iter().map(|&i| weights[i]))
    }
    /// The total cost (profit) of the selected items
    ///
    /// # Panics
    /// When the selection holds an index that is out of bounds of `costs`.
    pub fn total_cost(&self, costs: &[f64]) -> f64 {
        self.items.iter().map(|&i| costs[i]).sum()
    }
    /// Returns true iff the selection does not exceed the capacity of the
    /// given instance. This is the check the decoder itself never performs.
    ///
    /// # Panics
    /// When the selection was not decoded from an instance having at least
    /// as many items as `instance`.
    pub fn fits(&self, instance: &Instance) -> bool {
        let load = saturating_weight(self.items.iter().map(|&i| instance.items[i].weight));
        load <= instance.capacity
    }
}

/// Decodes the lowest energy candidate of the set. Returns None when the set
/// is empty.
pub fn decode_best(set: &SampleSet, n: usize) -> Option<Selection> {
    set.first().map(|best| Selection { items: decode(&best.sample, n), energy: best.energy })
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_decoder {
    use crate::{decode, decode_best, Candidate, Instance, Sample, SampleSet, Selection, Variable};

    fn sample(values: &[(Variable, u8)]) -> Sample {
        values.iter().copied().collect()
    }

    #[test]
    fn selected_items_are_listed_in_ascending_order() {
        let s = sample(&[(Variable::Item(3), 1), (Variable::Item(0), 1), (Variable::Item(1), 0)]);
        assert_eq!(vec![0, 3], decode(&s, 4));
    }
    #[test]
    fn slack_variables_are_not_items() {
        let s = sample(&[(Variable::Slack(0), 1), (Variable::Slack(2), 1)]);
        assert!(decode(&s, 3).is_empty());
    }
    #[test]
    fn missing_entries_mean_not_selected() {
        assert!(decode(&Sample::new(), 5).is_empty());
    }
    #[test]
    fn items_beyond_n_are_ignored() {
        let s = sample(&[(Variable::Item(7), 1)]);
        assert!(decode(&s, 7).is_empty());
    }
    #[test]
    fn decoding_twice_yields_the_same_selection() {
        let s = sample(&[(Variable::Item(2), 1), (Variable::Item(4), 1)]);
        assert_eq!(decode(&s, 5), decode(&s, 5));
    }
    #[test]
    fn decode_best_uses_the_lowest_energy_candidate() {
        let set = SampleSet::from_candidates(vec![
            Candidate { sample: sample(&[(Variable::Item(0), 1)]), energy: -1.0 },
            Candidate { sample: sample(&[(Variable::Item(1), 1)]), energy: -7.0 },
        ]);
        assert_eq!(Some(Selection { items: vec![1], energy: -7.0 }), decode_best(&set, 2));
    }
    #[test]
    fn decode_best_of_nothing_is_none() {
        assert_eq!(None, decode_best(&SampleSet::default(), 2));
    }
    #[test]
    fn overweight_selections_are_decoded_anyway_but_do_not_fit() {
        let inst = Instance::from_columns(&[10.0, 20.0], &[5, 15], 15);
        let s = sample(&[(Variable::Item(0), 1), (Variable::Item(1), 1)]);
        let sel = Selection { items: decode(&s, 2), energy: 0.0 };
        assert_eq!(vec![0, 1], sel.items);
        assert_eq!(20, sel.total_weight(&inst.weights()));
        assert_eq!(30.0, sel.total_cost(&inst.costs()));
        assert!(!sel.fits(&inst));
    }
    #[test]
    fn overflowing_loads_saturate_and_do_not_fit() {
        let inst = Instance::from_columns(&[1.0, 1.0], &[i64::MAX, i64::MAX], i64::MAX - 1);
        let sel  = Selection { items: vec![0, 1], energy: 0.0 };
        assert_eq!(i64::MAX, sel.total_weight(&inst.weights()));
        assert!(!sel.fits(&inst));
    }
    #[test]
    #[should_panic]
    fn a_selection_from_a_larger_instance_is_rejected() {
        let inst = Instance::from_columns(&[1.0], &[1], 1);
        let sel  = Selection { items: vec![3], energy: 0.0 };
        sel.fits(&inst);
    }
}
