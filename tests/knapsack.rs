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

//! This module is meant to test the correctness of the encode/sample/decode
//! chain on small knapsack instances whose optimum is known.

use std::path::PathBuf;

use knapsack_bqm::*;
use knapsack_bqm::io_utils::{self, read_instance};

fn locate(id: &str) -> PathBuf {
    PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/knapsack/")
        .join(id)
}

fn annealer(seed: u64) -> SimulatedAnnealingSampler {
    let config = AnnealingConfigBuilder::default()
        .seed(seed)
        .threads(4)
        .build()
        .unwrap();
    SimulatedAnnealingSampler::new(config)
}

/// Encodes the instance, samples it and decodes the best candidate
fn solve(instance: &Instance, sampler: &dyn Sampler, num_reads: usize) -> Selection {
    let bqm = instance.to_bqm(DEFAULT_PENALTY).unwrap();
    let set = sampler.sample(&bqm, num_reads).unwrap();
    decode_best(&set, instance.nb_items()).unwrap()
}

pub fn solve_id(id: &str, capacity: Option<i64>, sampler: &dyn Sampler) -> Selection {
    let instance = read_instance(locate(id), capacity).unwrap();
    solve(&instance, sampler, 200)
}

// --- scenarios with the exhaustive sampler ----------------------------------

#[test]
fn two_items_with_capacity_fifteen() {
    let instance = Instance::from_columns(&[10.0, 20.0], &[5, 15], 15);
    assert_eq!(4, slack_bits(15));
    let best = solve(&instance, &ExhaustiveSampler, 1);
    assert_eq!(vec![1], best.items);
    assert_eq!(-20.0, best.energy);
}
#[test]
fn zero_capacity_selects_nothing() {
    let instance = Instance::from_columns(&[5.0, 8.0], &[3, 1], 0);
    let bqm = instance.to_bqm(DEFAULT_PENALTY).unwrap();
    assert!(bqm.variables().iter().all(|v| v.is_item()));
    let best = solve(&instance, &ExhaustiveSampler, 1);
    assert!(best.items.is_empty());
    assert_eq!(0.0, best.energy);
}
#[test]
fn a_single_item_that_fits_exactly_is_selected() {
    let best = solve_id("single.csv", Some(3), &ExhaustiveSampler);
    assert_eq!(vec![0], best.items);
    assert_eq!(-5.0, best.energy);
}
#[test]
fn very_small_with_default_capacity() {
    let instance = read_instance(locate("very_small.csv"), None).unwrap();
    assert_eq!(11, instance.capacity);
    let best = solve(&instance, &ExhaustiveSampler, 1);
    assert_eq!(vec![0, 1, 3], best.items);
    assert_eq!(-30.0, best.energy);
    assert!(best.fits(&instance));
}

// --- the same with simulated annealing --------------------------------------

#[test]
fn annealing_two_items_with_capacity_fifteen() {
    let best = solve_id("pair.csv", Some(15), &annealer(1));
    assert_eq!(vec![1], best.items);
    assert_eq!(-20.0, best.energy);
}
#[test]
fn annealing_a_single_item() {
    let best = solve_id("single.csv", Some(3), &annealer(2));
    assert_eq!(vec![0], best.items);
}
#[test]
fn annealing_very_small() {
    let best = solve_id("very_small.csv", None, &annealer(3));
    assert_eq!(vec![0, 1, 3], best.items);
    assert_eq!(-30.0, best.energy);
}

// --- energy of the encoded models -------------------------------------------

#[test]
fn energy_is_minus_profit_plus_squared_residual() {
    let instance = read_instance(locate("very_small.csv"), Some(11)).unwrap();
    let bqm = instance.to_bqm(DEFAULT_PENALTY).unwrap();
    let set = ExhaustiveSampler.sample(&bqm, 1 << bqm.nb_variables()).unwrap();
    assert_eq!(256, set.len());

    for candidate in set.iter() {
        let sel = Selection { items: decode(&candidate.sample, instance.nb_items()), energy: candidate.energy };
        let slack: i64 = (0..slack_bits(11))
            .map(|j| i64::from(candidate.sample.get(Variable::Slack(j))) << j)
            .sum();
        let residual = (sel.total_weight(&instance.weights()) + slack - instance.capacity) as f64;
        let expected = -sel.total_cost(&instance.costs()) + DEFAULT_PENALTY * residual * residual;
        assert_eq!(expected, candidate.energy);
    }
}

// --- io ---------------------------------------------------------------------

#[test]
fn malformed_files_are_reported() {
    assert!(matches!(
        read_instance(locate("malformed.csv"), None),
        Err(io_utils::Error::Format { line: 2, .. })));
}
#[test]
fn invalid_instances_are_rejected_before_encoding() {
    let instance = Instance::from_columns(&[1.0, 2.0], &[1, -2], 3);
    assert_eq!(Err(Error::NegativeWeight { item: 1, weight: -2 }), instance.to_bqm(DEFAULT_PENALTY));
    let instance = Instance::from_columns(&[1.0], &[1], -3);
    assert_eq!(Err(Error::NegativeCapacity(-3)), instance.to_bqm(DEFAULT_PENALTY));
}
