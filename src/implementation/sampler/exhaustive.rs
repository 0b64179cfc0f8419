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

//! This module provides a sampler which enumerates all the assignments of a
//! model. It is only meant for tiny models (verification, toy instances).

use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::{BinaryQuadraticModel, Candidate, Error, SampleSet, Sampler};

use super::LocalFields;

/// Beyond this number of variables, the exhaustive sampler refuses to work
pub const MAX_EXHAUSTIVE_VARIABLES: usize = 24;

/// A sampler that visits every one of the `2^n` assignments of a model (in
/// Gray code order, so that moving from one assignment to the next is a
/// single flip) and returns the `num_reads` assignments having the lowest
/// energies. Unlike the annealing sampler, this one is exact: its first
/// candidate is a ground state of the model.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustiveSampler;

impl Sampler for ExhaustiveSampler {
    fn name(&self) -> &str {
        "ExhaustiveSampler"
    }

    fn sample(&self, bqm: &BinaryQuadraticModel, num_reads: usize) -> Result<SampleSet, Error> {
        if num_reads == 0 {
            return Err(Error::NoReads);
        }
        let n = bqm.nb_variables();
        if n > MAX_EXHAUSTIVE_VARIABLES {
            return Err(Error::TooManyVariables { actual: n, limit: MAX_EXHAUSTIVE_VARIABLES });
        }

        // there are no more than 2^n candidates to return
        let keep       = num_reads.min(1 << n);
        let adjacency  = bqm.adjacency();
        let mut state  = LocalFields::new(bqm.linear_biases(), &adjacency, vec![0; n]);
        let mut energy = bqm.offset();
        // max-heap of the best (energy, gray code) seen so far
        let mut best   = BinaryHeap::with_capacity(keep + 1);
        best.push((OrderedFloat(energy), 0_u64));

        for k in 1..(1_u64 << n) {
            let i = k.trailing_zeros() as usize;
            energy += state.delta(i);
            state.flip(i);

            let entry = (OrderedFloat(energy), k ^ (k >> 1));
            if best.len() < keep {
                best.push(entry);
            } else if best.peek().map_or(false, |top| entry < *top) {
                best.pop();
                best.push(entry);
            }
        }

        let candidates = best.into_sorted_vec().into_iter()
            .map(|(_, code)| {
                let bits = (0..n).map(|i| ((code >> i) & 1) as u8).collect::<Vec<u8>>();
                // recompute from scratch: the running energy accumulates rounding errors
                Candidate { energy: bqm.energy_of(&bits), sample: bqm.to_sample(&bits) }
            })
            .collect();
        Ok(SampleSet::from_candidates(candidates))
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################
