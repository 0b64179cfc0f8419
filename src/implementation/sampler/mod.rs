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

//! This module provides the samplers that can be used to search a binary
//! quadratic model for low energy assignments.

mod annealing;
mod exhaustive;

pub use annealing::*;
pub use exhaustive::*;

/// A dense assignment of the variables of a model, along with the local field
/// of each variable. The local field of `x_i` is the energy change caused by
/// setting `x_i` to 1 (all other variables being left untouched):
/// `field[i] = linear[i] + sum_j J_ij x_j`.
///
/// Keeping the fields up to date makes evaluating a single flip a constant
/// time operation. Flipping a variable costs the degree of that variable.
#[derive(Debug, Clone)]
pub(crate) struct LocalFields<'a> {
    adjacency: &'a [Vec<(usize, f64)>],
    bits: Vec<u8>,
    field: Vec<f64>,
}
impl <'a> LocalFields<'a> {
    pub fn new(linear: &[f64], adjacency: &'a [Vec<(usize, f64)>], bits: Vec<u8>) -> Self {
        let field = linear.iter().enumerate()
            .map(|(i, h)| h + adjacency[i].iter()
                .filter(|(j, _)| bits[*j] != 0)
                .map(|(_, b)| b)
                .sum::<f64>())
            .collect();
        Self { adjacency, bits, field }
    }
    /// The energy change caused by flipping variable `i`
    #[inline]
    pub fn delta(&self, i: usize) -> f64 {
        if self.bits[i] == 0 { self.field[i] } else { -self.field[i] }
    }
    /// Flips variable `i` and updates the fields of its neighbors
    #[inline]
    pub fn flip(&mut self, i: usize) {
        let d = if self.bits[i] == 0 { 1.0 } else { -1.0 };
        self.bits[i] ^= 1;
        for &(j, b) in self.adjacency[i].iter() {
            self.field[j] += d * b;
        }
    }
    pub fn len(&self) -> usize {
        self.bits.len()
    }
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }
    pub fn into_bits(self) -> Vec<u8> {
        self.bits
    }
}

#[cfg(test)]
mod test_local_fields {
    use crate::{BinaryQuadraticModel, Variable};
    use super::LocalFields;

    #[test]
    fn deltas_match_energy_differences() {
        let mut bqm = BinaryQuadraticModel::new();
        bqm.add_variable(Variable::Item(0), -3.0);
        bqm.add_variable(Variable::Item(1), 2.0);
        bqm.add_variable(Variable::Slack(0), -1.0);
        bqm.add_interaction(Variable::Item(0), Variable::Item(1), 5.0).unwrap();
        bqm.add_interaction(Variable::Item(1), Variable::Slack(0), -4.0).unwrap();
        let adj = bqm.adjacency();

        let mut fields = LocalFields::new(bqm.linear_biases(), &adj, vec![1, 0, 1]);
        for i in [1, 0, 2, 1, 1, 0] {
            let before = bqm.energy_of(fields.bits());
            let delta = fields.delta(i);
            fields.flip(i);
            assert_eq!(before + delta, bqm.energy_of(fields.bits()));
        }
    }
}
