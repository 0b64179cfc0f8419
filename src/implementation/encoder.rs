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

//! This module encodes a 0/1 knapsack instance as a binary quadratic model.
//!
//! The capacity inequality `sum_i w_i x_i <= C` is first turned into the
//! equality `sum_i w_i x_i + sum_j 2^j s_j = C` by means of `m` binary slack
//! variables. The equality is then enforced softly, with a penalty term:
//!
//! `E(x, s) = - sum_i c_i x_i + A * (sum_i w_i x_i + sum_j 2^j s_j - C)^2`
//!
//! Expanding the square (and using `x^2 = x` for binary variables) yields the
//! closed form coefficients computed by `encode`. The penalty strength `A` is
//! left to the caller: it must be large enough compared to the costs for no
//! profit to ever compensate a constraint violation.

use tracing::debug;

use crate::{BinaryQuadraticModel, Error, Instance, Variable};

/// The penalty strength used when none is specified
pub const DEFAULT_PENALTY: f64 = 1000.0;

/// Returns the number of slack bits `m` needed to represent any shortfall in
/// `0..=capacity`, that is `ceil(log2(capacity + 1))`. A zero capacity needs
/// no slack at all.
///
/// # Example
/// ```
/// # use knapsack_bqm::slack_bits;
/// assert_eq!(0, slack_bits(0));
/// assert_eq!(1, slack_bits(1));
/// assert_eq!(2, slack_bits(3));
/// assert_eq!(4, slack_bits(15));
/// assert_eq!(5, slack_bits(16));
/// ```
pub fn slack_bits(capacity: u64) -> usize {
    if capacity == 0 {
        0
    } else {
        // bit length of capacity == ceil(log2(capacity + 1))
        (u64::BITS - capacity.leading_zeros()) as usize
    }
}

/// Checks the inputs of `encode`. Nothing gets built unless this passes.
fn validate(costs: &[f64], weights: &[i64], capacity: i64, penalty: f64) -> Result<(), Error> {
    if costs.len() != weights.len() {
        return Err(Error::LengthMismatch { costs: costs.len(), weights: weights.len() });
    }
    if let Some((item, &weight)) = weights.iter().enumerate().find(|(_, w)| **w < 0) {
        return Err(Error::NegativeWeight { item, weight });
    }
    if capacity < 0 {
        return Err(Error::NegativeCapacity(capacity));
    }
    if !penalty.is_finite() || penalty <= 0.0 {
        return Err(Error::InvalidPenalty(penalty));
    }
    if let Some((item, &cost)) = costs.iter().enumerate().find(|(_, c)| !c.is_finite()) {
        return Err(Error::NonFiniteCost { item, cost });
    }
    Ok(())
}

/// Builds the binary quadratic model whose minimum energy assignment is the
/// maximum cost selection of items fitting in the sack.
///
/// The model comprises one variable `x_i` per item and `slack_bits(capacity)`
/// slack variables `s_j`. Every pair of variables interacts (item weights are
/// not checked for zeroes), so there are `O((n + m)^2)` quadratic terms.
///
/// # Errors
/// Any of the invalid input errors (`LengthMismatch`, `NegativeWeight`,
/// `NegativeCapacity`, `InvalidPenalty`, `NonFiniteCost`).
///
/// # Example
/// ```
/// # use knapsack_bqm::*;
/// let bqm = encode(&[10.0, 20.0], &[5, 15], 15, 1000.0).unwrap();
/// // 2 items + 4 slack bits
/// assert_eq!(6, bqm.nb_variables());
/// assert_eq!(1000.0 * 15.0 * 15.0, bqm.offset());
/// ```
pub fn encode(costs: &[f64], weights: &[i64], capacity: i64, penalty: f64) -> Result<BinaryQuadraticModel, Error> {
    validate(costs, weights, capacity, penalty)?;

    let a = penalty;
    let c = capacity as f64;
    let n = costs.len();
    let m = slack_bits(capacity as u64);
    let w = weights.iter().map(|&w| w as f64).collect::<Vec<f64>>();
    let p = (0..m).map(|j| (1_u64 << j) as f64).collect::<Vec<f64>>();

    let mut bqm = BinaryQuadraticModel::with_capacity(n + m);

    for i in 0..n {
        bqm.add_variable(Variable::Item(i), -costs[i] + a * w[i] * w[i] - 2.0 * a * c * w[i]);
    }
    for j in 0..m {
        bqm.add_variable(Variable::Slack(j), a * p[j] * p[j] - 2.0 * a * c * p[j]);
    }
    for i in 0..n {
        for k in i + 1..n {
            bqm.add_interaction(Variable::Item(i), Variable::Item(k), 2.0 * a * w[i] * w[k])?;
        }
    }
    for i in 0..n {
        for j in 0..m {
            bqm.add_interaction(Variable::Item(i), Variable::Slack(j), 2.0 * a * w[i] * p[j])?;
        }
    }
    for j in 0..m {
        for l in j + 1..m {
            bqm.add_interaction(Variable::Slack(j), Variable::Slack(l), 2.0 * a * p[j] * p[l])?;
        }
    }
    bqm.add_offset(a * c * c);

    debug!(items = n, slacks = m, interactions = bqm.nb_interactions(), "encoded knapsack model");
    Ok(bqm)
}

impl Instance {
    /// Encodes this instance with the given penalty strength (see `encode`)
    pub fn to_bqm(&self, penalty: f64) -> Result<BinaryQuadraticModel, Error> {
        encode(&self.costs(), &self.weights(), self.capacity, penalty)
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_encoder {
    use crate::{encode, slack_bits, Error, Instance, Sample, Variable, BinaryQuadraticModel};

    const A: f64 = 1000.0;

    /// Evaluates the energy of the assignment (items, slack) built from the
    /// bits of the given masks.
    fn energy(bqm: &BinaryQuadraticModel, n: usize, m: usize, items: u64, slack: u64) -> f64 {
        let mut sample = Sample::new();
        for i in 0..n {
            sample.set(Variable::Item(i), ((items >> i) & 1) as u8);
        }
        for j in 0..m {
            sample.set(Variable::Slack(j), ((slack >> j) & 1) as u8);
        }
        bqm.energy(&sample)
    }

    #[test]
    fn slack_bits_can_represent_every_shortfall() {
        for capacity in 1..=300_u64 {
            let m = slack_bits(capacity);
            assert!((1_u64 << m) > capacity, "capacity {capacity}, m {m}");
            assert!((1_u64 << (m - 1)) <= capacity, "capacity {capacity}, m {m}");
        }
    }
    #[test]
    fn zero_capacity_needs_no_slack() {
        assert_eq!(0, slack_bits(0));
    }

    #[test]
    fn mismatched_lengths_are_invalid() {
        assert_eq!(Err(Error::LengthMismatch { costs: 2, weights: 1 }), encode(&[1.0, 2.0], &[1], 3, A));
    }
    #[test]
    fn negative_weights_are_invalid() {
        assert_eq!(Err(Error::NegativeWeight { item: 1, weight: -4 }), encode(&[1.0, 2.0], &[1, -4], 3, A));
    }
    #[test]
    fn negative_capacity_is_invalid() {
        assert_eq!(Err(Error::NegativeCapacity(-1)), encode(&[1.0], &[1], -1, A));
    }
    #[test]
    fn penalty_must_be_strictly_positive() {
        assert_eq!(Err(Error::InvalidPenalty(0.0)), encode(&[1.0], &[1], 1, 0.0));
        assert_eq!(Err(Error::InvalidPenalty(-5.0)), encode(&[1.0], &[1], 1, -5.0));
        assert!(matches!(encode(&[1.0], &[1], 1, f64::NAN), Err(Error::InvalidPenalty(_))));
    }
    #[test]
    fn costs_must_be_finite() {
        assert!(matches!(encode(&[f64::INFINITY], &[1], 1, A), Err(Error::NonFiniteCost { item: 0, .. })));
    }

    #[test]
    fn the_model_has_one_variable_per_item_and_per_slack_bit() {
        let bqm = encode(&[10.0, 20.0], &[5, 15], 15, A).unwrap();
        let vars = bqm.variables();
        assert_eq!(&[
            Variable::Item(0), Variable::Item(1),
            Variable::Slack(0), Variable::Slack(1), Variable::Slack(2), Variable::Slack(3)
        ], vars);
        // all pairs of 6 variables interact
        assert_eq!(15, bqm.nb_interactions());
    }
    #[test]
    fn coefficients_match_the_closed_form() {
        let bqm = encode(&[10.0, 20.0], &[5, 15], 15, A).unwrap();
        assert_eq!(Some(-10.0 + A * 25.0 - 2.0 * A * 15.0 * 5.0), bqm.linear(Variable::Item(0)));
        assert_eq!(Some(-20.0 + A * 225.0 - 2.0 * A * 15.0 * 15.0), bqm.linear(Variable::Item(1)));
        assert_eq!(Some(A * 4.0 - 2.0 * A * 15.0 * 2.0), bqm.linear(Variable::Slack(1)));
        assert_eq!(Some(2.0 * A * 5.0 * 15.0), bqm.quadratic(Variable::Item(0), Variable::Item(1)));
        assert_eq!(Some(2.0 * A * 15.0 * 8.0), bqm.quadratic(Variable::Item(1), Variable::Slack(3)));
        assert_eq!(Some(2.0 * A * 2.0 * 4.0), bqm.quadratic(Variable::Slack(1), Variable::Slack(2)));
        assert_eq!(A * 225.0, bqm.offset());
    }
    #[test]
    fn the_offset_is_penalty_times_capacity_squared() {
        for capacity in [0, 1, 7, 42, 1000] {
            let bqm = encode(&[3.0, 4.0], &[2, 5], capacity, 12.5).unwrap();
            assert_eq!(12.5 * (capacity * capacity) as f64, bqm.offset());
        }
    }

    #[test]
    fn energy_is_objective_plus_penalty_for_every_assignment() {
        let costs   = [10.0, 20.0, 7.0];
        let weights = [5, 15, 4];
        let capacity= 15;
        let bqm = encode(&costs, &weights, capacity, A).unwrap();
        let n = costs.len();
        let m = slack_bits(capacity as u64);

        for items in 0..(1_u64 << n) {
            for slack in 0..(1_u64 << m) {
                let mut profit = 0.0;
                let mut load = slack as i64;
                for i in 0..n {
                    if (items >> i) & 1 == 1 {
                        profit += costs[i];
                        load += weights[i];
                    }
                }
                let delta = (load - capacity) as f64;
                let expected = -profit + A * delta * delta;
                assert_eq!(expected, energy(&bqm, n, m, items, slack));
            }
        }
    }

    #[test]
    fn a_satisfied_equality_costs_no_penalty() {
        // x0 = 1 (weight 5) and slack = 10 = 0b1010
        let bqm = encode(&[10.0, 20.0], &[5, 15], 15, A).unwrap();
        assert_eq!(-10.0, energy(&bqm, 2, 4, 0b01, 0b1010));
        // without the slack, the shortfall of 10 is penalized
        assert_eq!(-10.0 + A * 100.0, energy(&bqm, 2, 4, 0b01, 0));
    }

    #[test]
    fn with_zero_capacity_only_weightless_selections_are_penalty_free() {
        let bqm = encode(&[5.0, 8.0, 2.0], &[3, 1, 0], 0, A).unwrap();
        assert_eq!(3, bqm.nb_variables());
        assert_eq!(0.0, bqm.offset());
        assert_eq!(0.0, energy(&bqm, 3, 0, 0b000, 0));
        assert_eq!(-5.0 + A * 9.0, energy(&bqm, 3, 0, 0b001, 0));
        assert_eq!(-8.0 + A, energy(&bqm, 3, 0, 0b010, 0));
        assert_eq!(-2.0, energy(&bqm, 3, 0, 0b100, 0));
    }

    #[test]
    fn an_empty_instance_is_encoded_as_slack_only() {
        let bqm = encode(&[], &[], 3, A).unwrap();
        assert_eq!(&[Variable::Slack(0), Variable::Slack(1)], bqm.variables());
        assert_eq!(0.0, energy(&bqm, 0, 2, 0, 0b11));
    }

    #[test]
    fn instances_encode_like_their_columns() {
        let inst = Instance::from_columns(&[5.0], &[3], 3);
        assert_eq!(encode(&[5.0], &[3], 3, A), inst.to_bqm(A));
    }
}
