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

//! This module provides the binary quadratic model (BQM) which is the
//! currency exchanged between the encoder and the samplers.

use fxhash::FxHashMap;

use crate::{Error, Sample, Variable};

/// A binary quadratic model is an energy function over binary variables:
///
/// `E(a) = offset + sum_v linear[v] * a[v] + sum_{u,v} quadratic[u,v] * a[u] * a[v]`
///
/// Internally, the variables are given a dense index (in order of insertion)
/// so that samplers can work on plain slices. Quadratic terms are stored
/// sparsely, keyed by the (ordered) pair of indices of the variables they
/// relate. There is never a quadratic term relating a variable to itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryQuadraticModel {
    /// The variables in order of insertion
    variables: Vec<Variable>,
    /// Maps a variable onto its position in `variables`
    index: FxHashMap<Variable, usize>,
    /// linear[i] is the bias of variables[i]
    linear: Vec<f64>,
    /// The key (i, j) always has i < j
    quadratic: FxHashMap<(usize, usize), f64>,
    /// The constant energy
    offset: f64,
}

impl BinaryQuadraticModel {
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates an empty model with room for `nb_vars` variables
    pub fn with_capacity(nb_vars: usize) -> Self {
        Self {
            variables: Vec::with_capacity(nb_vars),
            index:     FxHashMap::default(),
            linear:    Vec::with_capacity(nb_vars),
            quadratic: FxHashMap::default(),
            offset:    0.0,
        }
    }

    /// Returns the index of `v`, adding it (with a zero bias) when needed
    fn ensure(&mut self, v: Variable) -> usize {
        if let Some(&i) = self.index.get(&v) {
            return i;
        }
        let i = self.variables.len();
        self.variables.push(v);
        self.linear.push(0.0);
        self.index.insert(v, i);
        i
    }

    /// Adds `bias` to the linear coefficient of `v` (the variable is added
    /// to the model if it was not part of it yet).
    pub fn add_variable(&mut self, v: Variable, bias: f64) {
        let i = self.ensure(v);
        self.linear[i] += bias;
    }
    /// Adds `bias` to the quadratic coefficient relating `u` and `v`. The
    /// pair is unordered: `(u, v)` and `(v, u)` denote the same term.
    ///
    /// # Errors
    /// `Error::SelfInteraction` when `u == v`; the model is left untouched.
    pub fn add_interaction(&mut self, u: Variable, v: Variable, bias: f64) -> Result<(), Error> {
        if u == v {
            return Err(Error::SelfInteraction(u));
        }
        let i = self.ensure(u);
        let j = self.ensure(v);
        *self.quadratic.entry(Self::key(i, j)).or_insert(0.0) += bias;
        Ok(())
    }
    /// Adds `delta` to the constant energy of the model
    pub fn add_offset(&mut self, delta: f64) {
        self.offset += delta;
    }

    #[inline]
    fn key(i: usize, j: usize) -> (usize, usize) {
        if i < j { (i, j) } else { (j, i) }
    }

    /// The linear coefficient of `v` (None if `v` is not in the model)
    pub fn linear(&self, v: Variable) -> Option<f64> {
        self.index.get(&v).map(|&i| self.linear[i])
    }
    /// The quadratic coefficient relating `u` and `v` (None if there is none)
    pub fn quadratic(&self, u: Variable, v: Variable) -> Option<f64> {
        let i = *self.index.get(&u)?;
        let j = *self.index.get(&v)?;
        self.quadratic.get(&Self::key(i, j)).copied()
    }
    pub fn offset(&self) -> f64 {
        self.offset
    }
    /// The variables of the model in the order of their dense index
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
    /// The dense index of `v`
    pub fn index_of(&self, v: Variable) -> Option<usize> {
        self.index.get(&v).copied()
    }
    /// The linear biases, indexed like `variables()`
    pub fn linear_biases(&self) -> &[f64] {
        &self.linear
    }
    pub fn nb_variables(&self) -> usize {
        self.variables.len()
    }
    pub fn nb_interactions(&self) -> usize {
        self.quadratic.len()
    }
    /// Iterates over all the quadratic terms (in no particular order)
    pub fn interactions(&self) -> impl Iterator<Item = (Variable, Variable, f64)> + '_ {
        self.quadratic.iter()
            .map(move |(&(i, j), &b)| (self.variables[i], self.variables[j], b))
    }

    /// Computes the energy of the given assignment. Variables of the model
    /// that are absent from the sample are considered to be zero; entries of
    /// the sample that are not part of the model are ignored.
    pub fn energy(&self, sample: &Sample) -> f64 {
        let state = self.variables.iter().map(|&v| sample.get(v)).collect::<Vec<u8>>();
        self.energy_of(&state)
    }
    /// Computes the energy of an assignment given as a slice indexed like
    /// `variables()`.
    pub fn energy_of(&self, state: &[u8]) -> f64 {
        debug_assert_eq!(state.len(), self.nb_variables());
        let mut energy = self.offset;
        for (i, &x) in state.iter().enumerate() {
            if x != 0 {
                energy += self.linear[i];
            }
        }
        for (&(i, j), &b) in self.quadratic.iter() {
            if state[i] != 0 && state[j] != 0 {
                energy += b;
            }
        }
        energy
    }
    /// Turns a dense assignment back into a sample
    pub fn to_sample(&self, state: &[u8]) -> Sample {
        self.variables.iter().copied().zip(state.iter().copied()).collect()
    }

    /// Returns the neighborhood of each variable: `adjacency()[i]` lists the
    /// pairs `(j, bias)` of all the quadratic terms involving variable `i`.
    pub fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj = vec![vec![]; self.nb_variables()];
        for (&(i, j), &b) in self.quadratic.iter() {
            adj[i].push((j, b));
            adj[j].push((i, b));
        }
        // hash map order is not something we want samplers to depend upon
        for neighbors in adj.iter_mut() {
            neighbors.sort_by_key(|(j, _)| *j);
        }
        adj
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################
