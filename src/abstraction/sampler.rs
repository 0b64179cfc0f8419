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

//! This module defines the `Sampler` trait.

use crate::{BinaryQuadraticModel, Error, SampleSet};

/// A sampler is a heuristic solver which searches for low energy assignments
/// of a binary quadratic model. It is the external collaborator of the
/// encode/decode pair: the encoder produces the model, the sampler explores
/// it, and the decoder reads the best candidate back as a selection of items.
///
/// A sampler makes no promise whatsoever. In particular:
///
/// * the returned candidates need not be globally optimal,
/// * the best candidate need not even satisfy the capacity constraint (this
///   happens when the penalty is too weak or when the search did not converge).
///
/// Each call to `sample` is a single synchronous attempt which blocks until
/// `num_reads` samples have been drawn (or the sampler decided to stop).
pub trait Sampler {
    /// A human readable name for this sampler
    fn name(&self) -> &str;
    /// Draws `num_reads` samples from the given model and returns them ranked
    /// by ascending energy.
    ///
    /// # Errors
    /// Implementations must return `Error::NoReads` when `num_reads == 0`.
    fn sample(&self, bqm: &BinaryQuadraticModel, num_reads: usize) -> Result<SampleSet, Error>;
}
