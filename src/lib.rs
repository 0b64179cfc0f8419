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

//! # knapsack-bqm
//! This crate encodes instances of the 0/1 knapsack problem as binary
//! quadratic models (BQM, also known as QUBO) so that they can be handed over
//! to a sampler, and it decodes the assignments returned by the sampler back
//! into selections of items.
//!
//! ## The encoding
//! Given `n` items with costs `c_i` and weights `w_i`, and a sack of capacity
//! `C`, the capacity inequality is first turned into an equality by adding
//! `m = ceil(log2(C + 1))` binary slack variables. The equality is then
//! enforced with a penalty of strength `A`:
//!
//! `E(x, s) = - sum_i c_i x_i + A * (sum_i w_i x_i + sum_j 2^j s_j - C)^2`
//!
//! Assignments satisfying the equality pay no penalty at all, so that the
//! energy of a feasible selection is the opposite of its total cost. Any
//! violation is penalized quadratically. Note that `A` remains a parameter:
//! it must be chosen large enough, relatively to the costs, for no profit to
//! ever compensate a violation.
//!
//! ## Quick Example
//! ```
//! # use knapsack_bqm::*;
//! // 1. Describe the instance
//! let costs   = [10.0, 20.0];
//! let weights = [5, 15];
//! let capacity= 15;
//! // 2. Encode it as a binary quadratic model
//! let bqm = encode(&costs, &weights, capacity, DEFAULT_PENALTY).unwrap();
//! // 3. Hand it over to a sampler. The exhaustive sampler is only fit for
//! //    tiny models; `SimulatedAnnealingSampler` is what you want otherwise.
//! let set = ExhaustiveSampler.sample(&bqm, 10).unwrap();
//! // 4. Decode the best candidate
//! let best = decode_best(&set, costs.len()).unwrap();
//! assert_eq!(vec![1], best.items);
//! assert_eq!(-20.0, best.energy);
//! ```
//!
//! ## A word of caution
//! The decoder does not check that the selection it returns fits in the
//! sack. With a penalty that is too weak, or a sampler that did not converge,
//! the best candidate may be overweight. Use `Selection::fits` if you need
//! that guarantee.

mod common;
mod abstraction;
mod implementation;
pub mod io_utils;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
