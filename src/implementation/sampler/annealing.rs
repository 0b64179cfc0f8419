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

//! This module provides the implementation of a parallel simulated annealing
//! sampler. Reads are independent from one another: they are distributed
//! among as many threads as requested (by default, as many threads as there
//! are hardware threads available on the machine).

use std::sync::atomic::{AtomicUsize, Ordering};

use derive_builder::Builder;
use parking_lot::Mutex;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{debug, info};

use crate::{BinaryQuadraticModel, Candidate, Cutoff, Error, NoCutoff, SampleSet, Sampler};

use super::LocalFields;

/// The maximum number of zero temperature sweeps performed at the end of a read
const MAX_DESCENT_SWEEPS: usize = 1000;
/// Room for this many candidates is reserved up front, the rest grows on demand
const PREALLOCATED_READS: usize = 1 << 16;

/// This is how you configure the annealing sampler.
///
/// # Example
/// ```
/// # use knapsack_bqm::*;
/// let config = AnnealingConfigBuilder::default()
///     .sweeps(500)
///     .seed(42)
///     .threads(2)
///     .build()
///     .unwrap();
/// assert_eq!(500, config.sweeps);
/// assert_eq!(None, config.beta_range);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct AnnealingConfig {
    /// The number of sweeps (one Metropolis step per variable) of each read
    #[builder(default = "1000")]
    pub sweeps: usize,
    /// The (hot, cold) inverse temperatures of the geometric schedule. When
    /// absent, the range is derived from the biases of the model: the hot
    /// end lets the largest possible flip happen half of the time, the cold
    /// end lets the smallest one happen 1% of the time.
    #[builder(default, setter(strip_option))]
    pub beta_range: Option<(f64, f64)>,
    /// The seed of the first read. Read `k` is seeded with `seed + k` so that
    /// a seeded run is reproducible whatever the number of threads.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
    /// The number of threads drawing reads concurrently
    #[builder(default = "num_cpus::get()")]
    pub threads: usize,
}
impl AnnealingConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.sweeps == Some(0) {
            return Err("at least one sweep is required".to_string());
        }
        if self.threads == Some(0) {
            return Err("at least one thread is required".to_string());
        }
        if let Some(Some((hot, cold))) = self.beta_range {
            if !(hot > 0.0 && hot <= cold && cold.is_finite()) {
                return Err(format!("invalid beta range ({hot}, {cold})"));
            }
        }
        Ok(())
    }
}
impl Default for AnnealingConfig {
    fn default() -> Self {
        Self { sweeps: 1000, beta_range: None, seed: None, threads: num_cpus::get() }
    }
}

/// A sampler which performs a classical simulated annealing with single flip
/// Metropolis moves. Each read starts from a uniformly random assignment,
/// follows a geometric inverse temperature schedule and ends with a greedy
/// descent, so every returned candidate is a local minimum with respect to
/// single flips.
///
/// The sampler checks its cutoff between reads: reads which have started are
/// always completed, and the candidates gathered before the cutoff are returned.
pub struct SimulatedAnnealingSampler {
    config: AnnealingConfig,
    cutoff: Box<dyn Cutoff + Send + Sync>,
}
impl Default for SimulatedAnnealingSampler {
    fn default() -> Self {
        Self::new(AnnealingConfig::default())
    }
}
impl SimulatedAnnealingSampler {
    pub fn new(config: AnnealingConfig) -> Self {
        Self { config, cutoff: Box::new(NoCutoff) }
    }
    /// Imposes a stopping criterion on the sampling
    pub fn with_cutoff<C: Cutoff + Send + Sync + 'static>(mut self, cutoff: C) -> Self {
        self.cutoff = Box::new(cutoff);
        self
    }
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Draws one read
    fn anneal(&self, linear: &[f64], adjacency: &[Vec<(usize, f64)>], betas: &[f64], rng: &mut SmallRng) -> Vec<u8> {
        let bits = (0..linear.len()).map(|_| u8::from(rng.gen::<bool>())).collect();
        let mut state = LocalFields::new(linear, adjacency, bits);
        let n = state.len();

        for &beta in betas {
            for i in 0..n {
                let delta = state.delta(i);
                if delta <= 0.0 || rng.gen::<f64>() < (-beta * delta).exp() {
                    state.flip(i);
                }
            }
        }
        for _ in 0..MAX_DESCENT_SWEEPS {
            let mut improved = false;
            for i in 0..n {
                if state.delta(i) < 0.0 {
                    state.flip(i);
                    improved = true;
                }
            }
            if !improved {
                break;
            }
        }
        state.into_bits()
    }
}

/// Derives the default (hot, cold) inverse temperatures from the biases
fn default_beta_range(linear: &[f64], adjacency: &[Vec<(usize, f64)>]) -> (f64, f64) {
    let max_delta = linear.iter().zip(adjacency.iter())
        .map(|(h, nbs)| h.abs() + nbs.iter().map(|(_, b)| b.abs()).sum::<f64>())
        .fold(0.0, f64::max);
    let min_delta = linear.iter()
        .chain(adjacency.iter().flatten().map(|(_, b)| b))
        .map(|b| b.abs())
        .filter(|b| *b > 0.0)
        .fold(f64::INFINITY, f64::min);

    if max_delta <= 0.0 || !min_delta.is_finite() {
        // flat landscape: any schedule will do
        return (0.1, 1.0);
    }
    let hot  = 2.0_f64.ln() / max_delta;
    let cold = 100.0_f64.ln() / min_delta;
    (hot, cold.max(hot))
}

/// A geometric progression of `sweeps` inverse temperatures from hot to cold
fn schedule((hot, cold): (f64, f64), sweeps: usize) -> Vec<f64> {
    if sweeps <= 1 {
        return vec![cold];
    }
    let ratio = (cold / hot).powf(1.0 / (sweeps - 1) as f64);
    let mut betas = Vec::with_capacity(sweeps);
    let mut beta = hot;
    for _ in 0..sweeps {
        betas.push(beta);
        beta *= ratio;
    }
    betas
}

impl Sampler for SimulatedAnnealingSampler {
    fn name(&self) -> &str {
        "SimulatedAnnealingSampler"
    }

    fn sample(&self, bqm: &BinaryQuadraticModel, num_reads: usize) -> Result<SampleSet, Error> {
        if num_reads == 0 {
            return Err(Error::NoReads);
        }
        let linear    = bqm.linear_biases();
        let adjacency = bqm.adjacency();
        let range     = self.config.beta_range
            .unwrap_or_else(|| default_beta_range(linear, &adjacency));
        let betas     = schedule(range, self.config.sweeps);
        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let threads   = self.config.threads.clamp(1, num_reads);
        debug!(hot = range.0, cold = range.1, sweeps = betas.len(), threads, "annealing schedule");

        let next_read = AtomicUsize::new(0);
        // num_reads may be huge when a cutoff is expected to end the run
        let results   = Mutex::new(Vec::with_capacity(num_reads.min(PREALLOCATED_READS)));

        std::thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| loop {
                    if self.cutoff.must_stop() {
                        break;
                    }
                    let read = next_read.fetch_add(1, Ordering::Relaxed);
                    if read >= num_reads {
                        break;
                    }
                    let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(read as u64));
                    let bits    = self.anneal(linear, &adjacency, &betas, &mut rng);
                    let energy  = bqm.energy_of(&bits);
                    let sample  = bqm.to_sample(&bits);
                    results.lock().push((read, Candidate { sample, energy }));
                });
            }
        });

        let mut results = results.into_inner();
        if results.is_empty() {
            return Err(Error::Aborted);
        }
        if results.len() < num_reads {
            info!(completed = results.len(), requested = num_reads, "sampling cut off");
        }
        // rank ties in read order, not in completion order
        results.sort_unstable_by_key(|(read, _)| *read);
        let set = SampleSet::from_candidates(results.into_iter().map(|(_, c)| c).collect());
        info!(reads = set.len(), best = set.lowest_energy(), "annealing done");
        Ok(set)
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################
