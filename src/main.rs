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

//! This is the command line front end: it reads a knapsack instance from file,
//! encodes it, samples the model and reports the best selection found.

use std::{path::PathBuf, time::{Duration, Instant}};

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use knapsack_bqm::*;
use knapsack_bqm::io_utils::{read_instance, FILENAME_HELP};

/// This structure uses `clap-derive` annotations and define the arguments that can
/// be passed on to the executable.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "data/large.csv", help = FILENAME_HELP.as_str())]
    filename: PathBuf,
    /// Maximum weight for the container. By default sets to 80% of the total.
    #[arg(long)]
    capacity: Option<i64>,
    /// The penalty strength enforcing the capacity constraint
    #[arg(long, default_value_t = DEFAULT_PENALTY)]
    penalty: f64,
    /// The number of samples to draw
    #[arg(long, default_value_t = 1000)]
    num_reads: usize,
    /// The number of annealing sweeps per read
    #[arg(long, default_value_t = 1000)]
    sweeps: usize,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// The number of concurrent threads (defaults to the number of hardware threads)
    #[arg(short, long)]
    threads: Option<usize>,
    /// The maximum amount of time (in seconds) you would like the sampler to run
    #[arg(short, long)]
    duration: Option<u64>,
    /// Enumerate all assignments instead of annealing (tiny instances only)
    #[arg(long)]
    exhaustive: bool,
    /// Print the outcome as json
    #[arg(long)]
    json: bool,
    /// Increase the logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// What gets printed when the `--json` flag is set
#[derive(Debug, Serialize)]
struct Report<'a> {
    sampler: &'a str,
    nb_items: usize,
    capacity: i64,
    #[serde(flatten)]
    selection: &'a Selection,
    total_cost: f64,
    total_weight: i64,
    duration_secs: f32,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn,knapsack_bqm=info",
        1 => "info,knapsack_bqm=debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// An utility function to return the sampler selected on the command line.
fn sampler(args: &Args) -> anyhow::Result<Box<dyn Sampler>> {
    if args.exhaustive {
        return Ok(Box::new(ExhaustiveSampler));
    }
    let mut config = AnnealingConfigBuilder::default();
    config.sweeps(args.sweeps);
    if let Some(seed) = args.seed {
        config.seed(seed);
    }
    if let Some(threads) = args.threads {
        config.threads(threads);
    }
    let sampler = SimulatedAnnealingSampler::new(config.build()?);
    Ok(match args.duration {
        Some(t) => Box::new(sampler.with_cutoff(TimeBudget::new(Duration::from_secs(t)))),
        None    => Box::new(sampler),
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let instance = read_instance(&args.filename, args.capacity)
        .with_context(|| format!("cannot read instance {}", args.filename.display()))?;
    let sampler = sampler(&args)?;

    if !args.json {
        println!("Building BQM for knapsack problem with {} items.", instance.nb_items());
    }
    let bqm = instance.to_bqm(args.penalty)?;

    if !args.json {
        println!("Submitting BQM to solver {}.", sampler.name());
    }
    let start = Instant::now();
    let set = sampler.sample(&bqm, args.num_reads)?;
    let duration = start.elapsed();

    let selection = decode_best(&set, instance.nb_items())
        .context("the sampler returned no candidate")?;
    let total_weight = selection.total_weight(&instance.weights());
    let total_cost = selection.total_cost(&instance.costs());
    if !selection.fits(&instance) {
        warn!(total_weight, capacity = instance.capacity,
            "the best selection exceeds the capacity; consider a larger penalty");
    }

    if args.json {
        let report = Report {
            sampler: sampler.name(),
            nb_items: instance.nb_items(),
            capacity: instance.capacity,
            selection: &selection,
            total_cost,
            total_weight,
            duration_secs: duration.as_secs_f32(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\nFound best solution with energy {}.", selection.energy);
        println!("Selected item indices (0-indexed): {:?}", selection.items);
        println!("Total cost:   {}", total_cost);
        println!("Total weight: {} / {}", total_weight, instance.capacity);
        println!("Duration:     {:.3} seconds", duration.as_secs_f32());
    }
    Ok(())
}
