// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reactive_grasp_assignment::{TaskAssignment, TaskAssignmentObjective};
use reactive_grasp_engine::prelude::ReactiveGrasp;
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Algorithm configuration, consumed as already-validated scalars by the
/// engine; validation happens here in the driver.
#[derive(Debug, Deserialize)]
struct Config {
    seed: u64,
    /// Evaluation budget per run.
    iterations: f64,
    amplification: f64,
    /// Passes between reactive probability updates.
    update: u64,
    numruns: u32,
    /// Local-search neighbor budget; omitted or 0 disables local search.
    #[serde(default)]
    neighbors: u64,
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn usage() -> ! {
    eprintln!("Usage: reactive-grasp-cli <config.json> <instance.tap> [output.json]");
    eprintln!("       reactive-grasp-cli generate <num-tasks> <seed> <output.tap>");
    std::process::exit(1);
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn load_config(path: &Path) -> Config {
    let file = File::open(path).unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));
    let config: Config = serde_json::from_reader(file)
        .unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));

    if !config.iterations.is_finite() || config.iterations <= 0.0 {
        fail("`iterations` must be a positive evaluation budget");
    }
    if config.update == 0 {
        fail("`update` must be a positive number of passes");
    }
    if config.numruns == 0 {
        fail("`numruns` must be at least 1");
    }
    if !config.amplification.is_finite() || config.amplification < 0.0 {
        fail("`amplification` must be non-negative");
    }
    config
}

fn generate(args: &[String]) {
    if args.len() != 3 {
        usage();
    }
    let num_tasks: usize = args[0]
        .parse()
        .unwrap_or_else(|_| fail("`num-tasks` must be a positive integer"));
    let seed: u64 = args[1]
        .parse()
        .unwrap_or_else(|_| fail("`seed` must be an integer"));
    if num_tasks == 0 {
        fail("`num-tasks` must be at least 1");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let instance = TaskAssignment::random(num_tasks, &mut rng);
    instance
        .write_to_path(&args[2])
        .unwrap_or_else(|e| fail(format!("{}: {}", args[2], e)));
    tracing::info!(num_tasks, seed, path = %args[2], "instance written");
}

fn solve(args: &[String]) {
    if args.len() < 2 || args.len() > 3 {
        usage();
    }
    let config = load_config(Path::new(&args[0]));
    let instance = TaskAssignment::from_path(&args[1])
        .unwrap_or_else(|e| fail(format!("{}: {}", args[1], e)));
    let output = args.get(2).map(String::as_str).unwrap_or("stats.json");

    let num_tasks = instance.num_tasks();
    if num_tasks < 2 {
        fail("instance must have at least 2 tasks to form an RCL");
    }
    tracing::info!(num_tasks, ?config, "instance loaded");

    let mut objective = TaskAssignmentObjective::new(instance);
    objective.set_num_neighbors(config.neighbors);

    let mut solver = ReactiveGrasp::new(objective);
    solver.set_seed(config.seed);
    solver.set_num_iters(config.iterations);
    solver.set_amplification(config.amplification);
    solver.set_iter_update(config.update);
    for v in 1..num_tasks {
        solver.add_value(v);
    }

    let num_runs = config.numruns as usize;
    for run_index in 0..num_runs {
        let start_ts: DateTime<Utc> = Utc::now();
        if let Err(e) = solver.run() {
            fail(format!("run {}: {}", run_index, e));
        }

        let stats = solver.statistics();
        tracing::info!(
            run = run_index,
            start_ts = %start_ts,
            end_ts = %Utc::now(),
            elapsed_seconds = stats.elapsed_seconds(run_index),
            best_fitness = stats.best_fitness(run_index),
            "run finished"
        );
    }

    if let Some(best) = solver.statistics().overall_best_fitness() {
        tracing::info!(
            best_fitness = best,
            assignment = ?solver.statistics().overall_best_solution(),
            "best over all runs"
        );
    }

    let exports = solver.statistics().run_exports();
    let json = serde_json::to_string_pretty(&exports)
        .unwrap_or_else(|e| fail(format!("serializing statistics: {}", e)));
    File::create(output)
        .and_then(|mut f| f.write_all(json.as_bytes()))
        .unwrap_or_else(|e| fail(format!("{}: {}", output, e)));
    tracing::info!(path = output, runs = num_runs, "statistics written");
}

fn main() {
    enable_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("generate") => generate(&args[1..]),
        Some(_) => solve(&args),
        None => usage(),
    }
}
