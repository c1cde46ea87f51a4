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

//! The reactive GRASP search loop.
//!
//! Each run is strictly single-threaded and draws all randomness from one
//! `ChaCha8Rng` seeded from the run's seed. The ordering of draws — one
//! uniform draw to sample the control value, then one bounded draw per rank
//! position — is part of the reproducibility contract: identical seed,
//! configuration and control-value set produce identical traces.

use crate::{
    err::{EmptyControlSetError, InvalidEquivalentCostError, SearchError},
    objective::ObjectiveFunction,
    probability::ProbabilityModel,
    statistics::Statistics,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default number of passes between reactive probability updates.
const ITER_UPDATE: u64 = 100;

/// Reactive GRASP solver over a pluggable objective function.
pub struct ReactiveGrasp<F: ObjectiveFunction> {
    objective: F,
    model: ProbabilityModel,
    statistics: Statistics<F::Solution>,
    /// Evaluation budget per run, in black-box evaluation units.
    num_iters: f64,
    iter_update: u64,
    /// Persistent seed state; advances by one after every completed run.
    current_seed: u64,
}

impl<F: ObjectiveFunction> ReactiveGrasp<F> {
    pub fn new(objective: F) -> Self {
        Self {
            objective,
            model: ProbabilityModel::new(),
            statistics: Statistics::new(),
            num_iters: 0.0,
            iter_update: ITER_UPDATE,
            current_seed: 1,
        }
    }

    /// Sets the seed the next [`Self::run`] will use.
    pub fn set_seed(&mut self, seed: u64) {
        self.current_seed = seed;
    }

    /// Registers an RCL control value. Must happen before the first run.
    pub fn add_value(&mut self, value: usize) {
        self.model.add_value(value);
    }

    /// Sets the evaluation budget of a run.
    pub fn set_num_iters(&mut self, num_iters: f64) {
        self.num_iters = num_iters;
    }

    /// Sets the amplification exponent of the reactive update.
    pub fn set_amplification(&mut self, amplification: f64) {
        self.model.set_amplification(amplification);
    }

    /// Sets the number of passes between reactive updates.
    ///
    /// # Panics
    ///
    /// Panics if `iter_update` is zero; the update cadence divides the
    /// evaluation index inside the search loop.
    pub fn set_iter_update(&mut self, iter_update: u64) {
        assert!(iter_update > 0, "iter_update must be positive");
        self.iter_update = iter_update;
    }

    #[inline]
    pub fn objective(&self) -> &F {
        &self.objective
    }

    #[inline]
    pub fn statistics(&self) -> &Statistics<F::Solution> {
        &self.statistics
    }

    #[inline]
    pub fn statistics_mut(&mut self) -> &mut Statistics<F::Solution> {
        &mut self.statistics
    }

    /// Runs the search once with the current seed and advances the seed, so
    /// subsequent invocations produce a deterministic sequence of distinct
    /// runs.
    ///
    /// An objective failure aborts the run and propagates; the aborted run
    /// is left open and never committed to the statistics aggregate.
    pub fn run(&mut self) -> Result<(), SearchError<F::Error>> {
        if self.model.is_empty() {
            return Err(EmptyControlSetError.into());
        }
        let eq = self.objective.equivalent_cost();
        if !eq.is_finite() || eq <= 0.0 {
            return Err(InvalidEquivalentCostError::new(eq).into());
        }

        self.statistics.new_run(self.current_seed);
        let mut rng = ChaCha8Rng::seed_from_u64(self.current_seed);
        self.current_seed += 1;

        self.model.reset();
        let mut best_so_far = f64::INFINITY;
        let n = self.objective.number_of_variables();
        let mut ranks: Vec<usize> = Vec::with_capacity(n);
        self.statistics.take_prob_stats(1, self.model.probabilities());

        let mut iter: u64 = 0;
        let mut evals: f64 = 0.0;
        while evals < self.num_iters {
            iter += 1;
            let eval_index = evals as u64;

            let value = self.model.pick(&mut rng);
            ranks.clear();
            for j in 0..n {
                let rank = rng.random_range(0..=value);
                ranks.push(rank.min(n - j - 1));
            }
            tracing::debug!(value, ranks = ?ranks, "construction pass");

            let solution = self
                .objective
                .decode(&ranks)
                .map_err(SearchError::Objective)?;
            let improved = self
                .objective
                .improve(solution)
                .map_err(SearchError::Objective)?;
            evals += improved.cost;
            let fitness = self
                .objective
                .evaluate(&improved.solution)
                .map_err(SearchError::Objective)?;
            tracing::debug!(fitness, "solution generated");

            self.statistics
                .take_stats(eval_index, fitness, &ranks, improved.solution);

            if fitness < best_so_far {
                tracing::info!(fitness, previous = best_so_far, "new best solution");
                best_so_far = fitness;
            }
            self.model.record(value, fitness);

            if iter % self.iter_update == 0 {
                self.model.update(best_so_far);
                self.statistics
                    .take_prob_stats(eval_index, self.model.probabilities());
            }

            evals += eq;
        }
        self.statistics.close_run();
        Ok(())
    }

    /// Runs the search once with an explicit seed, then restores the
    /// persistent seed state so the auto-advancing sequence is unaffected.
    pub fn run_with_seed(&mut self, seed: u64) -> Result<(), SearchError<F::Error>> {
        let saved = self.current_seed;
        self.current_seed = seed;
        let result = self.run();
        self.current_seed = saved;
        result
    }
}
