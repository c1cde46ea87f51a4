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

//! Per-run statistics of the reactive GRASP search.
//!
//! A run records three traces: a monotonic best-fitness trace (one entry per
//! pass), solution checkpoints (one entry per strict improvement), and
//! probability snapshots (one entry per reactive update, plus the initial
//! uniform distribution). Closed runs are committed into an append-only
//! aggregate; at most one run is open at a time.

use serde::Serialize;
use std::time::Instant;

/// One point of the best-fitness trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessEntry {
    pub eval_index: u64,
    pub best: f64,
}

/// A new-best checkpoint: the solution, its fitness and the rank vector
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionEntry<S> {
    pub eval_index: u64,
    pub fitness: f64,
    pub ranks: Vec<usize>,
    pub solution: S,
}

/// A snapshot of the selection probabilities, in the model's fixed order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityEntry {
    pub eval_index: u64,
    pub probabilities: Vec<f64>,
}

/// A closed run with its frozen wall-clock duration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord<S> {
    seed: u64,
    elapsed_seconds: f64,
    fitness_trace: Vec<FitnessEntry>,
    solution_checkpoints: Vec<SolutionEntry<S>>,
    probability_trace: Vec<ProbabilityEntry>,
}

impl<S> RunRecord<S> {
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    #[inline]
    pub fn fitness_trace(&self) -> &[FitnessEntry] {
        &self.fitness_trace
    }

    #[inline]
    pub fn solution_checkpoints(&self) -> &[SolutionEntry<S>] {
        &self.solution_checkpoints
    }

    #[inline]
    pub fn probability_trace(&self) -> &[ProbabilityEntry] {
        &self.probability_trace
    }

    /// Best fitness of the run: checkpoints are strictly decreasing, so the
    /// last one is the best. `None` if the run never improved on infinity.
    pub fn best_fitness(&self) -> Option<f64> {
        self.solution_checkpoints.last().map(|e| e.fitness)
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.solution_checkpoints.last().map(|e| &e.solution)
    }

    pub fn best_ranks(&self) -> Option<&[usize]> {
        self.solution_checkpoints.last().map(|e| e.ranks.as_slice())
    }
}

#[derive(Debug)]
struct OpenRun<S> {
    seed: u64,
    started: Instant,
    current_best: f64,
    fitness_trace: Vec<FitnessEntry>,
    solution_checkpoints: Vec<SolutionEntry<S>>,
    probability_trace: Vec<ProbabilityEntry>,
}

/// Recorder and aggregate of run statistics.
#[derive(Debug)]
pub struct Statistics<S> {
    runs: Vec<RunRecord<S>>,
    open: Option<OpenRun<S>>,
}

impl<S> Default for Statistics<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Statistics<S> {
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            open: None,
        }
    }

    /// Drops all committed runs and any open run.
    pub fn clear(&mut self) {
        self.runs.clear();
        self.open = None;
    }

    /// Opens a new run, force-closing any run still open.
    pub fn new_run(&mut self, seed: u64) {
        if self.open.is_some() {
            self.close_run();
        }
        self.open = Some(OpenRun {
            seed,
            started: Instant::now(),
            current_best: f64::INFINITY,
            fitness_trace: Vec::new(),
            solution_checkpoints: Vec::new(),
            probability_trace: Vec::new(),
        });
    }

    /// Stops the timer and commits the open run. No-op without an open run.
    pub fn close_run(&mut self) {
        if let Some(run) = self.open.take() {
            self.runs.push(RunRecord {
                seed: run.seed,
                elapsed_seconds: run.started.elapsed().as_secs_f64(),
                fitness_trace: run.fitness_trace,
                solution_checkpoints: run.solution_checkpoints,
                probability_trace: run.probability_trace,
            });
        }
    }

    /// Records one construction pass.
    ///
    /// The fitness trace always receives `min(current_best, fitness)`; a
    /// solution checkpoint is appended only on strict improvement.
    ///
    /// # Panics
    ///
    /// Panics if no run is open; call [`Statistics::new_run`] first.
    pub fn take_stats(&mut self, eval_index: u64, fitness: f64, ranks: &[usize], solution: S) {
        let run = self
            .open
            .as_mut()
            .expect("take_stats requires an open run");
        run.fitness_trace.push(FitnessEntry {
            eval_index,
            best: run.current_best.min(fitness),
        });
        if fitness < run.current_best {
            run.current_best = fitness;
            run.solution_checkpoints.push(SolutionEntry {
                eval_index,
                fitness,
                ranks: ranks.to_vec(),
                solution,
            });
        }
    }

    /// Records a probability snapshot.
    ///
    /// # Panics
    ///
    /// Panics if no run is open; call [`Statistics::new_run`] first.
    pub fn take_prob_stats(&mut self, eval_index: u64, probabilities: Vec<f64>) {
        let run = self
            .open
            .as_mut()
            .expect("take_prob_stats requires an open run");
        run.probability_trace.push(ProbabilityEntry {
            eval_index,
            probabilities,
        });
    }

    #[inline]
    pub fn num_runs(&self) -> usize {
        self.runs.len()
    }

    #[inline]
    pub fn run(&self, index: usize) -> &RunRecord<S> {
        &self.runs[index]
    }

    #[inline]
    pub fn runs(&self) -> &[RunRecord<S>] {
        &self.runs
    }

    /// Best fitness of the `index`-th committed run.
    pub fn best_fitness(&self, index: usize) -> Option<f64> {
        self.runs[index].best_fitness()
    }

    /// Index of the best committed run; ties break to the lowest index.
    fn best_run_index(&self) -> Option<usize> {
        let mut best = f64::INFINITY;
        let mut index = None;
        for (i, run) in self.runs.iter().enumerate() {
            if let Some(f) = run.best_fitness() {
                if f < best {
                    best = f;
                    index = Some(i);
                }
            }
        }
        index
    }

    /// Best fitness across all committed runs.
    pub fn overall_best_fitness(&self) -> Option<f64> {
        self.best_run_index().and_then(|i| self.runs[i].best_fitness())
    }

    /// Best solution across all committed runs.
    pub fn overall_best_solution(&self) -> Option<&S> {
        self.best_run_index().and_then(|i| self.runs[i].best_solution())
    }

    /// Ranks of the best solution across all committed runs.
    pub fn overall_best_ranks(&self) -> Option<&[usize]> {
        self.best_run_index().and_then(|i| self.runs[i].best_ranks())
    }

    /// Best solution of the run currently in progress, if any improvement
    /// has been recorded yet.
    pub fn current_best_solution(&self) -> Option<&S> {
        self.open
            .as_ref()
            .and_then(|r| r.solution_checkpoints.last())
            .map(|e| &e.solution)
    }

    /// Ranks of the best solution of the run currently in progress.
    pub fn current_best_ranks(&self) -> Option<&[usize]> {
        self.open
            .as_ref()
            .and_then(|r| r.solution_checkpoints.last())
            .map(|e| e.ranks.as_slice())
    }

    /// Wall-clock seconds of the `index`-th committed run.
    pub fn elapsed_seconds(&self, index: usize) -> f64 {
        self.runs[index].elapsed_seconds
    }
}

// ---------------- Export records ----------------

/// Fitness trace of one run as parallel arrays.
#[derive(Debug, Clone, Serialize)]
pub struct FitnessTraceExport {
    pub eval_indices: Vec<u64>,
    pub best_values: Vec<f64>,
}

/// Solution checkpoints of one run as parallel arrays.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionTraceExport<'a, S> {
    pub eval_indices: Vec<u64>,
    pub fitness_values: Vec<f64>,
    pub control_vectors: Vec<&'a [usize]>,
    pub solutions: Vec<&'a S>,
}

/// Probability snapshots of one run as parallel arrays.
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityTraceExport<'a> {
    pub eval_indices: Vec<u64>,
    pub probability_vectors: Vec<&'a [f64]>,
}

/// Serializable record of one committed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunExport<'a, S> {
    pub run_index: usize,
    pub seed: u64,
    pub elapsed_seconds: f64,
    pub fitness_trace: FitnessTraceExport,
    pub solution_checkpoints: SolutionTraceExport<'a, S>,
    pub probability_trace: ProbabilityTraceExport<'a>,
}

impl<S: Serialize> Statistics<S> {
    /// Export record of the `index`-th committed run.
    pub fn run_export(&self, index: usize) -> RunExport<'_, S> {
        let run = &self.runs[index];
        RunExport {
            run_index: index,
            seed: run.seed,
            elapsed_seconds: run.elapsed_seconds,
            fitness_trace: FitnessTraceExport {
                eval_indices: run.fitness_trace.iter().map(|e| e.eval_index).collect(),
                best_values: run.fitness_trace.iter().map(|e| e.best).collect(),
            },
            solution_checkpoints: SolutionTraceExport {
                eval_indices: run
                    .solution_checkpoints
                    .iter()
                    .map(|e| e.eval_index)
                    .collect(),
                fitness_values: run.solution_checkpoints.iter().map(|e| e.fitness).collect(),
                control_vectors: run
                    .solution_checkpoints
                    .iter()
                    .map(|e| e.ranks.as_slice())
                    .collect(),
                solutions: run.solution_checkpoints.iter().map(|e| &e.solution).collect(),
            },
            probability_trace: ProbabilityTraceExport {
                eval_indices: run
                    .probability_trace
                    .iter()
                    .map(|e| e.eval_index)
                    .collect(),
                probability_vectors: run
                    .probability_trace
                    .iter()
                    .map(|e| e.probabilities.as_slice())
                    .collect(),
            },
        }
    }

    /// Export records of all committed runs. An open run is not exported.
    pub fn run_exports(&self) -> Vec<RunExport<'_, S>> {
        (0..self.runs.len()).map(|i| self.run_export(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "take_stats requires an open run")]
    fn test_take_stats_without_open_run_panics() {
        let mut st: Statistics<Vec<usize>> = Statistics::new();
        st.take_stats(0, 10.0, &[0], vec![0]);
    }

    #[test]
    #[should_panic(expected = "take_prob_stats requires an open run")]
    fn test_take_prob_stats_without_open_run_panics() {
        let mut st: Statistics<Vec<usize>> = Statistics::new();
        st.take_prob_stats(1, vec![0.5, 0.5]);
    }

    #[test]
    fn test_trace_is_monotonic_and_checkpoints_strict() {
        let mut st: Statistics<Vec<usize>> = Statistics::new();
        st.new_run(1);
        st.take_stats(0, 10.0, &[0], vec![0]);
        st.take_stats(2, 12.0, &[1], vec![1]);
        st.take_stats(5, 8.0, &[2], vec![2]);
        st.take_stats(7, 8.0, &[3], vec![3]);
        st.close_run();

        let run = st.run(0);
        let best: Vec<f64> = run.fitness_trace().iter().map(|e| e.best).collect();
        assert_eq!(best, vec![10.0, 10.0, 8.0, 8.0]);
        let checkpoints: Vec<f64> = run
            .solution_checkpoints()
            .iter()
            .map(|e| e.fitness)
            .collect();
        assert_eq!(checkpoints, vec![10.0, 8.0]);
        assert_eq!(run.best_fitness(), Some(8.0));
        assert_eq!(run.best_solution(), Some(&vec![2]));
        assert_eq!(run.best_ranks(), Some(&[2][..]));
    }

    #[test]
    fn test_first_entry_uses_min_of_infinity_and_fitness() {
        let mut st: Statistics<()> = Statistics::new();
        st.new_run(0);
        st.take_stats(0, 3.5, &[], ());
        st.close_run();
        assert_eq!(st.run(0).fitness_trace()[0].best, 3.5);
    }

    #[test]
    fn test_new_run_force_closes_open_run() {
        let mut st: Statistics<()> = Statistics::new();
        st.new_run(11);
        st.take_stats(0, 1.0, &[], ());
        st.new_run(22);
        st.close_run();
        assert_eq!(st.num_runs(), 2);
        assert_eq!(st.run(0).seed(), 11);
        assert_eq!(st.run(1).seed(), 22);
        assert!(st.run(1).fitness_trace().is_empty());
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut st: Statistics<()> = Statistics::new();
        st.close_run();
        assert_eq!(st.num_runs(), 0);
    }

    #[test]
    fn test_overall_best_breaks_ties_to_first_run() {
        let mut st: Statistics<u32> = Statistics::new();
        st.new_run(1);
        st.take_stats(0, 5.0, &[0], 100);
        st.close_run();
        st.new_run(2);
        st.take_stats(0, 5.0, &[1], 200);
        st.close_run();
        st.new_run(3);
        st.take_stats(0, 9.0, &[2], 300);
        st.close_run();
        assert_eq!(st.overall_best_fitness(), Some(5.0));
        assert_eq!(st.overall_best_solution(), Some(&100));
        assert_eq!(st.overall_best_ranks(), Some(&[0][..]));
    }

    #[test]
    fn test_current_best_tracks_open_run() {
        let mut st: Statistics<u32> = Statistics::new();
        st.new_run(1);
        assert_eq!(st.current_best_solution(), None);
        st.take_stats(0, 4.0, &[1, 2], 7);
        assert_eq!(st.current_best_solution(), Some(&7));
        assert_eq!(st.current_best_ranks(), Some(&[1, 2][..]));
    }

    #[test]
    fn test_probability_snapshots_are_recorded_in_order() {
        let mut st: Statistics<()> = Statistics::new();
        st.new_run(1);
        st.take_prob_stats(1, vec![0.5, 0.5]);
        st.take_prob_stats(9, vec![0.9, 0.1]);
        st.close_run();
        let trace = st.run(0).probability_trace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].eval_index, 1);
        assert_eq!(trace[1].probabilities, vec![0.9, 0.1]);
    }

    #[test]
    fn test_export_shape() {
        let mut st: Statistics<Vec<usize>> = Statistics::new();
        st.new_run(99);
        st.take_prob_stats(1, vec![0.5, 0.5]);
        st.take_stats(0, 6.0, &[2, 0], vec![1, 0]);
        st.close_run();
        // An unfinished run must not show up in the export.
        st.new_run(7);

        let exports = st.run_exports();
        assert_eq!(exports.len(), 1);
        let json = serde_json::to_value(&exports[0]).unwrap();
        assert_eq!(json["run_index"], 0);
        assert_eq!(json["seed"], 99);
        assert_eq!(json["fitness_trace"]["eval_indices"][0], 0);
        assert_eq!(json["fitness_trace"]["best_values"][0], 6.0);
        assert_eq!(json["solution_checkpoints"]["control_vectors"][0][0], 2);
        assert_eq!(json["solution_checkpoints"]["solutions"][0][1], 0);
        assert_eq!(json["probability_trace"]["probability_vectors"][0][1], 0.5);
        assert!(json["elapsed_seconds"].as_f64().unwrap() >= 0.0);
    }
}
