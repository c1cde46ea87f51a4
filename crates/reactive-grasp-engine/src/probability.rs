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

//! Reactive probability model over RCL control values.
//!
//! The model keeps one selection probability per registered control value
//! and adapts it online: values whose constructed solutions score well on
//! average gain probability mass, while a Laplace floor keeps every value
//! selectable. Control values live in a fixed, registration-ordered vector
//! (never a hash map), so the sampling walk and every probability snapshot
//! iterate in the same deterministic order.

use rand::Rng;
use std::collections::HashMap;

/// Division-by-zero guard in the quality computation.
const EPSILON1: f64 = 1e-10;

/// Laplace-correction mass, spread uniformly over all control values.
const EPSILON2: f64 = 1e-2;

/// Live statistics of one control value during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueStats {
    probability: f64,
    score_sum: f64,
    pick_count: u64,
}

#[derive(Debug, Clone)]
pub struct ProbabilityModel {
    /// Control values in registration order. This order is the iteration
    /// order of the sampling walk and of every snapshot.
    values: Vec<usize>,
    /// Control value -> slot in `values`.
    slot_of: HashMap<usize, usize>,
    stats: Vec<ValueStats>,
    /// `EPSILON2 / |values|`, recomputed on registration.
    laplace: f64,
    amplification: f64,
}

impl Default for ProbabilityModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilityModel {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            slot_of: HashMap::new(),
            stats: Vec::new(),
            laplace: 0.0,
            amplification: 1.0,
        }
    }

    /// Registers a control value. Duplicates are ignored.
    pub fn add_value(&mut self, value: usize) {
        if self.slot_of.contains_key(&value) {
            return;
        }
        self.slot_of.insert(value, self.values.len());
        self.values.push(value);
        self.stats.push(ValueStats {
            probability: 0.0,
            score_sum: 0.0,
            pick_count: 0,
        });
        self.laplace = EPSILON2 / self.values.len() as f64;
    }

    /// Sets the amplification exponent used by [`Self::update`].
    pub fn set_amplification(&mut self, amplification: f64) {
        self.amplification = amplification;
    }

    #[inline]
    pub fn amplification(&self) -> f64 {
        self.amplification
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Registered control values in their fixed order.
    #[inline]
    pub fn control_values(&self) -> &[usize] {
        &self.values
    }

    /// Resets to the uniform distribution with zeroed scores and counts.
    pub fn reset(&mut self) {
        let p = 1.0 / self.values.len() as f64;
        for s in &mut self.stats {
            s.probability = p;
            s.score_sum = 0.0;
            s.pick_count = 0;
        }
    }

    /// Samples a control value by a roulette walk over the fixed order.
    ///
    /// If numerical drift leaves a positive remainder after the walk has
    /// consumed every probability, the last value is returned rather than
    /// failing.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> usize {
        let mut r = rng.random::<f64>();
        for (i, s) in self.stats.iter().enumerate() {
            r -= s.probability;
            if r <= 0.0 {
                return self.values[i];
            }
        }
        self.values[self.values.len() - 1]
    }

    /// Accumulates the fitness of a solution constructed with `value`.
    pub fn record(&mut self, value: usize, fitness: f64) {
        let slot = self.slot_of[&value];
        self.stats[slot].score_sum += fitness;
        self.stats[slot].pick_count += 1;
    }

    /// Reactive update of the selection probabilities.
    ///
    /// Each visited value gets quality `(best / (avg + EPS1))^amplification`
    /// (minimization: a lower average fitness means higher quality) and the
    /// new probability `laplace + (1-laplace) * (q + EPS1/n0) / (sigma + EPS1)`
    /// where `sigma` sums the qualities and `n0` counts the visited values.
    /// Unvisited values drop to the Laplace floor. The visited corrections
    /// cancel against `sigma + EPS1`, so the total mass after an update is
    /// `1 + (|values| - 1) * laplace` — within `EPSILON2` of 1, not exactly
    /// 1. This residual is inherent to the formula and is deliberately not
    /// renormalized away.
    pub fn update(&mut self, best_so_far: f64) {
        let mut quality = vec![0.0; self.stats.len()];
        let mut sigma = 0.0;
        let mut n0 = 0usize;
        for (i, s) in self.stats.iter().enumerate() {
            if s.pick_count == 0 {
                continue;
            }
            let avg = s.score_sum / s.pick_count as f64;
            let q = (best_so_far / (avg + EPSILON1)).powf(self.amplification);
            quality[i] = q;
            sigma += q;
            n0 += 1;
        }
        if n0 == 0 {
            return;
        }
        let correction = EPSILON1 / n0 as f64;

        for (i, s) in self.stats.iter_mut().enumerate() {
            s.probability = if s.pick_count > 0 {
                self.laplace + (1.0 - self.laplace) * (quality[i] + correction) / (sigma + EPSILON1)
            } else {
                self.laplace
            };
        }

        tracing::debug!(probabilities = ?self.probabilities(), "probabilities updated");
    }

    /// Snapshot of the probabilities, aligned with [`Self::control_values`].
    pub fn probabilities(&self) -> Vec<f64> {
        self.stats.iter().map(|s| s.probability).collect()
    }

    /// Current selection probability of a control value.
    pub fn probability_of(&self, value: usize) -> Option<f64> {
        self.slot_of.get(&value).map(|&i| self.stats[i].probability)
    }

    /// Times a control value has been picked in the current run.
    pub fn pick_count_of(&self, value: usize) -> Option<u64> {
        self.slot_of.get(&value).map(|&i| self.stats[i].pick_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn model_with(values: &[usize]) -> ProbabilityModel {
        let mut m = ProbabilityModel::new();
        for &v in values {
            m.add_value(v);
        }
        m.reset();
        m
    }

    /// The update formula leaves a residual of `(|values|-1) * laplace` on
    /// top of 1; the mass never strays further than `EPSILON2` from 1.
    fn assert_mass_within_floor_excess(m: &ProbabilityModel) {
        let sum: f64 = m.probabilities().iter().sum();
        assert!(
            (sum - 1.0).abs() <= EPSILON2 + 1e-9,
            "probability sum was {}",
            sum
        );
    }

    #[test]
    fn test_reset_is_uniform() {
        let m = model_with(&[1, 2, 3, 4]);
        for &v in m.control_values() {
            assert_eq!(m.probability_of(v), Some(0.25));
        }
        assert_mass_within_floor_excess(&m);
    }

    #[test]
    fn test_duplicate_values_ignored() {
        let mut m = ProbabilityModel::new();
        m.add_value(3);
        m.add_value(3);
        m.add_value(5);
        assert_eq!(m.control_values(), &[3, 5]);
    }

    #[test]
    fn test_pick_walks_in_registration_order() {
        let mut m = model_with(&[7, 1, 9]);
        // Concentrate all mass on the middle value.
        for _ in 0..10 {
            m.record(1, 1.0);
        }
        m.record(7, 1e6);
        m.record(9, 1e6);
        m.update(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut hits = 0;
        for _ in 0..1000 {
            if m.pick(&mut rng) == 1 {
                hits += 1;
            }
        }
        assert!(hits > 950, "expected value 1 to dominate, got {}", hits);
    }

    #[test]
    fn test_update_sum_invariant_and_floor() {
        let mut m = model_with(&[1, 2, 3, 4, 5]);
        m.set_amplification(2.0);
        m.record(1, 10.0);
        m.record(2, 20.0);
        m.record(3, 400.0);
        // values 4 and 5 stay unvisited
        m.update(10.0);
        assert_mass_within_floor_excess(&m);
        let floor = 1e-2 / 5.0;
        for p in m.probabilities() {
            assert!(p >= floor - 1e-12, "probability {} below Laplace floor", p);
        }
        assert!((m.probability_of(4).unwrap() - floor).abs() < 1e-15);
        assert!((m.probability_of(5).unwrap() - floor).abs() < 1e-15);
    }

    #[test]
    fn test_update_mass_is_one_plus_floor_residual() {
        // The visited corrections cancel against sigma + EPS1, so the mass
        // after an update is exactly 1 + (|values|-1) * laplace.
        let mut m = model_with(&[1, 2, 3, 4, 5]);
        m.record(1, 10.0);
        m.record(2, 20.0);
        m.update(10.0);
        let sum: f64 = m.probabilities().iter().sum();
        let laplace = EPSILON2 / 5.0;
        assert!((sum - (1.0 + 4.0 * laplace)).abs() < 1e-12, "sum was {}", sum);
    }

    #[test]
    fn test_better_average_gains_mass() {
        let mut m = model_with(&[1, 2]);
        m.record(1, 5.0);
        m.record(2, 50.0);
        m.update(5.0);
        assert!(m.probability_of(1).unwrap() > m.probability_of(2).unwrap());
        assert_mass_within_floor_excess(&m);
    }

    #[test]
    fn test_equal_averages_yield_equal_probabilities() {
        let mut m = model_with(&[1, 2, 3]);
        for v in 1..=3 {
            m.record(v, 12.0);
            m.record(v, 12.0);
        }
        m.set_amplification(7.5);
        m.update(12.0);
        let probs = m.probabilities();
        assert!((probs[0] - probs[1]).abs() < 1e-12);
        assert!((probs[1] - probs[2]).abs() < 1e-12);
        assert_mass_within_floor_excess(&m);
    }

    #[test]
    fn test_zero_amplification_flattens_visited() {
        let mut m = model_with(&[1, 2]);
        m.set_amplification(0.0);
        m.record(1, 1.0);
        m.record(2, 1000.0);
        m.update(1.0);
        // q = 1 for every visited value regardless of its average.
        let probs = m.probabilities();
        assert!((probs[0] - probs[1]).abs() < 1e-12);
        assert_mass_within_floor_excess(&m);
    }

    #[test]
    fn test_update_without_picks_is_noop() {
        let mut m = model_with(&[1, 2]);
        let before = m.probabilities();
        m.update(1.0);
        assert_eq!(before, m.probabilities());
    }

    #[test]
    fn test_repeated_updates_stay_normalized() {
        let mut m = model_with(&[1, 2, 3, 4]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut best = f64::INFINITY;
        for i in 0..500 {
            let v = m.pick(&mut rng);
            let f = 10.0 + (i % 17) as f64 + v as f64;
            best = best.min(f);
            m.record(v, f);
            if (i + 1) % 25 == 0 {
                m.update(best);
                assert_mass_within_floor_excess(&m);
            }
        }
    }

    #[test]
    fn test_pick_falls_back_to_last_value() {
        let mut m = model_with(&[1, 2]);
        // Degenerate probabilities force the walk to run off the end.
        m.stats[0].probability = 0.0;
        m.stats[1].probability = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(m.pick(&mut rng), 2);
    }
}
