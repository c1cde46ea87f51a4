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

//! The objective-function contract.
//!
//! This is the sole integration surface for plugging a combinatorial problem
//! into the engine. The engine drives construction through ranks into a
//! sorted candidate list (rank 0 = best candidate) and treats the decoded
//! solution as opaque: it stores and forwards it but never inspects it.
//! Fitness follows the minimization convention, lower is better.

/// Result of applying local improvement to a solution.
///
/// `cost` is the extra evaluation-budget cost the improvement incurred; a
/// no-op implementation returns the unchanged solution with cost 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSearchResult<S> {
    pub solution: S,
    pub cost: f64,
}

impl<S> LocalSearchResult<S> {
    #[inline]
    pub fn new(solution: S, cost: f64) -> Self {
        Self { solution, cost }
    }

    /// An untouched solution at zero additional cost.
    #[inline]
    pub fn unchanged(solution: S) -> Self {
        Self {
            solution,
            cost: 0.0,
        }
    }
}

/// A problem definition as seen by the reactive GRASP engine.
pub trait ObjectiveFunction {
    /// Decoded solution payload. Opaque to the engine.
    type Solution: Clone;

    /// Error raised by decode, improve or evaluate. Propagated verbatim;
    /// the engine never retries or substitutes a default solution.
    type Error: std::error::Error;

    /// Number of decisions needed to create a solution. Constant for a
    /// given instance, at least 1.
    fn number_of_variables(&self) -> usize;

    /// Number of black-box function evaluations a single construction pass
    /// is worth. Used so evaluation budgets are comparable across problems
    /// of different construction complexity. Must be positive.
    fn equivalent_cost(&self) -> f64;

    /// Decodes a rank vector of length [`Self::number_of_variables`] into a
    /// solution. Each rank indexes the sorted candidate list of its stage;
    /// ranks beyond the shrinking pool clamp to the last candidate and are
    /// never an error.
    fn decode(&mut self, ranks: &[usize]) -> Result<Self::Solution, Self::Error>;

    /// Applies local improvement and reports the additional search cost.
    fn improve(
        &mut self,
        solution: Self::Solution,
    ) -> Result<LocalSearchResult<Self::Solution>, Self::Error>;

    /// Returns the fitness of a solution (lower is better).
    fn evaluate(&mut self, solution: &Self::Solution) -> Result<f64, Self::Error>;
}
