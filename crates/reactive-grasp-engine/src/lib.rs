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

//! Problem-agnostic reactive GRASP engine.
//!
//! A problem plugs in through the [`objective::ObjectiveFunction`] contract
//! (decode, improve, evaluate plus two scalar accessors); the engine owns the
//! reactive probability model over RCL control values, the
//! evaluation-budget-driven search loop, and the per-run statistics record.

pub mod err;
pub mod objective;
pub mod probability;
pub mod search;
pub mod statistics;

pub mod prelude {
    pub use crate::err::SearchError;
    pub use crate::objective::{LocalSearchResult, ObjectiveFunction};
    pub use crate::probability::ProbabilityModel;
    pub use crate::search::ReactiveGrasp;
    pub use crate::statistics::Statistics;
}
