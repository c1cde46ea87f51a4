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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyControlSetError;

impl std::fmt::Display for EmptyControlSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No RCL control values have been registered")
    }
}

impl std::error::Error for EmptyControlSetError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidEquivalentCostError {
    cost: f64,
}

impl InvalidEquivalentCostError {
    pub fn new(cost: f64) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}

impl std::fmt::Display for InvalidEquivalentCostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Equivalent cost of a construction pass must be finite and positive, got {}",
            self.cost
        )
    }
}

impl std::error::Error for InvalidEquivalentCostError {}

/// Errors raised by [`crate::search::ReactiveGrasp::run`].
///
/// `Objective` wraps whatever the plugged-in objective function raised from
/// decode, improve or evaluate; such failures abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError<E> {
    EmptyControlSet(EmptyControlSetError),
    InvalidEquivalentCost(InvalidEquivalentCostError),
    Objective(E),
}

impl<E: std::fmt::Display> std::fmt::Display for SearchError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::EmptyControlSet(err) => write!(f, "{}", err),
            SearchError::InvalidEquivalentCost(err) => write!(f, "{}", err),
            SearchError::Objective(err) => write!(f, "Objective function failed: {}", err),
        }
    }
}

impl<E: std::error::Error> std::error::Error for SearchError<E> {}

impl<E> From<EmptyControlSetError> for SearchError<E> {
    fn from(err: EmptyControlSetError) -> Self {
        SearchError::EmptyControlSet(err)
    }
}

impl<E> From<InvalidEquivalentCostError> for SearchError<E> {
    fn from(err: InvalidEquivalentCostError) -> Self {
        SearchError::InvalidEquivalentCost(err)
    }
}
