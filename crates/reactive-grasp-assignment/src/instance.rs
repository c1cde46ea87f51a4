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

use crate::err::InstanceLoadError;
use rand::Rng;
use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

/// Smallest upper bound for randomly generated costs.
const MIN_COST_BOUND: i64 = 10;

/// A task-assignment problem instance.
///
/// The instance is square: as many agents as tasks, with
/// `cost(agent, task)` the price of assigning that agent to that task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAssignment {
    num_tasks: usize,
    /// Row-major, `cost[agent][task]`.
    cost: Vec<Vec<i64>>,
}

impl TaskAssignment {
    /// Creates a random instance with costs uniform in `1..=max(n, 10)`.
    ///
    /// Determinism is the caller's concern: pass an explicitly seeded RNG.
    pub fn random<R: Rng>(num_tasks: usize, rng: &mut R) -> Self {
        let bound = (num_tasks as i64).max(MIN_COST_BOUND);
        let cost = (0..num_tasks)
            .map(|_| (0..num_tasks).map(|_| rng.random_range(1..=bound)).collect())
            .collect();
        Self { num_tasks, cost }
    }

    /// Reads an instance from whitespace-separated text: the number of
    /// tasks followed by the `n * n` cost matrix in row-major order.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InstanceLoadError> {
        let mut text = String::new();
        BufReader::new(reader).read_to_string(&mut text)?;
        let mut tokens = text.split_whitespace();

        let num_tasks: usize = tokens
            .next()
            .ok_or(InstanceLoadError::Truncated)?
            .parse()?;
        if num_tasks == 0 {
            return Err(InstanceLoadError::EmptyInstance);
        }

        let mut cost = Vec::with_capacity(num_tasks);
        for _ in 0..num_tasks {
            let mut row = Vec::with_capacity(num_tasks);
            for _ in 0..num_tasks {
                let c: i64 = tokens
                    .next()
                    .ok_or(InstanceLoadError::Truncated)?
                    .parse()?;
                row.push(c);
            }
            cost.push(row);
        }

        Ok(Self { num_tasks, cost })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InstanceLoadError> {
        Self::from_reader(File::open(path)?)
    }

    /// Writes the instance in the format [`Self::from_reader`] accepts.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        write!(file, "{}", self)
    }

    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    /// Cost of assigning `agent` to `task`.
    #[inline]
    pub fn cost(&self, agent: usize, task: usize) -> i64 {
        self.cost[agent][task]
    }
}

impl std::fmt::Display for TaskAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.num_tasks)?;
        for row in &self.cost {
            for c in row {
                write!(f, "{}\t", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_instance_is_seeded_deterministically() {
        let mut rng_a = ChaCha8Rng::seed_from_u64(5);
        let mut rng_b = ChaCha8Rng::seed_from_u64(5);
        let a = TaskAssignment::random(8, &mut rng_a);
        let b = TaskAssignment::random(8, &mut rng_b);
        assert_eq!(a, b);
        for agent in 0..8 {
            for task in 0..8 {
                let c = a.cost(agent, task);
                assert!((1..=10).contains(&c));
            }
        }
    }

    #[test]
    fn test_roundtrip_through_text_format() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let original = TaskAssignment::random(5, &mut rng);
        let text = original.to_string();
        let reloaded = TaskAssignment::from_reader(text.as_bytes()).unwrap();
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_loader_parses_explicit_matrix() {
        let input = "2\n4 7\n3 1\n";
        let inst = TaskAssignment::from_reader(input.as_bytes()).unwrap();
        assert_eq!(inst.num_tasks(), 2);
        assert_eq!(inst.cost(0, 0), 4);
        assert_eq!(inst.cost(0, 1), 7);
        assert_eq!(inst.cost(1, 0), 3);
        assert_eq!(inst.cost(1, 1), 1);
    }

    #[test]
    fn test_loader_rejects_truncated_input() {
        let input = "3\n1 2 3\n4 5\n";
        assert!(matches!(
            TaskAssignment::from_reader(input.as_bytes()),
            Err(InstanceLoadError::Truncated)
        ));
    }

    #[test]
    fn test_loader_rejects_garbage_and_zero() {
        assert!(matches!(
            TaskAssignment::from_reader("x".as_bytes()),
            Err(InstanceLoadError::Parse(_))
        ));
        assert!(matches!(
            TaskAssignment::from_reader("0".as_bytes()),
            Err(InstanceLoadError::EmptyInstance)
        ));
    }
}
