/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task batches and assignment records.
//!
//! ```text
//! caller ──(sizes)──►  TaskBatch  ──(BatchScheduler)──►  Vec<Assignment>
//!                       ↑ input order                      ↑ processing order
//!                                                            (largest first)
//! ```
//!
//! A task has no identity beyond its size and its position in the batch.
//! The batch is borrowed by the scheduler for one pass and never mutated;
//! validation (empty batch, non-positive or non-finite sizes) happens in
//! [`BatchScheduler::distribute`](crate::scheduler::BatchScheduler::distribute).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::AcoParams;
use crate::scheduler::error::{BatchViolation, SchedulerError};

// ── TaskBatch ─────────────────────────────────────────────────────────────────

/// Ordered task sizes for one scheduling pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskBatch {
    sizes: Vec<f64>,
}

impl TaskBatch {
    pub fn new(sizes: impl Into<Vec<f64>>) -> Self {
        Self {
            sizes: sizes.into(),
        }
    }

    /// Random batch within the bounds of `params`.
    ///
    /// The task count is uniform in
    /// `[min_tasks_per_batch, max_tasks_per_batch]` and every size is a
    /// uniform integer in `[min_task_size, max_task_size]`.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidConfiguration`] if either range is empty or
    /// starts at zero; nothing is drawn from `rng`.
    pub fn generate<R: Rng + ?Sized>(
        params: &AcoParams,
        rng: &mut R,
    ) -> Result<Self, SchedulerError> {
        params.check_batch_bounds()?;
        let count = rng.gen_range(params.min_tasks_per_batch..=params.max_tasks_per_batch);
        let sizes = (0..count)
            .map(|_| f64::from(rng.gen_range(params.min_task_size..=params.max_task_size)))
            .collect();
        Ok(Self { sizes })
    }

    /// Sizes in input order.
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.sizes.iter().sum()
    }

    /// First structural problem with the batch, if any.
    pub fn check(&self) -> Result<(), BatchViolation> {
        if self.sizes.is_empty() {
            return Err(BatchViolation::Empty);
        }
        for (index, &size) in self.sizes.iter().enumerate() {
            if !size.is_finite() {
                return Err(BatchViolation::NonFiniteSize { index });
            }
            if size <= 0.0 {
                return Err(BatchViolation::NonPositiveSize { index, size });
            }
        }
        Ok(())
    }

    /// Sizes sorted largest first.  The sort is stable so equal sizes keep
    /// their input order.
    pub fn processing_order(&self) -> Vec<f64> {
        let mut sorted = self.sizes.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted
    }
}

impl From<Vec<f64>> for TaskBatch {
    fn from(sizes: Vec<f64>) -> Self {
        Self::new(sizes)
    }
}

// ── Assignment ────────────────────────────────────────────────────────────────

/// One task placed on one server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Zero-based server index.
    pub server: usize,
    /// Size of the task that was placed.
    pub task: f64,
}

impl Assignment {
    pub fn new(server: usize, task: f64) -> Self {
        Self { server, task }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::draw::{DrawSource, SeededDraws};

    #[test]
    fn processing_order_is_largest_first() {
        let batch = TaskBatch::new(vec![5.0, 20.0, 9.0]);
        assert_eq!(batch.processing_order(), vec![20.0, 9.0, 5.0]);
        // input order untouched
        assert_eq!(batch.sizes(), &[5.0, 20.0, 9.0]);
    }

    #[test]
    fn processing_order_is_independent_of_input_order() {
        let a = TaskBatch::new(vec![9.0, 5.0, 20.0]).processing_order();
        let b = TaskBatch::new(vec![20.0, 9.0, 5.0]).processing_order();
        assert_eq!(a, b);
    }

    #[test]
    fn check_accepts_positive_sizes() {
        assert!(TaskBatch::new(vec![0.5, 12.0]).check().is_ok());
    }

    #[test]
    fn check_rejects_empty() {
        assert_eq!(TaskBatch::default().check(), Err(BatchViolation::Empty));
    }

    #[test]
    fn check_reports_first_bad_index() {
        let b = TaskBatch::new(vec![3.0, 0.0, -1.0]);
        assert_eq!(
            b.check(),
            Err(BatchViolation::NonPositiveSize {
                index: 1,
                size: 0.0
            })
        );
        let b = TaskBatch::new(vec![3.0, f64::INFINITY]);
        assert_eq!(b.check(), Err(BatchViolation::NonFiniteSize { index: 1 }));
        let b = TaskBatch::new(vec![f64::NAN]);
        assert_eq!(b.check(), Err(BatchViolation::NonFiniteSize { index: 0 }));
    }

    #[test]
    fn generated_batches_respect_bounds() {
        let params = AcoParams::default();
        let mut rng = SeededDraws::new(99);
        for _ in 0..200 {
            let batch = TaskBatch::generate(&params, &mut rng).unwrap();
            assert!((3..=5).contains(&batch.len()), "len = {}", batch.len());
            for &s in batch.sizes() {
                assert!((5.0..=24.0).contains(&s), "size = {s}");
                assert_eq!(s.fract(), 0.0, "sizes are whole numbers");
            }
        }
    }

    #[test]
    fn generation_is_reproducible_from_seed() {
        let params = AcoParams::default();
        let a = TaskBatch::generate(&params, &mut SeededDraws::new(5)).unwrap();
        let b = TaskBatch::generate(&params, &mut SeededDraws::new(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn generation_with_inverted_bounds_is_a_config_error() {
        let inverted_count = AcoParams {
            min_tasks_per_batch: 6,
            ..AcoParams::default()
        };
        let inverted_size = AcoParams {
            min_task_size: 30,
            ..AcoParams::default()
        };
        for params in [inverted_count, inverted_size] {
            let mut rng = SeededDraws::new(1);
            let untouched = rng.clone();
            let err = TaskBatch::generate(&params, &mut rng).unwrap_err();
            assert!(
                matches!(err, SchedulerError::InvalidConfiguration { .. }),
                "got {err:?}"
            );
            assert_eq!(
                rng.next_draw(),
                untouched.clone().next_draw(),
                "rng must not advance"
            );
        }
    }
}
