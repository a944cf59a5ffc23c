/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the ACO batch scheduler.
//!
//! Two reason enums carry the low-level detail, one top-level enum is what
//! every public operation returns:
//!
//! * [`ConfigViolation`]: which tunable or bound was out of range, with the
//!   offending value.
//! * [`BatchViolation`]: why a task batch cannot be distributed.
//! * [`SchedulerError`]: top-level failure returned from
//!   [`BatchScheduler::distribute()`](super::BatchScheduler::distribute),
//!   [`SimulationState::resize()`](crate::state::SimulationState::resize) and
//!   [`AcoParams::validate()`](crate::config::AcoParams::validate).
//!
//! All variants are detected before any state is touched: a call that
//! returns `Err` leaves loads, pheromones, assignments and steps exactly as
//! they were.
//!
//! **Do not** replace these with `anyhow::Error` in library paths; callers
//! match on the variants to build user-facing messages.

use thiserror::Error;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Detailed reason why a configuration value or bound was rejected.
///
/// Carried inside [`SchedulerError::InvalidConfiguration`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigViolation {
    /// Requested server count is outside `[1, max]`.
    ServerCountOutOfRange { requested: usize, max: usize },

    /// A batch holds more tasks than the configured per-batch cap.
    BatchTooLarge { len: usize, max: usize },

    /// A numeric tunable is outside its admissible range.
    ///
    /// `expected` is a short human description of the range, e.g. `"(0, 1]"`.
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// The task-count bounds used for batch generation are inconsistent.
    TaskCountBounds { min: usize, max: usize },
}

impl std::fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigViolation::ServerCountOutOfRange { requested, max } => write!(
                f,
                "server count {} is outside the allowed range [1, {}]",
                requested, max
            ),

            ConfigViolation::BatchTooLarge { len, max } => write!(
                f,
                "batch holds {} tasks but at most {} are allowed per pass",
                len, max
            ),

            ConfigViolation::ParameterOutOfRange {
                name,
                value,
                expected,
            } => write!(f, "{} = {} is outside {}", name, value, expected),

            ConfigViolation::TaskCountBounds { min, max } => write!(
                f,
                "tasks per batch must satisfy 1 <= min <= max, got min={} max={}",
                min, max
            ),
        }
    }
}

// ── Batch ─────────────────────────────────────────────────────────────────────

/// Detailed reason why a [`TaskBatch`](crate::task::TaskBatch) was rejected.
///
/// `index` is the position in the batch as supplied by the caller, not the
/// processing order.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchViolation {
    /// The batch contains no tasks.
    Empty,

    /// A task size is zero or negative.
    NonPositiveSize { index: usize, size: f64 },

    /// A task size is NaN or infinite.
    NonFiniteSize { index: usize },
}

impl std::fmt::Display for BatchViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchViolation::Empty => write!(f, "batch is empty"),

            BatchViolation::NonPositiveSize { index, size } => write!(
                f,
                "task #{} has size {} but sizes must be > 0",
                index, size
            ),

            BatchViolation::NonFiniteSize { index } => {
                write!(f, "task #{} has a non-finite size", index)
            }
        }
    }
}

// ── Top-level scheduler errors ────────────────────────────────────────────────

/// Top-level error type for the scheduling kernel.
///
/// | Variant | Typical cause |
/// |---|---|
/// | `InvalidConfiguration` | bad tunables, server count or batch cap |
/// | `InvalidBatch` | empty batch or malformed task size |
/// | `InvalidState` | `distribute()` on a state that was never sized |
/// | `ServerOutOfRange` | pheromone deposit on a non-existent server |
///
/// None of these are transient; every variant is a caller error.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A configuration value or bound was violated.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: ConfigViolation },

    /// The task batch is empty or malformed.
    #[error("invalid batch: {reason}")]
    InvalidBatch { reason: BatchViolation },

    /// The simulation has zero servers.
    #[error("simulation state has no servers; resize before distributing")]
    InvalidState,

    /// A server index outside `0..server_count` was addressed.
    #[error("server index {index} is out of range (server count {server_count})")]
    ServerOutOfRange { index: usize, server_count: usize },
}

impl SchedulerError {
    pub(crate) fn config(reason: ConfigViolation) -> Self {
        SchedulerError::InvalidConfiguration { reason }
    }

    pub(crate) fn batch(reason: BatchViolation) -> Self {
        SchedulerError::InvalidBatch { reason }
    }
}
