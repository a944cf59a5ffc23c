/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-server pheromone trail.
//!
//! A [`PheromoneTable`] holds one scalar per server.  Two operations mutate
//! it: a global multiplicative [`decay`](PheromoneTable::decay), clamped at
//! the caller's floor, and a targeted additive
//! [`deposit`](PheromoneTable::deposit).
//! There is no upper bound: a server that keeps receiving tasks keeps
//! accumulating pheromone across passes.

use serde::{Deserialize, Serialize};

use crate::scheduler::error::SchedulerError;

// ── Deposit rule ──────────────────────────────────────────────────────────────

/// How much pheromone a server receives after accepting a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositRule {
    /// `q / (new_load + 1)` where `new_load` already includes the task.
    #[default]
    InverseLoad,
    /// `q / task_size`.
    InverseTask,
}

impl DepositRule {
    /// Amount to deposit for a task of `task_size` that brought the server
    /// to `new_load`.
    pub fn amount(self, q: f64, new_load: f64, task_size: f64) -> f64 {
        match self {
            DepositRule::InverseLoad => q / (new_load + 1.0),
            DepositRule::InverseTask => q / task_size,
        }
    }
}

// ── PheromoneTable ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneTable {
    values: Vec<f64>,
}

impl PheromoneTable {
    /// `servers` entries, each set to `initial`.
    pub fn new(servers: usize, initial: f64) -> Self {
        Self {
            values: vec![initial; servers],
        }
    }

    /// `pheromone = max(pheromone * rate, floor)` for every server.
    ///
    /// `floor` is the scheduler's `min_pheromone`; the table keeps none.
    pub fn decay(&mut self, rate: f64, floor: f64) {
        for p in &mut self.values {
            *p = (*p * rate).max(floor);
        }
    }

    /// Adds `amount` to server `index` and returns the new value.
    ///
    /// # Errors
    /// [`SchedulerError::ServerOutOfRange`] if `index >= len()`; the table is
    /// left untouched.
    pub fn deposit(&mut self, index: usize, amount: f64) -> Result<f64, SchedulerError> {
        let server_count = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(SchedulerError::ServerOutOfRange {
                index,
                server_count,
            })?;
        *slot += amount;
        Ok(*slot)
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
