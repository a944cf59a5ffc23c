/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Lifecycle owner of the simulated server pool.
//!
//! [`SimulationState`] is the only holder of loads, pheromones, the last
//! pass's assignments and its decision log.  The scheduler mutates it
//! through `pub(crate)` hooks; everyone else gets copies.
//!
//! # Ownership model
//! One `SimulationState` has exactly one owner.  Services that share an
//! instance between callers wrap it in
//! [`SharedSimulation`](crate::service::SharedSimulation), which serialises
//! every mutating call.

use serde::Serialize;
use tracing::info;

use crate::config::AcoParams;
use crate::pheromone::PheromoneTable;
use crate::scheduler::error::{ConfigViolation, SchedulerError};
use crate::scheduler::probability::ProbabilityModel;
use crate::task::Assignment;
use crate::trace::DecisionStep;

/// Serialisable copy of the whole observable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub server_count: usize,
    pub loads: Vec<f64>,
    pub pheromones: Vec<f64>,
    pub assignments: Vec<Assignment>,
    pub step_count: usize,
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    initial_pheromone: f64,
    max_servers: usize,

    pheromones: PheromoneTable,
    loads: Vec<f64>,
    /// Assignments of the most recent pass, in processing order.
    assignments: Vec<Assignment>,
    /// Decision log of the most recent pass.
    steps: Vec<DecisionStep>,
}

impl SimulationState {
    /// Unsized state: zero servers until [`resize`](Self::resize) is called.
    pub fn new(params: &AcoParams) -> Self {
        Self {
            initial_pheromone: params.initial_pheromone,
            max_servers: params.max_servers,
            pheromones: PheromoneTable::new(0, params.initial_pheromone),
            loads: Vec::new(),
            assignments: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// State sized to `servers`.
    ///
    /// # Errors
    /// Same as [`resize`](Self::resize).
    pub fn with_servers(servers: usize, params: &AcoParams) -> Result<Self, SchedulerError> {
        let mut state = Self::new(params);
        state.resize(servers)?;
        Ok(state)
    }

    /// Sets the server count and reinitialises everything.
    ///
    /// Every pheromone returns to the initial value, every load to zero, and
    /// the assignment and step logs are cleared.  Nothing from the previous
    /// size survives, including at indices that exist in both sizes.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidConfiguration`] if `servers` is outside
    /// `[1, max_servers]`; the state is left unchanged.
    pub fn resize(&mut self, servers: usize) -> Result<(), SchedulerError> {
        if servers == 0 || servers > self.max_servers {
            return Err(SchedulerError::config(
                ConfigViolation::ServerCountOutOfRange {
                    requested: servers,
                    max: self.max_servers,
                },
            ));
        }

        let previous = self.server_count();
        self.pheromones = PheromoneTable::new(servers, self.initial_pheromone);
        self.loads = vec![0.0; servers];
        self.assignments.clear();
        self.steps.clear();

        info!(from = previous, to = servers, "simulation resized");
        Ok(())
    }

    /// `resize(server_count())`.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidState`] on an unsized state.
    pub fn reset(&mut self) -> Result<(), SchedulerError> {
        let n = self.server_count();
        if n == 0 {
            return Err(SchedulerError::InvalidState);
        }
        self.resize(n)
    }

    // ── Read accessors (copies) ───────────────────────────────────────────────

    pub fn server_count(&self) -> usize {
        self.loads.len()
    }

    pub fn loads(&self) -> Vec<f64> {
        self.loads.clone()
    }

    pub fn pheromones(&self) -> Vec<f64> {
        self.pheromones.to_vec()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.assignments.clone()
    }

    pub fn steps(&self) -> Vec<DecisionStep> {
        self.steps.clone()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Highest load across servers, `0.0` when unsized.
    pub fn max_load(&self) -> f64 {
        self.loads.iter().copied().fold(0.0, f64::max)
    }

    /// Distribution the next task would be drawn from, without decay.
    pub fn current_probabilities(&self, model: &ProbabilityModel) -> Vec<f64> {
        model.compute(self.pheromones.as_slice(), &self.loads)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            server_count: self.server_count(),
            loads: self.loads(),
            pheromones: self.pheromones(),
            assignments: self.assignments(),
            step_count: self.step_count(),
        }
    }

    // ── Scheduler hooks ───────────────────────────────────────────────────────

    pub(crate) fn pheromone_table(&self) -> &PheromoneTable {
        &self.pheromones
    }

    pub(crate) fn load_slice(&self) -> &[f64] {
        &self.loads
    }

    /// Replaces the mutable part of the state with the result of one pass.
    pub(crate) fn commit(
        &mut self,
        pheromones: PheromoneTable,
        loads: Vec<f64>,
        assignments: Vec<Assignment>,
        steps: Vec<DecisionStep>,
    ) {
        debug_assert_eq!(pheromones.len(), self.server_count());
        debug_assert_eq!(loads.len(), self.server_count());
        self.pheromones = pheromones;
        self.loads = loads;
        self.assignments = assignments;
        self.steps = steps;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
