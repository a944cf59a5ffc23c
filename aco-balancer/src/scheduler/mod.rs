//! Ant-colony batch scheduler.
//!
//! [`BatchScheduler`] places every task of a [`TaskBatch`] on one server of a
//! [`SimulationState`], sampling each placement from a distribution that
//! favours high pheromone and low load, then reinforces the chosen server.
//!
//! # Pass order
//! 1. Decay every pheromone once (clamped at `min_pheromone`).
//! 2. Sort tasks largest first (stable).
//! 3. Per task: compute the distribution on the current loads and
//!    pheromones, draw, select, add the task to the server's load, deposit
//!    pheromone on that server.
//! 4. Commit loads, pheromones, assignments and the decision log.
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | Randomness | Injected [`DrawSource`], one draw per task |
//! | Failure atomicity | Validate first, work on copies, commit once at the end |
//! | Formula variants | [`LoadTerm`] and [`DepositRule`](crate::pheromone::DepositRule) picked from [`AcoParams`] |
//! | Thread safety | `Send + Sync`, holds only immutable parameters |
//!
//! # Example
//! ```rust
//! use aco_balancer::config::AcoParams;
//! use aco_balancer::scheduler::{BatchScheduler, FixedDraws};
//! use aco_balancer::state::SimulationState;
//! use aco_balancer::task::TaskBatch;
//!
//! let params = AcoParams::default();
//! let scheduler = BatchScheduler::new(params.clone());
//! let mut state = SimulationState::with_servers(2, &params).unwrap();
//!
//! let pass = scheduler
//!     .distribute(&mut state, &TaskBatch::new(vec![10.0]), &mut FixedDraws::new(vec![0.3]))
//!     .unwrap();
//! assert_eq!(pass.assignments[0].server, 0);
//! assert_eq!(state.loads(), vec![10.0, 0.0]);
//! ```

pub mod draw;
pub mod error;
pub mod probability;
pub mod selector;

pub use draw::{DrawSource, FixedDraws, SeededDraws};
pub use error::{BatchViolation, ConfigViolation, SchedulerError};
pub use probability::{LoadTerm, ProbabilityBreakdown, ProbabilityModel};
pub use selector::{select, Selection};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::AcoParams;
use crate::state::SimulationState;
use crate::task::{Assignment, TaskBatch};
use crate::trace::DecisionStep;

// ── Pass result ───────────────────────────────────────────────────────────────

/// Everything one [`BatchScheduler::distribute`] call produced.
///
/// The same data is committed to the [`SimulationState`]; this is a copy for
/// callers that want it without going back through the accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub loads: Vec<f64>,
    pub pheromones: Vec<f64>,
    /// In processing order (largest task first).
    pub assignments: Vec<Assignment>,
    /// Empty when step recording is disabled.
    pub steps: Vec<DecisionStep>,
}

// ── BatchScheduler ────────────────────────────────────────────────────────────

/// Stateless orchestrator of one distribution pass.
///
/// All per-pass state lives inside [`distribute`](Self::distribute); the
/// persistent state lives in the [`SimulationState`] passed to it.
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    params: AcoParams,
    model: ProbabilityModel,
}

impl BatchScheduler {
    /// Create a scheduler for the given tunables.
    ///
    /// `params` are assumed valid; call [`AcoParams::validate`] first when
    /// they come from an untrusted source.
    pub fn new(params: AcoParams) -> Self {
        let model = ProbabilityModel::new(params.alpha, params.beta, params.load_term);
        Self { params, model }
    }

    pub fn params(&self) -> &AcoParams {
        &self.params
    }

    pub fn model(&self) -> &ProbabilityModel {
        &self.model
    }

    // ── Public entry point ────────────────────────────────────────────────────

    /// Distribute `batch` over the servers of `state`, consuming one draw per
    /// task from `draws`.
    ///
    /// On success the state's loads, pheromones, assignments and step log are
    /// replaced by the outcome of this pass.  Decay rate and pheromone floor
    /// come from this scheduler's parameters, whatever `state` was built with.
    ///
    /// # Errors
    /// Checked in this order, before anything is mutated or drawn:
    /// * [`SchedulerError::InvalidState`]: the state has zero servers.
    /// * [`SchedulerError::InvalidConfiguration`]: the state has more than
    ///   `max_servers` servers.
    /// * [`SchedulerError::InvalidBatch`]: empty batch, or a size that is
    ///   not a finite positive number.
    /// * [`SchedulerError::InvalidConfiguration`]: the batch is longer than
    ///   `max_tasks_per_batch`.
    pub fn distribute<D: DrawSource + ?Sized>(
        &self,
        state: &mut SimulationState,
        batch: &TaskBatch,
        draws: &mut D,
    ) -> Result<Distribution, SchedulerError> {
        // ── Preconditions ─────────────────────────────────────────────────────
        let servers = state.server_count();
        if servers == 0 {
            return Err(SchedulerError::InvalidState);
        }
        if servers > self.params.max_servers {
            return Err(SchedulerError::config(
                ConfigViolation::ServerCountOutOfRange {
                    requested: servers,
                    max: self.params.max_servers,
                },
            ));
        }
        batch.check().map_err(SchedulerError::batch)?;
        if batch.len() > self.params.max_tasks_per_batch {
            return Err(SchedulerError::config(ConfigViolation::BatchTooLarge {
                len: batch.len(),
                max: self.params.max_tasks_per_batch,
            }));
        }

        info!(
            servers = servers,
            tasks = batch.len(),
            total = batch.total(),
            "=== BatchScheduler::distribute() ==="
        );

        // ── Per-pass working copies ───────────────────────────────────────────
        let mut pheromones = state.pheromone_table().clone();
        let mut loads = state.load_slice().to_vec();
        let mut assignments = Vec::with_capacity(batch.len());
        let mut trace = StepRecorder::new(self.params.record_steps);

        // 1. Decay
        pheromones.decay(self.params.pheromone_decay, self.params.min_pheromone);
        trace.record(|| DecisionStep::Initial {
            pheromones: pheromones.to_vec(),
            loads: loads.clone(),
        });

        // 2. Largest task first
        let order = batch.processing_order();

        // 3. Place each task
        for (task_index, &task) in order.iter().enumerate() {
            let breakdown = self.model.breakdown(pheromones.as_slice(), &loads);
            debug!(
                task = task,
                task_index = task_index,
                probabilities = ?breakdown.probabilities,
                "distribution computed"
            );

            let draw = draws.next_draw();
            let selection = select(&breakdown.probabilities, draw)
                .ok_or(SchedulerError::InvalidState)?;
            let server = selection.index;

            trace.record(|| DecisionStep::Probability {
                task,
                task_index,
                pheromones: pheromones.to_vec(),
                loads: loads.clone(),
                breakdown: breakdown.clone(),
            });
            trace.record(|| DecisionStep::Selection {
                task,
                task_index,
                draw,
                cumulative: selection.cumulative,
                selected_server: server,
                probabilities: breakdown.probabilities.clone(),
            });

            loads[server] += task;

            let old_pheromone = pheromones.get(server).unwrap_or(0.0);
            let contribution = self.deposit_amount(loads[server], task);
            let new_pheromone = pheromones.deposit(server, contribution)?;

            debug!(
                task = task,
                server = server,
                draw = draw,
                cumulative = selection.cumulative,
                new_load = loads[server],
                old_pheromone = old_pheromone,
                new_pheromone = new_pheromone,
                "✓ placed"
            );

            trace.record(|| DecisionStep::Update {
                task,
                task_index,
                selected_server: server,
                old_pheromone,
                contribution,
                new_pheromone,
                pheromones: pheromones.to_vec(),
                loads: loads.clone(),
            });

            assignments.push(Assignment::new(server, task));
        }

        // 4. Final snapshot + commit
        trace.record(|| DecisionStep::Final {
            pheromones: pheromones.to_vec(),
            loads: loads.clone(),
            assignments: assignments.clone(),
        });

        let steps = trace.finish();
        let result = Distribution {
            loads: loads.clone(),
            pheromones: pheromones.to_vec(),
            assignments: assignments.clone(),
            steps: steps.clone(),
        };
        state.commit(pheromones, loads, assignments, steps);

        info!(
            placed = result.assignments.len(),
            max_load = result.loads.iter().copied().fold(0.0, f64::max),
            steps = result.steps.len(),
            "=== Distribution complete ==="
        );

        Ok(result)
    }

    fn deposit_amount(&self, new_load: f64, task: f64) -> f64 {
        self.params
            .deposit_rule
            .amount(self.params.q, new_load, task)
    }
}

// ── Step recording ────────────────────────────────────────────────────────────

/// Collects steps when enabled; otherwise never builds them.
struct StepRecorder {
    steps: Option<Vec<DecisionStep>>,
}

impl StepRecorder {
    fn new(enabled: bool) -> Self {
        Self {
            steps: enabled.then(Vec::new),
        }
    }

    fn record(&mut self, step: impl FnOnce() -> DecisionStep) {
        if let Some(steps) = &mut self.steps {
            steps.push(step());
        }
    }

    fn finish(self) -> Vec<DecisionStep> {
        self.steps.unwrap_or_default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
