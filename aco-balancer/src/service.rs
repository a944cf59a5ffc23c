/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Shared, serialised access to one simulation.
//!
//! A distribution pass reads and writes the load and pheromone vectors many
//! times; another caller must never observe it half done.  [`SharedSimulation`]
//! puts the state and its draw stream behind one `tokio::sync::Mutex` and
//! holds the lock for the whole of every operation.  Cloning the handle
//! shares the same simulation.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::AcoParams;
use crate::scheduler::draw::SeededDraws;
use crate::scheduler::error::SchedulerError;
use crate::scheduler::{BatchScheduler, Distribution};
use crate::state::{SimulationState, StateSnapshot};
use crate::task::TaskBatch;
use crate::trace::DecisionStep;

/// Everything guarded by the lock.
struct Inner {
    state: SimulationState,
    /// One stream for both batch generation and roulette draws, so a seed
    /// reproduces the whole session.
    draws: SeededDraws,
}

#[derive(Clone)]
pub struct SharedSimulation {
    scheduler: Arc<BatchScheduler>,
    inner: Arc<Mutex<Inner>>,
}

impl SharedSimulation {
    /// Validates `params` and creates a simulation with `servers` servers.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidConfiguration`] for bad parameters or a
    /// server count outside `[1, max_servers]`.
    pub fn new(params: AcoParams, servers: usize, seed: u64) -> Result<Self, SchedulerError> {
        params.validate()?;
        let state = SimulationState::with_servers(servers, &params)?;

        info!(servers = servers, seed = seed, "shared simulation created");

        Ok(Self {
            scheduler: Arc::new(BatchScheduler::new(params)),
            inner: Arc::new(Mutex::new(Inner {
                state,
                draws: SeededDraws::new(seed),
            })),
        })
    }

    pub fn params(&self) -> &AcoParams {
        self.scheduler.params()
    }

    pub async fn resize(&self, servers: usize) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock().await;
        inner.state.resize(servers)
    }

    pub async fn reset(&self) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock().await;
        inner.state.reset()
    }

    /// Random batch drawn from the session's stream.
    pub async fn generate_batch(&self) -> Result<TaskBatch, SchedulerError> {
        let mut inner = self.inner.lock().await;
        let batch = TaskBatch::generate(self.scheduler.params(), &mut inner.draws)?;
        debug!(sizes = ?batch.sizes(), "batch generated");
        Ok(batch)
    }

    /// Runs one pass under the lock.
    pub async fn distribute(&self, batch: &TaskBatch) -> Result<Distribution, SchedulerError> {
        let mut guard = self.inner.lock().await;
        let Inner { state, draws } = &mut *guard;
        self.scheduler.distribute(state, batch, draws)
    }

    /// Generates a batch and distributes it without releasing the lock in
    /// between.
    pub async fn generate_and_distribute(
        &self,
    ) -> Result<(TaskBatch, Distribution), SchedulerError> {
        let mut guard = self.inner.lock().await;
        let Inner { state, draws } = &mut *guard;
        let batch = TaskBatch::generate(self.scheduler.params(), draws)?;
        let pass = self.scheduler.distribute(state, &batch, draws)?;
        Ok((batch, pass))
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        self.inner.lock().await.state.snapshot()
    }

    pub async fn steps(&self) -> Vec<DecisionStep> {
        self.inner.lock().await.state.steps()
    }

    /// Distribution the next task would currently be drawn from.
    pub async fn current_probabilities(&self) -> Vec<f64> {
        let inner = self.inner.lock().await;
        inner.state.current_probabilities(self.scheduler.model())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepKind;

    #[tokio::test]
    async fn rejects_invalid_construction() {
        let bad = AcoParams {
            q: -1.0,
            ..AcoParams::default()
        };
        assert!(SharedSimulation::new(bad, 3, 1).is_err());
        assert!(SharedSimulation::new(AcoParams::default(), 0, 1).is_err());
        assert!(SharedSimulation::new(AcoParams::default(), 11, 1).is_err());
    }

    #[tokio::test]
    async fn same_seed_same_session() {
        let a = SharedSimulation::new(AcoParams::default(), 4, 42).unwrap();
        let b = SharedSimulation::new(AcoParams::default(), 4, 42).unwrap();
        for _ in 0..5 {
            let (ba, pa) = a.generate_and_distribute().await.unwrap();
            let (bb, pb) = b.generate_and_distribute().await.unwrap();
            assert_eq!(ba, bb);
            assert_eq!(pa, pb);
        }
        assert_eq!(a.snapshot().await, b.snapshot().await);
    }

    #[tokio::test]
    async fn concurrent_passes_are_serialised() {
        let sim = SharedSimulation::new(AcoParams::default(), 5, 7).unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let sim = sim.clone();
            handles.push(tokio::spawn(async move {
                let batch = TaskBatch::new(vec![5.0 + i as f64, 6.0, 7.0]);
                sim.distribute(&batch).await.unwrap();
                batch.total()
            }));
        }

        let mut expected_total = 0.0;
        for h in handles {
            expected_total += h.await.unwrap();
        }

        let snap = sim.snapshot().await;
        let total: f64 = snap.loads.iter().sum();
        assert!((total - expected_total).abs() < 1e-9);
        assert_eq!(snap.assignments.len(), 3, "only the last pass is kept");

        // The stored log belongs to exactly one pass and matches the state.
        let steps = sim.steps().await;
        match steps.last() {
            Some(DecisionStep::Final {
                loads, pheromones, ..
            }) => {
                assert_eq!(loads, &snap.loads);
                assert_eq!(pheromones, &snap.pheromones);
            }
            other => panic!("expected final step, got {other:?}"),
        }
        assert_eq!(
            steps.iter().filter(|s| s.kind() == StepKind::Initial).count(),
            1
        );
    }

    #[tokio::test]
    async fn resize_and_reset_through_handle() {
        let sim = SharedSimulation::new(AcoParams::default(), 3, 1).unwrap();
        sim.generate_and_distribute().await.unwrap();

        sim.resize(6).await.unwrap();
        let snap = sim.snapshot().await;
        assert_eq!(snap.server_count, 6);
        assert_eq!(snap.loads, vec![0.0; 6]);
        assert_eq!(snap.step_count, 0);

        sim.generate_and_distribute().await.unwrap();
        sim.reset().await.unwrap();
        assert_eq!(sim.snapshot().await.pheromones, vec![1.0; 6]);
    }

    #[tokio::test]
    async fn current_probabilities_cover_all_servers() {
        let sim = SharedSimulation::new(AcoParams::default(), 4, 3).unwrap();
        let p = sim.current_probabilities().await;
        assert_eq!(p, vec![0.25; 4]);
    }

    #[tokio::test]
    async fn generate_batch_draws_from_the_session_stream() {
        let a = SharedSimulation::new(AcoParams::default(), 3, 21).unwrap();
        let b = SharedSimulation::new(AcoParams::default(), 3, 21).unwrap();

        let first = a.generate_batch().await.unwrap();
        assert_eq!(first, b.generate_batch().await.unwrap());
        assert!((3..=5).contains(&first.len()));

        // Both handles advanced the same stream, so later output still agrees.
        let (ba, pa) = a.generate_and_distribute().await.unwrap();
        let (bb, pb) = b.generate_and_distribute().await.unwrap();
        assert_eq!(ba, bb);
        assert_eq!(pa, pb);

        // A fresh session with the same seed generates the same first batch
        // whichever entry point it goes through.
        let c = SharedSimulation::new(AcoParams::default(), 3, 21).unwrap();
        let (bc, _) = c.generate_and_distribute().await.unwrap();
        assert_eq!(bc, first);
    }
}
