/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Decision log of one distribution pass.
//!
//! A pass emits, in order:
//!
//! ```text
//! Initial ─┬─ Probability ─ Selection ─ Update ─┬─ Final
//!          └──────────── once per task ─────────┘
//! ```
//!
//! Each step is an immutable record of what the scheduler computed at that
//! point, with enough data to re-derive the decision by hand: the full
//! probability breakdown, the draw that was consumed, and the pheromone
//! deposit.  The log for a pass replaces the previous pass's log.
//!
//! [`StepCursor`] walks a log one step at a time for step-by-step display.

pub mod cursor;

pub use cursor::{StepCursor, StepView};

use serde::Serialize;

use crate::scheduler::probability::ProbabilityBreakdown;
use crate::task::Assignment;

/// Discriminant of a [`DecisionStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Initial,
    Probability,
    Selection,
    Update,
    Final,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepKind::Initial => "initial",
            StepKind::Probability => "probability",
            StepKind::Selection => "selection",
            StepKind::Update => "update",
            StepKind::Final => "final",
        };
        f.pad(s)
    }
}

/// One recorded unit of scheduler work.
///
/// `task_index` is the position in processing order (largest task first),
/// not in the caller's batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionStep {
    /// State after decay, before any task is placed.
    Initial {
        pheromones: Vec<f64>,
        loads: Vec<f64>,
    },

    /// Distribution computed for one task.
    Probability {
        task: f64,
        task_index: usize,
        pheromones: Vec<f64>,
        loads: Vec<f64>,
        breakdown: ProbabilityBreakdown,
    },

    /// Roulette outcome for one task.
    Selection {
        task: f64,
        task_index: usize,
        draw: f64,
        /// Cumulative probability at the point the spin stopped.
        cumulative: f64,
        selected_server: usize,
        probabilities: Vec<f64>,
    },

    /// Load and pheromone after placing one task.
    Update {
        task: f64,
        task_index: usize,
        selected_server: usize,
        old_pheromone: f64,
        contribution: f64,
        new_pheromone: f64,
        pheromones: Vec<f64>,
        loads: Vec<f64>,
    },

    /// Terminal snapshot of the pass.
    Final {
        pheromones: Vec<f64>,
        loads: Vec<f64>,
        assignments: Vec<Assignment>,
    },
}

impl DecisionStep {
    pub fn kind(&self) -> StepKind {
        match self {
            DecisionStep::Initial { .. } => StepKind::Initial,
            DecisionStep::Probability { .. } => StepKind::Probability,
            DecisionStep::Selection { .. } => StepKind::Selection,
            DecisionStep::Update { .. } => StepKind::Update,
            DecisionStep::Final { .. } => StepKind::Final,
        }
    }

    /// Processing-order index of the task this step concerns.
    pub fn task_index(&self) -> Option<usize> {
        match self {
            DecisionStep::Probability { task_index, .. }
            | DecisionStep::Selection { task_index, .. }
            | DecisionStep::Update { task_index, .. } => Some(*task_index),
            DecisionStep::Initial { .. } | DecisionStep::Final { .. } => None,
        }
    }

    pub fn selected_server(&self) -> Option<usize> {
        match self {
            DecisionStep::Selection {
                selected_server, ..
            }
            | DecisionStep::Update {
                selected_server, ..
            } => Some(*selected_server),
            _ => None,
        }
    }

    /// `(pheromones, loads)` captured by this step, if it carries them.
    ///
    /// `Selection` steps carry none; the state at that point is the one from
    /// the preceding `Probability` step.
    pub fn snapshot(&self) -> Option<(&[f64], &[f64])> {
        match self {
            DecisionStep::Initial { pheromones, loads }
            | DecisionStep::Probability {
                pheromones, loads, ..
            }
            | DecisionStep::Update {
                pheromones, loads, ..
            }
            | DecisionStep::Final {
                pheromones, loads, ..
            } => Some((pheromones.as_slice(), loads.as_slice())),
            DecisionStep::Selection { .. } => None,
        }
    }

    /// One-line description for display.  Servers are numbered from 1.
    pub fn message(&self) -> String {
        match self {
            DecisionStep::Initial { .. } => {
                "Initial state with pheromone decay applied".to_string()
            }
            DecisionStep::Probability { task, .. } => {
                format!("Calculating probabilities for task {}", task)
            }
            DecisionStep::Selection {
                task,
                selected_server,
                draw,
                cumulative,
                ..
            } => format!(
                "Selected server {} for task {} ({:.4} <= {:.4})",
                selected_server + 1,
                task,
                draw,
                cumulative
            ),
            DecisionStep::Update {
                selected_server,
                old_pheromone,
                contribution,
                new_pheromone,
                ..
            } => format!(
                "Updated pheromone for server {}: {:.4} + {:.4} = {:.4}",
                selected_server + 1,
                old_pheromone,
                contribution,
                new_pheromone
            ),
            DecisionStep::Final { .. } => "Final state after all tasks distributed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> DecisionStep {
        DecisionStep::Selection {
            task: 10.0,
            task_index: 0,
            draw: 0.3,
            cumulative: 0.5,
            selected_server: 0,
            probabilities: vec![0.5, 0.5],
        }
    }

    #[test]
    fn messages_use_one_based_servers() {
        assert_eq!(
            selection().message(),
            "Selected server 1 for task 10 (0.3000 <= 0.5000)"
        );
    }

    #[test]
    fn selection_has_no_snapshot_but_knows_server() {
        let s = selection();
        assert_eq!(s.kind(), StepKind::Selection);
        assert!(s.snapshot().is_none());
        assert_eq!(s.selected_server(), Some(0));
        assert_eq!(s.task_index(), Some(0));
    }

    #[test]
    fn initial_and_final_have_no_task() {
        let i = DecisionStep::Initial {
            pheromones: vec![0.8],
            loads: vec![0.0],
        };
        assert_eq!(i.task_index(), None);
        assert_eq!(i.selected_server(), None);
        assert_eq!(i.snapshot(), Some((&[0.8][..], &[0.0][..])));
    }

    #[test]
    fn steps_serialise_with_type_tag() {
        let yaml = serde_yaml::to_string(&selection()).unwrap();
        assert!(yaml.contains("type: selection"), "got:\n{yaml}");
        assert!(yaml.contains("selected_server: 0"), "got:\n{yaml}");
    }
}
