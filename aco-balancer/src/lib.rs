/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Ant-colony load-balancing scheduler.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/         – tunable parameters, YAML loading, validation
//! ├── task            – task batches, assignments, random batch generation
//! ├── pheromone       – per-server pheromone table and deposit rules
//! ├── scheduler/      – probability model, roulette selector, batch pass
//! ├── trace/          – decision-step log and replay cursor
//! ├── state           – simulation lifecycle (resize / reset / snapshots)
//! └── service         – lock-serialised shared simulation for async callers
//! ```

pub mod config;
pub mod pheromone;
pub mod scheduler;
pub mod service;
pub mod state;
pub mod task;
pub mod trace;
