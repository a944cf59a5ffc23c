//! Tunable parameters for the ACO scheduler and their YAML loader.
//!
//! Every constant the scheduling kernel uses lives in [`AcoParams`].  The
//! defaults reproduce the reference configuration; a YAML file may override
//! any subset of them:
//! ```yaml
//! scheduler:
//!   pheromone_decay: 0.8
//!   alpha: 1.0
//!   beta: 2.0
//!   q: 10
//!   min_pheromone: 0.1
//!   initial_pheromone: 1.0
//!   max_servers: 10
//!   load_term: max_one        # or plus_one
//!   deposit_rule: inverse_load  # or inverse_task
//!   record_steps: true
//! batch:
//!   min_tasks: 3
//!   max_tasks: 5
//!   min_task_size: 5
//!   max_task_size: 24
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::pheromone::DepositRule;
use crate::scheduler::error::{ConfigViolation, SchedulerError};
use crate::scheduler::probability::LoadTerm;

// ── Defaults ──────────────────────────────────────────────────────────────────

pub const PHEROMONE_DECAY: f64 = 0.8;
pub const ALPHA: f64 = 1.0;
pub const BETA: f64 = 2.0;
pub const Q: f64 = 10.0;
pub const MIN_PHEROMONE: f64 = 0.1;
pub const INITIAL_PHEROMONE: f64 = 1.0;
pub const MAX_SERVERS: usize = 10;
pub const MIN_TASKS_PER_BATCH: usize = 3;
pub const MAX_TASKS_PER_BATCH: usize = 5;
pub const MIN_TASK_SIZE: u32 = 5;
pub const MAX_TASK_SIZE: u32 = 24;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
///
/// Both sections are optional; a missing section keeps all its defaults.
#[derive(Debug, Default, Deserialize)]
struct ParamsFile {
    #[serde(default)]
    scheduler: SchedulerSection,
    #[serde(default)]
    batch: BatchSection,
}

#[derive(Debug, Default, Deserialize)]
struct SchedulerSection {
    pheromone_decay: Option<f64>,
    alpha: Option<f64>,
    beta: Option<f64>,
    q: Option<f64>,
    min_pheromone: Option<f64>,
    initial_pheromone: Option<f64>,
    max_servers: Option<usize>,
    load_term: Option<LoadTerm>,
    deposit_rule: Option<DepositRule>,
    record_steps: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct BatchSection {
    min_tasks: Option<usize>,
    max_tasks: Option<usize>,
    min_task_size: Option<u32>,
    max_task_size: Option<u32>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// All tunables of the scheduling kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcoParams {
    /// Multiplicative pheromone decay applied once per pass, in `(0, 1]`.
    /// `1.0` disables decay.
    pub pheromone_decay: f64,
    /// Exponent on the pheromone term.
    pub alpha: f64,
    /// Exponent on the inverse load term.
    pub beta: f64,
    /// Deposit numerator.
    pub q: f64,
    /// Floor applied by decay.  Must be strictly positive.
    pub min_pheromone: f64,
    /// Pheromone every server starts with after a resize or reset.
    pub initial_pheromone: f64,
    pub max_servers: usize,
    pub min_tasks_per_batch: usize,
    /// Also the cap on the length of any batch passed to `distribute()`.
    pub max_tasks_per_batch: usize,
    pub min_task_size: u32,
    pub max_task_size: u32,
    pub load_term: LoadTerm,
    pub deposit_rule: DepositRule,
    /// Record a [`DecisionStep`](crate::trace::DecisionStep) log on each pass.
    pub record_steps: bool,
}

impl Default for AcoParams {
    fn default() -> Self {
        Self {
            pheromone_decay: PHEROMONE_DECAY,
            alpha: ALPHA,
            beta: BETA,
            q: Q,
            min_pheromone: MIN_PHEROMONE,
            initial_pheromone: INITIAL_PHEROMONE,
            max_servers: MAX_SERVERS,
            min_tasks_per_batch: MIN_TASKS_PER_BATCH,
            max_tasks_per_batch: MAX_TASKS_PER_BATCH,
            min_task_size: MIN_TASK_SIZE,
            max_task_size: MAX_TASK_SIZE,
            load_term: LoadTerm::default(),
            deposit_rule: DepositRule::default(),
            record_steps: true,
        }
    }
}

impl AcoParams {
    /// Parses `path` and overlays every key it sets onto the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, if the YAML is
    /// structurally invalid, or if the resulting parameters fail
    /// [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading scheduler parameters from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open parameter file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid parameter file: {}", path.display()))
    }

    /// Same as [`load_from_file`](Self::load_from_file) for an in-memory
    /// YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ParamsFile =
            serde_yaml::from_str(content).context("Failed to parse YAML parameters")?;

        let d = Self::default();
        let s = file.scheduler;
        let b = file.batch;
        let params = Self {
            pheromone_decay: s.pheromone_decay.unwrap_or(d.pheromone_decay),
            alpha: s.alpha.unwrap_or(d.alpha),
            beta: s.beta.unwrap_or(d.beta),
            q: s.q.unwrap_or(d.q),
            min_pheromone: s.min_pheromone.unwrap_or(d.min_pheromone),
            initial_pheromone: s.initial_pheromone.unwrap_or(d.initial_pheromone),
            max_servers: s.max_servers.unwrap_or(d.max_servers),
            min_tasks_per_batch: b.min_tasks.unwrap_or(d.min_tasks_per_batch),
            max_tasks_per_batch: b.max_tasks.unwrap_or(d.max_tasks_per_batch),
            min_task_size: b.min_task_size.unwrap_or(d.min_task_size),
            max_task_size: b.max_task_size.unwrap_or(d.max_task_size),
            load_term: s.load_term.unwrap_or(d.load_term),
            deposit_rule: s.deposit_rule.unwrap_or(d.deposit_rule),
            record_steps: s.record_steps.unwrap_or(d.record_steps),
        };

        params.validate()?;

        debug!(
            decay = params.pheromone_decay,
            alpha = params.alpha,
            beta = params.beta,
            q = params.q,
            load_term = ?params.load_term,
            deposit_rule = ?params.deposit_rule,
            "parameters loaded"
        );

        Ok(params)
    }

    /// Checks every tunable against its admissible range.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidConfiguration`] naming the first offending
    /// value.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        fn out_of_range(name: &'static str, value: f64, expected: &'static str) -> SchedulerError {
            SchedulerError::config(ConfigViolation::ParameterOutOfRange {
                name,
                value,
                expected,
            })
        }

        let d = self.pheromone_decay;
        if !(d.is_finite() && d > 0.0 && d <= 1.0) {
            return Err(out_of_range("pheromone_decay", d, "(0, 1]"));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(out_of_range("alpha", self.alpha, "[0, inf)"));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(out_of_range("beta", self.beta, "[0, inf)"));
        }
        if !(self.q.is_finite() && self.q > 0.0) {
            return Err(out_of_range("q", self.q, "(0, inf)"));
        }
        if !(self.min_pheromone.is_finite() && self.min_pheromone > 0.0) {
            return Err(out_of_range("min_pheromone", self.min_pheromone, "(0, inf)"));
        }
        if !(self.initial_pheromone.is_finite() && self.initial_pheromone >= self.min_pheromone) {
            return Err(out_of_range(
                "initial_pheromone",
                self.initial_pheromone,
                "[min_pheromone, inf)",
            ));
        }
        if self.max_servers == 0 {
            return Err(out_of_range("max_servers", 0.0, "[1, inf)"));
        }
        self.check_batch_bounds()
    }

    /// Checks the bounds used by random batch generation.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidConfiguration`] when a task-count or
    /// task-size range is empty or starts at zero.
    pub fn check_batch_bounds(&self) -> Result<(), SchedulerError> {
        if self.min_tasks_per_batch == 0 || self.min_tasks_per_batch > self.max_tasks_per_batch {
            return Err(SchedulerError::config(ConfigViolation::TaskCountBounds {
                min: self.min_tasks_per_batch,
                max: self.max_tasks_per_batch,
            }));
        }
        if self.min_task_size == 0 || self.min_task_size > self.max_task_size {
            return Err(SchedulerError::config(ConfigViolation::ParameterOutOfRange {
                name: "min_task_size",
                value: f64::from(self.min_task_size),
                expected: "[1, max_task_size]",
            }));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
