/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Selection distribution over servers for a single task.
//!
//! For every server `i`:
//!
//! ```text
//! raw_i = pheromone_i ^ alpha  ×  (1 / load_factor_i) ^ beta
//! p_i   = raw_i / Σ raw
//! ```
//!
//! `load_factor_i` is chosen by [`LoadTerm`].  High pheromone and low load
//! both raise a server's share.
//!
//! The model is pure: it never mutates its inputs, so the scheduler can call
//! it once for the decision and the trace can keep the full breakdown.

use serde::{Deserialize, Serialize};
use tracing::warn;

// ── Load term ─────────────────────────────────────────────────────────────────

/// How a server's load is turned into the denominator of the load term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadTerm {
    /// `load` when positive, otherwise a neutral `1`.
    #[default]
    MaxOne,
    /// `load + 1`.  Penalises early load less sharply than `MaxOne`.
    PlusOne,
}

impl LoadTerm {
    pub fn factor(self, load: f64) -> f64 {
        match self {
            LoadTerm::MaxOne => {
                if load > 0.0 {
                    load
                } else {
                    1.0
                }
            }
            LoadTerm::PlusOne => load + 1.0,
        }
    }
}

// ── Breakdown ─────────────────────────────────────────────────────────────────

/// Every intermediate value of one distribution computation.
///
/// All vectors have one entry per server.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProbabilityBreakdown {
    pub load_factors: Vec<f64>,
    /// `pheromone ^ alpha`.
    pub pheromone_powers: Vec<f64>,
    /// Unnormalised weights.
    pub raw_weights: Vec<f64>,
    pub probabilities: Vec<f64>,
    /// `true` when the raw weights summed to zero (or a non-finite value) and
    /// the uniform distribution was substituted.
    pub uniform_fallback: bool,
}

// ── ProbabilityModel ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityModel {
    pub alpha: f64,
    pub beta: f64,
    pub load_term: LoadTerm,
}

impl ProbabilityModel {
    pub fn new(alpha: f64, beta: f64, load_term: LoadTerm) -> Self {
        Self {
            alpha,
            beta,
            load_term,
        }
    }

    /// Normalised selection probabilities, one per server.
    pub fn compute(&self, pheromones: &[f64], loads: &[f64]) -> Vec<f64> {
        self.breakdown(pheromones, loads).probabilities
    }

    /// Same as [`compute`](Self::compute) but keeps the intermediate terms.
    ///
    /// `pheromones` and `loads` must have the same length; an empty input
    /// yields an empty breakdown.
    pub fn breakdown(&self, pheromones: &[f64], loads: &[f64]) -> ProbabilityBreakdown {
        debug_assert_eq!(
            pheromones.len(),
            loads.len(),
            "pheromone and load vectors must be the same length"
        );

        let n = pheromones.len().min(loads.len());
        let mut out = ProbabilityBreakdown {
            load_factors: Vec::with_capacity(n),
            pheromone_powers: Vec::with_capacity(n),
            raw_weights: Vec::with_capacity(n),
            probabilities: Vec::with_capacity(n),
            uniform_fallback: false,
        };

        for (&pheromone, &load) in pheromones.iter().zip(loads) {
            let load_factor = self.load_term.factor(load);
            let pheromone_power = pheromone.powf(self.alpha);
            let load_power = (1.0 / load_factor).powf(self.beta);

            out.load_factors.push(load_factor);
            out.pheromone_powers.push(pheromone_power);
            out.raw_weights.push(pheromone_power * load_power);
        }

        if n == 0 {
            return out;
        }

        let sum: f64 = out.raw_weights.iter().sum();
        if sum > 0.0 && sum.is_finite() {
            out.probabilities = out.raw_weights.iter().map(|w| w / sum).collect();
        } else {
            warn!(
                servers = n,
                raw_sum = sum,
                "degenerate weights, falling back to uniform distribution"
            );
            out.probabilities = vec![1.0 / n as f64; n];
            out.uniform_fallback = true;
        }

        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
