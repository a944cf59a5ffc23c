/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Roulette-wheel selection.
//!
//! The random draw is an argument, never generated here, so a test can pin
//! the exact server chosen for a given distribution.

use serde::Serialize;
use tracing::warn;

/// Outcome of one roulette spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub index: usize,
    /// Running sum of probabilities up to and including `index`.
    pub cumulative: f64,
}

/// Picks the first index whose cumulative probability reaches `draw`.
///
/// `draw` is expected in `[0, 1)`.  If rounding leaves the cumulative sum
/// below `draw` after the last entry, the last index is returned so a server
/// is always chosen.
///
/// Returns `None` only for an empty distribution.
pub fn select(probabilities: &[f64], draw: f64) -> Option<Selection> {
    let last = probabilities.len().checked_sub(1)?;

    let mut cumulative = 0.0;
    for (index, p) in probabilities.iter().enumerate() {
        cumulative += p;
        if cumulative >= draw {
            return Some(Selection { index, cumulative });
        }
    }

    warn!(
        draw = draw,
        cumulative = cumulative,
        "cumulative probability fell short of draw, choosing last server"
    );
    Some(Selection {
        index: last,
        cumulative,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
