/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Injected source of uniform draws for roulette selection.
//!
//! [`BatchScheduler::distribute`](super::BatchScheduler::distribute) never
//! touches a global RNG.  It pulls one value per task from a [`DrawSource`],
//! which makes a pass fully reproducible:
//!
//! * [`SeededDraws`]: ChaCha8 stream from a `u64` seed.  Also implements
//!   [`RngCore`] so the same stream can generate task batches.
//! * [`FixedDraws`]: a literal list of draws, cycled when exhausted.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Yields values in `[0, 1)`.
pub trait DrawSource {
    fn next_draw(&mut self) -> f64;
}

// ── SeededDraws ───────────────────────────────────────────────────────────────

/// Deterministic draws backed by a seeded ChaCha8 RNG.
#[derive(Debug, Clone)]
pub struct SeededDraws {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededDraws {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DrawSource for SeededDraws {
    fn next_draw(&mut self) -> f64 {
        // `gen::<f64>()` is uniform over [0, 1)
        self.rng.gen::<f64>()
    }
}

impl RngCore for SeededDraws {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

// ── FixedDraws ────────────────────────────────────────────────────────────────

/// Replays a fixed list of draws in order, wrapping around at the end.
///
/// An empty list yields `0.0` forever, which always picks the first server
/// with non-zero probability.
#[derive(Debug, Clone, Default)]
pub struct FixedDraws {
    draws: Vec<f64>,
    next: usize,
}

impl FixedDraws {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            next: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl DrawSource for FixedDraws {
    fn next_draw(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let v = self.draws[self.next % self.draws.len()];
        self.next += 1;
        v
    }
}

impl<D: DrawSource + ?Sized> DrawSource for &mut D {
    fn next_draw(&mut self) -> f64 {
        (**self).next_draw()
    }
}
