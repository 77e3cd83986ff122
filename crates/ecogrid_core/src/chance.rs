//! Random source for every stochastic decision in a tick.
//!
//! Rules never touch an RNG directly; they ask a [`Chance`] whether a roll
//! succeeds and which candidate to take. Production sessions use [`SimRng`];
//! tests inject [`Scripted`] to force individual rolls.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// The kind of roll being made, so scripted sources can force one action
/// without affecting the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Draw {
    /// Plant spreading into a neighbor.
    Spread,
    /// Eating one adjacent prey.
    Eat,
    /// Animal reproduction.
    Reproduce,
    /// Animal movement.
    Move,
}

pub trait Chance {
    /// True with the given probability.
    fn chance(&mut self, draw: Draw, probability: f64) -> bool;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Restarts the stream from `seed`. Sources without a stream ignore it.
    fn reseed(&mut self, _seed: u64) {}
}

impl<C: Chance + ?Sized> Chance for &mut C {
    fn chance(&mut self, draw: Draw, probability: f64) -> bool {
        (**self).chance(draw, probability)
    }

    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }

    fn reseed(&mut self, seed: u64) {
        (**self).reseed(seed)
    }
}

/// ChaCha8-backed random source.
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: ChaCha8Rng,
}

impl SimRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when a seed is given, entropy otherwise.
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl Chance for SimRng {
    fn chance(&mut self, _draw: Draw, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }
}

/// Fixed outcomes per [`Draw`], for tests and replays.
///
/// Draws without an explicit outcome return `default`. Picks come from the
/// queue (wrapped into range), then fall back to the first candidate.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    outcomes: HashMap<Draw, bool>,
    default: bool,
    picks: VecDeque<usize>,
    rolls: HashMap<Draw, usize>,
}

impl Scripted {
    /// Every roll returns `outcome`.
    #[must_use]
    pub fn always(outcome: bool) -> Self {
        Self {
            default: outcome,
            ..Self::default()
        }
    }

    /// Every roll fails.
    #[must_use]
    pub fn never() -> Self {
        Self::always(false)
    }

    /// Forces rolls of `draw` to return `outcome`.
    #[must_use]
    pub fn with(mut self, draw: Draw, outcome: bool) -> Self {
        self.outcomes.insert(draw, outcome);
        self
    }

    /// Queues candidate indices for upcoming picks.
    #[must_use]
    pub fn with_picks<I: IntoIterator<Item = usize>>(mut self, picks: I) -> Self {
        self.picks.extend(picks);
        self
    }

    /// How many times `draw` has been rolled.
    #[must_use]
    pub fn rolls(&self, draw: Draw) -> usize {
        self.rolls.get(&draw).copied().unwrap_or(0)
    }
}

impl Chance for Scripted {
    fn chance(&mut self, draw: Draw, _probability: f64) -> bool {
        *self.rolls.entry(draw).or_insert(0) += 1;
        self.outcomes.get(&draw).copied().unwrap_or(self.default)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().map_or(0, |p| p % len.max(1))
    }
}

/// A [`Chance`] shared between worker threads. Each draw takes the lock
/// briefly; callers must not hold it while acquiring cell locks.
pub struct SharedChance<'a, C> {
    inner: &'a Mutex<C>,
}

impl<'a, C> SharedChance<'a, C> {
    pub fn new(inner: &'a Mutex<C>) -> Self {
        Self { inner }
    }
}

impl<C: Chance> Chance for SharedChance<'_, C> {
    fn chance(&mut self, draw: Draw, probability: f64) -> bool {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.chance(draw, probability)
    }

    fn pick(&mut self, len: usize) -> usize {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.pick(len)
    }

    fn reseed(&mut self, seed: u64) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.reseed(seed);
    }
}
