//! Injectable randomness for opponent picks and outcome rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Highest value [`Dice::roll_percent`] may return.
pub const ROLL_MAX: u32 = 100;

pub trait Dice: Send + Sync {
    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn pick(&self, len: usize) -> usize;

    /// Uniform integer in `0..=ROLL_MAX`.
    fn roll_percent(&self) -> u32;
}

/// Production dice backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len.max(1))
    }

    fn roll_percent(&self) -> u32 {
        rand::rng().random_range(0..=ROLL_MAX)
    }
}

/// Reproducible dice for simulations and replays.
#[derive(Debug)]
pub struct SeededDice {
    rng: Mutex<StdRng>,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        SeededDice {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Dice for SeededDice {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.random_range(0..len.max(1))
    }

    fn roll_percent(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        rng.random_range(0..=ROLL_MAX)
    }
}

/// Dice that replay fixed sequences, so a test can force the exact branch.
///
/// Exhausted queues yield `0`. Picks are reduced modulo `len` and rolls are
/// capped at [`ROLL_MAX`] so scripted values always stay in range.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    picks: Mutex<VecDeque<usize>>,
    rolls: Mutex<VecDeque<u32>>,
}

impl ScriptedDice {
    pub fn new(picks: impl IntoIterator<Item = usize>, rolls: impl IntoIterator<Item = u32>) -> Self {
        ScriptedDice {
            picks: Mutex::new(picks.into_iter().collect()),
            rolls: Mutex::new(rolls.into_iter().collect()),
        }
    }

    pub fn rolls(rolls: impl IntoIterator<Item = u32>) -> Self {
        ScriptedDice::new(std::iter::empty(), rolls)
    }
}

impl Dice for ScriptedDice {
    fn pick(&self, len: usize) -> usize {
        let next = self
            .picks
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or(0);
        next % len.max(1)
    }

    fn roll_percent(&self) -> u32 {
        self.rolls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or(0)
            .min(ROLL_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_dice_stays_in_range() {
        let dice = ThreadDice;
        for _ in 0..1_000 {
            assert!(dice.roll_percent() <= ROLL_MAX);
            assert!(dice.pick(3) < 3);
        }
    }

    #[test]
    fn seeded_dice_is_reproducible() {
        let a = SeededDice::new(7);
        let b = SeededDice::new(7);
        let xs: Vec<u32> = (0..20).map(|_| a.roll_percent()).collect();
        let ys: Vec<u32> = (0..20).map(|_| b.roll_percent()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn scripted_dice_replays_then_defaults() {
        let dice = ScriptedDice::new([4, 1], [59, 250]);
        assert_eq!(dice.pick(3), 1); // 4 % 3
        assert_eq!(dice.pick(3), 1);
        assert_eq!(dice.pick(3), 0);
        assert_eq!(dice.roll_percent(), 59);
        assert_eq!(dice.roll_percent(), ROLL_MAX);
        assert_eq!(dice.roll_percent(), 0);
    }
}
