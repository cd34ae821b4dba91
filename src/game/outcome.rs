//! Weighted win/lose/draw decision between two squad scores.

use crate::error::MatchError;
use crate::game::dice::Dice;
use crate::game::types::Outcome;

/// `round(100 * a / (a + b))`, halves rounding up.
pub fn win_probability(a: u64, b: u64) -> Result<u32, MatchError> {
    let total = a.checked_add(b).filter(|t| *t > 0).ok_or(MatchError::InvalidScoreState {
        my_score: a,
        opponent_score: b,
    })?;
    // Integer form of round-half-up: floor((200a + total) / 2total).
    let (a, total) = (u128::from(a), u128::from(total));
    Ok(((200 * a + total) / (2 * total)) as u32)
}

/// Compare a roll against the win probability.
pub fn judge(roll: u32, win_prob: u32) -> Outcome {
    use std::cmp::Ordering::*;
    match roll.cmp(&win_prob) {
        Less => Outcome::Win,
        Greater => Outcome::Lose,
        Equal => Outcome::Draw,
    }
}

/// A resolved duel together with the numbers that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub win_prob: u32,
    pub roll: u32,
}

/// Roll the dice for `my_score` against `opponent_score`.
pub fn resolve(my_score: u64, opponent_score: u64, dice: &dyn Dice) -> Result<Verdict, MatchError> {
    let win_prob = win_probability(my_score, opponent_score)?;
    let roll = dice.roll_percent();
    Ok(Verdict {
        outcome: judge(roll, win_prob),
        win_prob,
        roll,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes() {
        assert_eq!(win_probability(10, 0).unwrap(), 100);
        assert_eq!(win_probability(0, 10).unwrap(), 0);
    }

    #[test]
    fn half_rounds_up() {
        // 1 / 200 * 100 = 0.5
        assert_eq!(win_probability(1, 199).unwrap(), 1);
        // 57.5 and 28.5 sit just under .5 in f64 division
        assert_eq!(win_probability(23, 17).unwrap(), 58);
        assert_eq!(win_probability(57, 143).unwrap(), 29);
    }
}
