//! Odometer-style score keeping.
//!
//! `score` and `high` change the instant points are earned. The visible
//! counters trail behind by at most one point per tick, and the digit
//! arrays are bumped one step at a time with carry so the display rolls
//! like a mechanical counter.

use crate::config::SCORE_DIGITS;

pub type Digits = [u8; SCORE_DIGITS];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub score: u32,
    pub visible_score: u32,
    pub high: u32,
    pub visible_high: u32,
    pub score_digits: Digits,
    pub high_digits: Digits,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, points: u32) {
        self.score += points;
    }

    /// Move both visible counters one step toward their targets, then let
    /// the high score catch up with the current score.
    pub fn chase(&mut self) {
        if self.visible_score < self.score {
            bump(&mut self.score_digits);
            self.visible_score += 1;
        }

        if self.visible_high < self.high {
            bump(&mut self.high_digits);
            self.visible_high += 1;
        }

        if self.score > self.high {
            self.high = self.score;
        }
    }

    /// Zero the current score for a new game; the high score survives.
    pub fn reset_current(&mut self) {
        self.score = 0;
        self.visible_score = 0;
        self.score_digits = [0; SCORE_DIGITS];
    }
}

/// Add one to the rightmost digit, carrying leftwards.
fn bump(digits: &mut Digits) {
    for digit in digits.iter_mut().rev() {
        *digit += 1;
        if *digit <= 9 {
            return;
        }
        *digit = 0;
    }
}
