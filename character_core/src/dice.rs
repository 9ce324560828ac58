//! Dice notation (`1d6`, `2d10`) and rolling

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid dice notation '{0}', expected NdM")]
pub struct DiceError(pub String);

/// A dice expression: `count` dice with `sides` faces each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dice {
    pub count: u32,
    pub sides: u32,
}

impl Dice {
    pub fn new(count: u32, sides: u32) -> Self {
        Dice { count, sides }
    }

    /// Roll all dice and sum the faces
    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        (0..self.count).map(|_| rng.gen_range(1..=self.sides)).sum()
    }

    pub fn min(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.count * self.sides
    }

    /// Expected value of a roll
    pub fn average(&self) -> f64 {
        self.count as f64 * (self.sides as f64 + 1.0) / 2.0
    }
}

impl FromStr for Dice {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DiceError(s.to_string());
        let (count, sides) = s.trim().split_once(['d', 'D']).ok_or_else(err)?;
        let count = if count.is_empty() { 1 } else { count.parse().map_err(|_| err())? };
        let sides: u32 = sides.parse().map_err(|_| err())?;
        if count == 0 || sides == 0 {
            return Err(err());
        }
        Ok(Dice { count, sides })
    }
}

impl TryFrom<String> for Dice {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dice> for String {
    fn from(dice: Dice) -> Self {
        dice.to_string()
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Roll a whole pool, summing every expression
pub fn roll_pool(pool: &[Dice], rng: &mut impl Rng) -> u32 {
    pool.iter().map(|dice| dice.roll(rng)).sum()
}
