//! Defense system - Dodge and barriers

mod barrier;
mod dodge;

pub use barrier::absorb_with_barrier;
pub use dodge::{dodge_chance, dodge_chance_with};
