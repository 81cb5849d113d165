// Dice engine - notation parsing and rolling

mod error;
pub mod notation;
mod roller;

pub use error::DiceError;
pub use notation::parse;
pub use roller::{roll, DiceRoll};
