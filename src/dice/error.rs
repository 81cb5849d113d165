use thiserror::Error;

/// Errors produced while parsing or resolving dice notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("invalid notation: nothing to roll")]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unexpected end of notation")]
    UnexpectedEnd,

    #[error("expected {expected} at position {position}, found '{found}'")]
    Expected {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("too many dice: at most {max} per term, got {count}")]
    TooManyDice { count: u64, max: u32 },

    #[error("dice need between 1 and {max} sides, got {sides}")]
    InvalidSides { sides: u64, max: u32 },

    #[error("notation is too long: at most {max} characters, got {length}")]
    TooLong { length: usize, max: usize },

    #[error("notation is nested too deeply: at most {max} levels")]
    TooDeep { max: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is too large")]
    Overflow,
}

impl DiceError {
    /// True when the notation itself is malformed, as opposed to well-formed
    /// but outside the engine's limits.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            DiceError::Empty
                | DiceError::UnexpectedCharacter { .. }
                | DiceError::UnexpectedEnd
                | DiceError::Expected { .. }
        )
    }
}
