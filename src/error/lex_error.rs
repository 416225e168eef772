use thiserror::Error;

use crate::interpreter::lexer::Location;

/// Represents all errors that can occur while tokenizing source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character that cannot start any token.
    #[error("Error at {location}: Unexpected character '{character}'.")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Where it was found.
        location:  Location,
    },
    /// A run of digits and dots that is not a representable number.
    #[error("Error at {location}: Invalid number literal '{text}'.")]
    InvalidNumber {
        /// The literal as written.
        text:     String,
        /// Where it starts.
        location: Location,
    },
}

impl LexError {
    /// Returns the position the error refers to.
    #[must_use]
    pub const fn location(&self) -> &Location {
        match self {
            Self::UnexpectedCharacter { location, .. } | Self::InvalidNumber { location, .. } => {
                location
            },
        }
    }
}
