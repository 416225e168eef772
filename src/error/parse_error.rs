use thiserror::Error;

use crate::interpreter::lexer::Location;

/// Represents all errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A token that cannot appear at this point.
    #[error("Error at {location}: Unexpected token '{found}', expected {expected}.")]
    UnexpectedToken {
        /// The token as written.
        found:    String,
        /// A description of what would have been accepted.
        expected: String,
        /// Where the token starts.
        location: Location,
    },
    /// The input ended inside an unfinished construct.
    #[error("Error at {location}: Unexpected end of input, expected {expected}.")]
    UnexpectedEnd {
        /// A description of what would have been accepted.
        expected: String,
        /// The end of the input.
        location: Location,
    },
    /// Expressions or statements are nested more deeply than allowed.
    #[error("Error at {location}: Nesting deeper than {limit} levels.")]
    NestingTooDeep {
        /// The configured ceiling.
        limit:    usize,
        /// Where the limit was crossed.
        location: Location,
    },
    /// A function declares the same parameter twice.
    #[error("Error at {location}: Duplicate parameter '{name}'.")]
    DuplicateParameter {
        /// The repeated parameter.
        name:     String,
        /// Where the second declaration is.
        location: Location,
    },
    /// A call passes a positional argument after a named one.
    #[error("Error at {location}: Positional argument after named argument.")]
    PositionalAfterNamed {
        /// Where the positional argument starts.
        location: Location,
    },
}

impl ParseError {
    /// Returns the position the error refers to.
    #[must_use]
    pub const fn location(&self) -> &Location {
        match self {
            Self::UnexpectedToken { location, .. }
            | Self::UnexpectedEnd { location, .. }
            | Self::NestingTooDeep { location, .. }
            | Self::DuplicateParameter { location, .. }
            | Self::PositionalAfterNamed { location } => location,
        }
    }
}
