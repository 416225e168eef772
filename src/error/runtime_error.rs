use thiserror::Error;

use crate::interpreter::lexer::Location;

/// Represents all errors that can occur during execution.
///
/// Every variant records the location of the expression or statement that
/// failed. Errors raised inside a user function are wrapped in
/// [`RuntimeError::InFunction`], so the chain of [`std::error::Error::source`]
/// walks from the outermost call site down to the original failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Tried to read a name that is bound nowhere in the scope chain.
    #[error("Error at {location}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name:     String,
        /// Where it was referenced.
        location: Location,
    },
    /// An operator received operand types it does not support.
    #[error("Error at {location}: Type mismatch: {details}.")]
    TypeMismatch {
        /// What went wrong.
        details:  String,
        /// Where the operation is.
        location: Location,
    },
    /// A condition or logical operand was not a boolean.
    #[error("Error at {location}: Expected boolean, found {found}.")]
    ExpectedBoolean {
        /// The type that was found instead.
        found:    String,
        /// Where the value was used.
        location: Location,
    },
    /// Division or modulo by zero.
    #[error("Error at {location}: Division by zero.")]
    DivisionByZero {
        /// Where the division is.
        location: Location,
    },
    /// Called a value that is not a function.
    #[error("Error at {location}: Value of type {found} is not callable.")]
    NotCallable {
        /// The type of the callee.
        found:    String,
        /// Where the call is.
        location: Location,
    },
    /// A function received the wrong number of arguments.
    #[error("Error at {location}: Function '{name}' expects {expected} argument(s), found \
             {found}.")]
    ArgumentCountMismatch {
        /// The function being called.
        name:     String,
        /// A description of the accepted count.
        expected: String,
        /// The number actually supplied.
        found:    usize,
        /// Where the call is.
        location: Location,
    },
    /// An argument or operand has the right type but an unusable value.
    #[error("Error at {location}: Invalid argument: {details}.")]
    InvalidArgument {
        /// What went wrong.
        details:  String,
        /// Where the value was used.
        location: Location,
    },
    /// The left side of an assignment is not an identifier, list subscript or
    /// dict member.
    #[error("Error at {location}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// Where the assignment is.
        location: Location,
    },
    /// A list or string index outside the valid range.
    #[error("Error at {location}: Index {index} out of bounds for length {len}.")]
    IndexOutOfBounds {
        /// The requested index.
        index:    i64,
        /// The length of the indexed value.
        len:      usize,
        /// Where the access is.
        location: Location,
    },
    /// A dict has no entry for the requested key.
    #[error("Error at {location}: Key '{key}' not found.")]
    KeyNotFound {
        /// The missing key.
        key:      String,
        /// Where the access is.
        location: Location,
    },
    /// Integer arithmetic overflowed, or an integer could not be converted
    /// without loss.
    #[error("Error at {location}: Integer overflow while computing result.")]
    Overflow {
        /// Where the operation is.
        location: Location,
    },
    /// `break` executed outside any loop.
    #[error("Error at {location}: 'break' outside of a loop.")]
    BreakOutsideLoop {
        /// Where the statement is.
        location: Location,
    },
    /// `continue` executed outside any loop.
    #[error("Error at {location}: 'continue' outside of a loop.")]
    ContinueOutsideLoop {
        /// Where the statement is.
        location: Location,
    },
    /// Function calls are nested more deeply than allowed.
    #[error("Error at {location}: Call depth exceeded {limit}.")]
    CallDepthExceeded {
        /// The configured ceiling.
        limit:    usize,
        /// Where the call is.
        location: Location,
    },
    /// The program ran more statements than allowed.
    #[error("Error at {location}: Step limit of {limit} exceeded.")]
    StepLimitExceeded {
        /// The configured ceiling.
        limit:    u64,
        /// The statement that crossed it.
        location: Location,
    },
    /// A failure inside a user function, as seen from its call site.
    #[error("Error at {location}: In function '{name}'.")]
    InFunction {
        /// The name of the function, or `<anonymous>`.
        name:     String,
        /// Where the call is.
        location: Location,
        /// The error raised by the function body.
        #[source]
        source:   Box<RuntimeError>,
    },
}

impl RuntimeError {
    /// Returns the position the error refers to.
    #[must_use]
    pub const fn location(&self) -> &Location {
        match self {
            Self::UnknownVariable { location, .. }
            | Self::TypeMismatch { location, .. }
            | Self::ExpectedBoolean { location, .. }
            | Self::DivisionByZero { location }
            | Self::NotCallable { location, .. }
            | Self::ArgumentCountMismatch { location, .. }
            | Self::InvalidArgument { location, .. }
            | Self::InvalidAssignmentTarget { location }
            | Self::IndexOutOfBounds { location, .. }
            | Self::KeyNotFound { location, .. }
            | Self::Overflow { location }
            | Self::BreakOutsideLoop { location }
            | Self::ContinueOutsideLoop { location }
            | Self::CallDepthExceeded { location, .. }
            | Self::StepLimitExceeded { location, .. }
            | Self::InFunction { location, .. } => location,
        }
    }

    /// Follows the [`RuntimeError::InFunction`] chain down to the error that
    /// started it.
    ///
    /// # Example
    /// ```
    /// use cinder::{error::RuntimeError, interpreter::lexer::Location};
    ///
    /// let inner = RuntimeError::DivisionByZero { location: Location::new(2, 5) };
    /// let outer = RuntimeError::InFunction { name:     "f".to_string(),
    ///                                        location: Location::new(4, 1),
    ///                                        source:   Box::new(inner.clone()), };
    ///
    /// assert_eq!(outer.root_cause(), &inner);
    /// ```
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::InFunction { source, .. } = current {
            current = source;
        }
        current
    }

    pub(crate) fn type_mismatch(details: impl Into<String>, location: &Location) -> Self {
        Self::TypeMismatch { details:  details.into(),
                             location: location.clone(), }
    }

    pub(crate) fn invalid_argument(details: impl Into<String>, location: &Location) -> Self {
        Self::InvalidArgument { details:  details.into(),
                                location: location.clone(), }
    }
}
