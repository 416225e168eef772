use std::rc::Rc;

use crate::interpreter::{lexer::Location, operator::Operator};

/// Represents an expression in the syntax tree.
///
/// Expressions are immutable once the parser has built them. Every variant
/// records the location of the token that introduced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A name to resolve through the scope chain.
    Identifier {
        /// The name.
        name:     String,
        /// Where it appears.
        location: Location,
    },
    /// Integer literal.
    Int {
        /// The value.
        value:    i64,
        /// Where it appears.
        location: Location,
    },
    /// Float literal.
    Float {
        /// The value.
        value:    f64,
        /// Where it appears.
        location: Location,
    },
    /// String literal.
    Str {
        /// The contents, without quotes.
        value:    String,
        /// Where it appears.
        location: Location,
    },
    /// Boolean literal.
    Bool {
        /// The value.
        value:    bool,
        /// Where it appears.
        location: Location,
    },
    /// A prefix or postfix operator applied to one operand.
    Unary {
        /// The operator.
        op:       Operator,
        /// The operand.
        operand:  Box<Expr>,
        /// Where the operator is.
        location: Location,
    },
    /// An operator applied to two operands.
    ///
    /// Also covers subscript (`Operator::Index`), member access
    /// (`Operator::Member`, whose right side is an identifier), assignments,
    /// and the conditional (`Operator::Ternary`, whose right side is a
    /// [`Expr::Pair`]).
    Binary {
        /// The operator.
        op:       Operator,
        /// The left operand.
        lhs:      Box<Expr>,
        /// The right operand.
        rhs:      Box<Expr>,
        /// Where the operator is.
        location: Location,
    },
    /// A function call.
    Call {
        /// The expression producing the function.
        callee:   Box<Expr>,
        /// Positional arguments in order.
        args:     Vec<Expr>,
        /// Named arguments in order.
        named:    Vec<(String, Expr)>,
        /// Where the opening parenthesis is.
        location: Location,
    },
    /// `[a, b, c]`
    List {
        /// The element expressions.
        elements: Vec<Expr>,
        /// Where the opening bracket is.
        location: Location,
    },
    /// `{name: value, ...}`
    Dict {
        /// Key/value pairs in source order.
        entries:  Vec<(String, Expr)>,
        /// Where the opening brace is.
        location: Location,
    },
    /// A function literal.
    Function(Rc<FunctionDef>),
    /// The two branches of a conditional expression.
    Pair {
        /// Evaluated when the condition holds.
        then:      Box<Expr>,
        /// Evaluated otherwise.
        otherwise: Box<Expr>,
        /// Where the `:` is.
        location:  Location,
    },
}

impl Expr {
    /// Returns the location recorded for this node.
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::Identifier { location, .. }
            | Self::Int { location, .. }
            | Self::Float { location, .. }
            | Self::Str { location, .. }
            | Self::Bool { location, .. }
            | Self::Unary { location, .. }
            | Self::Binary { location, .. }
            | Self::Call { location, .. }
            | Self::List { location, .. }
            | Self::Dict { location, .. }
            | Self::Pair { location, .. } => location,
            Self::Function(def) => &def.location,
        }
    }
}

/// A user function: declaration or literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The declared name; `None` for anonymous literals.
    pub name:     Option<String>,
    /// Parameter names, all distinct.
    pub params:   Vec<String>,
    /// The body.
    pub body:     Vec<Statement>,
    /// Where the `function` keyword is.
    pub location: Location,
}

impl FunctionDef {
    /// The name used in diagnostics.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// Represents a statement in the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression evaluated for its effect.
    Expression(Expr),
    /// `if (condition) then_branch [else else_branch]`
    If {
        /// Must evaluate to a boolean.
        condition:   Expr,
        /// Runs when the condition holds.
        then_branch: Vec<Statement>,
        /// Runs otherwise, if present.
        else_branch: Option<Vec<Statement>>,
        /// Where the keyword is.
        location:    Location,
    },
    /// `while (condition) body`
    While {
        /// Checked before every iteration.
        condition: Expr,
        /// The loop body.
        body:      Vec<Statement>,
        /// Where the keyword is.
        location:  Location,
    },
    /// `for (init; condition; step) body`
    For {
        /// Runs once before the loop.
        init:      Option<Expr>,
        /// Checked before every iteration; absent means always true.
        condition: Option<Expr>,
        /// Runs after every iteration, including ones ended by `continue`.
        step:      Option<Expr>,
        /// The loop body.
        body:      Vec<Statement>,
        /// Where the keyword is.
        location:  Location,
    },
    /// `break;`
    Break {
        /// Where the keyword is.
        location: Location,
    },
    /// `continue;`
    Continue {
        /// Where the keyword is.
        location: Location,
    },
    /// `return [value];`
    Return {
        /// The returned expression, if any.
        value:    Option<Expr>,
        /// Where the keyword is.
        location: Location,
    },
    /// `function name(params) { body }`
    Function(Rc<FunctionDef>),
}

impl Statement {
    /// Returns the location recorded for this node.
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::Expression(expr) => expr.location(),
            Self::If { location, .. }
            | Self::While { location, .. }
            | Self::For { location, .. }
            | Self::Break { location }
            | Self::Continue { location }
            | Self::Return { location, .. } => location,
            Self::Function(def) => &def.location,
        }
    }
}

/// A parsed script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in order.
    pub statements: Vec<Statement>,
}
