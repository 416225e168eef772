use tracing::debug;

use crate::{
    ast::Program,
    config::{Config, DEFAULT_MAX_NESTING_DEPTH},
    error::ParseError,
    interpreter::lexer::{Location, Token, TokenKind},
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Stands in for the end token if the parser is handed a slice without one.
static END: Token = Token { kind:     TokenKind::End,
                            location: Location { file:   None,
                                                 line:   1,
                                                 column: 1, }, };

/// A cursor over a token sequence.
///
/// The parser never moves past the terminating [`TokenKind::End`] token, so
/// every lookahead is well defined.
pub struct Parser<'t> {
    tokens:    &'t [Token],
    pos:       usize,
    depth:     usize,
    max_depth: usize,
    /// Height of the tallest expression tree finished since the innermost
    /// active [`Parser::measured`] call began.
    height:    usize,
}

impl<'t> Parser<'t> {
    /// Creates a parser with the default nesting limit.
    #[must_use]
    pub const fn new(tokens: &'t [Token]) -> Self {
        Self::with_max_depth(tokens, DEFAULT_MAX_NESTING_DEPTH)
    }

    /// Creates a parser that rejects nesting deeper than `max_depth`.
    #[must_use]
    pub const fn with_max_depth(tokens: &'t [Token], max_depth: usize) -> Self {
        Self { tokens,
               pos: 0,
               depth: 0,
               max_depth,
               height: 0 }
    }

    /// The current token, without consuming it.
    pub(super) fn peek(&self) -> &'t Token {
        self.tokens.get(self.pos).or_else(|| self.tokens.last()).unwrap_or(&END)
    }

    /// The kind of the current token.
    pub(super) fn peek_kind(&self) -> &'t TokenKind {
        &self.peek().kind
    }

    /// The kind of the token `n` places ahead of the current one.
    pub(super) fn peek_nth(&self, n: usize) -> &'t TokenKind {
        self.tokens.get(self.pos + n).map_or(&END.kind, |token| &token.kind)
    }

    /// Consumes and returns the current token. The end token is never
    /// consumed.
    pub(super) fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if token.kind != TokenKind::End {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it is `kind`.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind && *kind != TokenKind::End {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Consumes a token of `kind`, or fails naming `expected`.
    pub(super) fn expect(&mut self, kind: &TokenKind, expected: &str) -> ParseResult<&'t Token> {
        let token = self.peek();
        if self.eat(kind) {
            return Ok(token);
        }
        Err(unexpected(token, expected))
    }

    /// Runs `f` one nesting level deeper.
    ///
    /// # Errors
    /// Returns `NestingTooDeep` when the configured limit would be exceeded.
    pub(super) fn nested<T>(&mut self,
                            f: impl FnOnce(&mut Self) -> ParseResult<T>)
                            -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep { limit:    self.max_depth,
                                                    location: self.peek().location.clone(), });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// The limit on nesting depth and on expression tree height.
    pub(super) const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Runs `f` and also returns the height of the tallest expression tree
    /// it finished.
    ///
    /// Operator chains are reduced without recursion, so the nesting counter
    /// alone does not bound how tall a tree can grow. Heights measured here
    /// let the expression parser bound them too.
    pub(super) fn measured<T>(&mut self,
                              f: impl FnOnce(&mut Self) -> ParseResult<T>)
                              -> ParseResult<(T, usize)> {
        let outer = std::mem::take(&mut self.height);
        let result = f(self);
        let inner = std::mem::replace(&mut self.height, outer);
        self.height = self.height.max(inner);
        Ok((result?, inner))
    }

    /// Records a finished expression tree of the given height.
    pub(super) fn note_height(&mut self, height: usize) {
        self.height = self.height.max(height);
    }
}

/// Builds the error for a token that does not fit, distinguishing the end
/// of input from a wrong token.
pub(super) fn unexpected(token: &Token, expected: impl Into<String>) -> ParseError {
    match token.kind {
        TokenKind::End => ParseError::UnexpectedEnd { expected: expected.into(),
                                                      location: token.location.clone(), },
        _ => ParseError::UnexpectedToken { found:    token.kind.to_string(),
                                           expected: expected.into(),
                                           location: token.location.clone(), },
    }
}

/// Parses a full token sequence into a program using the default limits.
///
/// # Example
/// ```
/// use cinder::interpreter::{lexer::tokenize, parser::core::parse};
///
/// let tokens = tokenize("x = 1; if (x > 0) x--;").unwrap();
/// let program = parse(&tokens).unwrap();
///
/// assert_eq!(program.statements.len(), 2);
/// ```
pub fn parse(tokens: &[Token]) -> ParseResult<Program> {
    parse_with_config(tokens, &Config::default())
}

/// Parses a full token sequence into a program, honoring the nesting limit
/// in `config`.
pub fn parse_with_config(tokens: &[Token], config: &Config) -> ParseResult<Program> {
    let mut parser = Parser::with_max_depth(tokens, config.max_nesting_depth);
    let program = parser.parse_program()?;

    debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}
