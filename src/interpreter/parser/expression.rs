use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Expr, FunctionDef},
    error::ParseError,
    interpreter::{
        lexer::{Location, Token, TokenKind},
        operator::{Operator, Position, lookup},
        parser::{
            core::{ParseResult, Parser, unexpected},
            utils::Completion,
        },
    },
};

/// The states of the expression state machine.
enum State {
    /// The next token must start an operand.
    WantOperand,
    /// An operand is complete; an operator or terminator may follow.
    HaveOperand,
    /// The terminator has been consumed.
    Finished(TokenKind),
}

/// The operator and operand stacks of one expression.
///
/// Each operand carries the height of its tree. Trees taller than `limit`
/// are rejected as they are built, since evaluating and dropping them
/// recurses once per level.
struct Yard {
    operators: Vec<(Operator, Location)>,
    operands:  Vec<(Expr, usize)>,
    limit:     usize,
    height:    usize,
}

impl Yard {
    fn new(limit: usize) -> Self {
        Self { operators: vec![(Operator::Sentinel, Location::default())],
               operands: Vec::new(),
               limit,
               height: 0 }
    }

    fn push_operand(&mut self, expr: Expr, height: usize) -> ParseResult<()> {
        if height > self.limit {
            return Err(ParseError::NestingTooDeep { limit:    self.limit,
                                                    location: expr.location().clone(), });
        }
        self.height = self.height.max(height);
        self.operands.push((expr, height));
        Ok(())
    }

    fn push_operator(&mut self, op: Operator, location: Location) {
        self.operators.push((op, location));
    }

    fn pop_operand(&mut self, op: Operator, location: &Location) -> ParseResult<(Expr, usize)> {
        self.operands.pop().ok_or_else(|| ParseError::UnexpectedToken {
                               found:    op.symbol().to_string(),
                               expected: "an operand".to_string(),
                               location: location.clone(),
                           })
    }

    /// Turns the top operator into an expression node over its operands.
    fn reduce(&mut self) -> ParseResult<()> {
        let Some((op, location)) = self.operators.pop() else {
            return Ok(());
        };

        let (expr, height) = match op.info().position {
            Position::Infix => {
                let (rhs, rhs_height) = self.pop_operand(op, &location)?;
                let (lhs, lhs_height) = self.pop_operand(op, &location)?;
                (Expr::Binary { op,
                                lhs: Box::new(lhs),
                                rhs: Box::new(rhs),
                                location },
                 lhs_height.max(rhs_height))
            },
            Position::Prefix | Position::Postfix => {
                let (operand, operand_height) = self.pop_operand(op, &location)?;
                (Expr::Unary { op,
                               operand: Box::new(operand),
                               location },
                 operand_height)
            },
        };

        self.push_operand(expr, height + 1)
    }

    /// Reduces every pending operator that binds at least as tightly as
    /// `incoming`.
    fn resolve(&mut self, incoming: Operator) -> ParseResult<()> {
        while let Some(&(top, _)) = self.operators.last()
              && top != Operator::Sentinel
              && top.reduces_before(incoming)
        {
            self.reduce()?;
        }
        Ok(())
    }

    /// Reduces everything down to the sentinel and returns the single
    /// remaining operand with the height of its tree.
    fn finish(mut self, terminator: &Token) -> ParseResult<(Expr, usize)> {
        while self.operators.len() > 1 {
            self.reduce()?;
        }
        match (self.operands.pop(), self.operands.is_empty()) {
            (Some(operand), true) => Ok(operand),
            _ => Err(unexpected(terminator, "a single expression")),
        }
    }
}

impl Parser<'_> {
    /// Parses one expression up to the terminator selected by `completion`.
    ///
    /// Returns the expression and the kind of the terminator that ended it,
    /// so that callers reading comma-separated items know whether the list
    /// continues. The terminator is consumed unless it is the end of text.
    ///
    /// # Errors
    /// Returns a located `ParseError` for any token that fits neither the
    /// current state nor the completion mode, and `NestingTooDeep` when
    /// sub-expressions nest, or the expression tree grows, past the
    /// configured limit.
    ///
    /// # Example
    /// ```
    /// use cinder::{
    ///     ast::Expr,
    ///     interpreter::{
    ///         lexer::{TokenKind, tokenize},
    ///         operator::Operator,
    ///         parser::{core::Parser, utils::Completion},
    ///     },
    /// };
    ///
    /// let tokens = tokenize("8 - 4 - 2").unwrap();
    /// let mut parser = Parser::new(&tokens);
    /// let (expr, terminator) = parser.parse_expression(Completion::EndOfText).unwrap();
    ///
    /// assert_eq!(terminator, TokenKind::End);
    /// let Expr::Binary { op: Operator::Sub, lhs, .. } = expr else { panic!() };
    /// assert!(matches!(*lhs, Expr::Binary { op: Operator::Sub, .. }));
    /// ```
    pub fn parse_expression(&mut self, completion: Completion) -> ParseResult<(Expr, TokenKind)> {
        self.nested(|parser| parser.run_yard(completion))
    }

    fn run_yard(&mut self, completion: Completion) -> ParseResult<(Expr, TokenKind)> {
        let mut yard = Yard::new(self.max_depth());
        let mut state = State::WantOperand;
        let start = self.peek();

        loop {
            state = match state {
                State::WantOperand => self.want_operand(&mut yard)?,
                State::HaveOperand => self.have_operand(&mut yard, completion)?,
                State::Finished(terminator) => {
                    let (expr, height) = yard.finish(start)?;
                    self.note_height(height);
                    trace!(%terminator, height, "expression complete");
                    return Ok((expr, terminator));
                },
            };
        }
    }

    fn want_operand(&mut self, yard: &mut Yard) -> ParseResult<State> {
        let token = self.advance();
        let location = token.location.clone();

        if let Some(op) = lookup(&token.kind, Position::Prefix) {
            yard.push_operator(op, location);
            return Ok(State::WantOperand);
        }

        let (operand, inner) = match &token.kind {
            TokenKind::LParen => {
                let ((expr, _), inner) =
                    self.measured(|parser| parser.parse_expression(Completion::RParen))?;
                (expr, inner)
            },
            TokenKind::LBracket => self.measured(|parser| parser.parse_list(location))?,
            TokenKind::LBrace => self.measured(|parser| parser.parse_dict(location))?,
            TokenKind::Function => {
                let (def, inner) = self.measured(|parser| parser.parse_function(location))?;
                (Expr::Function(def), inner)
            },
            TokenKind::Identifier(name) => (Expr::Identifier { name: name.clone(),
                                                               location },
                                            0),
            TokenKind::Int(value) => (Expr::Int { value: *value,
                                                  location },
                                      0),
            TokenKind::Float(value) => (Expr::Float { value: *value,
                                                      location },
                                        0),
            TokenKind::Str(value) => (Expr::Str { value: value.clone(),
                                                  location },
                                      0),
            TokenKind::Bool(value) => (Expr::Bool { value: *value,
                                                    location },
                                       0),
            _ => return Err(unexpected(token, "an operand")),
        };

        yard.push_operand(operand, inner + 1)?;
        Ok(State::HaveOperand)
    }

    fn have_operand(&mut self, yard: &mut Yard, completion: Completion) -> ParseResult<State> {
        let token = self.peek();
        let location = token.location.clone();

        if let Some(op) = lookup(&token.kind, Position::Postfix) {
            self.advance();
            yard.resolve(op)?;
            let (operand, operand_height) = yard.pop_operand(op, &location)?;

            let (expr, inner) = match op {
                Operator::Call => {
                    let ((args, named), inner) =
                        self.measured(|parser| parser.parse_call_arguments())?;
                    (Expr::Call { callee: Box::new(operand),
                                  args,
                                  named,
                                  location },
                     inner)
                },
                Operator::Index => {
                    let ((index, _), inner) =
                        self.measured(|parser| parser.parse_expression(Completion::RBracket))?;
                    (Expr::Binary { op,
                                    lhs: Box::new(operand),
                                    rhs: Box::new(index),
                                    location },
                     inner)
                },
                Operator::Member => {
                    let name_token = self.advance();
                    let TokenKind::Identifier(name) = &name_token.kind else {
                        return Err(unexpected(name_token, "a member name"));
                    };
                    let member = Expr::Identifier { name:     name.clone(),
                                                    location: name_token.location.clone(), };
                    (Expr::Binary { op,
                                    lhs: Box::new(operand),
                                    rhs: Box::new(member),
                                    location },
                     1)
                },
                _ => (Expr::Unary { op,
                                    operand: Box::new(operand),
                                    location },
                      0),
            };

            yard.push_operand(expr, operand_height.max(inner) + 1)?;
            return Ok(State::HaveOperand);
        }

        if token.kind == TokenKind::Question {
            self.advance();
            yard.resolve(Operator::Ternary)?;

            let ((then, _), then_height) =
                self.measured(|parser| parser.parse_expression(Completion::Colon))?;
            let ((otherwise, terminator), otherwise_height) =
                self.measured(|parser| parser.parse_expression(completion))?;

            yard.push_operand(Expr::Pair { then:      Box::new(then),
                                           otherwise: Box::new(otherwise),
                                           location:  location.clone(), },
                              then_height.max(otherwise_height) + 1)?;
            yard.push_operator(Operator::Ternary, location);
            return Ok(State::Finished(terminator));
        }

        if let Some(op) = lookup(&token.kind, Position::Infix) {
            self.advance();
            yard.resolve(op)?;
            yard.push_operator(op, location);
            return Ok(State::WantOperand);
        }

        if completion.accepts(&token.kind) {
            self.advance();
            return Ok(State::Finished(token.kind.clone()));
        }

        Err(unexpected(token, format!("an operator or {}", completion.describe())))
    }

    /// Parses call arguments after the opening parenthesis.
    ///
    /// Positional arguments come first; `name: value` pairs may follow.
    fn parse_call_arguments(&mut self) -> ParseResult<(Vec<Expr>, Vec<(String, Expr)>)> {
        let mut named: Vec<(String, Expr)> = Vec::new();

        let positional = self.parse_comma_separated(&TokenKind::RParen, |parser| {
            let start = parser.peek();
            if let TokenKind::Identifier(name) = &start.kind
               && *parser.peek_nth(1) == TokenKind::Colon
            {
                parser.advance();
                parser.advance();
                let (value, terminator) = parser.parse_expression(Completion::CommaOrRParen)?;
                named.push((name.clone(), value));
                return Ok((None, terminator));
            }

            if !named.is_empty() {
                return Err(ParseError::PositionalAfterNamed { location: start.location.clone() });
            }
            let (value, terminator) = parser.parse_expression(Completion::CommaOrRParen)?;
            Ok((Some(value), terminator))
        })?;

        Ok((positional.into_iter().flatten().collect(), named))
    }

    /// Parses a list literal after the opening bracket.
    fn parse_list(&mut self, location: Location) -> ParseResult<Expr> {
        let elements = self.parse_comma_separated(&TokenKind::RBracket, |parser| {
                               parser.parse_expression(Completion::CommaOrRBracket)
                           })?;
        Ok(Expr::List { elements, location })
    }

    /// Parses a dict literal after the opening brace. Keys are identifiers
    /// or string literals.
    fn parse_dict(&mut self, location: Location) -> ParseResult<Expr> {
        let entries = self.parse_comma_separated(&TokenKind::RBrace, |parser| {
                              let key_token = parser.advance();
                              let key = match &key_token.kind {
                                  TokenKind::Identifier(key) | TokenKind::Str(key) => key.clone(),
                                  _ => return Err(unexpected(key_token, "a dict key")),
                              };
                              parser.expect(&TokenKind::Colon, "':'")?;
                              let (value, terminator) =
                                  parser.parse_expression(Completion::CommaOrRBrace)?;
                              Ok(((key, value), terminator))
                          })?;
        Ok(Expr::Dict { entries, location })
    }

    /// Parses a function after its `function` keyword: an optional name, a
    /// parenthesized parameter list and a braced body.
    ///
    /// # Errors
    /// Returns `DuplicateParameter` if a parameter name repeats.
    pub(super) fn parse_function(&mut self, location: Location) -> ParseResult<Rc<FunctionDef>> {
        let name = match self.peek_kind() {
            TokenKind::Identifier(name) => {
                self.advance();
                Some(name.clone())
            },
            _ => None,
        };

        self.expect(&TokenKind::LParen, "'('")?;
        let mut params: Vec<String> = Vec::new();
        while !self.eat(&TokenKind::RParen) {
            let token = self.advance();
            let TokenKind::Identifier(param) = &token.kind else {
                return Err(unexpected(token, "a parameter name"));
            };
            if params.contains(param) {
                return Err(ParseError::DuplicateParameter { name:     param.clone(),
                                                            location: token.location.clone(), });
            }
            params.push(param.clone());

            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen, "',' or ')'")?;
                break;
            }
        }

        self.expect(&TokenKind::LBrace, "'{'")?;
        let body = self.parse_braced_block()?;

        Ok(Rc::new(FunctionDef { name,
                                 params,
                                 body,
                                 location }))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::lexer::tokenize;

    fn parse(source: &str) -> Expr {
        let tokens = tokenize(source).unwrap();
        Parser::new(&tokens).parse_expression(Completion::EndOfText).unwrap().0
    }

    fn parse_err(source: &str) -> ParseError {
        let tokens = tokenize(source).unwrap();
        Parser::new(&tokens).parse_expression(Completion::EndOfText).unwrap_err()
    }

    /// Renders a tree with explicit parentheses, for compact assertions.
    fn shape(expr: &Expr) -> String {
        match expr {
            Expr::Identifier { name, .. } => name.clone(),
            Expr::Int { value, .. } => value.to_string(),
            Expr::Float { value, .. } => format!("{value:?}"),
            Expr::Str { value, .. } => format!("'{value}'"),
            Expr::Bool { value, .. } => value.to_string(),
            Expr::Unary { op: op @ (Operator::PostIncrement | Operator::PostDecrement),
                          operand,
                          .. } => format!("({}{op})", shape(operand)),
            Expr::Unary { op, operand, .. } => format!("({op}{})", shape(operand)),
            Expr::Binary { op: Operator::Index,
                           lhs,
                           rhs,
                           .. } => format!("{}[{}]", shape(lhs), shape(rhs)),
            Expr::Binary { op: Operator::Member,
                           lhs,
                           rhs,
                           .. } => format!("{}.{}", shape(lhs), shape(rhs)),
            Expr::Binary { op: Operator::Ternary,
                           lhs,
                           rhs,
                           .. } => format!("({} ? {})", shape(lhs), shape(rhs)),
            Expr::Binary { op, lhs, rhs, .. } => {
                format!("({} {op} {})", shape(lhs), shape(rhs))
            },
            Expr::Call { callee, args, named, .. } => {
                let mut parts: Vec<String> = args.iter().map(shape).collect();
                parts.extend(named.iter().map(|(n, e)| format!("{n}: {}", shape(e))));
                format!("{}({})", shape(callee), parts.join(", "))
            },
            Expr::List { elements, .. } => {
                format!("[{}]", elements.iter().map(shape).collect::<Vec<_>>().join(", "))
            },
            Expr::Dict { entries, .. } => {
                format!("{{{}}}",
                        entries.iter()
                               .map(|(k, e)| format!("{k}: {}", shape(e)))
                               .collect::<Vec<_>>()
                               .join(", "))
            },
            Expr::Function(def) => format!("function({})", def.params.join(", ")),
            Expr::Pair { then, otherwise, .. } => {
                format!("{} : {}", shape(then), shape(otherwise))
            },
        }
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(shape(&parse("1 + 2 * 3 + 4")), "((1 + (2 * 3)) + 4)");
        assert_eq!(shape(&parse("8 - 4 - 2")), "((8 - 4) - 2)");
        assert_eq!(shape(&parse("(1 + 2) * (3 + 4)")), "((1 + 2) * (3 + 4))");
        assert_eq!(shape(&parse("a = b = 1")), "(a = (b = 1))");
        assert_eq!(shape(&parse("a || b && c == d")), "(a || (b && (c == d)))");
        assert_eq!(shape(&parse("1 << 2 + 3 & 4")), "((1 << (2 + 3)) & 4)");
    }

    #[test]
    fn unary_chains_group_right_to_left() {
        assert_eq!(shape(&parse("!!a")), "(!(!a))");
        assert_eq!(shape(&parse("-a * b")), "((-a) * b)");
        assert_eq!(shape(&parse("-a++")), "(-(a++))");
        assert_eq!(shape(&parse("a++ + 3")), "((a++) + 3)");
        assert_eq!(shape(&parse("++a + 3")), "((++a) + 3)");
    }

    #[test]
    fn postfix_forms_bind_tightest() {
        assert_eq!(shape(&parse("a.b[1](2).c")), "a.b[1](2).c");
        assert_eq!(shape(&parse("-f(x)")), "(-f(x))");
        assert_eq!(shape(&parse("d.k += 1")), "(d.k += 1)");
    }

    #[test]
    fn calls_accept_named_arguments() {
        assert_eq!(shape(&parse("f(1, x + 1, b: 2, c: 3,)")), "f(1, (x + 1), b: 2, c: 3)");
        assert_eq!(shape(&parse("f()")), "f()");
        assert!(matches!(parse_err("f(a: 1, 2)"), ParseError::PositionalAfterNamed { .. }));
    }

    #[test]
    fn conditional_expression() {
        assert_eq!(shape(&parse("a = c ? 1 : 2")), "(a = (c ? 1 : 2))");
        assert_eq!(shape(&parse("x == 1 ? a : b ? c : d")), "((x == 1) ? a : (b ? c : d))");
        assert_eq!(shape(&parse("(c ? 1 : 2) + 3")), "((c ? 1 : 2) + 3)");
    }

    #[test]
    fn container_literals() {
        assert_eq!(shape(&parse("[1, [2], 3,]")), "[1, [2], 3]");
        assert_eq!(shape(&parse("{a: 1, 'b c': [], }")), "{a: 1, b c: []}");
        assert_eq!(shape(&parse("[]")), "[]");
        assert_eq!(shape(&parse("{}")), "{}");
    }

    #[test]
    fn function_literal() {
        assert_eq!(shape(&parse("function (a, b) { return a + b; }")), "function(a, b)");
        assert!(matches!(parse_err("function (a, a) {}"),
                         ParseError::DuplicateParameter { .. }));
    }

    #[test]
    fn malformed_expressions_fail() {
        assert!(matches!(parse_err("(1 + 2"), ParseError::UnexpectedEnd { .. }));
        assert!(matches!(parse_err("1 +"), ParseError::UnexpectedEnd { .. }));
        assert!(matches!(parse_err("1 2"), ParseError::UnexpectedToken { .. }));
        assert!(matches!(parse_err("f(1,,2)"), ParseError::UnexpectedToken { .. }));
        assert!(matches!(parse_err("a.1"), ParseError::UnexpectedToken { .. }));
        assert!(matches!(parse_err("1 )"), ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let source = format!("{}1{}", "(".repeat(40), ")".repeat(40));
        let tokens = tokenize(&source).unwrap();

        let err = Parser::with_max_depth(&tokens, 10).parse_expression(Completion::EndOfText)
                                                     .unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { limit: 10, .. }));
        assert!(Parser::with_max_depth(&tokens, 64).parse_expression(Completion::EndOfText)
                                                   .is_ok());
    }

    #[test]
    fn tree_height_is_limited_without_parentheses() {
        let limited = |source: &str, limit: usize| {
            let tokens = tokenize(source).unwrap();
            Parser::with_max_depth(&tokens, limit).parse_expression(Completion::EndOfText)
        };

        let chain = vec!["1"; 20].join(" + ");
        assert!(matches!(limited(&chain, 10), Err(ParseError::NestingTooDeep { limit: 10, .. })));
        assert!(limited(&chain, 64).is_ok());

        let negations = format!("{}1", "- ".repeat(20));
        assert!(matches!(limited(&negations, 10),
                         Err(ParseError::NestingTooDeep { limit: 10, .. })));

        let calls = format!("f{}", "(1)".repeat(20));
        assert!(matches!(limited(&calls, 10), Err(ParseError::NestingTooDeep { limit: 10, .. })));

        let lists = format!("{}1{}", "[".repeat(6), "]".repeat(6));
        assert!(limited(&format!("{lists} + 1"), 8).is_ok());
        assert!(matches!(limited(&format!("{lists} + 1 + 1"), 8),
                         Err(ParseError::NestingTooDeep { limit: 8, .. })));
    }
}
