use crate::{
    ast::{Program, Statement},
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser, unexpected},
    },
};

impl Parser<'_> {
    /// Parses the body of `if`, `else`, `while` or `for`.
    ///
    /// The body is either a braced block or a single statement. A lone `;`
    /// gives an empty body.
    ///
    /// Grammar: `body := "{" statement* "}" | ";" | statement`
    pub(super) fn parse_body(&mut self) -> ParseResult<Vec<Statement>> {
        self.nested(|parser| {
                if parser.eat(&TokenKind::LBrace) {
                    return parser.parse_block_statements();
                }
                if parser.eat(&TokenKind::Semicolon) {
                    return Ok(Vec::new());
                }
                Ok(vec![parser.parse_statement()?])
            })
    }

    /// Parses a mandatory braced block whose `{` was already consumed, such
    /// as a function body.
    pub(super) fn parse_braced_block(&mut self) -> ParseResult<Vec<Statement>> {
        self.nested(Self::parse_block_statements)
    }

    /// Parses statements up to and including the closing `}`.
    fn parse_block_statements(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();

        while !self.eat(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            if *self.peek_kind() == TokenKind::End {
                return Err(unexpected(self.peek(), "'}'"));
            }
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parses statements until the input is exhausted.
    ///
    /// Empty statements are skipped.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();

        while *self.peek_kind() != TokenKind::End {
            if self.eat(&TokenKind::Semicolon) {
                continue;
            }
            statements.push(self.parse_statement()?);
        }

        Ok(Program { statements })
    }
}
