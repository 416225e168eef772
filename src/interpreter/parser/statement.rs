use crate::{
    ast::{Expr, Statement},
    interpreter::{
        lexer::{Location, TokenKind},
        parser::{
            core::{ParseResult, Parser, unexpected},
            utils::Completion,
        },
    },
};

impl Parser<'_> {
    /// Parses a single statement.
    ///
    /// Dispatches on the leading keyword. A `function` keyword followed by a
    /// name is a declaration; anything else, including an anonymous function
    /// literal, is an expression statement ended by `;` or the end of text.
    ///
    /// # Example
    /// ```
    /// use cinder::{
    ///     ast::Statement,
    ///     interpreter::{lexer::tokenize, parser::core::Parser},
    /// };
    ///
    /// let tokens = tokenize("while (i < 3) { i++; }").unwrap();
    /// let statement = Parser::new(&tokens).parse_statement().unwrap();
    ///
    /// assert!(matches!(statement, Statement::While { .. }));
    /// ```
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self.peek();
        let location = token.location.clone();

        match &token.kind {
            TokenKind::If => {
                self.advance();
                self.parse_if(location)
            },
            TokenKind::While => {
                self.advance();
                self.parse_while(location)
            },
            TokenKind::For => {
                self.advance();
                self.parse_for(location)
            },
            TokenKind::Break => {
                self.advance();
                self.expect_statement_end()?;
                Ok(Statement::Break { location })
            },
            TokenKind::Continue => {
                self.advance();
                self.expect_statement_end()?;
                Ok(Statement::Continue { location })
            },
            TokenKind::Return => {
                self.advance();
                self.parse_return(location)
            },
            TokenKind::Function if matches!(self.peek_nth(1), TokenKind::Identifier(_)) => {
                self.advance();
                Ok(Statement::Function(self.parse_function(location)?))
            },
            _ => {
                let (expr, _) = self.parse_expression(Completion::StatementEnd)?;
                Ok(Statement::Expression(expr))
            },
        }
    }

    /// Parses `(condition) body [else body]` after the `if` keyword.
    fn parse_if(&mut self, location: Location) -> ParseResult<Statement> {
        self.expect(&TokenKind::LParen, "'(' after 'if'")?;
        let (condition, _) = self.parse_expression(Completion::RParen)?;
        let then_branch = self.parse_body()?;

        let else_branch = if self.eat(&TokenKind::Else) {
            Some(self.parse_body()?)
        } else {
            None
        };

        Ok(Statement::If { condition,
                           then_branch,
                           else_branch,
                           location })
    }

    /// Parses `(condition) body` after the `while` keyword.
    fn parse_while(&mut self, location: Location) -> ParseResult<Statement> {
        self.expect(&TokenKind::LParen, "'(' after 'while'")?;
        let (condition, _) = self.parse_expression(Completion::RParen)?;
        let body = self.parse_body()?;

        Ok(Statement::While { condition,
                              body,
                              location })
    }

    /// Parses `([init]; [condition]; [step]) body` after the `for` keyword.
    fn parse_for(&mut self, location: Location) -> ParseResult<Statement> {
        self.expect(&TokenKind::LParen, "'(' after 'for'")?;

        let init = self.parse_optional(&TokenKind::Semicolon, Completion::Semicolon)?;
        let condition = self.parse_optional(&TokenKind::Semicolon, Completion::Semicolon)?;
        let step = self.parse_optional(&TokenKind::RParen, Completion::RParen)?;
        let body = self.parse_body()?;

        Ok(Statement::For { init,
                            condition,
                            step,
                            body,
                            location })
    }

    /// Parses an expression unless `closing` comes first, consuming the
    /// closing token either way.
    fn parse_optional(&mut self,
                      closing: &TokenKind,
                      completion: Completion)
                      -> ParseResult<Option<Expr>> {
        if self.eat(closing) {
            return Ok(None);
        }
        Ok(Some(self.parse_expression(completion)?.0))
    }

    /// Parses `[value]` and the statement end after the `return` keyword.
    fn parse_return(&mut self, location: Location) -> ParseResult<Statement> {
        let value = match self.peek_kind() {
            TokenKind::Semicolon => {
                self.advance();
                None
            },
            TokenKind::End => None,
            _ => Some(self.parse_expression(Completion::StatementEnd)?.0),
        };

        Ok(Statement::Return { value, location })
    }

    /// Consumes `;`, or accepts the end of text without consuming it.
    fn expect_statement_end(&mut self) -> ParseResult<()> {
        match self.peek_kind() {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            },
            TokenKind::End => Ok(()),
            _ => Err(unexpected(self.peek(), Completion::StatementEnd.describe())),
        }
    }
}
