use crate::interpreter::{
    lexer::TokenKind,
    parser::core::{ParseResult, Parser},
};

/// Tells the expression parser which token ends the current expression.
///
/// The terminator is consumed, except for the end of text, which is left in
/// place for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Only the end of text.
    EndOfText,
    /// `)`
    RParen,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `;` or the end of text.
    StatementEnd,
    /// `,` or `)`
    CommaOrRParen,
    /// `,` or `]`
    CommaOrRBracket,
    /// `,` or `}`
    CommaOrRBrace,
}

impl Completion {
    /// Returns `true` if `kind` ends an expression in this mode.
    #[must_use]
    pub const fn accepts(self, kind: &TokenKind) -> bool {
        match self {
            Self::EndOfText => matches!(kind, TokenKind::End),
            Self::RParen => matches!(kind, TokenKind::RParen),
            Self::RBracket => matches!(kind, TokenKind::RBracket),
            Self::Colon => matches!(kind, TokenKind::Colon),
            Self::Semicolon => matches!(kind, TokenKind::Semicolon),
            Self::StatementEnd => matches!(kind, TokenKind::Semicolon | TokenKind::End),
            Self::CommaOrRParen => matches!(kind, TokenKind::Comma | TokenKind::RParen),
            Self::CommaOrRBracket => matches!(kind, TokenKind::Comma | TokenKind::RBracket),
            Self::CommaOrRBrace => matches!(kind, TokenKind::Comma | TokenKind::RBrace),
        }
    }

    /// A human-readable list of the accepted terminators.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::EndOfText => "end of input",
            Self::RParen => "')'",
            Self::RBracket => "']'",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::StatementEnd => "';' or end of input",
            Self::CommaOrRParen => "',' or ')'",
            Self::CommaOrRBracket => "',' or ']'",
            Self::CommaOrRBrace => "',' or '}'",
        }
    }
}

impl Parser<'_> {
    /// Parses a comma-separated list of items up to `closing`.
    ///
    /// This utility is shared by list literals, dict literals and call
    /// argument lists. The opening token must already be consumed. Each call
    /// to `parse_item` parses one item including the token that ends it and
    /// returns that token's kind; parsing stops once it is `closing`. An
    /// immediately encountered closing token gives an empty list, and a
    /// trailing comma before the closer is tolerated.
    ///
    /// # Errors
    /// Propagates the first error reported by `parse_item`.
    pub(super) fn parse_comma_separated<T>(&mut self,
                                           closing: &TokenKind,
                                           mut parse_item: impl FnMut(&mut Self)
                                                                 -> ParseResult<(T, TokenKind)>)
                                           -> ParseResult<Vec<T>> {
        let mut items = Vec::new();

        while !self.eat(closing) {
            let (item, terminator) = parse_item(self)?;
            items.push(item);
            if terminator == *closing {
                break;
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_end_accepts_end_of_text() {
        assert!(Completion::StatementEnd.accepts(&TokenKind::End));
        assert!(Completion::StatementEnd.accepts(&TokenKind::Semicolon));
        assert!(!Completion::Semicolon.accepts(&TokenKind::End));
    }

    #[test]
    fn comma_modes_accept_their_closer() {
        assert!(Completion::CommaOrRBrace.accepts(&TokenKind::Comma));
        assert!(Completion::CommaOrRBrace.accepts(&TokenKind::RBrace));
        assert!(!Completion::CommaOrRBrace.accepts(&TokenKind::RParen));
    }
}
