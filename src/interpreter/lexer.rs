use std::{fmt, sync::Arc};

use logos::Logos;
use tracing::debug;

use crate::error::LexError;

/// Represents the kind of a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Symbol tokens are matched longest-first, and reserved words outrank the
/// identifier pattern, so `>>=` is one token and `if` is never an identifier.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum TokenKind {
    /// Float literal tokens: a maximal run of digits and dots containing a
    /// dot, such as `3.14` or `2.`.
    #[regex(r"[0-9]+\.[0-9.]*", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Int(i64),
    /// String literal tokens. The payload excludes the quotes; no escape
    /// sequences are processed.
    #[regex(r#""[^"]*""#, parse_string, allow_greedy = true)]
    #[regex(r"'[^']*'", parse_string, allow_greedy = true)]
    Str(String),
    /// Boolean literal tokens, `true` or `false`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `return`
    #[token("return")]
    Return,
    /// `function`
    #[token("function")]
    Function,

    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `:`
    #[token(":")]
    Colon,
    /// `?`
    #[token("?")]
    Question,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,

    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `^`
    #[token("^")]
    Caret,
    /// `~`
    #[token("~")]
    Tilde,
    /// `<<`
    #[token("<<")]
    ShiftLeft,
    /// `>>`
    #[token(">>")]
    ShiftRight,

    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `!`
    #[token("!")]
    Bang,

    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,

    /// `=`
    #[token("=")]
    Assign,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `<<=`
    #[token("<<=")]
    ShiftLeftAssign,
    /// `>>=`
    #[token(">>=")]
    ShiftRightAssign,
    /// `&=`
    #[token("&=")]
    AmpersandAssign,
    /// `|=`
    #[token("|=")]
    PipeAssign,
    /// `^=`
    #[token("^=")]
    CaretAssign,

    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    LineComment,
    /// `/* Block comments. */`
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    BlockComment,
    /// Spaces, tabs, feeds and newlines.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Ignored,

    /// End-of-stream sentinel. Never produced by the DFA; appended once by
    /// [`tokenize`].
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            // Plain notation with a dot, the only form the float pattern reads.
            Self::Float(value) if value.fract() == 0.0 => return write!(f, "{value}.0"),
            Self::Float(value) => return write!(f, "{value}"),
            Self::Int(value) => return write!(f, "{value}"),
            Self::Str(text) if text.contains('\'') => return write!(f, "\"{text}\""),
            Self::Str(text) => return write!(f, "'{text}'"),
            Self::Bool(value) => return write!(f, "{value}"),
            Self::Identifier(name) => return f.write_str(name),
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Return => "return",
            Self::Function => "function",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Question => "?",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Bang => "!",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Assign => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
            Self::ShiftLeftAssign => "<<=",
            Self::ShiftRightAssign => ">>=",
            Self::AmpersandAssign => "&=",
            Self::PipeAssign => "|=",
            Self::CaretAssign => "^=",
            Self::LineComment | Self::BlockComment | Self::Ignored | Self::End => "",
        };
        f.write_str(symbol)
    }
}

/// A position in the source text, used for diagnostics.
///
/// Lines and columns are 1-based; columns count bytes from the start of the
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// The name of the source file, if the text came from one.
    pub file:   Option<Arc<str>>,
    /// The source line.
    pub line:   usize,
    /// The source column.
    pub column: usize,
}

impl Location {
    /// Creates a location without a file name.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { file: None,
               line,
               column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}:{}", self.line, self.column),
            None => write!(f, "line {}, column {}", self.line, self.column),
        }
    }
}

/// A token together with the place it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is.
    pub kind:     TokenKind,
    /// Where the token starts.
    pub location: Location,
}

/// Byte offsets of every line start, for offset to line/column translation.
struct LineIndex {
    starts: Vec<usize>,
    file:   Option<Arc<str>>,
}

impl LineIndex {
    fn new(source: &str, file: Option<Arc<str>>) -> Self {
        let starts = std::iter::once(0).chain(source.match_indices('\n').map(|(i, _)| i + 1))
                                       .collect();
        Self { starts, file }
    }

    fn locate(&self, offset: usize) -> Location {
        let line = self.starts.partition_point(|&start| start <= offset);
        let column = offset - self.starts[line - 1] + 1;
        Location { file: self.file.clone(),
                   line,
                   column }
    }
}

/// Converts source text into a token sequence terminated by
/// [`TokenKind::End`].
///
/// # Errors
/// Returns a [`LexError`] at the first character that does not start any
/// token. No tokens past the error are produced.
///
/// # Example
/// ```
/// use cinder::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("a >>= 2; // shift").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Identifier("a".into()),
///                 TokenKind::ShiftRightAssign,
///                 TokenKind::Int(2),
///                 TokenKind::Semicolon,
///                 TokenKind::End]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_named(source, None)
}

/// Same as [`tokenize`], but stamps every location with a file name.
pub fn tokenize_named(source: &str, file: Option<&str>) -> Result<Vec<Token>, LexError> {
    let index = LineIndex::new(source, file.map(Arc::from));
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let location = index.locate(lexer.span().start);
        match result {
            Ok(kind) => tokens.push(Token { kind, location }),
            Err(()) => {
                let slice = lexer.slice();
                return Err(if slice.starts_with(|c: char| c.is_ascii_digit()) {
                               LexError::InvalidNumber { text: slice.to_string(),
                                                         location }
                           } else {
                               let character = slice.chars().next().unwrap_or_default();
                               LexError::UnexpectedCharacter { character, location }
                           });
            },
        }
    }

    tokens.push(Token { kind:     TokenKind::End,
                        location: index.locate(source.len()), });
    debug!(count = tokens.len(), "tokenized source");

    Ok(tokens)
}

/// Writes a token sequence back out as source text.
///
/// Tokens are separated by single spaces, so re-tokenizing the result yields
/// the same kinds. The end sentinel is omitted.
#[must_use]
pub fn serialize(tokens: &[Token]) -> String {
    tokens.iter()
          .filter(|token| token.kind != TokenKind::End)
          .map(|token| token.kind.to_string())
          .collect::<Vec<_>>()
          .join(" ")
}

fn parse_float(lex: &logos::Lexer<TokenKind>) -> Option<f64> {
    lex.slice().parse().ok().filter(|value: &f64| value.is_finite())
}

fn parse_integer(lex: &logos::Lexer<TokenKind>) -> Option<i64> {
    lex.slice().parse().ok()
}

fn parse_string(lex: &logos::Lexer<TokenKind>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn longest_symbol_wins() {
        assert_eq!(kinds("a+++b"),
                   vec![TokenKind::Identifier("a".into()),
                        TokenKind::PlusPlus,
                        TokenKind::Plus,
                        TokenKind::Identifier("b".into()),
                        TokenKind::End]);
        assert_eq!(kinds("<<= << <= <"),
                   vec![TokenKind::ShiftLeftAssign,
                        TokenKind::ShiftLeft,
                        TokenKind::LessEqual,
                        TokenKind::Less,
                        TokenKind::End]);
    }

    #[test]
    fn keywords_outrank_identifiers() {
        assert_eq!(kinds("if iffy true truth"),
                   vec![TokenKind::If,
                        TokenKind::Identifier("iffy".into()),
                        TokenKind::Bool(true),
                        TokenKind::Identifier("truth".into()),
                        TokenKind::End]);
    }

    #[test]
    fn literals_carry_payloads() {
        assert_eq!(kinds(r#"12 3.5 'it' "x'y""#),
                   vec![TokenKind::Int(12),
                        TokenKind::Float(3.5),
                        TokenKind::Str("it".into()),
                        TokenKind::Str("x'y".into()),
                        TokenKind::End]);
    }

    #[test]
    fn comments_are_discarded() {
        assert_eq!(kinds("1 // one\n/* two\n ** */ 3"),
                   vec![TokenKind::Int(1), TokenKind::Int(3), TokenKind::End]);
    }

    #[test]
    fn locations_track_lines_and_columns() {
        let tokens = tokenize("a\n  'multi\nline' b").unwrap();

        assert_eq!(tokens[0].location, Location::new(1, 1));
        assert_eq!(tokens[1].location, Location::new(2, 3));
        assert_eq!(tokens[2].location, Location::new(3, 7));
    }

    #[test]
    fn file_names_are_stamped() {
        let tokens = tokenize_named("x", Some("main.cin")).unwrap();

        assert_eq!(tokens[0].location.to_string(), "main.cin:1:1");
    }

    #[test]
    fn unexpected_character_is_reported_with_position() {
        let err = tokenize("a = 1;\n b = #").unwrap_err();

        assert!(matches!(err,
                         LexError::UnexpectedCharacter { character: '#',
                                                         location: Location { line: 2,
                                                                              column: 6,
                                                                              .. } }));
    }

    #[test]
    fn malformed_number_is_rejected() {
        assert!(matches!(tokenize("1.2.3").unwrap_err(), LexError::InvalidNumber { .. }));
        assert!(matches!(tokenize("99999999999999999999").unwrap_err(),
                         LexError::InvalidNumber { .. }));
        let huge = format!("1{}.0", "0".repeat(400));
        assert!(matches!(tokenize(&huge).unwrap_err(), LexError::InvalidNumber { .. }));
    }

    #[test]
    fn serialize_round_trips() {
        let source = "for (i = 0; i < 2.0; i += 1) { log('a', \"b'c\"); }";
        let first = tokenize(source).unwrap();
        let second = tokenize(&serialize(&first)).unwrap();

        let strip = |tokens: Vec<Token>| tokens.into_iter().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(strip(first), strip(second));
    }

    #[test]
    fn floats_serialize_without_exponents() {
        for source in ["0.00001", "10000000000000000.0", "2.", "0.1", "123456789.125"] {
            let first = kinds(source);
            let text = serialize(&tokenize(source).unwrap());
            assert!(!text.contains("e-") && !text.contains("e+"), "{text}");
            assert_eq!(kinds(&text), first, "{source} -> {text}");
        }
        assert_eq!(TokenKind::Float(0.000_01).to_string(), "0.00001");
        assert_eq!(TokenKind::Float(1e16).to_string(), "10000000000000000.0");
    }
}
