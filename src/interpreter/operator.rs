use std::{fmt, mem::Discriminant, sync::LazyLock};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::interpreter::lexer::TokenKind;

/// Where an operator stands relative to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Before its single operand, as in `-x`.
    Prefix,
    /// Between two operands, as in `a + b`.
    Infix,
    /// After its operand, as in `x++` or `f(...)`.
    Postfix,
}

/// How operators of equal precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `8 - 4 - 2` groups as `(8 - 4) - 2`.
    LeftToRight,
    /// `a = b = c` groups as `a = (b = c)`.
    RightToLeft,
}

/// Every operator the expression parser can produce.
///
/// A token may map to several operators depending on its position: `-` is
/// both [`Operator::Negate`] and [`Operator::Sub`], `(` is both grouping and
/// [`Operator::Call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Bottom marker of the operator stack. Binds loosest of all.
    Sentinel,
    /// `x++`
    PostIncrement,
    /// `x--`
    PostDecrement,
    /// `f(...)`
    Call,
    /// `a[i]`
    Index,
    /// `a.b`
    Member,
    /// `++x`
    PreIncrement,
    /// `--x`
    PreDecrement,
    /// `+x`
    Plus,
    /// `-x`
    Negate,
    /// `!x`
    Not,
    /// `~x`
    BitNot,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `&`
    BitAnd,
    /// `^`
    BitXor,
    /// `|`
    BitOr,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `c ? a : b`
    Ternary,
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
    /// `%=`
    ModAssign,
    /// `<<=`
    ShlAssign,
    /// `>>=`
    ShrAssign,
    /// `&=`
    BitAndAssign,
    /// `|=`
    BitOrAssign,
    /// `^=`
    BitXorAssign,
}

/// The fixed facets of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    /// Prefix, infix or postfix.
    pub position:      Position,
    /// Lower numbers bind tighter.
    pub precedence:    u8,
    /// Grouping of equal-precedence chains.
    pub associativity: Associativity,
}

/// One row of the operator table.
struct OperatorRecord {
    token:         Option<TokenKind>,
    position:      Position,
    operator:      Operator,
    precedence:    u8,
    associativity: Associativity,
}

/// Lowest possible binding strength; reserved for [`Operator::Sentinel`].
pub const SENTINEL_PRECEDENCE: u8 = u8::MAX;

/// The single ordered list both lookup maps are derived from.
fn records() -> Vec<OperatorRecord> {
    use Associativity::{LeftToRight as L, RightToLeft as R};
    use Position::{Infix, Postfix, Prefix};

    let row = |token, position, operator, precedence, associativity| {
        OperatorRecord { token: Some(token),
                         position,
                         operator,
                         precedence,
                         associativity }
    };

    vec![OperatorRecord { token:         None,
                          position:      Infix,
                          operator:      Operator::Sentinel,
                          precedence:    SENTINEL_PRECEDENCE,
                          associativity: L, },
         row(TokenKind::PlusPlus, Postfix, Operator::PostIncrement, 1, L),
         row(TokenKind::MinusMinus, Postfix, Operator::PostDecrement, 1, L),
         row(TokenKind::LParen, Postfix, Operator::Call, 1, L),
         row(TokenKind::LBracket, Postfix, Operator::Index, 1, L),
         row(TokenKind::Dot, Postfix, Operator::Member, 1, L),
         row(TokenKind::PlusPlus, Prefix, Operator::PreIncrement, 2, R),
         row(TokenKind::MinusMinus, Prefix, Operator::PreDecrement, 2, R),
         row(TokenKind::Plus, Prefix, Operator::Plus, 2, R),
         row(TokenKind::Minus, Prefix, Operator::Negate, 2, R),
         row(TokenKind::Bang, Prefix, Operator::Not, 2, R),
         row(TokenKind::Tilde, Prefix, Operator::BitNot, 2, R),
         row(TokenKind::Star, Infix, Operator::Mul, 3, L),
         row(TokenKind::Slash, Infix, Operator::Div, 3, L),
         row(TokenKind::Percent, Infix, Operator::Mod, 3, L),
         row(TokenKind::Plus, Infix, Operator::Add, 4, L),
         row(TokenKind::Minus, Infix, Operator::Sub, 4, L),
         row(TokenKind::ShiftLeft, Infix, Operator::Shl, 5, L),
         row(TokenKind::ShiftRight, Infix, Operator::Shr, 5, L),
         row(TokenKind::Less, Infix, Operator::Less, 6, L),
         row(TokenKind::LessEqual, Infix, Operator::LessEqual, 6, L),
         row(TokenKind::Greater, Infix, Operator::Greater, 6, L),
         row(TokenKind::GreaterEqual, Infix, Operator::GreaterEqual, 6, L),
         row(TokenKind::EqualEqual, Infix, Operator::Equal, 7, L),
         row(TokenKind::BangEqual, Infix, Operator::NotEqual, 7, L),
         row(TokenKind::Ampersand, Infix, Operator::BitAnd, 8, L),
         row(TokenKind::Caret, Infix, Operator::BitXor, 9, L),
         row(TokenKind::Pipe, Infix, Operator::BitOr, 10, L),
         row(TokenKind::AndAnd, Infix, Operator::And, 11, L),
         row(TokenKind::OrOr, Infix, Operator::Or, 12, L),
         row(TokenKind::Question, Infix, Operator::Ternary, 13, R),
         row(TokenKind::Assign, Infix, Operator::Assign, 14, R),
         row(TokenKind::PlusAssign, Infix, Operator::AddAssign, 14, R),
         row(TokenKind::MinusAssign, Infix, Operator::SubAssign, 14, R),
         row(TokenKind::StarAssign, Infix, Operator::MulAssign, 14, R),
         row(TokenKind::SlashAssign, Infix, Operator::DivAssign, 14, R),
         row(TokenKind::PercentAssign, Infix, Operator::ModAssign, 14, R),
         row(TokenKind::ShiftLeftAssign, Infix, Operator::ShlAssign, 14, R),
         row(TokenKind::ShiftRightAssign, Infix, Operator::ShrAssign, 14, R),
         row(TokenKind::AmpersandAssign, Infix, Operator::BitAndAssign, 14, R),
         row(TokenKind::PipeAssign, Infix, Operator::BitOrAssign, 14, R),
         row(TokenKind::CaretAssign, Infix, Operator::BitXorAssign, 14, R),]
}

/// The two lookup structures derived from [`records`].
struct OperatorTable {
    by_token: FxHashMap<(Discriminant<TokenKind>, Position), Operator>,
    info:     FxHashMap<Operator, OperatorInfo>,
}

impl OperatorTable {
    fn build() -> Self {
        let mut by_token = FxHashMap::default();
        let mut info = FxHashMap::default();

        for record in records() {
            if let Some(token) = &record.token {
                by_token.insert((std::mem::discriminant(token), record.position), record.operator);
            }
            info.insert(record.operator,
                        OperatorInfo { position:      record.position,
                                       precedence:    record.precedence,
                                       associativity: record.associativity, });
        }

        debug!(operators = info.len(), "operator table built");
        Self { by_token, info }
    }
}

static TABLE: LazyLock<OperatorTable> = LazyLock::new(OperatorTable::build);

/// Maps a token in a given position to the operator it denotes, if any.
///
/// # Example
/// ```
/// use cinder::interpreter::{
///     lexer::TokenKind,
///     operator::{Operator, Position, lookup},
/// };
///
/// assert_eq!(lookup(&TokenKind::Minus, Position::Prefix), Some(Operator::Negate));
/// assert_eq!(lookup(&TokenKind::Minus, Position::Infix), Some(Operator::Sub));
/// assert_eq!(lookup(&TokenKind::Comma, Position::Infix), None);
/// ```
#[must_use]
pub fn lookup(kind: &TokenKind, position: Position) -> Option<Operator> {
    TABLE.by_token.get(&(std::mem::discriminant(kind), position)).copied()
}

impl Operator {
    /// Returns the operator's position, precedence and associativity.
    #[must_use]
    pub fn info(self) -> OperatorInfo {
        TABLE.info.get(&self).copied().unwrap_or(OperatorInfo { position:      Position::Infix,
                                                                precedence:    SENTINEL_PRECEDENCE,
                                                                associativity:
                                                                    Associativity::LeftToRight, })
    }

    /// Shorthand for `self.info().precedence`.
    #[must_use]
    pub fn precedence(self) -> u8 {
        self.info().precedence
    }

    /// Returns `true` if an operator already on the stack must be reduced
    /// before `incoming` is pushed.
    ///
    /// Reduction happens when `self` binds strictly tighter, or equally
    /// tightly and `incoming` groups left to right.
    #[must_use]
    pub fn reduces_before(self, incoming: Self) -> bool {
        let top = self.info();
        let next = incoming.info();
        top.precedence < next.precedence
        || (top.precedence == next.precedence
            && next.associativity == Associativity::LeftToRight)
    }

    /// For compound assignments, the plain operator they apply; `None` for
    /// every other operator.
    #[must_use]
    pub const fn compound_base(self) -> Option<Self> {
        match self {
            Self::AddAssign => Some(Self::Add),
            Self::SubAssign => Some(Self::Sub),
            Self::MulAssign => Some(Self::Mul),
            Self::DivAssign => Some(Self::Div),
            Self::ModAssign => Some(Self::Mod),
            Self::ShlAssign => Some(Self::Shl),
            Self::ShrAssign => Some(Self::Shr),
            Self::BitAndAssign => Some(Self::BitAnd),
            Self::BitOrAssign => Some(Self::BitOr),
            Self::BitXorAssign => Some(Self::BitXor),
            _ => None,
        }
    }

    /// The source text of the operator, for diagnostics.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Sentinel => "<sentinel>",
            Self::PostIncrement | Self::PreIncrement => "++",
            Self::PostDecrement | Self::PreDecrement => "--",
            Self::Call => "()",
            Self::Index => "[]",
            Self::Member => ".",
            Self::Plus | Self::Add => "+",
            Self::Negate | Self::Sub => "-",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::And => "&&",
            Self::Or => "||",
            Self::Ternary => "?:",
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::ModAssign => "%=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::BitAndAssign => "&=",
            Self::BitOrAssign => "|=",
            Self::BitXorAssign => "^=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operator_has_info() {
        for record in records() {
            assert_eq!(record.operator.precedence(), record.precedence);
        }
    }

    #[test]
    fn sentinel_binds_loosest() {
        let loosest = records().iter()
                               .filter(|r| r.operator != Operator::Sentinel)
                               .map(|r| r.precedence)
                               .max()
                               .unwrap();
        assert!(Operator::Sentinel.precedence() > loosest);
    }

    #[test]
    fn associativity_drives_reduction() {
        assert!(Operator::Sub.reduces_before(Operator::Sub));
        assert!(Operator::Mul.reduces_before(Operator::Add));
        assert!(!Operator::Add.reduces_before(Operator::Mul));
        assert!(!Operator::Assign.reduces_before(Operator::Assign));
        assert!(!Operator::Not.reduces_before(Operator::Not));
        assert!(!Operator::Sentinel.reduces_before(Operator::Assign));
    }

    #[test]
    fn compound_assignments_map_to_plain_operators() {
        assert_eq!(Operator::ShrAssign.compound_base(), Some(Operator::Shr));
        assert_eq!(Operator::Assign.compound_base(), None);
    }
}
