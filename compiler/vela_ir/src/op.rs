//! Operator enumerations consumed by the parser and later phases.
//!
//! `BinaryOp` keeps every plain operator ahead of its compound-assignment
//! counterpart, with [`BinaryOp::Assign`] as the fixed boundary: "is this
//! an assigning operator" is a single range comparison, not a match.

use crate::TokenKind;

/// Assignment operators, `=` and the compound forms.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum AssignOp {
    Error = 0,
    Assign,
    MultAssign,
    AddAssign,
    SubAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShrAssign,
    ShlAssign,
}

impl AssignOp {
    /// Map an assignment-shaped token to its operator.
    pub fn from_token(kind: TokenKind) -> Option<AssignOp> {
        Some(match kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::MultAssign => AssignOp::MultAssign,
            TokenKind::PlusAssign => AssignOp::AddAssign,
            TokenKind::MinusAssign => AssignOp::SubAssign,
            TokenKind::DivAssign => AssignOp::DivAssign,
            TokenKind::ModAssign => AssignOp::ModAssign,
            TokenKind::AndAssign => AssignOp::AndAssign,
            TokenKind::OrAssign => AssignOp::OrAssign,
            TokenKind::BitAndAssign => AssignOp::BitAndAssign,
            TokenKind::BitOrAssign => AssignOp::BitOrAssign,
            TokenKind::BitXorAssign => AssignOp::BitXorAssign,
            TokenKind::ShrAssign => AssignOp::ShrAssign,
            TokenKind::ShlAssign => AssignOp::ShlAssign,
            _ => return None,
        })
    }
}

/// Binary operators. Plain forms first; after [`BinaryOp::Assign`],
/// only assigning forms follow.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum BinaryOp {
    Error = 0,
    Mult,
    Sub,
    Add,
    Div,
    Mod,
    Shr,
    Shl,
    BitOr,
    BitXor,
    BitAnd,
    And,
    Or,
    Gt,
    Ge,
    Lt,
    Le,
    Ne,
    Eq,
    // Only "assign" ops after this point.
    Assign,
    MultAssign,
    AddAssign,
    SubAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShrAssign,
    ShlAssign,
}

impl BinaryOp {
    /// First assigning member; everything from here on assigns.
    pub const FIRST_ASSIGN: BinaryOp = BinaryOp::Assign;

    /// Single range comparison, per the enumeration layout.
    #[inline]
    pub fn is_assignment(self) -> bool {
        self >= BinaryOp::FIRST_ASSIGN
    }

    /// The plain operator a compound assignment applies, e.g.
    /// `AddAssign -> Add`. Plain `Assign` and non-assigning operators
    /// have none.
    pub fn base_op(self) -> Option<BinaryOp> {
        Some(match self {
            BinaryOp::MultAssign => BinaryOp::Mult,
            BinaryOp::AddAssign => BinaryOp::Add,
            BinaryOp::SubAssign => BinaryOp::Sub,
            BinaryOp::DivAssign => BinaryOp::Div,
            BinaryOp::ModAssign => BinaryOp::Mod,
            BinaryOp::AndAssign => BinaryOp::And,
            BinaryOp::OrAssign => BinaryOp::Or,
            BinaryOp::BitAndAssign => BinaryOp::BitAnd,
            BinaryOp::BitOrAssign => BinaryOp::BitOr,
            BinaryOp::BitXorAssign => BinaryOp::BitXor,
            BinaryOp::ShrAssign => BinaryOp::Shr,
            BinaryOp::ShlAssign => BinaryOp::Shl,
            _ => return None,
        })
    }

    /// Map an operator token to its binary operator.
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        Some(match kind {
            TokenKind::Star => BinaryOp::Mult,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Div => BinaryOp::Div,
            TokenKind::Mod => BinaryOp::Mod,
            TokenKind::Shr => BinaryOp::Shr,
            TokenKind::Shl => BinaryOp::Shl,
            TokenKind::BitOr => BinaryOp::BitOr,
            TokenKind::BitXor => BinaryOp::BitXor,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            TokenKind::Greater => BinaryOp::Gt,
            TokenKind::GreaterEq => BinaryOp::Ge,
            TokenKind::Less => BinaryOp::Lt,
            TokenKind::LessEq => BinaryOp::Le,
            TokenKind::NotEqual => BinaryOp::Ne,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::Eq => BinaryOp::Assign,
            TokenKind::MultAssign => BinaryOp::MultAssign,
            TokenKind::PlusAssign => BinaryOp::AddAssign,
            TokenKind::MinusAssign => BinaryOp::SubAssign,
            TokenKind::DivAssign => BinaryOp::DivAssign,
            TokenKind::ModAssign => BinaryOp::ModAssign,
            TokenKind::AndAssign => BinaryOp::AndAssign,
            TokenKind::OrAssign => BinaryOp::OrAssign,
            TokenKind::BitAndAssign => BinaryOp::BitAndAssign,
            TokenKind::BitOrAssign => BinaryOp::BitOrAssign,
            TokenKind::BitXorAssign => BinaryOp::BitXorAssign,
            TokenKind::ShrAssign => BinaryOp::ShrAssign,
            TokenKind::ShlAssign => BinaryOp::ShlAssign,
            _ => return None,
        })
    }
}

/// Prefix and postfix unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum UnaryOp {
    Error = 0,
    Deref,
    Addr,
    Neg,
    BitNeg,
    Not,
    Inc,
    Dec,
}

impl UnaryOp {
    /// Map a prefix-position token to its unary operator.
    pub fn from_token(kind: TokenKind) -> Option<UnaryOp> {
        Some(match kind {
            TokenKind::Star => UnaryOp::Deref,
            TokenKind::Amp => UnaryOp::Addr,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::BitNot => UnaryOp::BitNeg,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::PlusPlus => UnaryOp::Inc,
            TokenKind::MinusMinus => UnaryOp::Dec,
            _ => return None,
        })
    }
}
