//! Operator tokens.

use crate::{
    parser::{
        error::{kind, Error},
        Associativity,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;

/// The tokens that can start a binary operator, in order of decreasing precedence.
const BIN_OP_TOKENS: &[TokenKind] = &[
    TokenKind::Exp,
    TokenKind::Mul,
    TokenKind::Div,
    TokenKind::Add,
    TokenKind::Sub,
];

/// The only unary operation of the syntax.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOpKind {
    /// Negation, `-x`.
    Neg,
}

/// A unary operator, with the span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    pub kind: UnaryOpKind,
    pub span: Range<usize>,
}

impl UnaryOp {
    /// Negation binds looser than `^`, so that `-x^2` is `-(x^2)`.
    pub fn precedence(&self) -> Precedence {
        match self.kind {
            UnaryOpKind::Neg => Precedence::Neg,
        }
    }
}

impl Parse for UnaryOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        if token.kind != TokenKind::Sub {
            return Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[TokenKind::Sub],
                found: token.kind,
            }));
        }

        Ok(Self { kind: UnaryOpKind::Neg, span: token.span })
    }
}

/// A binary arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Add,
    Sub,
}

impl BinOpKind {
    fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Exp => Self::Exp,
            TokenKind::Mul => Self::Mul,
            TokenKind::Div => Self::Div,
            TokenKind::Add => Self::Add,
            TokenKind::Sub => Self::Sub,
            _ => return None,
        })
    }

    /// How tightly the operation binds its operands.
    pub fn precedence(self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
        }
    }

    /// Only `^` groups to the right: `a^b^c` is `a^(b^c)`.
    pub fn associativity(self) -> Associativity {
        if self == Self::Exp {
            Associativity::Right
        } else {
            Associativity::Left
        }
    }
}

/// A binary operator, with the span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub kind: BinOpKind,
    pub span: Range<usize>,
}

impl BinOp {
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for BinOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        match BinOpKind::from_token(token.kind) {
            Some(kind) => Ok(Self { kind, span: token.span }),
            None => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: BIN_OP_TOKENS,
                found: token.kind,
            })),
        }
    }
}
