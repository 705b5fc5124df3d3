use crate::{
    parser::{
        binary::Binary,
        call::Call,
        error::{kind, Error},
        literal::Literal,
        paren::Paren,
        unary::Unary,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

/// Any kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `sin(x)`.
    Call(Call),

    /// A unary operation, such as `-x`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }
}

/// Parses a primary expression: a literal, a function call, or a parenthesized expression.
pub fn parse_primary(input: &mut Parser) -> Result<Expr, Error> {
    match input.peek_token().map(|token| token.kind) {
        Some(TokenKind::Name) => {
            let is_call = input.peek_with_fn(|input| {
                input.next_token()?;
                input.next_token()
            }).is_some_and(|token| token.kind == TokenKind::OpenParen);

            if is_call {
                input.try_parse::<Call>().map(Expr::Call)
            } else {
                input.try_parse::<Literal>().map(Expr::Literal)
            }
        },
        Some(TokenKind::OpenParen) => input.try_parse::<Paren>().map(Expr::Paren),
        Some(TokenKind::Int | TokenKind::Float) => input.try_parse::<Literal>().map(Expr::Literal),
        Some(found) => {
            let token = input.next_token()?;
            Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Name,
                    TokenKind::OpenParen,
                    TokenKind::Sub,
                ],
                found,
            }))
        },
        None => Err(Error::new(vec![input.eof_span()], kind::UnexpectedEof)),
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = Unary::parse_or_lower(input)?;
        Binary::parse_expr(input, lhs, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => write!(f, "{}", literal),
            Expr::Paren(paren) => write!(f, "({})", paren.expr),
            Expr::Call(call) => {
                write!(f, "{}(", call.name.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            },
            Expr::Unary(unary) => write!(f, "{}", unary),
            Expr::Binary(binary) => write!(f, "{}", binary),
        }
    }
}
