use crate::{
    parser::{error::{kind, Error}, expr::Expr, Parse, Parser},
    tokenizer::TokenKind,
};
use std::ops::Range;

/// A parenthesized expression, such as `(a + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this expression was parsed from, including the
    /// parentheses.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the innermost expression that is not parenthesized.
    pub fn innermost(&self) -> &Expr {
        let mut inner = &*self.expr;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.next_token()?;
        if open.kind != TokenKind::OpenParen {
            return Err(Error::new(vec![open.span], kind::UnexpectedToken {
                expected: &[TokenKind::OpenParen],
                found: open.kind,
            }));
        }

        if input.peek_token().is_some_and(|token| token.kind == TokenKind::CloseParen) {
            let close = input.next_token()?;
            return Err(Error::new(vec![open.span.start..close.span.end], kind::EmptyParenthesis));
        }

        let expr = input.try_parse::<Expr>()?;
        match input.next_token() {
            Ok(close) if close.kind == TokenKind::CloseParen => Ok(Self {
                expr: Box::new(expr),
                span: open.span.start..close.span.end,
            }),
            _ => Err(Error::new(vec![open.span], kind::UnclosedParenthesis)),
        }
    }
}
