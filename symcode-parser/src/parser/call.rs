use crate::{
    parser::{error::{kind, Error}, expr::Expr, literal::LitSym, Parse, Parser},
    tokenizer::TokenKind,
};
use std::ops::Range;

/// A function call, such as `sin(x)` or `atan2(y, x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// The name of the function being called.
    pub name: LitSym,

    /// The arguments passed to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        let open = input.next_token()?;
        if open.kind != TokenKind::OpenParen {
            return Err(Error::new(vec![open.span], kind::UnexpectedToken {
                expected: &[TokenKind::OpenParen],
                found: open.kind,
            }));
        }

        let args = if input.peek_token().is_some_and(|token| token.kind == TokenKind::CloseParen) {
            Vec::new()
        } else {
            input.try_parse_delimited::<Expr>(TokenKind::Comma)?
        };

        match input.next_token() {
            Ok(close) if close.kind == TokenKind::CloseParen => {
                let span = name.span.start..close.span.end;
                Ok(Self {
                    name,
                    args,
                    span,
                    paren_span: open.span.start..close.span.end,
                })
            },
            _ => Err(Error::new(vec![open.span], kind::UnclosedParenthesis)),
        }
    }
}
