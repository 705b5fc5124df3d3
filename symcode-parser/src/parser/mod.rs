pub mod binary;
pub mod call;
pub mod error;
pub mod expr;
pub mod literal;
pub mod paren;
pub mod token;
pub mod unary;

use error::{Error, kind};
use symcode_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A backtracking parser over the tokens of one source string.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    tokens: Box<[Token<'source>]>,

    /// Index of the next token to consume.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the next non-whitespace token without moving the cursor.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Moves the cursor past any whitespace tokens.
    pub fn skip_whitespace(&mut self) {
        while self.current_token().is_some_and(Token::is_whitespace) {
            self.cursor += 1;
        }
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        self.skip_whitespace();
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(self.error(kind::UnexpectedEof)),
        }
    }

    /// Parses a value, moving the cursor back to where it was if parsing fails. Alternatives are
    /// tried this way.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        let start = self.cursor;
        T::parse(self).map_err(|err| {
            self.cursor = start;
            err
        })
    }

    /// Parses a value from the stream without consuming it. The cursor is always left where it
    /// was.
    pub fn peek<T: Parse>(&mut self) -> Option<T> {
        self.peek_with_fn(T::parse)
    }

    /// Runs a parsing function without consuming anything, returning its result if it succeeded.
    /// The cursor is always left where it was.
    pub fn peek_with_fn<T, F>(&mut self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        let value = f(self).ok();
        self.cursor = start;
        value
    }

    /// Parses one or more values separated by `delimiter`, such as the arguments of a call. On
    /// failure, nothing is consumed.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let start = self.cursor;
        let mut values = Vec::new();

        loop {
            match self.try_parse::<T>() {
                Ok(value) => values.push(value),
                Err(err) => {
                    self.cursor = start;
                    return Err(err);
                },
            }

            match self.peek_token() {
                Some(token) if token.kind == delimiter => {
                    self.next_token()?;
                },
                _ => return Ok(values),
            }
        }
    }

    /// Parses a value that must span the whole source. Trailing tokens are reported as one
    /// [`kind::ExpectedEof`] error covering all of them.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        self.skip_whitespace();

        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            Err(Error::new(vec![self.span().start..self.eof_span().end], kind::ExpectedEof))
        }
    }
}

/// A syntax node that can be parsed from tokens.
pub trait Parse: Sized {
    /// Parses the node at the cursor. On failure the cursor may be left anywhere; use
    /// [`Parser::try_parse`] to backtrack.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use binary::Binary;
    use call::Call;
    use expr::Expr;
    use literal::{LitNum, LitSym, Literal};
    use paren::Paren;
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};
    use unary::Unary;

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn int(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Integer(LitNum { value: value.to_string(), span }))
    }

    fn bin(lhs: Expr, kind: BinOpKind, op_span: Range<usize>, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, int("16", 0..2));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.5e2");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Literal(Literal::Float(LitNum { value: "3.5e2".to_string(), span: 0..5 })));
    }

    #[test]
    fn term_and_factor() {
        let mut parser = Parser::new("a + b * c");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, bin(
            sym("a", 0..1),
            BinOpKind::Add,
            2..3,
            bin(sym("b", 4..5), BinOpKind::Mul, 6..7, sym("c", 8..9)),
        ));
    }

    #[test]
    fn left_associative_sub() {
        let mut parser = Parser::new("a-b-c");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, bin(
            bin(sym("a", 0..1), BinOpKind::Sub, 1..2, sym("b", 2..3)),
            BinOpKind::Sub,
            3..4,
            sym("c", 4..5),
        ));
    }

    #[test]
    fn right_associative_exp() {
        let mut parser = Parser::new("a^b^c");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, bin(
            sym("a", 0..1),
            BinOpKind::Exp,
            1..2,
            bin(sym("b", 2..3), BinOpKind::Exp, 3..4, sym("c", 4..5)),
        ));
    }

    #[test]
    fn neg_binds_looser_than_exp() {
        let mut parser = Parser::new("-x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(bin(sym("x", 1..2), BinOpKind::Exp, 2..3, int("2", 3..4))),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..4,
        }));
    }

    #[test]
    fn neg_binds_tighter_than_mul() {
        let mut parser = Parser::new("-x*y");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, bin(
            Expr::Unary(Unary {
                operand: Box::new(sym("x", 1..2)),
                op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
                span: 0..2,
            }),
            BinOpKind::Mul,
            2..3,
            sym("y", 3..4),
        ));
    }

    #[test]
    fn call_with_args() {
        let mut parser = Parser::new("atan2(y, x + 1)");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Call(Call {
            name: LitSym { name: "atan2".to_string(), span: 0..5 },
            args: vec![
                sym("y", 6..7),
                bin(sym("x", 9..10), BinOpKind::Add, 11..12, int("1", 13..14)),
            ],
            span: 0..15,
            paren_span: 5..15,
        }));
    }

    #[test]
    fn paren_groups() {
        let mut parser = Parser::new("(a + b) * c");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, bin(
            Expr::Paren(Paren {
                expr: Box::new(bin(sym("a", 1..2), BinOpKind::Add, 3..4, sym("b", 5..6))),
                span: 0..7,
            }),
            BinOpKind::Mul,
            8..9,
            sym("c", 10..11),
        ));
    }

    #[test]
    fn trailing_whitespace() {
        let mut parser = Parser::new("x * y \n");
        assert!(parser.try_parse_full::<Expr>().is_ok());
    }

    #[test]
    fn unclosed_paren() {
        let mut parser = Parser::new("(a + b");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::UnclosedParenthesis>());
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn empty_paren() {
        let mut parser = Parser::new("2 * ()");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::EmptyParenthesis>());
    }

    #[test]
    fn unexpected_eof() {
        let mut parser = Parser::new("a +");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::UnexpectedEof>());
    }

    #[test]
    fn expected_eof() {
        let mut parser = Parser::new("a b");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::ExpectedEof>());
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn unexpected_token() {
        let mut parser = Parser::new("a * $");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert!(err.is::<kind::UnexpectedToken>());
    }
}
