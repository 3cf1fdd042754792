use std::fmt;
use crate::{
    parser::{
        fmt::{fmt_paren, Latex},
        group::closes_at_end,
        Parse,
    },
    tokenizer::{Token, TokenKind},
};
use super::Expression;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A power, written `base^{exponent}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Exponent {
    /// The base of the power.
    pub base: Expression,

    /// The exponent of the power.
    pub exponent: Expression,
}

/// Returns the index of the first `^` that is not nested inside a group.
fn top_level_caret(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0isize;
    for (i, token) in tokens.iter().enumerate() {
        if token.kind.is_open() {
            depth += 1;
        } else if token.kind.is_close() {
            depth -= 1;
        } else if depth == 0 && token.kind == TokenKind::Exp {
            return Some(i);
        }
    }
    None
}

impl Parse for Exponent {
    /// Parses a power from the first top-level `^` in the span.
    ///
    /// Everything before the `^` is the base, so `2x^2` is the square of `2x`. The exponent is
    /// either the single token after the `^`, or a group that closes at the end of the span.
    /// Anything after the exponent makes the span invalid, which also rejects `a^b^c`.
    fn parse(tokens: &[Token]) -> Option<Self> {
        let caret = top_level_caret(tokens)?;
        let (base, rest) = (&tokens[..caret], &tokens[caret + 1..]);
        if base.is_empty() {
            return None;
        }

        let exponent = match rest.first()?.kind {
            TokenKind::OpenCurly if closes_at_end(rest, 0) => &rest[1..rest.len() - 1],
            TokenKind::OpenParen if closes_at_end(rest, 0) => rest,
            _ if rest.len() == 1 => rest,
            _ => return None,
        };

        Some(Self {
            base: Expression::parse(base)?,
            exponent: Expression::parse(exponent)?,
        })
    }
}

impl Latex for Exponent {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.base.items.as_slice() {
            // a single factor needs no parentheses
            [item] if item.positive && item.factors.len() == 1 => item.fmt_factors(f)?,
            _ => fmt_paren(f, &self.base)?,
        }
        write!(f, "^{{")?;
        self.exponent.fmt_latex(f)?;
        write!(f, "}}")
    }
}
