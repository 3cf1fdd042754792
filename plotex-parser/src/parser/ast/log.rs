use std::fmt;
use crate::{
    parser::{
        fmt::{fmt_paren, Latex},
        group::matching_close,
        Parse,
    },
    tokenizer::{Token, TokenKind},
};
use super::{unary::argument_tokens, Expression};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A logarithm with an explicit base, written `\log_{base}(antilog)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Log {
    /// The base of the logarithm.
    pub base: Expression,

    /// The value whose logarithm is taken.
    pub antilog: Expression,
}

impl Log {
    /// Computes the logarithm of `antilog` in the given `base`.
    pub fn apply(base: f64, antilog: f64) -> f64 {
        antilog.ln() / base.ln()
    }
}

impl Parse for Log {
    /// Parses `\log_`, then a base that is either a single token or a `{...}` group, then the
    /// antilog following the same rules as the argument of [`Unary`](super::Unary) functions.
    fn parse(tokens: &[Token]) -> Option<Self> {
        if tokens.first()?.kind != TokenKind::LogBase {
            return None;
        }

        let (base, rest) = match tokens.get(1)?.kind {
            TokenKind::OpenCurly => {
                let close = matching_close(tokens, 1)?;
                (&tokens[2..close], &tokens[close + 1..])
            },
            _ => (&tokens[1..2], &tokens[2..]),
        };

        Some(Self {
            base: Expression::parse(base)?,
            antilog: Expression::parse(argument_tokens(rest)?)?,
        })
    }
}

impl Latex for Log {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\log_{{")?;
        self.base.fmt_latex(f)?;
        write!(f, "}}")?;
        fmt_paren(f, &self.antilog)
    }
}
