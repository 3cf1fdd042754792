use std::fmt;
use crate::{
    parser::{
        fmt::Latex,
        group::{closes_at_end, matching_close},
        Parse,
    },
    tokenizer::{Token, TokenKind},
};
use super::{Expression, Factor};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A fraction, written `\frac{numerator}{denominator}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fraction {
    /// The numerator of the fraction.
    pub numerator: Expression,

    /// The denominator of the fraction.
    pub denominator: Expression,
}

impl Fraction {
    /// Creates the fraction `1 / factor`.
    pub fn reciprocal(factor: Factor) -> Self {
        Self {
            numerator: Expression::number(1.0),
            denominator: Expression::from_factor(factor),
        }
    }
}

impl Parse for Fraction {
    fn parse(tokens: &[Token]) -> Option<Self> {
        if tokens.first()?.kind != TokenKind::Frac || tokens.get(1)?.kind != TokenKind::OpenCurly {
            return None;
        }

        let numerator_end = matching_close(tokens, 1)?;
        let denominator_start = numerator_end + 1;
        if tokens.get(denominator_start)?.kind != TokenKind::OpenCurly
            || !closes_at_end(tokens, denominator_start) {
            return None;
        }

        Some(Self {
            numerator: Expression::parse(&tokens[2..numerator_end])?,
            denominator: Expression::parse(&tokens[denominator_start + 1..tokens.len() - 1])?,
        })
    }
}

impl Latex for Fraction {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\frac{{")?;
        self.numerator.fmt_latex(f)?;
        write!(f, "}}{{")?;
        self.denominator.fmt_latex(f)?;
        write!(f, "}}")
    }
}
