use std::fmt;
use crate::{
    parser::{fmt::Latex, Parse},
    tokenizer::{Token, TokenKind},
};
use super::{env::Scope, Constant, Factor, Fraction, NamedConstant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A signed product of [`Factor`]s, such as `-2x\sin(x)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Whether the item is added to (`true`) or subtracted from the expression containing it.
    pub positive: bool,

    /// The factors of the item, in source order.
    pub factors: Vec<Factor>,
}

/// Parses the longest prefix of `tokens` that forms a single factor, returning the factor and the
/// number of tokens it spans.
///
/// Spans are tried from longest to shortest, and for each span the factor parsers are tried in
/// priority order (see [`Factor::parse`]); the first success wins.
fn longest_factor(tokens: &[Token]) -> Option<(Factor, usize)> {
    (1..=tokens.len())
        .rev()
        .find_map(|len| Factor::parse(&tokens[..len]).map(|factor| (factor, len)))
}

impl Parse for Item {
    fn parse(tokens: &[Token]) -> Option<Self> {
        let (positive, mut cursor) = match tokens.first()?.kind {
            TokenKind::Sub => (false, 1),
            TokenKind::Add => (true, 1),
            _ => (true, 0),
        };

        let mut factors = Vec::new();
        while cursor < tokens.len() {
            match tokens[cursor].kind {
                // explicit multiplication only separates two factors
                TokenKind::Mul => {
                    let next = tokens.get(cursor + 1).map(|token| token.kind);
                    if factors.is_empty() || matches!(next, None | Some(TokenKind::Mul | TokenKind::Div)) {
                        return None;
                    }
                    cursor += 1;
                },
                // division applies to the next factor only
                TokenKind::Div => {
                    if factors.is_empty() {
                        return None;
                    }
                    let (divisor, len) = longest_factor(&tokens[cursor + 1..])?;
                    factors.push(Factor::Fraction(Fraction::reciprocal(divisor)));
                    cursor += 1 + len;
                },
                _ => {
                    let (factor, len) = longest_factor(&tokens[cursor..])?;
                    factors.push(factor);
                    cursor += len;
                },
            }
        }

        if factors.is_empty() {
            return None;
        }
        Some(Self { positive, factors })
    }
}

impl Item {
    /// Creates an item from its sign and factors.
    pub fn new(positive: bool, factors: Vec<Factor>) -> Self {
        Self { positive, factors }
    }

    pub(crate) fn eval(&self, scope: &Scope) -> f64 {
        let sign = if self.positive { 1.0 } else { -1.0 };
        self.factors.iter().fold(sign, |product, factor| product * factor.eval(scope))
    }

    /// Formats the factors of the item, without its sign.
    pub(crate) fn fmt_factors(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, factor) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", separator(&self.factors[i - 1], factor))?;
            }
            factor.fmt_latex(f)?;
        }
        Ok(())
    }
}

/// Returns the text that separates two adjacent factors so that they are read back as two
/// factors.
fn separator(prev: &Factor, next: &Factor) -> &'static str {
    match (prev, next) {
        (_, Factor::Constant(Constant::Number(_))) => "\\cdot ",
        // `x(y)` would be read as a call to `x`
        (Factor::Variable(_), Factor::Bracket(_) | Factor::Call(_)) => "\\cdot ",
        (
            Factor::Constant(Constant::Named(NamedConstant::Pi)),
            Factor::Variable(_) | Factor::Call(_) | Factor::Constant(Constant::Named(NamedConstant::E)),
        ) => " ",
        _ => "",
    }
}

impl Latex for Item {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.positive {
            write!(f, "-")?;
        }
        self.fmt_factors(f)
    }
}
