use std::fmt;
use crate::{
    parser::{fmt::{fmt_paren, Latex}, Parse},
    tokenizer::{Token, TokenKind},
};
use super::Expression;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function of one argument that is written as a LaTeX command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryFunc {
    Ln,
    Lg,
    Sin,
    Arcsin,
    Cos,
    Arccos,
    Tan,
    Arctan,
    Csc,
    Arccsc,
    Sec,
    Arcsec,
    Cot,
    Arccot,
}

impl UnaryFunc {
    /// All unary functions, in parser priority order.
    pub const ALL: [UnaryFunc; 14] = [
        Self::Ln,
        Self::Lg,
        Self::Sin,
        Self::Arcsin,
        Self::Cos,
        Self::Arccos,
        Self::Tan,
        Self::Arctan,
        Self::Csc,
        Self::Arccsc,
        Self::Sec,
        Self::Arcsec,
        Self::Cot,
        Self::Arccot,
    ];

    /// Returns the function introduced by the given token.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Ln => Self::Ln,
            TokenKind::Lg => Self::Lg,
            TokenKind::Sin => Self::Sin,
            TokenKind::Arcsin => Self::Arcsin,
            TokenKind::Cos => Self::Cos,
            TokenKind::Arccos => Self::Arccos,
            TokenKind::Tan => Self::Tan,
            TokenKind::Arctan => Self::Arctan,
            TokenKind::Csc => Self::Csc,
            TokenKind::Arccsc => Self::Arccsc,
            TokenKind::Sec => Self::Sec,
            TokenKind::Arcsec => Self::Arcsec,
            TokenKind::Cot => Self::Cot,
            TokenKind::Arccot => Self::Arccot,
            _ => return None,
        })
    }

    /// Returns the LaTeX command of the function.
    pub fn command(self) -> &'static str {
        match self {
            Self::Ln => r"\ln",
            Self::Lg => r"\lg",
            Self::Sin => r"\sin",
            Self::Arcsin => r"\sin^{-1}",
            Self::Cos => r"\cos",
            Self::Arccos => r"\cos^{-1}",
            Self::Tan => r"\tan",
            Self::Arctan => r"\tan^{-1}",
            Self::Csc => r"\csc",
            Self::Arccsc => r"\csc^{-1}",
            Self::Sec => r"\sec",
            Self::Arcsec => r"\sec^{-1}",
            Self::Cot => r"\cot",
            Self::Arccot => r"\cot^{-1}",
        }
    }

    /// Applies the function to a value.
    ///
    /// Values outside of the domain of the function produce NaN or an infinity.
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Ln => v.ln(),
            Self::Lg => v.log10(),
            Self::Sin => v.sin(),
            Self::Arcsin => v.asin(),
            Self::Cos => v.cos(),
            Self::Arccos => v.acos(),
            Self::Tan => v.tan(),
            Self::Arctan => v.atan(),
            Self::Csc => v.sin().recip(),
            Self::Arccsc => v.recip().asin(),
            Self::Sec => v.cos().recip(),
            Self::Arcsec => v.recip().acos(),
            Self::Cot => v.tan().recip(),
            Self::Arccot => v.recip().atan(),
        }
    }
}

impl fmt::Display for UnaryFunc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.command())
    }
}

/// Returns the tokens of the argument of a function whose name ends right before `rest`.
///
/// If the argument starts with `(` and the span ends with `)`, the argument is what lies between
/// them. Otherwise, the whole rest of the span is the argument, as in `\sin x`.
pub(crate) fn argument_tokens(rest: &[Token]) -> Option<&[Token]> {
    let (first, last) = (rest.first()?, rest.last()?);
    if rest.len() >= 2 && first.kind == TokenKind::OpenParen && last.kind == TokenKind::CloseParen {
        Some(&rest[1..rest.len() - 1])
    } else {
        Some(rest)
    }
}

/// A logarithm or trigonometric function applied to an argument, such as `\sin(x)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The function to apply.
    pub func: UnaryFunc,

    /// The argument of the function.
    pub arg: Expression,
}

impl Parse for Unary {
    fn parse(tokens: &[Token]) -> Option<Self> {
        let func = UnaryFunc::from_token(tokens.first()?.kind)?;
        let arg = Expression::parse(argument_tokens(&tokens[1..])?)?;
        Some(Self { func, arg })
    }
}

impl Latex for Unary {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.func)?;
        fmt_paren(f, &self.arg)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_abs, afe_relative_error_msg, afe_is_relative_eq, assert_float_relative_eq};
    use super::*;

    #[test]
    fn reciprocal_functions() {
        let v = 0.7;
        assert_float_relative_eq!(UnaryFunc::Csc.apply(v), 1.0 / v.sin());
        assert_float_relative_eq!(UnaryFunc::Sec.apply(v), 1.0 / v.cos());
        assert_float_relative_eq!(UnaryFunc::Cot.apply(v), 1.0 / v.tan());
        assert_float_relative_eq!(UnaryFunc::Arccsc.apply(2.0), 0.5f64.asin());
        assert_float_relative_eq!(UnaryFunc::Arcsec.apply(2.0), 0.5f64.acos());
        assert_float_relative_eq!(UnaryFunc::Arccot.apply(2.0), 0.5f64.atan());
    }

    #[test]
    fn out_of_domain_is_nan() {
        assert!(UnaryFunc::Ln.apply(-1.0).is_nan());
        assert!(UnaryFunc::Arcsin.apply(2.0).is_nan());
        assert!(UnaryFunc::Lg.apply(0.0).is_infinite());
    }

    #[test]
    fn every_command_lexes_back() {
        for func in UnaryFunc::ALL {
            let tokens = crate::tokenizer::tokenize(func.command()).unwrap();
            assert_eq!(tokens.len(), 1, "{}", func);
            assert_eq!(UnaryFunc::from_token(tokens[0].kind), Some(func));
        }
    }
}
