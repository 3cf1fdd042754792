use std::{f64::consts, fmt};
use crate::{
    parser::{fmt::Latex, Parse},
    tokenizer::{Token, TokenKind},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named mathematical constant, resolved to its value only when evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NamedConstant {
    /// Euler's number, written `e`.
    E,

    /// The ratio of a circle's circumference to its diameter, written `\pi`.
    Pi,
}

impl NamedConstant {
    /// Returns the value of the constant.
    pub fn value(self) -> f64 {
        match self {
            Self::E => consts::E,
            Self::Pi => consts::PI,
        }
    }
}

/// A numeric literal or named constant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    /// A number, such as `3.14`.
    ///
    /// Parsed numbers are never negative; negative values only appear through substitution.
    Number(f64),

    /// A named constant, such as `\pi`.
    Named(NamedConstant),
}

impl Constant {
    /// Returns the value of the constant.
    pub fn value(self) -> f64 {
        match self {
            Self::Number(value) => value,
            Self::Named(named) => named.value(),
        }
    }
}

impl Parse for Constant {
    fn parse(tokens: &[Token]) -> Option<Self> {
        let [token] = tokens else { return None };
        match token.kind {
            TokenKind::Number(value) => Some(Self::Number(value)),
            TokenKind::Pi => Some(Self::Named(NamedConstant::Pi)),
            TokenKind::Letter('e') => Some(Self::Named(NamedConstant::E)),
            _ => None,
        }
    }
}

impl Latex for Constant {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Number(value) if value.is_sign_negative() => write!(f, "(-{})", -value),
            Self::Number(value) => write!(f, "{}", value),
            Self::Named(NamedConstant::E) => write!(f, "e"),
            Self::Named(NamedConstant::Pi) => write!(f, "\\pi"),
        }
    }
}
