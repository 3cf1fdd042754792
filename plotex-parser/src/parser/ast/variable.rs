use std::fmt;
use crate::{
    parser::{fmt::Latex, Parse},
    tokenizer::{Token, TokenKind},
};
use super::env::Scope;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single-letter variable, such as `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variable {
    /// The name of the variable.
    pub name: char,

    /// A value bound to the variable in place by hidden substitution. When set, it takes
    /// precedence over any binding in the evaluation environment.
    pub bound: Option<f64>,
}

impl Variable {
    /// Creates a new, unbound variable.
    pub fn new(name: char) -> Self {
        Self { name, bound: None }
    }

    /// Evaluates the variable. Unbound variables evaluate to NaN.
    pub(crate) fn eval(&self, scope: &Scope) -> f64 {
        self.bound
            .or_else(|| scope.get(self.name))
            .unwrap_or(f64::NAN)
    }
}

impl Parse for Variable {
    fn parse(tokens: &[Token]) -> Option<Self> {
        match tokens {
            // `e` is Euler's number, see `Constant`
            [Token { kind: TokenKind::Letter(name), .. }] if *name != 'e' => Some(Self::new(*name)),
            _ => None,
        }
    }
}

impl Latex for Variable {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
