use std::fmt;
use crate::{
    parser::{
        fmt::{fmt_paren, Latex},
        group::closes_at_end,
        Parse,
    },
    tokenizer::Token,
};
use super::Expression;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A grouped expression, treated as a single opaque factor.
///
/// Both `(...)` and `{...}` parse as a bracket; it is always formatted with parentheses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bracket {
    /// The expression inside the group.
    pub inner: Expression,
}

impl Bracket {
    /// Wraps the given expression in a bracket.
    pub fn new(inner: Expression) -> Self {
        Self { inner }
    }
}

impl Parse for Bracket {
    fn parse(tokens: &[Token]) -> Option<Self> {
        if !tokens.first()?.kind.is_open() || !closes_at_end(tokens, 0) {
            return None;
        }
        Expression::parse(&tokens[1..tokens.len() - 1]).map(Self::new)
    }
}

impl Latex for Bracket {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_paren(f, &self.inner)
    }
}
