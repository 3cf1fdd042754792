use std::{fmt, sync::Arc};
use crate::{
    parser::{
        fmt::{fmt_separated, Latex},
        group::{closes_at_end, split_top_level},
        Parse,
    },
    tokenizer::{Token, TokenKind},
};
use super::{env::Scope, Expression, FunctionDefinition, FunctionKey};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A call to a user-defined function, such as `f(x, 2)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function.
    pub name: char,

    /// The arguments of the call, in order.
    pub args: Vec<Expression>,

    /// The definition the call is linked to, if any.
    ///
    /// This is set by [`Expression::link_functions`]. An unlinked call evaluates to NaN.
    pub definition: Option<Arc<FunctionDefinition>>,
}

impl Call {
    /// Creates an unlinked call.
    pub fn new(name: char, args: Vec<Expression>) -> Self {
        Self { name, args, definition: None }
    }

    /// Returns the `(name, arity)` pair that identifies the called function.
    pub fn key(&self) -> FunctionKey {
        (self.name, self.args.len())
    }

    pub(crate) fn eval(&self, scope: &Scope) -> f64 {
        let Some(def) = &self.definition else {
            return f64::NAN;
        };

        let locals = def.params.iter()
            .copied()
            .zip(self.args.iter().map(|arg| arg.eval(scope)))
            .collect::<Vec<_>>();
        def.body.eval(&scope.enter(&locals))
    }
}

impl Parse for Call {
    fn parse(tokens: &[Token]) -> Option<Self> {
        let TokenKind::Letter(name) = tokens.first()?.kind else {
            return None;
        };

        // `e(...)` is Euler's number times a group
        if name == 'e' || tokens.get(1)?.kind != TokenKind::OpenParen || !closes_at_end(tokens, 1) {
            return None;
        }

        let args = split_top_level(&tokens[2..tokens.len() - 1], TokenKind::Comma)
            .into_iter()
            .map(Expression::parse)
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(name, args))
    }
}

impl Latex for Call {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        fmt_separated(f, &self.args, ",")?;
        write!(f, ")")
    }
}
