use std::{collections::HashMap, fmt};
use plotex_error::Error;
use crate::{
    parser::{
        error::{EmptyExpression, MissingEquals},
        fmt::Latex,
        group::span_of,
        Parse,
    },
    tokenizer::{Token, TokenKind},
};
use super::{env::Env, push_unique, Bindings, Expression, FunctionKey};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An equation between two expressions, such as `x^2+y^2=1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    /// The left-hand side.
    pub lhs: Expression,

    /// The right-hand side.
    pub rhs: Expression,

    /// Whether [`Equation::form`] has moved every term to the left-hand side.
    pub formed: bool,
}

impl Equation {
    /// Creates an equation from both of its sides.
    pub fn new(lhs: Expression, rhs: Expression) -> Self {
        Self { lhs, rhs, formed: false }
    }

    /// Creates the equation `lhs=0`.
    pub fn with_zero(lhs: Expression) -> Self {
        Self::new(lhs, Expression::zero())
    }

    /// Moves every term of the right-hand side to the left-hand side, negating each one, so that
    /// the equation reads `lhs - rhs = 0`. Calling this more than once has no further effect.
    pub fn form(&mut self) {
        if self.formed {
            return;
        }

        let rhs = std::mem::replace(&mut self.rhs, Expression::zero());
        self.lhs.items.extend(rhs.items.into_iter().map(|mut item| {
            item.positive = !item.positive;
            item
        }));
        self.formed = true;
    }

    /// Returns a formed copy of the equation.
    pub fn to_formed(&self) -> Self {
        let mut eq = self.clone();
        eq.form();
        eq
    }

    /// Computes the difference between the two sides with the given variable bindings.
    ///
    /// The roots of the equation are exactly the bindings that make this zero.
    pub fn compute(&self, env: &Env) -> f64 {
        self.lhs.compute(env) - self.rhs.compute(env)
    }

    /// Returns the names of all variables on either side, without duplicates and in order of
    /// first appearance.
    pub fn variables(&self) -> Vec<char> {
        let mut names = self.lhs.variables();
        self.rhs.variables().into_iter().for_each(|name| push_unique(&mut names, name));
        names
    }

    /// Returns the names of the variables on either side that have no hidden-substituted value.
    pub fn free_vars(&self) -> Vec<char> {
        let mut names = self.lhs.free_vars();
        self.rhs.free_vars().into_iter().for_each(|name| push_unique(&mut names, name));
        names
    }

    /// Like [`Equation::free_vars`], but includes the free variables of linked function bodies.
    pub fn free_vars_linked(&self) -> Vec<char> {
        let mut names = self.lhs.free_vars_linked();
        self.rhs.free_vars_linked().into_iter().for_each(|name| push_unique(&mut names, name));
        names
    }

    /// Permanently substitutes variables on both sides. See [`Expression::substitute`].
    pub fn substitute(&mut self, bindings: &Bindings) {
        self.lhs.substitute(bindings);
        self.rhs.substitute(bindings);
    }

    /// Sets or clears hidden-substituted values on both sides. See
    /// [`Expression::hidden_substitute`].
    pub fn hidden_substitute(&mut self, bindings: &HashMap<char, Option<f64>>) {
        self.lhs.hidden_substitute(bindings);
        self.rhs.hidden_substitute(bindings);
    }

    /// Returns the `(name, arity)` of every function called on either side.
    pub fn all_functions(&self) -> Vec<FunctionKey> {
        let mut keys = self.lhs.all_functions();
        for key in self.rhs.all_functions() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Returns true if every function call on either side is linked.
    pub fn link_complete(&self) -> bool {
        self.lhs.link_complete() && self.rhs.link_complete()
    }
}

impl Parse for Equation {
    /// Splits the tokens at the first `=` and parses both sides as expressions.
    fn parse(tokens: &[Token]) -> Option<Self> {
        let eq = tokens.iter().position(|token| token.kind == TokenKind::Assign)?;
        Some(Self::new(
            Expression::parse(&tokens[..eq])?,
            Expression::parse(&tokens[eq + 1..])?,
        ))
    }

    fn explain(tokens: &[Token]) -> Error {
        let Some(eq) = tokens.iter().position(|token| token.kind == TokenKind::Assign) else {
            return Error::new(span_of(tokens).into_iter().collect(), MissingEquals);
        };

        let (lhs, rhs) = (&tokens[..eq], &tokens[eq + 1..]);
        let failing = if Expression::parse(lhs).is_none() { lhs } else { rhs };
        if failing.is_empty() {
            return Error::new(vec![tokens[eq].span.clone()], EmptyExpression);
        }
        Expression::explain(failing)
    }
}

impl Latex for Equation {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.lhs.fmt_latex(f)?;
        write!(f, "=")?;
        self.rhs.fmt_latex(f)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_latex(f)
    }
}
