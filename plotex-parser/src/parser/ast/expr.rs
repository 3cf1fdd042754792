use std::{collections::HashMap, fmt};
use plotex_error::Error;
use crate::{
    parser::{
        error::{EmptyExpression, InvalidTerm},
        fmt::Latex,
        group::span_of,
        Parse,
    },
    tokenizer::Token,
};
use super::{
    env::{Env, Scope},
    push_unique,
    Bindings,
    Call,
    Constant,
    Factor,
    FunctionKey,
    Item,
    Variable,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sum of signed [`Item`]s, such as `x^2+2x-1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expression {
    /// The terms of the expression, in source order.
    pub items: Vec<Item>,
}

/// Splits the tokens of an expression into the token spans of its items.
///
/// Every `+` or `-` outside of any group, except one in the very first position, starts a new
/// item. The sign token is kept as the first token of the item it starts.
fn split_items(tokens: &[Token]) -> Vec<&[Token]> {
    let mut items = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.kind.is_open() {
            depth += 1;
        } else if token.kind.is_close() {
            depth -= 1;
        } else if depth == 0 && i > 0 && token.kind.is_sign() {
            items.push(&tokens[start..i]);
            start = i;
        }
    }
    items.push(&tokens[start..]);
    items
}

impl Parse for Expression {
    fn parse(tokens: &[Token]) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }

        split_items(tokens)
            .into_iter()
            .map(Item::parse)
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    fn explain(tokens: &[Token]) -> Error {
        let Some(whole) = span_of(tokens) else {
            return Error::new(Vec::new(), EmptyExpression);
        };

        for item in split_items(tokens) {
            if Item::parse(item).is_some() {
                continue;
            }

            // a lone sign, as in `1++2` or a trailing `-`
            return match item {
                [sign] if sign.kind.is_sign() => Error::new(vec![sign.span.clone()], EmptyExpression),
                _ => Error::new(span_of(item).into_iter().collect(), InvalidTerm),
            };
        }

        Error::new(vec![whole], InvalidTerm)
    }
}

impl Expression {
    /// Creates an expression from its items.
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Creates an expression consisting of a single factor.
    pub fn from_factor(factor: Factor) -> Self {
        Self::new(vec![Item::new(true, vec![factor])])
    }

    /// Creates an expression consisting of a single number.
    pub fn number(value: f64) -> Self {
        Self::from_factor(Factor::Constant(Constant::Number(value)))
    }

    /// The expression `0`.
    pub fn zero() -> Self {
        Self::number(0.0)
    }

    /// Evaluates the expression with the given variable bindings.
    ///
    /// Numeric anomalies, such as division by zero or an unbound variable, produce non-finite
    /// results rather than errors.
    pub fn compute(&self, env: &Env) -> f64 {
        self.eval(&Scope::new(env))
    }

    pub(crate) fn eval(&self, scope: &Scope) -> f64 {
        self.items.iter().map(|item| item.eval(scope)).sum()
    }

    /// Calls the given function on every variable in the expression, depth-first and in source
    /// order. Bodies of linked function definitions are not visited.
    pub fn visit_variables(&self, f: &mut impl FnMut(&Variable)) {
        for factor in self.items.iter().flat_map(|item| &item.factors) {
            match factor {
                Factor::Variable(var) => f(var),
                other => for child in other.children() {
                    child.visit_variables(f);
                },
            }
        }
    }

    /// Calls the given function on every factor in the expression, depth-first and in source
    /// order, including nested factors.
    pub fn visit_factors(&self, f: &mut impl FnMut(&Factor)) {
        for factor in self.items.iter().flat_map(|item| &item.factors) {
            f(factor);
            for child in factor.children() {
                child.visit_factors(f);
            }
        }
    }

    /// Returns the names of all variables in the expression, bound or not, without duplicates
    /// and in order of first appearance.
    pub fn variables(&self) -> Vec<char> {
        let mut names = Vec::new();
        self.visit_variables(&mut |var| push_unique(&mut names, var.name));
        names
    }

    /// Returns the names of the variables in the expression that have no hidden-substituted
    /// value, without duplicates and in order of first appearance.
    pub fn free_vars(&self) -> Vec<char> {
        let mut names = Vec::new();
        self.visit_variables(&mut |var| if var.bound.is_none() {
            push_unique(&mut names, var.name);
        });
        names
    }

    /// Like [`Expression::free_vars`], but also includes the variables that the bodies of linked
    /// function definitions read from the environment, transitively.
    pub fn free_vars_linked(&self) -> Vec<char> {
        let mut names = self.free_vars();
        self.push_linked_globals(&mut names);
        names
    }

    /// Pushes the variables that linked function bodies called from this expression read from
    /// the environment. A body's own parameters are not included.
    fn push_linked_globals(&self, names: &mut Vec<char>) {
        self.visit_factors(&mut |factor| {
            let Factor::Call(Call { definition: Some(def), .. }) = factor else {
                return;
            };
            for name in def.body.free_vars() {
                if !def.params.contains(&name) {
                    push_unique(names, name);
                }
            }
            def.body.push_linked_globals(names);
        });
    }

    /// Permanently replaces every variable named in `bindings` with its replacement.
    ///
    /// Numeric replacements become constants; expression replacements are spliced in as a
    /// bracketed group. Freshly inserted expressions are not substituted into again.
    pub fn substitute(&mut self, bindings: &Bindings) {
        for factor in self.items.iter_mut().flat_map(|item| &mut item.factors) {
            let replacement = match factor {
                Factor::Variable(var) => bindings.get(&var.name),
                _ => None,
            };
            match replacement {
                Some(replacement) => *factor = replacement.to_factor(),
                None => for child in factor.children_mut() {
                    child.substitute(bindings);
                },
            }
        }
    }

    /// Sets the hidden-substituted value of every variable named in `bindings`, without
    /// removing the variable from the tree. A value of [`None`] clears the binding.
    pub fn hidden_substitute(&mut self, bindings: &HashMap<char, Option<f64>>) {
        for factor in self.items.iter_mut().flat_map(|item| &mut item.factors) {
            match factor {
                Factor::Variable(var) => if let Some(value) = bindings.get(&var.name) {
                    var.bound = *value;
                },
                other => for child in other.children_mut() {
                    child.hidden_substitute(bindings);
                },
            }
        }
    }

    /// Returns the `(name, arity)` of every function called in the expression, without
    /// duplicates and in order of first appearance.
    pub fn all_functions(&self) -> Vec<FunctionKey> {
        let mut keys = Vec::new();
        self.visit_factors(&mut |factor| if let Factor::Call(call) = factor {
            if !keys.contains(&call.key()) {
                keys.push(call.key());
            }
        });
        keys
    }

    /// Returns true if every function call in the expression, including those inside linked
    /// definitions, is linked to a definition.
    pub fn link_complete(&self) -> bool {
        let mut complete = true;
        self.visit_factors(&mut |factor| if let Factor::Call(call) = factor {
            complete &= call.definition
                .as_ref()
                .map_or(false, |def| def.body.link_complete());
        });
        complete
    }
}

impl Latex for Expression {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.items.is_empty() {
            return write!(f, "0");
        }

        for (i, item) in self.items.iter().enumerate() {
            match (i, item.positive) {
                (0, true) => (),
                (_, true) => write!(f, "+")?,
                (_, false) => write!(f, "-")?,
            }
            item.fmt_factors(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_latex(f)
    }
}
