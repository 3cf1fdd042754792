//! The abstract syntax tree produced by the parser.
//!
//! Every node knows how to parse itself from a span of tokens (see [`Parse`]), format itself as
//! LaTeX (see [`Latex`]), and evaluate itself against an [`Env`].
//!
//! [`Parse`]: crate::parser::Parse
//! [`Latex`]: crate::parser::fmt::Latex

pub mod call;
pub mod def;
pub mod env;
pub mod equation;
pub mod exponent;
pub mod expr;
pub mod factor;
pub mod fraction;
pub mod item;
pub mod literal;
pub mod log;
pub mod paren;
pub mod stmt;
pub mod unary;
pub mod variable;

pub use call::Call;
pub use def::{FunctionDefinition, FunctionKey, FunctionTable, VariableDefinition};
pub use env::Env;
pub use equation::Equation;
pub use exponent::Exponent;
pub use expr::Expression;
pub use factor::Factor;
pub use fraction::Fraction;
pub use item::Item;
pub use literal::{Constant, NamedConstant};
pub use self::log::Log;
pub use paren::Bracket;
pub use stmt::Statement;
pub use unary::{Unary, UnaryFunc};
pub use variable::Variable;

use std::collections::HashMap;

/// The replacement for a variable during permanent substitution.
#[derive(Debug, Clone, PartialEq)]
pub enum Substitute {
    /// Replace the variable with a numeric constant.
    Value(f64),

    /// Replace the variable with a bracketed expression.
    Expr(Expression),
}

impl Substitute {
    /// Returns the factor that replaces a substituted variable.
    pub(crate) fn to_factor(&self) -> Factor {
        match self {
            Self::Value(value) => Factor::Constant(Constant::Number(*value)),
            Self::Expr(expr) => Factor::Bracket(Bracket::new(expr.clone())),
        }
    }
}

impl From<f64> for Substitute {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<Expression> for Substitute {
    fn from(expr: Expression) -> Self {
        Self::Expr(expr)
    }
}

/// Variables to substitute, mapped to their replacements.
pub type Bindings = HashMap<char, Substitute>;

/// Pushes `name` into `names` if it is not already there, keeping first-appearance order.
pub(crate) fn push_unique(names: &mut Vec<char>, name: char) {
    if !names.contains(&name) {
        names.push(name);
    }
}
