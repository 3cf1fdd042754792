use std::fmt;
use plotex_error::Error;
use crate::{
    parser::{fmt::Latex, Parse},
    tokenizer::{Token, TokenKind},
};
use super::{Equation, Expression, FunctionDefinition, VariableDefinition};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single line of user input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Statement {
    /// A definition of a variable, such as `a=2`.
    VariableDefinition(VariableDefinition),

    /// A definition of a function, such as `f(t)=t^2`.
    FunctionDefinition(FunctionDefinition),

    /// An equation, such as `x^2+y^2=1`.
    Equation(Equation),

    /// A bare expression, such as `\sin(x)+1`.
    Expression(Expression),
}

fn has_equals(tokens: &[Token]) -> bool {
    tokens.iter().any(|token| token.kind == TokenKind::Assign)
}

impl Parse for Statement {
    /// Classifies the input, trying in order a variable definition, a function definition, an
    /// equation if the input contains `=`, and finally an expression.
    fn parse(tokens: &[Token]) -> Option<Self> {
        if let Some(def) = VariableDefinition::parse(tokens) {
            return Some(Self::VariableDefinition(def));
        }
        if let Some(def) = FunctionDefinition::parse(tokens) {
            return Some(Self::FunctionDefinition(def));
        }
        if has_equals(tokens) {
            Equation::parse(tokens).map(Self::Equation)
        } else {
            Expression::parse(tokens).map(Self::Expression)
        }
    }

    fn explain(tokens: &[Token]) -> Error {
        if has_equals(tokens) {
            Equation::explain(tokens)
        } else {
            Expression::explain(tokens)
        }
    }
}

impl Latex for Statement {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::VariableDefinition(def) => def.fmt_latex(f),
            Self::FunctionDefinition(def) => def.fmt_latex(f),
            Self::Equation(eq) => eq.fmt_latex(f),
            Self::Expression(expr) => expr.fmt_latex(f),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_latex(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::Parser;
    use super::*;

    fn classify(input: &str) -> Statement {
        Parser::new(input).unwrap().try_parse_full::<Statement>().unwrap()
    }

    #[test]
    fn classification_order() {
        assert!(matches!(classify("a=2"), Statement::VariableDefinition(_)));
        assert!(matches!(classify("f(t)=t^2"), Statement::FunctionDefinition(_)));
        assert!(matches!(classify("x=2"), Statement::Equation(_)));
        assert!(matches!(classify("a=2b"), Statement::Equation(_)));
        assert!(matches!(classify("f(2)=4"), Statement::Equation(_)));
        assert!(matches!(classify(r"\sin(x)+1"), Statement::Expression(_)));
        assert!(matches!(classify("f(t)"), Statement::Expression(_)));
    }

    #[test]
    fn render() {
        assert_eq!(classify("a = -2").to_string(), "a=-2");
        assert_eq!(classify("g(u,v)=uv").to_string(), "g(u,v)=uv");
    }
}
