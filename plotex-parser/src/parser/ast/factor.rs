use std::fmt;
use crate::{
    parser::{fmt::Latex, Parse},
    tokenizer::Token,
};
use super::{
    env::Scope,
    Bracket,
    Call,
    Constant,
    Exponent,
    Expression,
    Fraction,
    Log,
    Unary,
    Variable,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single multiplicative component of an [`Item`](super::Item).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Factor {
    /// A number or named constant, such as `2` or `\pi`.
    Constant(Constant),

    /// A variable, such as `x`.
    Variable(Variable),

    /// A fraction, such as `\frac{1}{x}`.
    Fraction(Fraction),

    /// A power, such as `x^{2}`.
    Exponent(Exponent),

    /// A parenthesized expression, such as `(x+1)`.
    Bracket(Bracket),

    /// A logarithm or trigonometric function of one argument, such as `\sin(x)`.
    Unary(Unary),

    /// A logarithm with an explicit base, such as `\log_{2}(x)`.
    Log(Log),

    /// A call to a user-defined function, such as `f(x, 2)`.
    Call(Call),
}

impl Parse for Factor {
    /// Parses a factor spanning exactly the given tokens.
    ///
    /// The parsers are tried in a fixed priority order: fraction, exponent, function call,
    /// bracket, the logarithm and trigonometric forms, variable, then constant. The logarithm and
    /// trigonometric forms each require a distinct leading token, so their relative order does
    /// not matter.
    fn parse(tokens: &[Token]) -> Option<Self> {
        Fraction::parse(tokens).map(Self::Fraction)
            .or_else(|| Exponent::parse(tokens).map(Self::Exponent))
            .or_else(|| Call::parse(tokens).map(Self::Call))
            .or_else(|| Bracket::parse(tokens).map(Self::Bracket))
            .or_else(|| Unary::parse(tokens).map(Self::Unary))
            .or_else(|| Log::parse(tokens).map(Self::Log))
            .or_else(|| Variable::parse(tokens).map(Self::Variable))
            .or_else(|| Constant::parse(tokens).map(Self::Constant))
    }
}

impl Factor {
    /// Returns the expressions directly nested in this factor.
    ///
    /// The body of a linked function definition is not part of the tree, and is not returned.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Self::Constant(_) | Self::Variable(_) => Vec::new(),
            Self::Fraction(frac) => vec![&frac.numerator, &frac.denominator],
            Self::Exponent(pow) => vec![&pow.base, &pow.exponent],
            Self::Bracket(bracket) => vec![&bracket.inner],
            Self::Unary(unary) => vec![&unary.arg],
            Self::Log(log) => vec![&log.base, &log.antilog],
            Self::Call(call) => call.args.iter().collect(),
        }
    }

    /// Returns mutable references to the expressions directly nested in this factor.
    pub fn children_mut(&mut self) -> Vec<&mut Expression> {
        match self {
            Self::Constant(_) | Self::Variable(_) => Vec::new(),
            Self::Fraction(frac) => vec![&mut frac.numerator, &mut frac.denominator],
            Self::Exponent(pow) => vec![&mut pow.base, &mut pow.exponent],
            Self::Bracket(bracket) => vec![&mut bracket.inner],
            Self::Unary(unary) => vec![&mut unary.arg],
            Self::Log(log) => vec![&mut log.base, &mut log.antilog],
            Self::Call(call) => call.args.iter_mut().collect(),
        }
    }

    pub(crate) fn eval(&self, scope: &Scope) -> f64 {
        match self {
            Self::Constant(constant) => constant.value(),
            Self::Variable(var) => var.eval(scope),
            Self::Fraction(frac) => frac.numerator.eval(scope) / frac.denominator.eval(scope),
            Self::Exponent(pow) => pow.base.eval(scope).powf(pow.exponent.eval(scope)),
            Self::Bracket(bracket) => bracket.inner.eval(scope),
            Self::Unary(unary) => unary.func.apply(unary.arg.eval(scope)),
            Self::Log(log) => Log::apply(log.base.eval(scope), log.antilog.eval(scope)),
            Self::Call(call) => call.eval(scope),
        }
    }
}

impl Latex for Factor {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Constant(constant) => constant.fmt_latex(f),
            Self::Variable(var) => var.fmt_latex(f),
            Self::Fraction(frac) => frac.fmt_latex(f),
            Self::Exponent(pow) => pow.fmt_latex(f),
            Self::Bracket(bracket) => bracket.fmt_latex(f),
            Self::Unary(unary) => unary.fmt_latex(f),
            Self::Log(log) => log.fmt_latex(f),
            Self::Call(call) => call.fmt_latex(f),
        }
    }
}
