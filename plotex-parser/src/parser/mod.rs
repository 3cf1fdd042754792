pub mod ast;
pub mod error;
pub mod fmt;
pub mod group;

use plotex_error::Error;
use crate::tokenizer::{tokenize, Token};
use error::{EmptyExpression, InvalidTerm};
use group::{check_balanced, span_of};

/// A high-level parser for the notation. This is the type to use to parse a line of user input
/// into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The source text.
    source: &'source str,

    /// The tokens of the source text.
    tokens: Box<[Token]>,
}

impl<'source> Parser<'source> {
    /// Creates a parser for the given source.
    ///
    /// This tokenizes the source and checks that every group is closed, so errors in those
    /// stages are reported here rather than by [`Parser::try_parse_full`].
    pub fn new(source: &'source str) -> Result<Self, Error> {
        let tokens = tokenize(source)?;
        check_balanced(&tokens)?;
        Ok(Self { source, tokens: tokens.into_boxed_slice() })
    }

    /// Returns the source text.
    pub fn source(&self) -> &'source str {
        self.source
    }

    /// Returns the tokens of the source text.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Parses a value from all of the tokens of the source.
    ///
    /// The node parsers themselves only report whether the tokens form a valid node. If they do
    /// not, the reason is recovered with [`Parse::explain`].
    pub fn try_parse_full<T: Parse>(&self) -> Result<T, Error> {
        if self.tokens.is_empty() {
            return Err(Error::new(vec![0..self.source.len()], EmptyExpression));
        }

        match T::parse(&self.tokens) {
            Some(value) => {
                log::debug!("parsed {:?} as {}", self.source, std::any::type_name::<T>());
                Ok(value)
            },
            None => Err(T::explain(&self.tokens)),
        }
    }
}

/// Parses the given source text into a value of type `T`.
pub fn parse<T: Parse>(source: &str) -> Result<T, Error> {
    Parser::new(source)?.try_parse_full()
}

/// Any type that can be parsed from a span of tokens.
pub trait Parse: Sized {
    /// Parses a value spanning exactly the given tokens.
    ///
    /// Returns [`None`] if the tokens do not form a value of this type. No partial values are
    /// ever returned.
    fn parse(tokens: &[Token]) -> Option<Self>;

    /// Builds an error describing why [`Parse::parse`] rejected the given tokens.
    fn explain(tokens: &[Token]) -> Error {
        Error::new(span_of(tokens).into_iter().collect(), InvalidTerm)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_abs, afe_relative_error_msg, afe_is_relative_eq, assert_float_relative_eq};
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{Env, Equation, Expression, Factor, FunctionDefinition, FunctionTable, Statement};
    use error::{RecursiveFunction, UnclosedGroup, UnrecognizedToken};
    use fmt::Latex;

    fn expr(input: &str) -> Expression {
        parse::<Expression>(input).unwrap()
    }

    fn table(defs: &[&str]) -> FunctionTable {
        defs.iter()
            .map(|def| parse::<FunctionDefinition>(def).unwrap())
            .collect()
    }

    /// Renders the input, then checks that rendering is stable when the output is parsed again.
    fn render_stable(input: &str) -> String {
        let once = parse::<Statement>(input).unwrap().to_string();
        let twice = parse::<Statement>(&once).unwrap().to_string();
        assert_eq!(once, twice, "rendering of {:?} is not stable", input);
        once
    }

    #[test]
    fn round_trip_corpus() {
        let corpus = [
            ("1+1", "1+1"),
            (r"\frac{1}{2}+1", r"\frac{1}{2}+1"),
            (r"3.14^2+\frac{2}{xy^{22}}", r"3.14^{2}+\frac{2}{(xy)^{22}}"),
            (r"\sin(2x^x)+\sin^{-1}x", r"\sin((2x)^{x})+\sin^{-1}(x)"),
            ("x^2+0.8^y", "x^{2}+0.8^{y}"),
            ("x-y", "x-y"),
            (r"\sin\sin x+\sin^{-1}\sin^{-1}y", r"\sin(\sin(x))+\sin^{-1}(\sin^{-1}(y))"),
        ];

        for (input, expected) in corpus {
            assert_eq!(render_stable(input), expected);
        }
    }

    #[test]
    fn round_trip_notation() {
        let corpus = [
            (r"\left(x+1\right)^{2}", "(x+1)^{2}"),
            (r"2\cdot3", r"2\cdot 3"),
            (r"x\times y", "xy"),
            ("x/2", r"x\frac{1}{2}"),
            (r"\ln x+\lg x+\log(x)", r"\ln(x)+\lg(x)+\lg(x)"),
            (r"\log_2(8)", r"\log_{2}(8)"),
            (r"\log_{b}(a+1)", r"\log_{b}(a+1)"),
            (r"\arccos(x)+\cot y", r"\cos^{-1}(x)+\cot(y)"),
            // a bare argument extends to the end of the term
            (r"\sin(x)\cos x", r"\sin((x)\cos(x))"),
            (r"\pi r^2", r"(\pi r)^{2}"),
            (r"e^{-x}", "e^{-x}"),
            ("f(x,2y)", "f(x,2y)"),
            ("x(y+1)", "x(y+1)"),
            ("a=-1.5", "a=-1.5"),
            ("f(t)=t^2+1", "f(t)=t^{2}+1"),
            ("x^2+y^2=1", "x^{2}+y^{2}=1"),
        ];

        for (input, expected) in corpus {
            assert_eq!(render_stable(input), expected);
        }
    }

    #[test]
    fn variable_before_group_renders_cdot() {
        let mut e = expr("ab");
        e.substitute(&ast::Bindings::from([('b', ast::Substitute::Expr(expr("c+1")))]));
        assert_eq!(e.to_string(), r"a\cdot (c+1)");
        assert_eq!(expr(&e.to_string()).to_string(), r"a\cdot (c+1)");
    }

    #[test]
    fn negative_substitution_renders_in_parens() {
        let mut e = expr("2x");
        e.substitute(&ast::Bindings::from([('x', ast::Substitute::Value(-3.0))]));
        assert_eq!(e.to_string(), r"2\cdot (-3)");
        assert_float_relative_eq!(expr(&e.to_string()).compute(&Env::new()), -6.0);
    }

    #[test]
    fn exponent_takes_everything_before_it() {
        let e = expr("2x^2");
        let Factor::Exponent(pow) = &e.items[0].factors[0] else {
            panic!("expected an exponent, got {:?}", e.items[0].factors[0]);
        };
        assert_eq!(pow.base.to_string(), "2x");
        assert_float_relative_eq!(e.compute(&Env::new().with('x', 3.0)), 36.0);
    }

    #[test]
    fn explicit_operators() {
        let env = Env::new().with('x', 6.0).with('y', 2.0);
        assert_float_relative_eq!(expr("x/y").compute(&env), 3.0);
        assert_float_relative_eq!(expr("x*y").compute(&env), 12.0);
        assert_float_relative_eq!(expr(r"x\div y\cdot 3").compute(&env), 9.0);

        for input in ["*x", "x*", "x**y", "/x", "x/", "x*/y"] {
            assert!(parse::<Expression>(input).is_err(), "{}", input);
        }
    }

    #[test]
    fn unary_and_log_compute() {
        let env = Env::new().with('x', 0.5);
        assert_float_relative_eq!(expr(r"\sin x").compute(&env), 0.5f64.sin());
        assert_float_relative_eq!(expr(r"\sin^{-1}x").compute(&env), 0.5f64.asin());
        assert_float_relative_eq!(expr(r"\arctan(x)").compute(&env), 0.5f64.atan());
        assert_float_relative_eq!(expr(r"\sec x").compute(&env), 1.0 / 0.5f64.cos());
        assert_float_relative_eq!(expr(r"\log 1000").compute(&env), 3.0);
        assert_float_relative_eq!(expr(r"\log_2(8)").compute(&env), 3.0);
        assert_float_relative_eq!(expr(r"\ln(e^2)").compute(&env), 2.0);
        assert_float_relative_eq!(expr(r"\frac{\pi}{2}").compute(&env), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn malformed_inputs() {
        let err = parse::<Expression>(r"\frac{1}{").unwrap_err();
        assert!(err.is::<UnclosedGroup>());
        assert_eq!(err.spans, vec![8..9]);

        let err = parse::<Expression>("sin(").unwrap_err();
        assert!(err.is::<UnclosedGroup>());
        assert_eq!(err.spans, vec![3..4]);

        let err = parse::<Expression>(r"\sqrt{2}").unwrap_err();
        assert!(err.is::<UnrecognizedToken>());
    }

    #[test]
    fn empty_input() {
        let err = parse::<Expression>("   ").unwrap_err();
        assert!(err.is::<EmptyExpression>());
        assert_eq!(err.spans, vec![0..3]);

        let err = parse::<Expression>("1+").unwrap_err();
        assert!(err.is::<EmptyExpression>());
        assert_eq!(err.spans, vec![1..2]);
    }

    #[test]
    fn invalid_term() {
        let err = parse::<Expression>("1+2,3").unwrap_err();
        assert!(err.is::<InvalidTerm>());
        assert_eq!(err.spans, vec![1..5]);
    }

    #[test]
    fn inline_function() {
        let mut e = expr("f(x+1)");
        e.replace_functions(&table(&["f(t)=t^2+1"])).unwrap();

        assert!(e.all_functions().is_empty());
        assert_eq!(e.to_string(), "((x+1)^{2}+1)");
        assert_float_relative_eq!(e.compute(&Env::new().with('x', 2.0)), 10.0);
    }

    #[test]
    fn inline_nested_functions() {
        let mut e = expr("g(x)+h(1)");
        e.replace_functions(&table(&["f(t)=2t", "g(u)=f(u)+f(1)"])).unwrap();

        // `h` is not defined, and is left in place
        assert_eq!(e.all_functions(), vec![('h', 1)]);
        // each substituted argument is wrapped in its own group
        assert_eq!(e.to_string(), "((2((x)))+(2(1)))+h(1)");
    }

    #[test]
    fn link_function() {
        let mut e = expr("f(x+1)");
        e.link_functions(&table(&["f(t)=t^2+1"])).unwrap();

        assert!(e.link_complete());
        assert_eq!(e.to_string(), "f(x+1)");
        assert_float_relative_eq!(e.compute(&Env::new().with('x', 2.0)), 10.0);
    }

    #[test]
    fn link_uses_body_scope() {
        // `t` in the body of `g` is `g`'s parameter, not the `t` passed to `f`
        let mut e = expr("f(1)");
        e.link_functions(&table(&["f(t)=g(2)+t", "g(u)=ut+k"])).unwrap();

        assert!(e.free_vars().is_empty());
        assert_eq!(e.free_vars_linked(), vec!['t', 'k']);
        assert_float_relative_eq!(e.compute(&Env::new().with('t', 10.0).with('k', 3.0)), 24.0);
    }

    #[test]
    fn unlinked_call_is_nan() {
        let mut e = expr("f(x)+1");
        e.link_functions(&table(&["f(a,b)=a+b"])).unwrap();
        assert!(!e.link_complete());
        assert!(e.compute(&Env::new().with('x', 1.0)).is_nan());
    }

    #[test]
    fn recursive_definitions() {
        let defs = table(&["f(t)=g(t)+1", "g(t)=f(t)"]);

        let err = expr("f(x)").link_functions(&defs).unwrap_err();
        let kind = err.downcast_ref::<RecursiveFunction>().unwrap();
        assert_eq!(kind.name, 'f');
        assert_eq!(kind.chain, "f(1) -> g(1) -> f(1)");

        let err = expr("2+g(x)").replace_functions(&defs).unwrap_err();
        let kind = err.downcast_ref::<RecursiveFunction>().unwrap();
        assert_eq!(kind.name, 'g');
        assert_eq!(kind.chain, "g(1) -> f(1) -> g(1)");
    }

    #[test]
    fn self_recursive_definition() {
        let mut eq = parse::<Equation>("y=f(x)").unwrap();
        let err = eq.link_functions(&table(&["f(t)=f(t-1)"])).unwrap_err();
        assert!(err.is::<RecursiveFunction>());
    }

    #[test]
    fn render_as_display() {
        let e = expr(r"\frac{x}{2}");
        assert_eq!(e.as_display().to_string(), e.to_string());
    }
}
