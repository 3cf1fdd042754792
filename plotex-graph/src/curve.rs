use std::ops::Range;
use plotex_compiler::{Compiler, Program};
use plotex_error::Error;
use plotex_parser::{
    parser::{
        ast::{
            Bindings,
            Env,
            Equation,
            Expression,
            Factor,
            FunctionDefinition,
            FunctionTable,
            Statement,
            Substitute,
            Variable,
            VariableDefinition,
        },
        parse,
    },
    tokenizer::{tokenize, Token, TokenKind},
};
use crate::{
    error::{CurveMentionsY, UndefinedFunction, UnsupportedVariable},
    sample::{sample, Axis, PointBuffer, SampleOptions, Viewport},
};

/// The variables and functions the user has defined, which curves may refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    /// Values of the defined variables.
    pub variables: Env,

    /// The defined functions.
    pub functions: FunctionTable,
}

impl Definitions {
    /// Creates an empty set of definitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a variable, returning its previous value if it was already defined.
    pub fn define_variable(&mut self, def: VariableDefinition) -> Option<f64> {
        self.variables.set(def.name, def.value)
    }

    /// Defines a function, returning the previous definition with the same name and arity.
    pub fn define_function(&mut self, def: FunctionDefinition) -> Option<FunctionDefinition> {
        self.functions.insert(def)
    }

    /// Stores the statement if it is a definition. Otherwise, returns it unchanged.
    pub fn define(&mut self, stmt: Statement) -> Option<Statement> {
        match stmt {
            Statement::VariableDefinition(def) => {
                self.define_variable(def);
                None
            },
            Statement::FunctionDefinition(def) => {
                self.define_function(def);
                None
            },
            other => Some(other),
        }
    }

    /// Returns the values of the defined variables as permanent substitutions.
    pub fn bindings(&self) -> Bindings {
        self.variables.iter()
            .map(|(name, value)| (name, Substitute::Value(value)))
            .collect()
    }
}

/// Returns the spans of the letter `name` in the input, where `followed_by` holds for the token
/// after it.
fn letter_spans(tokens: &[Token], name: char, followed_by: impl Fn(Option<&Token>) -> bool) -> Vec<Range<usize>> {
    tokens.iter()
        .enumerate()
        .filter(|(i, token)| token.kind == TokenKind::Letter(name) && followed_by(tokens.get(i + 1)))
        .map(|(_, token)| token.span.clone())
        .collect()
}

/// An implicit curve in `x` and `y`, ready to be sampled.
#[derive(Debug, Clone)]
pub struct Curve {
    /// The formed equation of the curve, with its functions linked.
    equation: Equation,

    /// The compiled equation.
    program: Program,

    /// Values for the variables that linked function bodies read.
    env: Env,

    /// Whether the curve uses `x`.
    uses_x: bool,

    /// Whether the curve uses `y`.
    uses_y: bool,
}

impl Curve {
    /// Prepares the curve described by `input`.
    ///
    /// Input without `=` is read as `y=<input>`, and must not use `y`. Defined variables are
    /// substituted into the equation, and calls are linked to the defined functions. The curve
    /// may then only use `x` and `y`.
    pub fn new(input: &str, defs: &Definitions) -> Result<Self, Error> {
        let tokens = tokenize(input)?;
        let explicit = !tokens.iter().any(|token| token.kind == TokenKind::Assign);

        let mut equation = if explicit {
            let expr = parse::<Expression>(input)?;
            if expr.variables().contains(&'y') {
                return Err(Error::new(letter_spans(&tokens, 'y', |_| true), CurveMentionsY));
            }
            Equation::new(Expression::from_factor(Factor::Variable(Variable::new('y'))), expr)
        } else {
            parse::<Equation>(input)?
        };

        equation.substitute(&defs.bindings());
        equation.link_functions(&defs.functions)?;

        let undefined = equation.all_functions()
            .into_iter()
            .find(|(name, arity)| defs.functions.get(*name, *arity).is_none());
        if let Some((name, arity)) = undefined {
            let spans = letter_spans(&tokens, name, |next| {
                next.is_some_and(|token| token.kind == TokenKind::OpenParen)
            });
            return Err(Error::new(spans, UndefinedFunction { name, arity }));
        }

        let vars = equation.free_vars_linked();
        let unsupported = vars.iter()
            .copied()
            .find(|name| !matches!(name, 'x' | 'y') && !defs.variables.contains(*name));
        if let Some(name) = unsupported {
            return Err(Error::new(letter_spans(&tokens, name, |_| true), UnsupportedVariable { name }));
        }

        equation.form();
        let program = Compiler::compile(&equation);
        log::debug!("prepared curve `{}`", equation);

        Ok(Self {
            equation,
            program,
            env: defs.variables.clone(),
            uses_x: vars.contains(&'x'),
            uses_y: vars.contains(&'y'),
        })
    }

    /// Returns the formed equation of the curve.
    pub fn equation(&self) -> &Equation {
        &self.equation
    }

    /// Returns the compiled equation of the curve.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Samples the curve across the viewport.
    ///
    /// The x-sweep is computed only if the curve uses `y`, and the y-sweep only if it uses `x`.
    /// A sweep that is not computed is returned empty. Both sweeps run in parallel.
    pub fn sample(&self, viewport: &Viewport, opts: &SampleOptions) -> Result<CurveSamples, Error> {
        let sweep = |axis: Axis, needed: bool| if needed {
            sample(&self.program, &self.env, axis, viewport, opts)
        } else {
            Ok(PointBuffer::new(axis))
        };

        let (x_sweep, y_sweep) = rayon::join(
            || sweep(Axis::X, self.uses_y),
            || sweep(Axis::Y, self.uses_x),
        );
        Ok(CurveSamples {
            x_sweep: x_sweep?,
            y_sweep: y_sweep?,
        })
    }
}

/// The output of [`Curve::sample`].
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSamples {
    /// Roots in `y` for a sweep over `x`.
    pub x_sweep: PointBuffer,

    /// Roots in `x` for a sweep over `y`.
    pub y_sweep: PointBuffer,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    fn defs(sources: &[&str]) -> Definitions {
        let mut defs = Definitions::new();
        for source in sources {
            let stmt = parse::<Statement>(source).unwrap();
            assert!(defs.define(stmt).is_none(), "`{}` is not a definition", source);
        }
        defs
    }

    #[test]
    fn explicit_curve() {
        let curve = Curve::new("2x+1", &Definitions::new()).unwrap();
        assert_eq!(curve.equation().to_string(), "y-2x-1=0");

        let opts = SampleOptions::default().step(1.0).refinements(0);
        let samples = curve.sample(&Viewport::default(), &opts).unwrap();
        assert!(!samples.x_sweep.is_empty());
        assert!(!samples.y_sweep.is_empty());
        for (x, y) in samples.x_sweep.points().chain(samples.y_sweep.points()) {
            assert_abs_diff_eq!(y, 2.0 * x + 1.0, epsilon = 0.05);
        }
    }

    #[test]
    fn only_needed_sweeps() {
        let opts = SampleOptions::default().step(1.0).refinements(0);

        let samples = Curve::new("3", &Definitions::new()).unwrap()
            .sample(&Viewport::default(), &opts)
            .unwrap();
        assert!(!samples.x_sweep.is_empty());
        assert!(samples.y_sweep.is_empty());

        let samples = Curve::new("x=-1", &Definitions::new()).unwrap()
            .sample(&Viewport::default(), &opts)
            .unwrap();
        assert!(samples.x_sweep.is_empty());
        assert_eq!(samples.y_sweep.len(), 23);
    }

    #[test]
    fn explicit_curve_with_y() {
        let err = Curve::new("y+x", &Definitions::new()).unwrap_err();
        assert!(err.is::<CurveMentionsY>());
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn definitions_are_applied() {
        let defs = defs(&["a=2", "f(t)=at+b", "b=-1"]);
        let curve = Curve::new("f(x)", &defs).unwrap();
        assert_eq!(curve.program().symbols, vec!['y', 'x', 'a', 'b']);

        let opts = SampleOptions::default().step(1.0).refinements(0);
        let samples = curve.sample(&Viewport::default(), &opts).unwrap();
        for (x, y) in samples.x_sweep.points() {
            assert_abs_diff_eq!(y, 2.0 * x - 1.0, epsilon = 0.05);
        }
    }

    #[test]
    fn undefined_variable() {
        let err = Curve::new("x^2+y^2=r^2", &Definitions::new()).unwrap_err();
        let kind = err.downcast_ref::<UnsupportedVariable>().unwrap();
        assert_eq!(kind.name, 'r');
        assert_eq!(err.spans, vec![8..9]);

        assert!(Curve::new("x^2+y^2=r^2", &defs(&["r=2"])).is_ok());
    }

    #[test]
    fn undefined_function() {
        let err = Curve::new("y=g(x)", &defs(&["g(a,b)=a+b"])).unwrap_err();
        let kind = err.downcast_ref::<UndefinedFunction>().unwrap();
        assert_eq!((kind.name, kind.arity), ('g', 1));
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn parse_errors_propagate() {
        assert!(Curve::new(r"\frac{1}{", &Definitions::new()).is_err());
        assert!(Curve::new("y=", &Definitions::new()).is_err());
    }
}
