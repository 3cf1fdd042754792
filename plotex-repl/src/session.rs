use plotex_compiler::Compiler;
use plotex_error::Error;
use plotex_graph::{Curve, Definitions, FindRoots, RootOptions, SampleOptions, Viewport};
use plotex_parser::parser::{
    ast::{Call, Equation, Expression, Factor, FunctionDefinition, Statement},
    fmt::Latex,
    parse,
};
use plotex_vm::Eval;
use crate::error::InvalidArguments;

const ROOTS_USAGE: &str = "roots <equation> [min max]";
const SAMPLE_USAGE: &str = "sample <curve>";
const ASM_USAGE: &str = ":asm <expression or equation>";

/// The width and height, in pixels, of the canvas that `sample` derives its options from.
const CANVAS_SIZE: f64 = 1000.0;

/// If `line` starts with the command `name`, returns the arguments of the command and their
/// offset in `line`.
fn strip_command<'a>(line: &'a str, name: &str) -> Option<(usize, &'a str)> {
    let start = line.len() - line.trim_start().len();
    let rest = line[start..].strip_prefix(name)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let args = rest.trim_start();
    Some((line.len() - args.len(), args.trim_end()))
}

/// Splits a trailing `min max` range from the arguments of `roots`.
fn split_range(args: &str) -> (&str, Option<(f64, f64)>) {
    let range = args.rsplit_once(char::is_whitespace).and_then(|(head, max)| {
        let (equation, min) = head.trim_end().rsplit_once(char::is_whitespace)?;
        Some((equation.trim_end(), min.parse::<f64>().ok()?, max.parse::<f64>().ok()?))
    });
    match range {
        Some((equation, min, max)) => (equation, Some((min, max))),
        None => (args, None),
    }
}

/// Points an error reported against `text` at its position in the whole line. Errors without a
/// position are pointed at all of `text`.
fn relocate(mut err: Error, offset: usize, text: &str) -> Error {
    if err.spans.is_empty() {
        err.spans.push(offset..offset + text.len());
        return err;
    }
    crate::error::shift(err, offset)
}

fn invalid_arguments(line: &str, command: &'static str, usage: &'static str) -> Error {
    let start = line.len() - line.trim_start().len();
    Error::new(vec![start..line.trim_end().len()], InvalidArguments { command, usage })
}

/// The state of an interactive session: the user's definitions, and the viewport used by the
/// graphing commands.
#[derive(Debug, Clone, Default)]
pub struct Session {
    defs: Definitions,
    viewport: Viewport,
}

impl Session {
    /// Creates a session with no definitions.
    pub fn new(viewport: Viewport) -> Self {
        Self { defs: Definitions::new(), viewport }
    }

    /// Executes one line of input, returning the text to print.
    ///
    /// The spans of a returned error point into `line`.
    pub fn execute(&mut self, line: &str) -> Result<String, Error> {
        if let Some((offset, args)) = strip_command(line, "roots") {
            if args.is_empty() {
                return Err(invalid_arguments(line, "roots", ROOTS_USAGE));
            }
            let (text, range) = split_range(args);
            return self.roots(text, range).map_err(|err| relocate(err, offset, text));
        }
        if let Some((offset, args)) = strip_command(line, "sample") {
            if args.is_empty() {
                return Err(invalid_arguments(line, "sample", SAMPLE_USAGE));
            }
            return self.sample(args).map_err(|err| relocate(err, offset, args));
        }
        if strip_command(line, ":defs").is_some() {
            return Ok(self.list_definitions());
        }
        if let Some((offset, args)) = strip_command(line, ":asm") {
            if args.is_empty() {
                return Err(invalid_arguments(line, ":asm", ASM_USAGE));
            }
            return self.disassemble(args)
                .map_err(|err| relocate(err, offset, args))?
                .ok_or_else(|| invalid_arguments(line, ":asm", ASM_USAGE));
        }

        let offset = line.len() - line.trim_start().len();
        let text = line.trim();
        self.statement(text).map_err(|err| relocate(err, offset, text))
    }

    fn roots(&self, text: &str, range: Option<(f64, f64)>) -> Result<String, Error> {
        let mut eq = parse::<Equation>(text)?;
        eq.substitute(&self.defs.bindings());
        eq.link_functions(&self.defs.functions)?;

        let (min, max) = range.unwrap_or((self.viewport.low_x, self.viewport.high_x));
        let roots = eq.find_roots(&self.defs.variables, min, max, RootOptions::default())?;
        if roots.is_empty() {
            return Ok(format!("no roots in [{}, {}]", min, max));
        }
        Ok(roots.iter().map(f64::to_string).collect::<Vec<_>>().join(", "))
    }

    fn sample(&self, text: &str) -> Result<String, Error> {
        let curve = Curve::new(text, &self.defs)?;
        let opts = SampleOptions::for_canvas(&self.viewport, CANVAS_SIZE, CANVAS_SIZE);
        let samples = curve.sample(&self.viewport, &opts)?;
        Ok(format!(
            "{}\nx-sweep: {} record(s), {} point(s)\ny-sweep: {} record(s), {} point(s)",
            curve.equation(),
            samples.x_sweep.len(),
            samples.x_sweep.points().count(),
            samples.y_sweep.len(),
            samples.y_sweep.points().count(),
        ))
    }

    fn list_definitions(&self) -> String {
        let mut variables = self.defs.variables.iter().collect::<Vec<_>>();
        variables.sort_by_key(|(name, _)| *name);
        let mut functions = self.defs.functions.iter().collect::<Vec<_>>();
        functions.sort_by_key(|def| def.key());

        let lines = variables.into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .chain(functions.into_iter().map(|def| def.as_display().to_string()))
            .collect::<Vec<_>>();
        if lines.is_empty() {
            "no definitions".to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Returns the disassembly of the compiled expression or equation, or [`None`] if the input
    /// is a definition.
    fn disassemble(&self, text: &str) -> Result<Option<String>, Error> {
        let program = match parse::<Statement>(text)? {
            Statement::Expression(mut expr) => {
                expr.link_functions(&self.defs.functions)?;
                Compiler::compile(&expr)
            },
            Statement::Equation(mut eq) => {
                eq.form();
                eq.link_functions(&self.defs.functions)?;
                Compiler::compile(&eq)
            },
            Statement::VariableDefinition(_) | Statement::FunctionDefinition(_) => return Ok(None),
        };
        Ok(Some(program.to_string().trim_end().to_string()))
    }

    /// Checks that a new function definition does not make any definition recursive.
    fn check_recursion(&self, def: &FunctionDefinition) -> Result<(), Error> {
        let mut functions = self.defs.functions.clone();
        functions.insert(def.clone());
        let args = vec![Expression::zero(); def.params.len()];
        let mut probe = Expression::from_factor(Factor::Call(Call::new(def.name, args)));
        probe.link_functions(&functions)
    }

    fn statement(&mut self, text: &str) -> Result<String, Error> {
        match parse::<Statement>(text)? {
            Statement::VariableDefinition(def) => {
                let out = def.as_display().to_string();
                self.defs.define_variable(def);
                Ok(out)
            },
            Statement::FunctionDefinition(def) => {
                self.check_recursion(&def)?;
                let out = def.as_display().to_string();
                self.defs.define_function(def);
                Ok(out)
            },
            Statement::Expression(mut expr) => {
                expr.link_functions(&self.defs.functions)?;
                let value = Compiler::compile(&expr).eval(&self.defs.variables);
                Ok(format!("{} = {}", expr, value))
            },
            Statement::Equation(eq) => Ok(eq.to_formed().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use plotex_parser::parser::error::RecursiveFunction;
    use plotex_graph::error::{InvalidSamplingOptions, RootFindingPrecondition};
    use pretty_assertions::assert_eq;
    use super::*;

    fn session() -> Session {
        Session::new(Viewport::default())
    }

    #[test]
    fn commands_need_whitespace() {
        assert_eq!(strip_command("  roots x=1", "roots"), Some((8, "x=1")));
        assert_eq!(strip_command(":defs", ":defs"), Some((5, "")));
        assert_eq!(strip_command("rootsx=1", "roots"), None);
    }

    #[test]
    fn range_split() {
        assert_eq!(split_range("x^2=4 -3 3"), ("x^2=4", Some((-3.0, 3.0))));
        assert_eq!(split_range("x^2=4  0   5.5"), ("x^2=4", Some((0.0, 5.5))));
        assert_eq!(split_range("x^2=4"), ("x^2=4", None));
        assert_eq!(split_range("x = 4"), ("x = 4", None));
    }

    #[test]
    fn evaluate_with_definitions() {
        let mut session = session();
        assert_eq!(session.execute("a=2").unwrap(), "a=2");
        assert_eq!(session.execute("f(t)=t^2+a").unwrap(), "f(t)=t^{2}+a");
        assert_eq!(session.execute("f(3)-1").unwrap(), "f(3)-1 = 10");
        assert_eq!(session.execute(":defs").unwrap(), "a=2\nf(t)=t^{2}+a");
    }

    #[test]
    fn equations_are_formed() {
        assert_eq!(session().execute("x^2=y-1").unwrap(), "x^{2}-y+1=0");
    }

    #[test]
    fn roots() {
        let mut session = session();
        let out = session.execute("roots x+1=0").unwrap();
        assert!((out.parse::<f64>().unwrap() + 1.0).abs() < 1e-3);
        assert_eq!(session.execute("roots x^2+1=0").unwrap(), "no roots in [-10, 10]");

        let out = session.execute("roots x^2=4 0 5").unwrap();
        let root = out.parse::<f64>().unwrap();
        assert!((root - 2.0).abs() < 1e-3);

        session.execute("k=3").unwrap();
        let out = session.execute("roots x=k").unwrap();
        assert!((out.parse::<f64>().unwrap() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn roots_errors() {
        let err = session().execute("roots x+y=1").unwrap_err();
        assert!(err.is::<RootFindingPrecondition>());
        assert_eq!(err.spans, vec![6..11]);

        let err = session().execute("roots").unwrap_err();
        assert!(err.is::<InvalidArguments>());

        let err = session().execute("roots x=1 -inf 0").unwrap_err();
        assert!(err.is::<InvalidSamplingOptions>());
        assert_eq!(err.spans, vec![6..9]);
    }

    #[test]
    fn sample_curve() {
        let out = session().execute("sample x^2+y^2=4").unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("x^{2}+y^{2}-4=0"));
        assert!(lines.next().is_some_and(|line| line.starts_with("x-sweep: ")));
        assert!(lines.next().is_some_and(|line| line.starts_with("y-sweep: ")));
    }

    #[test]
    fn disassembly() {
        let out = session().execute(":asm 2x").unwrap();
        assert_eq!(out, "chunk 0 (arity 0):\n  0000 push_const 2\n  0001 push_var 0  ; x\n  0002 mul");

        let err = session().execute(":asm a=1").unwrap_err();
        assert!(err.is::<InvalidArguments>());
    }

    #[test]
    fn recursive_definitions_rejected() {
        let mut session = session();
        session.execute("f(t)=g(t)").unwrap();
        let err = session.execute("g(t)=f(t)+1").unwrap_err();
        assert!(err.is::<RecursiveFunction>());
        assert_eq!(session.execute(":defs").unwrap(), "f(t)=g(t)");
    }

    #[test]
    fn parse_errors_point_into_line() {
        let err = session().execute(r"sample \frac{1}{").unwrap_err();
        assert!(err.spans.iter().all(|span| span.start >= 7));
    }
}
