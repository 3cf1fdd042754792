//! Bisection root finder for functions of one variable.

use plotex_compiler::Compiler;
use plotex_error::Error;
use plotex_parser::parser::ast::{Env, Equation};
use plotex_vm::Vm;
use crate::error::{InvalidSamplingOptions, RootFindingPrecondition};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The maximum number of bisection steps spent on a single bracket.
const MAX_ITERATIONS: usize = 200;

/// Options for [`find_roots`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RootOptions {
    /// The distance between consecutive samples of the function. Two roots closer than this may be
    /// missed.
    ///
    /// The default value is `0.1`.
    pub granularity: f64,

    /// Bisection stops once the bracket around a root is narrower than this.
    ///
    /// The default value is `1e-4`.
    pub max_gap: f64,
}

/// The default options for root finding. Returns a [`RootOptions`] with the following values:
///
/// - [`granularity`](RootOptions::granularity): `0.1`
/// - [`max_gap`](RootOptions::max_gap): `1e-4`
impl Default for RootOptions {
    fn default() -> Self {
        Self {
            granularity: 0.1,
            max_gap: 1e-4,
        }
    }
}

impl RootOptions {
    /// Set the sampling granularity. Returns an updated [`RootOptions`] for chaining.
    pub fn granularity(mut self, granularity: f64) -> Self {
        self.granularity = granularity;
        self
    }

    /// Set the maximum bracket width. Returns an updated [`RootOptions`] for chaining.
    pub fn max_gap(mut self, max_gap: f64) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Checks that the options can be used to search `[min, max]`.
    pub fn validate(&self, min: f64, max: f64) -> Result<(), Error> {
        let reason = if !(self.granularity.is_finite() && self.granularity > 0.0) {
            format!("the granularity must be a positive number, but it is {}", self.granularity)
        } else if !(self.max_gap.is_finite() && self.max_gap > 0.0) {
            format!("the maximum gap must be a positive number, but it is {}", self.max_gap)
        } else if !(min.is_finite() && max.is_finite()) {
            format!("the range [{}, {}] must have finite bounds", min, max)
        } else if min > max {
            format!("the range [{}, {}] is empty", min, max)
        } else {
            return Ok(());
        };
        Err(Error::new(Vec::new(), InvalidSamplingOptions { reason }))
    }
}

/// Narrows the bracket `[left, right]` around a sign change of `f`, returning the root it
/// contains.
///
/// Returns [`None`] if the values at the ends of the narrowed bracket are not closer together
/// than they were at the ends of the original one. That happens when the sign change is caused
/// by an asymptote rather than a root.
fn bisect(
    f: &mut impl FnMut(f64) -> f64,
    (mut left, mut right): (f64, f64),
    (left_value, right_value): (f64, f64),
    max_gap: f64,
) -> Option<f64> {
    let rising = right_value > 0.0;
    let (mut new_left_value, mut new_right_value) = (left_value, right_value);

    for _ in 0..MAX_ITERATIONS {
        if right - left < max_gap {
            break;
        }

        let mid = (left + right) / 2.0;
        if mid <= left || mid >= right {
            break;
        }

        let value = f(mid);
        if value == 0.0 {
            return Some(mid);
        }

        // NaN compares as not negative, so it is treated like a positive value
        if (value < 0.0) == rising {
            left = mid;
            new_left_value = value;
        } else {
            right = mid;
            new_right_value = value;
        }
    }

    let converged = (new_left_value - new_right_value).abs() < (left_value - right_value).abs();
    log::trace!(
        "bracket narrowed to [{}, {}], {}",
        left,
        right,
        if converged { "accepted" } else { "rejected as an asymptote" },
    );
    converged.then(|| (left + right) / 2.0)
}

/// Finds the roots of `f` in `[min, max]`, in ascending order.
///
/// `f` is sampled at `min + i * granularity` for every `i` that stays within the range. A sample
/// that is exactly zero is a root. A strict sign change between two consecutive finite samples
/// is narrowed down with bisection. Non-finite samples break continuity, so no root is reported
/// across them.
///
/// Finding no roots is not an error. An error is returned only if the options are invalid (see
/// [`RootOptions::validate`]).
pub fn find_roots(
    mut f: impl FnMut(f64) -> f64,
    min: f64,
    max: f64,
    opts: RootOptions,
) -> Result<Vec<f64>, Error> {
    opts.validate(min, max)?;

    let mut roots = Vec::new();
    let mut previous: Option<(f64, f64)> = None;
    for i in 0u64.. {
        let x = min + i as f64 * opts.granularity;
        if x > max {
            break;
        }

        let y = f(x);
        if !y.is_finite() {
            previous = None;
            continue;
        }

        if y == 0.0 {
            roots.push(x);
        } else if let Some((prev_x, prev_y)) = previous {
            if prev_y != 0.0 && (prev_y < 0.0) != (y < 0.0) {
                if let Some(root) = bisect(&mut f, (prev_x, x), (prev_y, y), opts.max_gap) {
                    roots.push(root);
                }
            }
        }
        previous = Some((x, y));
    }

    Ok(roots)
}

/// Root finding for equations.
pub trait FindRoots {
    /// Finds the values of the equation's only unbound variable that make both sides equal.
    ///
    /// Variables bound in `env`, or by hidden substitution, are held at their value. The
    /// equation is left untouched; it is formed and compiled on a copy.
    fn find_roots(&self, env: &Env, min: f64, max: f64, opts: RootOptions) -> Result<Vec<f64>, Error>;
}

impl FindRoots for Equation {
    fn find_roots(&self, env: &Env, min: f64, max: f64, opts: RootOptions) -> Result<Vec<f64>, Error> {
        let formed = self.to_formed();
        let unbound = formed.free_vars_linked()
            .into_iter()
            .filter(|name| !env.contains(*name))
            .collect::<Vec<_>>();
        let [var] = unbound[..] else {
            return Err(Error::new(Vec::new(), RootFindingPrecondition { unbound }));
        };

        let program = Compiler::compile(&formed);
        let mut vm = Vm::new(&program);
        vm.bind(env);
        let slot = program.slot(var);
        log::debug!("finding roots of `{}` in `{}` over [{}, {}]", formed, var, min, max);

        find_roots(|value| {
            if let Some(slot) = slot {
                vm.set_slot(slot, value);
            }
            vm.eval()
        }, min, max, opts)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use plotex_parser::parser::{ast::{FunctionDefinition, FunctionTable}, parse};
    use pretty_assertions::assert_eq;
    use super::*;

    fn roots(source: &str, env: &Env) -> Result<Vec<f64>, Error> {
        let opts = RootOptions::default().granularity(0.1).max_gap(1e-4);
        parse::<Equation>(source).unwrap().find_roots(env, -10.0, 10.0, opts)
    }

    #[test]
    fn quadratic() {
        let roots = roots("x^2-4=0", &Env::new()).unwrap();
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], -2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(roots[1], 2.0, epsilon = 1e-3);
    }

    #[test]
    fn no_roots() {
        assert!(roots("x^2+1=0", &Env::new()).unwrap().is_empty());
    }

    #[test]
    fn both_sides() {
        let roots = roots("y^2=2y+3", &Env::new()).unwrap();
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], -1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(roots[1], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn bound_by_env() {
        let env = Env::new().with('x', 3.0);
        let roots = roots("x+y=1", &env).unwrap();
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], -2.0, epsilon = 1e-3);
    }

    #[test]
    fn bound_by_hidden_substitution() {
        let mut eq = parse::<Equation>("y=2x").unwrap();
        eq.hidden_substitute(&[('x', Some(1.5))].into_iter().collect());
        let roots = eq.find_roots(&Env::new(), -10.0, 10.0, RootOptions::default()).unwrap();
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn unbound_variables() {
        let err = roots("x+y=1", &Env::new()).unwrap_err();
        let kind = err.downcast_ref::<RootFindingPrecondition>().unwrap();
        assert_eq!(kind.unbound, vec!['x', 'y']);

        let err = roots("1=1", &Env::new()).unwrap_err();
        assert!(err.is::<RootFindingPrecondition>());
    }

    #[test]
    fn variables_of_linked_functions() {
        let table = [parse::<FunctionDefinition>("f(t)=t-a").unwrap()]
            .into_iter()
            .collect::<FunctionTable>();
        let mut eq = parse::<Equation>("f(x)=0").unwrap();
        eq.link_functions(&table).unwrap();

        assert!(roots("f(x)=0", &Env::new()).unwrap().is_empty());
        assert!(eq.find_roots(&Env::new(), -10.0, 10.0, RootOptions::default()).is_err());

        let roots = eq.find_roots(&Env::new().with('a', 4.0), -10.0, 10.0, RootOptions::default()).unwrap();
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], 4.0, epsilon = 1e-3);
    }

    #[test]
    fn exact_zero_sample() {
        // 0 is sampled exactly, and must not be counted twice
        let roots = find_roots(|x| x, -1.0, 1.0, RootOptions::default().granularity(0.5)).unwrap();
        assert_eq!(roots, vec![0.0]);

        let roots = find_roots(|x| x * (x - 1.0), -1.0, 1.0, RootOptions::default().granularity(0.5)).unwrap();
        assert_eq!(roots, vec![0.0, 1.0]);
    }

    #[test]
    fn asymptote_rejected() {
        let roots = find_roots(|x| 1.0 / x, -1.05, 1.0, RootOptions::default()).unwrap();
        assert!(roots.is_empty());

        let roots = find_roots(|x| x.tan(), 0.05, 4.0, RootOptions::default()).unwrap();
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], std::f64::consts::PI, epsilon = 1e-3);
    }

    #[test]
    fn non_finite_breaks_continuity() {
        let roots = find_roots(|x| if x < 0.0 { x.sqrt() } else { x - 0.55 }, -1.0, 1.0, RootOptions::default()).unwrap();
        assert_eq!(roots.len(), 1);
        assert_abs_diff_eq!(roots[0], 0.55, epsilon = 1e-3);

        let roots = find_roots(|x| if x.abs() < 0.25 { f64::NAN } else { x }, -1.0, 1.0, RootOptions::default()).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn invalid_options() {
        for (opts, min, max) in [
            (RootOptions::default().granularity(0.0), -1.0, 1.0),
            (RootOptions::default().granularity(f64::INFINITY), -1.0, 1.0),
            (RootOptions::default().max_gap(-1.0), -1.0, 1.0),
            (RootOptions::default(), 1.0, -1.0),
            (RootOptions::default(), f64::NAN, 1.0),
            (RootOptions::default(), f64::NEG_INFINITY, 1.0),
            (RootOptions::default(), -1.0, f64::INFINITY),
            (RootOptions::default(), f64::NEG_INFINITY, f64::INFINITY),
        ] {
            let err = find_roots(|x| x, min, max, opts).unwrap_err();
            assert!(err.is::<InvalidSamplingOptions>());
        }
    }
}
