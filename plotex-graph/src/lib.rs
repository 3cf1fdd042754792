//! Root finding and curve sampling for implicit equations in `x` and `y`.
//!
//! An implicit curve such as `x^2+y^2=4` cannot be evaluated point by point. Instead, one axis is
//! swept across the viewport, and at each sample the roots of the equation along the other axis
//! are found with [`find_roots`]. The [`sample`](sample::sample) driver does this in parallel and
//! returns the results as flat [`PointBuffer`]s, and [`Curve`] ties it to user input and
//! definitions.
//!
//! ```
//! use plotex_graph::{FindRoots, RootOptions};
//! use plotex_parser::parser::{ast::{Env, Equation}, parse};
//!
//! let eq = parse::<Equation>("x^2=4").unwrap();
//! let roots = eq.find_roots(&Env::new(), -10.0, 10.0, RootOptions::default()).unwrap();
//! assert_eq!(roots.len(), 2);
//! assert!((roots[0] + 2.0).abs() < 1e-3 && (roots[1] - 2.0).abs() < 1e-3);
//! ```

pub mod curve;
pub mod error;
pub mod roots;
pub mod sample;
pub mod worker;

pub use curve::{Curve, CurveSamples, Definitions};
pub use roots::{find_roots, FindRoots, RootOptions};
pub use sample::{Axis, PointBuffer, SampleOptions, Viewport};
pub use worker::Coalescer;
