//! The sampling driver, which sweeps one axis of the viewport and finds the roots of a program
//! along the other.

use plotex_compiler::Program;
use plotex_error::Error;
use plotex_parser::parser::ast::Env;
use plotex_vm::Vm;
use rayon::prelude::*;
use crate::{
    error::InvalidSamplingOptions,
    roots::{find_roots, RootOptions},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the two coordinate axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Returns the name of the variable for this axis.
    pub fn name(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
        }
    }

    /// Returns the other axis.
    pub fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// The visible region of the graph, in graph units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    pub low_x: f64,
    pub high_x: f64,
    pub low_y: f64,
    pub high_y: f64,
}

/// The default viewport, from `-10` to `10` on both axes.
impl Default for Viewport {
    fn default() -> Self {
        Self::new(-10.0, 10.0, -10.0, 10.0)
    }
}

impl Viewport {
    /// Creates a viewport with the given bounds.
    pub fn new(low_x: f64, high_x: f64, low_y: f64, high_y: f64) -> Self {
        Self { low_x, high_x, low_y, high_y }
    }

    /// Checks that both axes have finite bounds, with the low bound below the high one.
    pub fn validate(&self) -> Result<(), Error> {
        for axis in [Axis::X, Axis::Y] {
            let (low, high) = self.range(axis);
            if !(low.is_finite() && high.is_finite() && low < high) {
                let reason = format!(
                    "the {} range of the viewport, [{}, {}], must be finite and non-empty",
                    axis.name(),
                    low,
                    high,
                );
                return Err(Error::new(Vec::new(), InvalidSamplingOptions { reason }));
            }
        }
        Ok(())
    }

    /// Returns the `(low, high)` bounds of the given axis.
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.low_x, self.high_x),
            Axis::Y => (self.low_y, self.high_y),
        }
    }
}

/// Options for [`sample`].
///
/// All distances are in graph units. [`SampleOptions::for_canvas`] derives them from the size of
/// the canvas the curve is drawn on.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleOptions {
    /// The distance between coarse samples along the sweep axis. The sweep is also extended by
    /// this much past both ends of the viewport, and so is the search along the cross axis.
    pub step: f64,

    /// The granularity of each root search. See [`RootOptions::granularity`].
    pub granularity: f64,

    /// The precision of each root. See [`RootOptions::max_gap`].
    pub max_gap: f64,

    /// The number of samples taken between each pair of consecutive coarse samples.
    pub refinements: usize,

    /// How far past the roots of the neighboring coarse samples a refinement sample searches.
    pub padding: f64,
}

/// The default options, for the default [`Viewport`] drawn on a 1000 by 1000 canvas.
impl Default for SampleOptions {
    fn default() -> Self {
        Self::for_canvas(&Viewport::default(), 1000.0, 1000.0)
    }
}

impl SampleOptions {
    /// Derives the options for a viewport drawn on a canvas of the given size, in pixels.
    ///
    /// - the coarse step is one fiftieth of the average canvas dimension;
    /// - there is one refinement sample for every 2 pixels of the step;
    /// - roots are searched for every 4 pixels, to a precision of half a pixel;
    /// - refinement samples search 20 pixels past the neighboring roots.
    pub fn for_canvas(viewport: &Viewport, width: f64, height: f64) -> Self {
        let step_px = (width + height) / 2.0 / 50.0;
        let units_per_px = (viewport.high_x - viewport.low_x) / width;
        Self {
            step: step_px * units_per_px,
            granularity: 4.0 * units_per_px,
            max_gap: 0.5 * units_per_px,
            refinements: (step_px / 2.0).ceil() as usize,
            padding: 20.0 * units_per_px,
        }
    }

    /// Set the coarse step. Returns an updated [`SampleOptions`] for chaining.
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set the root search granularity. Returns an updated [`SampleOptions`] for chaining.
    pub fn granularity(mut self, granularity: f64) -> Self {
        self.granularity = granularity;
        self
    }

    /// Set the root precision. Returns an updated [`SampleOptions`] for chaining.
    pub fn max_gap(mut self, max_gap: f64) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Set the number of refinement samples. Returns an updated [`SampleOptions`] for chaining.
    pub fn refinements(mut self, refinements: usize) -> Self {
        self.refinements = refinements;
        self
    }

    /// Set the refinement padding. Returns an updated [`SampleOptions`] for chaining.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Returns the options used for each root search.
    pub fn root_options(&self) -> RootOptions {
        RootOptions::default()
            .granularity(self.granularity)
            .max_gap(self.max_gap)
    }

    fn validate(&self) -> Result<(), Error> {
        let reason = if !(self.step.is_finite() && self.step > 0.0) {
            format!("the step must be a positive number, but it is {}", self.step)
        } else if !(self.padding.is_finite() && self.padding >= 0.0) {
            format!("the padding must be a non-negative number, but it is {}", self.padding)
        } else {
            return self.root_options().validate(0.0, 0.0);
        };
        Err(Error::new(Vec::new(), InvalidSamplingOptions { reason }))
    }
}

/// The roots found along one sweep axis, as a flat buffer of records.
///
/// Each record is `[count, coordinate, root_1, ..., root_count]`: the coordinate on the sweep
/// axis, followed by the coordinates on the cross axis where the curve passes. Only samples with
/// at least one root have a record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointBuffer {
    /// The axis that was swept.
    pub sweep: Axis,

    /// The records.
    pub data: Vec<f64>,
}

impl PointBuffer {
    /// Creates an empty buffer for the given sweep axis.
    pub fn new(sweep: Axis) -> Self {
        Self { sweep, data: Vec::new() }
    }

    /// Appends a record, unless there are no roots.
    pub fn push(&mut self, coordinate: f64, roots: &[f64]) {
        if roots.is_empty() {
            return;
        }
        self.data.push(roots.len() as f64);
        self.data.push(coordinate);
        self.data.extend_from_slice(roots);
    }

    /// Returns an iterator over the records, as pairs of the sweep coordinate and the roots.
    pub fn records(&self) -> Records<'_> {
        Records { data: &self.data }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records().count()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns every point of the buffer as an `(x, y)` pair.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let sweep = self.sweep;
        self.records().flat_map(move |(coordinate, roots)| {
            roots.iter().map(move |root| match sweep {
                Axis::X => (coordinate, *root),
                Axis::Y => (*root, coordinate),
            })
        })
    }
}

/// Iterator over the records of a [`PointBuffer`].
#[derive(Clone, Debug)]
pub struct Records<'a> {
    data: &'a [f64],
}

impl<'a> Iterator for Records<'a> {
    type Item = (f64, &'a [f64]);

    fn next(&mut self) -> Option<Self::Item> {
        let (&count, rest) = self.data.split_first()?;
        let (&coordinate, rest) = rest.split_first()?;
        let count = (count as usize).min(rest.len());
        let (roots, rest) = rest.split_at(count);
        self.data = rest;
        Some((coordinate, roots))
    }
}

/// Finds the roots along the cross axis with the sweep variable fixed at `coordinate`.
fn roots_at(
    program: &Program,
    env: &Env,
    sweep: Axis,
    coordinate: f64,
    (min, max): (f64, f64),
    opts: RootOptions,
) -> Result<Vec<f64>, Error> {
    if min > max {
        return Ok(Vec::new());
    }

    let mut vm = Vm::new(program);
    vm.bind(env);
    vm.set(sweep.name(), coordinate);
    let cross = program.slot(sweep.cross().name());
    let roots = find_roots(|value| {
        if let Some(slot) = cross {
            vm.set_slot(slot, value);
        }
        vm.eval()
    }, min, max, opts)?;

    log::trace!("{}={}: {} root(s) in [{}, {}]", sweep.name(), coordinate, roots.len(), min, max);
    Ok(roots)
}

/// Returns the smallest and largest roots of two neighboring samples, if both have roots.
fn root_bounds(current: &[f64], next: &[f64]) -> Option<(f64, f64)> {
    if current.is_empty() || next.is_empty() {
        return None;
    }
    let bounds = current.iter()
        .chain(next)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), root| (min.min(*root), max.max(*root)));
    Some(bounds)
}

/// Samples the curve where `program` is zero, sweeping the given axis across the viewport.
///
/// The sweep runs from one step before the viewport to one step past it. At each coarse sample,
/// the roots along the cross axis (also extended by one step on each side) are found. Then
/// [`SampleOptions::refinements`] more samples are taken evenly between each pair of neighboring
/// coarse samples. A refinement sample searches:
///
/// - the whole cross range, if either neighbor has no roots;
/// - otherwise the range spanned by both neighbors' roots, widened by the padding;
/// - and if that finds nothing, the rest of the cross range: from the largest neighboring root
///   (less the padding) to the top, then from the bottom to the smallest neighboring root (plus
///   the padding).
///
/// Samples are computed in parallel. The records of the result are ordered by coarse sample,
/// each followed by its refinement samples.
pub fn sample(
    program: &Program,
    env: &Env,
    sweep: Axis,
    viewport: &Viewport,
    opts: &SampleOptions,
) -> Result<PointBuffer, Error> {
    opts.validate()?;
    viewport.validate()?;

    let (low, high) = viewport.range(sweep);
    let (low, high) = (low - opts.step, high + opts.step);
    let (cross_low, cross_high) = viewport.range(sweep.cross());
    let cross = (cross_low - opts.step, cross_high + opts.step);
    let root_opts = opts.root_options();

    let coarse = (0u64..)
        .map(|i| low + i as f64 * opts.step)
        .take_while(|coordinate| *coordinate <= high)
        .collect::<Vec<_>>();
    let coarse_roots = coarse.par_iter()
        .map(|coordinate| roots_at(program, env, sweep, *coordinate, cross, root_opts))
        .collect::<Result<Vec<_>, Error>>()?;

    let refined = (0..coarse.len().saturating_sub(1))
        .into_par_iter()
        .map(|i| {
            let bounds = root_bounds(&coarse_roots[i], &coarse_roots[i + 1]);
            (0..opts.refinements)
                .map(|j| -> Result<(f64, Vec<f64>), Error> {
                    let coordinate = low + i as f64 * opts.step
                        + opts.step * (j + 1) as f64 / (opts.refinements + 1) as f64;
                    let search = |range| roots_at(program, env, sweep, coordinate, range, root_opts);
                    let roots = match bounds {
                        None => search(cross)?,
                        Some((min, max)) => {
                            let roots = search((min - opts.padding, max + opts.padding))?;
                            if roots.is_empty() {
                                let mut roots = search((max - opts.padding, cross.1))?;
                                roots.extend(search((cross.0, min + opts.padding))?);
                                roots
                            } else {
                                roots
                            }
                        },
                    };
                    Ok((coordinate, roots))
                })
                .collect::<Result<Vec<_>, Error>>()
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let mut buffer = PointBuffer::new(sweep);
    for (i, (coordinate, roots)) in coarse.iter().zip(&coarse_roots).enumerate() {
        buffer.push(*coordinate, roots);
        for (coordinate, roots) in refined.get(i).into_iter().flatten() {
            buffer.push(*coordinate, roots);
        }
    }

    log::debug!(
        "sampled {} {}-coordinate(s) with {} refinement(s) each: {} record(s)",
        coarse.len(),
        sweep.name(),
        opts.refinements,
        buffer.len(),
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use plotex_compiler::Compiler;
    use plotex_parser::parser::{ast::Equation, parse};
    use pretty_assertions::assert_eq;
    use super::*;

    fn program(source: &str) -> Program {
        let mut eq = parse::<Equation>(source).unwrap();
        eq.form();
        Compiler::compile(&eq)
    }

    #[test]
    fn options_for_canvas() {
        let opts = SampleOptions::for_canvas(&Viewport::default(), 800.0, 600.0);
        let units_per_px = 20.0 / 800.0;
        assert_abs_diff_eq!(opts.step, 14.0 * units_per_px, epsilon = 1e-12);
        assert_abs_diff_eq!(opts.granularity, 4.0 * units_per_px, epsilon = 1e-12);
        assert_abs_diff_eq!(opts.max_gap, 0.5 * units_per_px, epsilon = 1e-12);
        assert_abs_diff_eq!(opts.padding, 20.0 * units_per_px, epsilon = 1e-12);
        assert_eq!(opts.refinements, 7);
    }

    #[test]
    fn records() {
        let mut buffer = PointBuffer::new(Axis::Y);
        buffer.push(1.0, &[2.0, 3.0]);
        buffer.push(1.5, &[]);
        buffer.push(2.0, &[4.0]);
        assert_eq!(buffer.data, vec![2.0, 1.0, 2.0, 3.0, 1.0, 2.0, 4.0]);
        assert_eq!(buffer.len(), 2);
        assert_eq!(
            buffer.points().collect::<Vec<_>>(),
            vec![(2.0, 1.0), (3.0, 1.0), (4.0, 2.0)],
        );
    }

    #[test]
    fn horizontal_line() {
        let opts = SampleOptions::default().step(1.0).refinements(1);
        let buffer = sample(&program("y=2"), &Env::new(), Axis::X, &Viewport::default(), &opts).unwrap();

        // 23 coarse samples from -11 to 11, and one between each pair
        assert_eq!(buffer.len(), 45);
        for (i, (x, roots)) in buffer.records().enumerate() {
            assert_abs_diff_eq!(x, -11.0 + i as f64 * 0.5, epsilon = 1e-9);
            assert_eq!(roots.len(), 1);
            assert_abs_diff_eq!(roots[0], 2.0, epsilon = 0.01);
        }
    }

    #[test]
    fn circle() {
        let opts = SampleOptions::default().step(0.5).refinements(2);
        let viewport = Viewport::new(-3.0, 3.0, -3.0, 3.0);
        let buffer = sample(&program("x^2+y^2=4"), &Env::new(), Axis::X, &viewport, &opts).unwrap();

        assert!(!buffer.is_empty());
        for (x, y) in buffer.points() {
            assert!(x.abs() <= 2.0 + 1e-9);
            assert_abs_diff_eq!(x.hypot(y), 2.0, epsilon = 0.05);
        }

        // x = 0 is a coarse sample, with one root above and one below
        let (_, roots) = buffer.records().find(|(x, _)| x.abs() < 1e-9).unwrap();
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], -2.0, epsilon = 0.01);
        assert_abs_diff_eq!(roots[1], 2.0, epsilon = 0.01);
    }

    #[test]
    fn no_curve() {
        let buffer = sample(&program("x^2+y^2=-1"), &Env::new(), Axis::Y, &Viewport::default(), &SampleOptions::default()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.sweep, Axis::Y);
    }

    #[test]
    fn invalid_options() {
        let opts = SampleOptions::default().step(0.0);
        let err = sample(&program("y=x"), &Env::new(), Axis::X, &Viewport::default(), &opts).unwrap_err();
        assert!(err.is::<InvalidSamplingOptions>());

        let opts = SampleOptions::default().max_gap(f64::NAN);
        assert!(sample(&program("y=x"), &Env::new(), Axis::X, &Viewport::default(), &opts).is_err());
    }

    #[test]
    fn invalid_viewport() {
        let opts = SampleOptions::default();
        for viewport in [
            Viewport::new(f64::NEG_INFINITY, 10.0, -10.0, 10.0),
            Viewport::new(-10.0, f64::INFINITY, -10.0, 10.0),
            Viewport::new(-10.0, 10.0, f64::NAN, 10.0),
            Viewport::new(-10.0, 10.0, 5.0, 5.0),
            Viewport::new(10.0, -10.0, -10.0, 10.0),
        ] {
            for axis in [Axis::X, Axis::Y] {
                let err = sample(&program("y=x"), &Env::new(), axis, &viewport, &opts).unwrap_err();
                assert!(err.is::<InvalidSamplingOptions>(), "{:?} accepted", viewport);
            }
        }
        assert!(Viewport::default().validate().is_ok());
    }
}
