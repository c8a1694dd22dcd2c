//! Linear interpolation over tabulated (x, y) data.
//!
//! Backs every curve lookup in the predictor: thrust curves, mass curves,
//! collected acceleration samples and the atmospheric pressure table.

/// Tables at or below this length are bracketed with a linear scan instead of
/// bisection.
const LINEAR_SCAN_MAX: usize = 4;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    Empty,
    /// x values must be non-decreasing; `index` is the first offending knot.
    NonMonotonic { index: usize },
}

/// Ordered (x, y) samples of a function, borrowed from the caller.
///
/// Validated once at construction so that every later lookup is infallible;
/// configuration errors surface before the control loop is entered.
#[derive(Debug, Clone, Copy)]
pub struct TabulatedCurve<'a> {
    points: &'a [(f64, f64)],
}

impl<'a> TabulatedCurve<'a> {
    pub fn new(points: &'a [(f64, f64)]) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::Empty);
        }
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].0 < pair[0].0 {
                return Err(CurveError::NonMonotonic { index: i + 1 });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &'a [(f64, f64)] {
        self.points
    }

    /// x of the last knot.
    pub fn last_x(&self) -> f64 {
        self.points[self.points.len() - 1].0
    }

    /// Samples the curve at `key`, clamping to the first/last y outside the
    /// table's x range.
    pub fn sample(&self, key: f64) -> f64 {
        interp(self.points, key)
    }
}

/// Interpolates `points` at `key`. `points` must be non-empty with
/// non-decreasing x (`TabulatedCurve` guarantees this for caller data).
pub(crate) fn interp(points: &[(f64, f64)], key: f64) -> f64 {
    debug_assert!(!points.is_empty());

    let last = points.len() - 1;
    if key < points[0].0 {
        return points[0].1;
    }
    if key > points[last].0 {
        return points[last].1;
    }

    let index = if points.len() <= LINEAR_SCAN_MAX {
        scan(points, key)
    } else {
        bisect(points, key)
    };
    if index >= last {
        return points[last].1;
    }

    // Bracketing pair; x1 > x0 holds even with duplicate knots because index
    // is the last knot with x <= key.
    let (x0, y0) = points[index];
    let (x1, y1) = points[index + 1];
    y0 + (y1 - y0) * (key - x0) / (x1 - x0)
}

/// Index of the last knot with x <= key, by linear scan.
/// Requires `key >= points[0].0`.
fn scan(points: &[(f64, f64)], key: f64) -> usize {
    points
        .iter()
        .skip(1)
        .take_while(|point| key >= point.0)
        .count()
}

/// Index of the last knot with x <= key, by bisection (searchsorted
/// semantics). Requires `key >= points[0].0`.
fn bisect(points: &[(f64, f64)], key: f64) -> usize {
    let mut index_min = 0usize;
    let mut index_max = points.len();
    while index_min < index_max {
        let middle = index_min + ((index_max - index_min) >> 1);
        if key >= points[middle].0 {
            index_min = middle + 1;
        } else {
            index_max = middle;
        }
    }
    index_min - 1
}
