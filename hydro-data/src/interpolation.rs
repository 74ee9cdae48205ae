//! One-dimensional interpolants over sparse control points.
//!
//! Both smooth strategies are cubic Hermite splines; they differ only in
//! how the knot slopes are chosen:
//!
//! - [`HermiteSpline::cubic`]: the exact-interpolating C2 cubic spline with
//!   not-a-knot end conditions (the zero-smoothing cubic B-spline fit).
//! - [`HermiteSpline::pchip`]: Fritsch-Carlson shape-preserving slopes, which
//!   never overshoot between monotone data.

use crate::error::InterpolationError;

/// Anything that can be evaluated at a point.
pub trait Interpolant {
    fn value(&self, x: f64) -> f64;

    /// Evaluate at every integer position `0..len`.
    fn sample(&self, len: usize) -> Vec<f64> {
        (0..len).map(|i| self.value(i as f64)).collect()
    }
}

fn validate(xs: &[f64], ys: &[f64], min_len: usize) -> Result<(), InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::LengthMismatch);
    }
    if xs.len() < min_len {
        return Err(InterpolationError::TooFewPoints {
            required: min_len,
            found: xs.len(),
        });
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(InterpolationError::NonFinite);
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(InterpolationError::NonIncreasing);
    }
    Ok(())
}

/// Index of the segment `[xs[i], xs[i + 1]]` containing `x`, clamped to
/// the first and last segments.
fn segment(xs: &[f64], x: f64) -> usize {
    let idx = xs.partition_point(|v| *v <= x);
    idx.saturating_sub(1).min(xs.len() - 2)
}

/// Piecewise-linear interpolation, flat outside the knot range.
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolant {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpolationError> {
        validate(&xs, &ys, 2)?;
        Ok(Self { xs, ys })
    }
}

impl Interpolant for LinearInterpolant {
    fn value(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        let i = segment(&self.xs, x);
        let w = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        self.ys[i] + w * (self.ys[i + 1] - self.ys[i])
    }
}

/// Piecewise cubic Hermite spline: values and first derivatives at knots.
#[derive(Debug, Clone)]
pub struct HermiteSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

impl HermiteSpline {
    /// Exact-interpolating cubic spline with not-a-knot end conditions.
    pub fn cubic(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpolationError> {
        validate(&xs, &ys, 2)?;
        let slopes = not_a_knot_slopes(&xs, &ys)?;
        Ok(Self { xs, ys, slopes })
    }

    /// Shape-preserving piecewise cubic (PCHIP).
    pub fn pchip(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpolationError> {
        validate(&xs, &ys, 2)?;
        let slopes = pchip_slopes(&xs, &ys);
        Ok(Self { xs, ys, slopes })
    }

    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }
}

impl Interpolant for HermiteSpline {
    /// Outside the knot range the boundary cubic is extended.
    fn value(&self, x: f64) -> f64 {
        let i = segment(&self.xs, x);
        hermite_eval(
            self.xs[i],
            self.xs[i + 1],
            self.ys[i],
            self.ys[i + 1],
            self.slopes[i],
            self.slopes[i + 1],
            x,
        )
    }
}

#[inline]
fn hermite_eval(x0: f64, x1: f64, y0: f64, y1: f64, m0: f64, m1: f64, xq: f64) -> f64 {
    let h = x1 - x0;
    let s = (xq - x0) / h;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    h00 * y0 + h10 * h * m0 + h01 * y1 + h11 * h * m1
}

fn secants(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let delta = ys
        .windows(2)
        .zip(&h)
        .map(|(w, h)| (w[1] - w[0]) / h)
        .collect();
    (h, delta)
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Knot slopes of the C2 cubic spline with not-a-knot end conditions.
///
/// Two points give a straight line and three points the interpolating
/// parabola. Otherwise the tridiagonal system for the slopes is solved
/// directly, with the not-a-knot rows folded into the first and last rows.
fn not_a_knot_slopes(xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, InterpolationError> {
    let n = xs.len();
    let (h, delta) = secants(xs, ys);

    if n == 2 {
        return Ok(vec![delta[0], delta[0]]);
    }
    if n == 3 {
        let c = (delta[1] - delta[0]) / (h[0] + h[1]);
        return Ok(vec![
            delta[0] - c * h[0],
            delta[0] + c * h[0],
            delta[0] + c * (h[0] + 2.0 * h[1]),
        ]);
    }

    let mut lower = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    let d = xs[2] - xs[0];
    diag[0] = h[1];
    upper[0] = d;
    rhs[0] = ((h[0] + 2.0 * d) * h[1] * delta[0] + h[0] * h[0] * delta[1]) / d;

    for i in 1..n - 1 {
        lower[i] = h[i];
        diag[i] = 2.0 * (h[i - 1] + h[i]);
        upper[i] = h[i - 1];
        rhs[i] = 3.0 * (h[i] * delta[i - 1] + h[i - 1] * delta[i]);
    }

    let d = xs[n - 1] - xs[n - 3];
    lower[n - 1] = d;
    diag[n - 1] = h[n - 3];
    rhs[n - 1] =
        (h[n - 2] * h[n - 2] * delta[n - 3] + (2.0 * d + h[n - 2]) * h[n - 3] * delta[n - 2]) / d;

    solve_tridiagonal(&lower, &diag, &upper, &rhs)
}

/// Thomas algorithm. `lower[0]` and `upper[n - 1]` are ignored.
fn solve_tridiagonal(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
) -> Result<Vec<f64>, InterpolationError> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    if diag[0].abs() <= f64::EPSILON {
        return Err(InterpolationError::SingularSystem);
    }
    c[0] = upper[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let m = diag[i] - lower[i] * c[i - 1];
        if m.abs() <= f64::EPSILON {
            return Err(InterpolationError::SingularSystem);
        }
        c[i] = if i < n - 1 { upper[i] / m } else { 0.0 };
        d[i] = (rhs[i] - lower[i] * d[i - 1]) / m;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(InterpolationError::SingularSystem);
    }
    Ok(x)
}

/// Fritsch-Carlson monotone slopes with the three-point end formula.
/// Callers validate for at least two points.
fn pchip_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let (h, delta) = secants(xs, ys);
    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        if sign(delta[k - 1]) * sign(delta[k]) <= 0 {
            d[k] = 0.0;
        } else {
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            d[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
        }
    }

    d[0] = pchip_end_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = pchip_end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

fn pchip_end_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}
