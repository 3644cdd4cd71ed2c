//! Piecewise polynomial interpolation over a swept axis.

use crate::error::{Error, Result};

/// A piecewise polynomial interpolant of degree at most 3 over strictly
/// increasing sample points.
///
/// Degree 3 fits a not-a-knot cubic spline through all points. Degree 2
/// evaluates the parabola through the three samples nearest the query
/// interval; the result interpolates every sample but is only piecewise
/// smooth (its derivative may step where the parabola selection changes,
/// unlike a C1 quadratic spline). Degree 1 is piecewise linear. Queries
/// outside the sampled interval extrapolate the nearest polynomial
/// piece.
#[derive(Debug, Clone)]
pub struct Spline {
    x: Vec<f64>,
    y: Vec<f64>,
    degree: usize,
    /// Second derivatives at the knots. Empty unless `degree == 3`.
    d2: Vec<f64>,
}

impl Spline {
    /// Fits an interpolant of exactly the given degree (1, 2, or 3).
    ///
    /// Requires `degree + 1` points; fails with [`Error::Interpolation`]
    /// when fewer are supplied. The `x` values must be strictly
    /// increasing.
    ///
    /// # Panics
    ///
    /// Panics if `degree` is not 1, 2, or 3, or if `x` and `y` have
    /// different lengths.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self> {
        assert!((1..=3).contains(&degree), "unsupported spline degree");
        assert_eq!(x.len(), y.len());
        debug_assert!(x.windows(2).all(|w| w[0] < w[1]));

        let n = x.len();
        if n < degree + 1 {
            return Err(Error::Interpolation {
                degree,
                required: degree + 1,
                found: n,
            });
        }

        let d2 = if degree == 3 {
            second_derivatives(x, y)
        } else {
            Vec::new()
        };

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            degree,
            d2,
        })
    }

    /// Fits an interpolant of the given degree, lowering the degree to
    /// `n - 1` when fewer than `degree + 1` points are supplied.
    ///
    /// At least 2 points are always required.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`Spline::fit`].
    pub fn fit_capped(x: &[f64], y: &[f64], degree: usize) -> Result<Self> {
        let capped = degree.min(x.len().saturating_sub(1)).max(1);
        Self::fit(x, y, capped)
    }

    /// Evaluates the interpolant at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let i = self.interval(x);
        match self.degree {
            1 => self.eval_linear(i, x),
            2 => self.eval_quadratic(i, x),
            3 => self.eval_cubic(i, x),
            _ => unreachable!(),
        }
    }

    /// Returns the index of the knot interval containing `x`, clamped to
    /// the sampled range.
    fn interval(&self, x: f64) -> usize {
        let n = self.x.len();
        match self.x.partition_point(|&xi| xi <= x) {
            0 => 0,
            p => (p - 1).min(n - 2),
        }
    }

    fn eval_linear(&self, i: usize, x: f64) -> f64 {
        let h = self.x[i + 1] - self.x[i];
        let t = (x - self.x[i]) / h;
        self.y[i] * (1.0 - t) + self.y[i + 1] * t
    }

    fn eval_quadratic(&self, i: usize, x: f64) -> f64 {
        // Parabola through the three knots nearest the query interval.
        let n = self.x.len();
        let j = i.clamp(1, n - 2) - 1;
        let (x0, x1, x2) = (self.x[j], self.x[j + 1], self.x[j + 2]);
        let (y0, y1, y2) = (self.y[j], self.y[j + 1], self.y[j + 2]);
        y0 * (x - x1) * (x - x2) / ((x0 - x1) * (x0 - x2))
            + y1 * (x - x0) * (x - x2) / ((x1 - x0) * (x1 - x2))
            + y2 * (x - x0) * (x - x1) / ((x2 - x0) * (x2 - x1))
    }

    fn eval_cubic(&self, i: usize, x: f64) -> f64 {
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - x) / h;
        let b = (x - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.d2[i] + (b * b * b - b) * self.d2[i + 1]) * h * h / 6.0
    }
}

/// Solves for the spline's second derivatives at the knots with
/// not-a-knot end conditions (the third derivative is continuous across
/// the first and last interior knots).
fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = y
        .windows(2)
        .zip(h.iter())
        .map(|(w, &h)| (w[1] - w[0]) / h)
        .collect();

    // Interior equations for the unknowns m[1..n-1]:
    //   h[i-1] m[i-1] + 2 (h[i-1] + h[i]) m[i] + h[i] m[i+1] = 6 (slope[i] - slope[i-1])
    // with m[0] and m[n-1] eliminated via the not-a-knot conditions
    //   h[1] m[0] - (h[0] + h[1]) m[1] + h[0] m[2] = 0
    //   h[n-2] m[n-3] - (h[n-3] + h[n-2]) m[n-2] + h[n-3] m[n-1] = 0.
    let k = n - 2;
    let mut sub = vec![0.0; k];
    let mut diag = vec![0.0; k];
    let mut sup = vec![0.0; k];
    let mut rhs = vec![0.0; k];
    for i in 1..=k {
        sub[i - 1] = h[i - 1];
        diag[i - 1] = 2.0 * (h[i - 1] + h[i]);
        sup[i - 1] = h[i];
        rhs[i - 1] = 6.0 * (slope[i] - slope[i - 1]);
    }
    // Fold m[0] = ((h[0] + h[1]) m[1] - h[0] m[2]) / h[1] into the first row.
    diag[0] += h[0] * (h[0] + h[1]) / h[1];
    sup[0] -= h[0] * h[0] / h[1];
    // Fold m[n-1] = ((h[n-3] + h[n-2]) m[n-2] - h[n-2] m[n-3]) / h[n-3] into the last row.
    diag[k - 1] += h[n - 2] * (h[n - 3] + h[n - 2]) / h[n - 3];
    sub[k - 1] -= h[n - 2] * h[n - 2] / h[n - 3];

    // Thomas algorithm.
    for i in 1..k {
        let w = sub[i] / diag[i - 1];
        diag[i] -= w * sup[i - 1];
        rhs[i] -= w * rhs[i - 1];
    }
    let mut m = vec![0.0; n];
    m[k] = rhs[k - 1] / diag[k - 1];
    for i in (1..k).rev() {
        m[i] = (rhs[i - 1] - sup[i - 1] * m[i + 1]) / diag[i - 1];
    }
    m[0] = ((h[0] + h[1]) * m[1] - h[0] * m[2]) / h[1];
    m[n - 1] = ((h[n - 3] + h[n - 2]) * m[n - 2] - h[n - 2] * m[n - 3]) / h[n - 3];
    m
}
