//! Bracketed scalar root-finding.

/// Absolute convergence tolerance on the root location.
const XTOL: f64 = 2e-12;
/// Relative convergence tolerance on the root location.
const RTOL: f64 = 4.0 * f64::EPSILON;
/// Iteration cap; the bracket halves at least every other step, so this
/// is never reached for well-scaled inputs.
const MAX_ITER: usize = 100;

/// Finds a zero of `f` on the closed interval `[a, b]` using Brent's
/// method (inverse quadratic interpolation with secant and bisection
/// fallbacks).
///
/// Returns `None` when `f(a)` and `f(b)` have the same nonzero sign, i.e.
/// when the interval is not known to bracket a root. A zero at either
/// endpoint is returned directly.
pub fn brentq<F>(f: F, a: f64, b: f64) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let mut xpre = a;
    let mut xcur = b;
    let mut fpre = f(xpre);
    let mut fcur = f(xcur);

    if fpre == 0.0 {
        return Some(xpre);
    }
    if fcur == 0.0 {
        return Some(xcur);
    }
    if fpre * fcur > 0.0 {
        return None;
    }

    let mut xblk = 0.0;
    let mut fblk = 0.0;
    let mut spre = 0.0;
    let mut scur = 0.0;

    for _ in 0..MAX_ITER {
        if fpre * fcur < 0.0 {
            xblk = xpre;
            fblk = fpre;
            spre = xcur - xpre;
            scur = spre;
        }
        if fblk.abs() < fcur.abs() {
            xpre = xcur;
            xcur = xblk;
            xblk = xpre;
            fpre = fcur;
            fcur = fblk;
            fblk = fpre;
        }

        let delta = (XTOL + RTOL * xcur.abs()) / 2.0;
        let sbis = (xblk - xcur) / 2.0;
        if fcur == 0.0 || sbis.abs() < delta {
            return Some(xcur);
        }

        if spre.abs() > delta && fcur.abs() < fpre.abs() {
            let stry = if xpre == xblk {
                // Secant step.
                -fcur * (xcur - xpre) / (fcur - fpre)
            } else {
                // Inverse quadratic interpolation.
                let dpre = (fpre - fcur) / (xpre - xcur);
                let dblk = (fblk - fcur) / (xblk - xcur);
                -fcur * (fblk * dblk - fpre * dpre) / (dblk * dpre * (fblk - fpre))
            };
            if 2.0 * stry.abs() < spre.abs().min(3.0 * sbis.abs() - delta) {
                spre = scur;
                scur = stry;
            } else {
                spre = sbis;
                scur = sbis;
            }
        } else {
            spre = sbis;
            scur = sbis;
        }

        xpre = xcur;
        fpre = fcur;
        if scur.abs() > delta {
            xcur += scur;
        } else {
            xcur += if sbis > 0.0 { delta } else { -delta };
        }
        fcur = f(xcur);
    }

    Some(xcur)
}
