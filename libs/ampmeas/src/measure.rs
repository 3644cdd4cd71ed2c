//! Metric computation over a loaded sweep.

use std::f64::consts::{PI, TAU};

use num::complex::Complex64;

use crate::error::Result;
use crate::interp::Spline;
use crate::rootfind::brentq;
use crate::Crossing;

/// The DC gain: response magnitude at the lowest swept frequency.
///
/// Assumes the first swept point is low enough to sit on the
/// low-frequency asymptote; no extrapolation to true DC is attempted.
pub(crate) fn dc_gain(mag: &[f64]) -> f64 {
    mag[0]
}

/// Locates the unity-gain (0 dB) crossing of the magnitude response.
///
/// A cubic spline interpolant of magnitude vs frequency (degree lowered
/// for very short sweeps) is searched for `|H|(f) = 1` over the full
/// swept interval with Brent's method. When the magnitude does not change
/// sides of 1 across the sweep, no bracket exists and the crossing is
/// reported invalid with the last swept frequency as a sentinel.
pub(crate) fn unity_crossing(freq: &[f64], mag: &[f64]) -> Result<Crossing> {
    let interp = Spline::fit_capped(freq, mag, 3)?;
    let (start, stop) = (freq[0], freq[freq.len() - 1]);
    match brentq(|f| interp.eval(f) - 1.0, start, stop) {
        Some(f) => Ok(Crossing {
            freq: f,
            valid: true,
        }),
        None => {
            tracing::debug!(start, stop, "magnitude does not cross 0 dB within the sweep");
            Ok(Crossing {
                freq: stop,
                valid: false,
            })
        }
    }
}

/// Computes the phase margin in degrees at the given crossing.
///
/// The phase of every sample is taken with the four-quadrant arctangent,
/// unwrapped as a full sequence, converted to degrees, and interpolated
/// quadratically so it can be evaluated at the (generally off-grid)
/// crossing frequency. The interpolated value is folded onto the -180
/// degree stability boundary: positive values are shifted down by 180,
/// non-positive values up by 180, correcting for whichever winding the
/// unwrap produced. An invalid crossing yields exactly -180.
pub(crate) fn phase_margin(
    freq: &[f64],
    response: &[Complex64],
    crossing: &Crossing,
) -> Result<f64> {
    let mut phase: Vec<f64> = response.iter().map(|c| c.arg()).collect();
    unwrap_phase(&mut phase);
    for p in phase.iter_mut() {
        *p = p.to_degrees();
    }
    let interp = Spline::fit(freq, &phase, 2)?;

    if !crossing.valid {
        return Ok(-180.0);
    }
    let phi = interp.eval(crossing.freq);
    Ok(if phi > 0.0 { phi - 180.0 } else { phi + 180.0 })
}

/// Unwraps a radian phase sequence in place.
///
/// Successive differences of magnitude >= pi are corrected by multiples
/// of 2 pi so the sequence is continuous across the principal-value
/// branch cut. Must be applied to the full ordered sequence; a single
/// unwrapped value has no meaning on its own.
pub(crate) fn unwrap_phase(phase: &mut [f64]) {
    let Some((&mut first, rest)) = phase.split_first_mut() else {
        return;
    };
    let mut prev = first;
    let mut offset = 0.0;
    for p in rest.iter_mut() {
        let raw = *p;
        let d = raw - prev;
        if d.abs() >= PI {
            let mut wrapped = (d + PI).rem_euclid(TAU) - PI;
            if wrapped == -PI && d > 0.0 {
                wrapped = PI;
            }
            offset += wrapped - d;
        }
        *p = raw + offset;
        prev = raw;
    }
}
