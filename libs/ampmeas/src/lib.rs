//! Closed-loop amplifier performance extraction.
//!
//! Consumes an AC frequency sweep (complex response vs frequency) and a
//! DC operating-point bias sample, as produced by a circuit simulator,
//! and computes DC gain, unity-gain bandwidth (UGBW), phase margin, and
//! bias power draw. Each extraction is a pure function of its inputs:
//! no I/O, no shared state, and independent extractions may run on any
//! number of threads without coordination.
#![warn(missing_docs)]

use std::fmt;

use error::{MalformedInput, Result};
use itertools::Itertools;
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod interp;
mod measure;
pub mod parser;
pub mod rootfind;

#[cfg(test)]
mod tests;

/// A single point of an AC frequency sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencySample {
    /// The swept frequency in Hz.
    pub freq: f64,
    /// The complex small-signal response at this frequency.
    pub response: Complex64,
}

/// An AC frequency sweep.
///
/// Holds at least 2 samples ordered by strictly increasing positive
/// frequency. The constructor enforces these invariants; the sample list
/// is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    samples: Vec<FrequencySample>,
}

impl Sweep {
    /// Creates a sweep from samples ordered by frequency.
    ///
    /// Fails with [`MalformedInput`] when fewer than 2 samples are given,
    /// when any frequency is zero or negative, or when the frequencies
    /// are not strictly increasing.
    pub fn new(samples: impl IntoIterator<Item = FrequencySample>) -> Result<Self> {
        let samples: Vec<_> = samples.into_iter().collect();
        if samples.len() < 2 {
            return Err(MalformedInput::TooFewRows {
                required: 2,
                found: samples.len(),
            }
            .into());
        }
        for (row, s) in samples.iter().enumerate() {
            if !(s.freq > 0.0) {
                return Err(MalformedInput::NonPositiveFrequency {
                    row,
                    value: s.freq,
                }
                .into());
            }
        }
        for (row, (a, b)) in samples.iter().tuple_windows().enumerate() {
            if b.freq <= a.freq {
                return Err(MalformedInput::NonMonotonicFrequency { row: row + 1 }.into());
            }
        }
        Ok(Self { samples })
    }

    /// The sweep samples, ordered by increasing frequency.
    pub fn samples(&self) -> &[FrequencySample] {
        &self.samples
    }
}

/// The result of searching for the unity-gain (0 dB) crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    /// The crossing frequency in Hz.
    ///
    /// When `valid` is false this holds the last swept frequency as a
    /// sentinel, not a true crossing.
    pub freq: f64,
    /// Whether a 0 dB crossing exists within the swept range.
    pub valid: bool,
}

/// Extracted amplifier performance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// DC gain as a magnitude ratio.
    pub gain: f64,
    /// Unity-gain bandwidth in Hz.
    ///
    /// When `ugbw_valid` is false the magnitude never crossed 0 dB within
    /// the sweep and this holds the last swept frequency.
    pub ugbw: f64,
    /// Whether a 0 dB crossing was found within the swept range.
    pub ugbw_valid: bool,
    /// Phase margin in degrees; exactly -180 when no crossing was found.
    pub pm: f64,
    /// Bias current drawn from the supply, in amperes.
    pub power: f64,
}

impl fmt::Display for Metrics {
    /// Renders the one-line diagnostic summary: gain as a ratio and in
    /// dB, UGBW in MHz, phase margin in degrees, and power in mA, each to
    /// 3 decimal digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gain={:.3}, gain_dB={:.3}, ugbw={:.3} (MHz), pm={:.3} (degrees), power={:.3} mA",
            self.gain,
            20.0 * self.gain.log10(),
            self.ugbw / 1e6,
            self.pm,
            self.power * 1e3
        )
    }
}

/// Extracts amplifier metrics from an AC sweep and a DC bias sample.
///
/// Pure and deterministic: identical inputs yield bit-identical outputs.
/// The absence of a 0 dB crossing is an expected outcome reported through
/// [`Metrics::ugbw_valid`] and the documented fallback values, never an
/// error. The only error a well-formed sweep can produce is
/// [`Error::Interpolation`](error::Error::Interpolation) when it is too
/// short for the phase interpolant.
pub fn extract(sweep: &Sweep, bias: f64) -> Result<Metrics> {
    let samples = sweep.samples();
    let freq: Vec<f64> = samples.iter().map(|s| s.freq).collect();
    let response: Vec<Complex64> = samples.iter().map(|s| s.response).collect();
    let mag: Vec<f64> = response.iter().map(|c| c.norm()).collect();

    let gain = measure::dc_gain(&mag);
    let crossing = measure::unity_crossing(&freq, &mag)?;
    let pm = measure::phase_margin(&freq, &response, &crossing)?;

    Ok(Metrics {
        gain,
        ugbw: crossing.freq,
        ugbw_valid: crossing.valid,
        pm,
        power: bias,
    })
}
