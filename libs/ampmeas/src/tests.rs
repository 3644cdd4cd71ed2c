use std::fmt::Write;

use approx::assert_relative_eq;
use num::complex::Complex64;

use crate::error::Error;
use crate::{extract, parser, FrequencySample, Metrics, Sweep};

/// Log-spaced sweep of the single-pole response `H(f) = a / (1 + j f/fp)`.
///
/// Its magnitude crosses 0 dB at the analytic frequency
/// `fp * sqrt(a^2 - 1)` when that falls inside the swept range.
fn single_pole(a: f64, fp: f64, fstart: f64, fstop: f64, n: usize) -> Sweep {
    let decades = (fstop / fstart).log10();
    let samples = (0..n).map(|i| {
        let f = fstart * 10f64.powf(decades * i as f64 / (n - 1) as f64);
        FrequencySample {
            freq: f,
            response: Complex64::new(a, 0.0) / Complex64::new(1.0, f / fp),
        }
    });
    Sweep::new(samples).unwrap()
}

#[test]
fn single_pole_crossing_matches_analytic_value() {
    let (a, fp) = (1000.0, 1e3);
    let sweep = single_pole(a, fp, 1e2, 1e8, 301);
    let metrics = extract(&sweep, 1e-3).unwrap();

    let fc = fp * (a * a - 1.0).sqrt();
    assert!(metrics.ugbw_valid);
    assert_relative_eq!(metrics.ugbw, fc, max_relative = 1e-3);

    // Phase at the crossing is -atan(fc/fp), safely in (-90, 0) degrees,
    // so the quadrant correction adds 180.
    let pm = 180.0 - (fc / fp).atan().to_degrees();
    assert_relative_eq!(metrics.pm, pm, max_relative = 1e-3);
}

#[test]
fn crossing_lies_strictly_inside_the_sweep() {
    let sweep = single_pole(1000.0, 1e3, 1e2, 1e8, 301);
    let metrics = extract(&sweep, 1e-3).unwrap();
    let samples = sweep.samples();
    assert!(metrics.ugbw_valid);
    assert!(metrics.ugbw > samples[0].freq);
    assert!(metrics.ugbw < samples[samples.len() - 1].freq);
}

#[test]
fn magnitude_entirely_above_unity_reports_no_crossing() {
    // Sweep stops two decades below the crossing; |H| stays above 1.
    let sweep = single_pole(1000.0, 1e3, 1e2, 1e4, 20);
    let metrics = extract(&sweep, 1e-3).unwrap();
    let last = sweep.samples().last().unwrap().freq;
    assert!(!metrics.ugbw_valid);
    assert_eq!(metrics.ugbw, last);
    assert_eq!(metrics.pm, -180.0);
}

#[test]
fn magnitude_entirely_below_unity_reports_no_crossing() {
    let sweep = single_pole(0.5, 1e3, 1e2, 1e6, 40);
    let metrics = extract(&sweep, 1e-3).unwrap();
    let last = sweep.samples().last().unwrap().freq;
    assert!(!metrics.ugbw_valid);
    assert_eq!(metrics.ugbw, last);
    assert_eq!(metrics.pm, -180.0);
}

#[test]
fn gain_is_the_first_sample_magnitude() {
    let sweep = Sweep::new([
        FrequencySample {
            freq: 1e3,
            response: Complex64::new(3.0, -4.0),
        },
        FrequencySample {
            freq: 1e4,
            response: Complex64::new(1.0, -1.0),
        },
        FrequencySample {
            freq: 1e5,
            response: Complex64::new(0.05, -0.2),
        },
    ])
    .unwrap();
    let metrics = extract(&sweep, 0.0).unwrap();
    assert_eq!(metrics.gain, 5.0);
}

#[test]
fn extraction_is_idempotent() {
    let sweep = single_pole(1000.0, 1e3, 1e2, 1e8, 151);
    let first = extract(&sweep, 2e-5).unwrap();
    let second = extract(&sweep, 2e-5).unwrap();
    assert_eq!(first.gain.to_bits(), second.gain.to_bits());
    assert_eq!(first.ugbw.to_bits(), second.ugbw.to_bits());
    assert_eq!(first.ugbw_valid, second.ugbw_valid);
    assert_eq!(first.pm.to_bits(), second.pm.to_bits());
    assert_eq!(first.power.to_bits(), second.power.to_bits());
}

#[test]
fn positive_phase_at_crossing_subtracts_half_turn() {
    // Mirror-image pole with leading phase: the unwrapped phase at the
    // crossing is near +90 degrees, exercising the other quadrant branch.
    let (a, fp) = (1000.0, 1e3);
    let samples = single_pole(a, fp, 1e2, 1e8, 301)
        .samples()
        .iter()
        .map(|s| FrequencySample {
            freq: s.freq,
            response: s.response.conj(),
        })
        .collect::<Vec<_>>();
    let sweep = Sweep::new(samples).unwrap();
    let metrics = extract(&sweep, 0.0).unwrap();

    let fc = fp * (a * a - 1.0).sqrt();
    let pm = (fc / fp).atan().to_degrees() - 180.0;
    assert!(metrics.ugbw_valid);
    assert_relative_eq!(metrics.pm, pm, max_relative = 1e-3);
}

#[test]
fn two_point_sweep_is_too_short_for_phase_interpolation() {
    let sweep = Sweep::new([
        FrequencySample {
            freq: 1e3,
            response: Complex64::new(2.0, 0.0),
        },
        FrequencySample {
            freq: 1e5,
            response: Complex64::new(0.5, -0.1),
        },
    ])
    .unwrap();
    let err = extract(&sweep, 0.0).unwrap_err();
    assert_eq!(
        err,
        Error::Interpolation {
            degree: 2,
            required: 3,
            found: 2
        }
    );
}

#[test]
fn end_to_end_example_scenario() {
    // A closed-loop buffer with gain slightly above unity and a pole at
    // 5 MHz; the 0 dB crossing falls near 1 MHz, between grid points.
    let (a, fp) = (1.02, 5e6);
    let mut ac = String::from("frequency vout_real vout_imag\n");
    let n = 101;
    for i in 0..n {
        let f = 1e3 * 10f64.powf(4.0 * i as f64 / (n - 1) as f64);
        let h = Complex64::new(a, 0.0) / Complex64::new(1.0, f / fp);
        writeln!(ac, "{} {} {}", f, h.re, h.im).unwrap();
    }
    let dc = "i_vdd\n0.0\n-1.5e-5\n";

    let sweep = parser::parse_ac(&ac).unwrap();
    let bias = parser::parse_dc(&dc).unwrap();
    let metrics = extract(&sweep, bias).unwrap();

    assert!((metrics.gain - 1.0).abs() < 0.05);
    assert_relative_eq!(metrics.gain, a, max_relative = 1e-6);

    let fc = fp * (a * a - 1.0).sqrt();
    assert!(metrics.ugbw_valid);
    assert_relative_eq!(metrics.ugbw, fc, max_relative = 1e-3);

    // Interpolated phase at the crossing is negative, so the quadrant
    // correction adds 180 degrees.
    let pm = 180.0 - (fc / fp).atan().to_degrees();
    assert_relative_eq!(metrics.pm, pm, max_relative = 1e-3);

    assert_eq!(metrics.power, 1.5e-5);
}

#[test]
fn summary_renders_fixed_point_units() {
    let metrics = Metrics {
        gain: 100.0,
        ugbw: 2.5e6,
        ugbw_valid: true,
        pm: 60.1234,
        power: 1.5e-5,
    };
    assert_eq!(
        metrics.to_string(),
        "gain=100.000, gain_dB=40.000, ugbw=2.500 (MHz), pm=60.123 (degrees), power=0.015 mA"
    );
}
