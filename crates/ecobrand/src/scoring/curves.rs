//! Piecewise linear curves mapping measured footprints to 0–100 sub-scores.
//!
//! Each curve starts at a "best practice" threshold scoring 100 and tapers through its bands
//! to 0. Values between breakpoints are linearly interpolated; values at or below the first
//! breakpoint score 100 and values past the last breakpoint score 0.

/// A single point on a curve, mapping a measured `input` to a `score`.
struct Breakpoint {
    input: f64,
    score: f64,
}

const fn point(input: f64, score: f64) -> Breakpoint {
    Breakpoint { input, score }
}

/// kg CO2e per unit.
const CARBON_CURVE: &[Breakpoint] = &[
    point(50.0, 100.0),
    point(100.0, 60.0),
    point(200.0, 30.0),
    point(400.0, 0.0),
];

/// Liters per unit.
const WATER_CURVE: &[Breakpoint] = &[
    point(500.0, 100.0),
    point(1500.0, 50.0),
    point(3000.0, 20.0),
    point(6000.0, 0.0),
];

/// kWh per unit.
const ENERGY_CURVE: &[Breakpoint] = &[
    point(5.0, 100.0),
    point(20.0, 50.0),
    point(50.0, 10.0),
    point(100.0, 0.0),
];

pub(crate) fn carbon(kg: f64) -> Option<f64> {
    measurement_score(kg, CARBON_CURVE)
}

pub(crate) fn water(liters: f64) -> Option<f64> {
    measurement_score(liters, WATER_CURVE)
}

pub(crate) fn energy(kwh: f64) -> Option<f64> {
    measurement_score(kwh, ENERGY_CURVE)
}

/// Negative and non-finite measurements are unusable rather than best-in-class.
fn measurement_score(value: f64, curve: &[Breakpoint]) -> Option<f64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(piecewise(value, curve))
}

fn piecewise(value: f64, curve: &[Breakpoint]) -> f64 {
    debug_assert!(
        curve.windows(2).all(|w| w[0].input <= w[1].input),
        "breakpoints must be sorted by input"
    );
    let Some(first) = curve.first() else {
        return 0.0;
    };
    if value <= first.input {
        return first.score;
    }

    for band in curve.windows(2) {
        let (start, end) = (&band[0], &band[1]);
        if value <= end.input {
            return interpolate(value, start, end);
        }
    }

    // past the taper band
    0.0
}

fn interpolate(value: f64, start: &Breakpoint, end: &Breakpoint) -> f64 {
    if start.input == end.input {
        return end.score;
    }
    let ratio = (value - start.input) / (end.input - start.input);
    let score = start.score + ratio * (end.score - start.score);
    score.clamp(0.0, 100.0)
}
