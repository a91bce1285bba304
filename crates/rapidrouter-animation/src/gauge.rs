//! Fuel gauge needle mapping
//!
//! The needle sweeps 240 degrees: empty sits at -120, full at +120.

use crate::stage::FuelGauge;

pub const NEEDLE_EMPTY_DEGREES: f32 = -120.0;
pub const NEEDLE_FULL_DEGREES: f32 = 120.0;

/// Needle rotation for a fuel level in percent. Out-of-range input is clamped.
pub fn needle_degrees(fuel_percent: f32) -> f32 {
    let pct = if fuel_percent.is_nan() {
        0.0
    } else {
        fuel_percent.clamp(0.0, 100.0)
    };
    (pct / 100.0) * (NEEDLE_FULL_DEGREES - NEEDLE_EMPTY_DEGREES) + NEEDLE_EMPTY_DEGREES
}

/// Point the gauge at a fuel level
pub fn update_fuel_gauge<G: FuelGauge + ?Sized>(gauge: &mut G, fuel_percent: f32) {
    let degrees = needle_degrees(fuel_percent);
    tracing::trace!("Fuel {}% -> needle {}°", fuel_percent, degrees);
    gauge.rotate_needle(degrees);
}
