//! Bar height model.
//!
//! Maps an aggregated value to a radial offset from the globe center,
//! relative to the largest value in the current batch.

/// Radial distance from the globe center to the top of a bar.
///
/// Returns `globe_radius` (a flat, zero-height bar) when `max_value` or
/// `value` is not positive; otherwise scales linearly so the max-value cell
/// tops out at `globe_radius + 2 * highest_bar_fraction * globe_radius`.
pub fn height_offset(
    value: f64,
    max_value: f64,
    globe_radius: f64,
    highest_bar_fraction: f64,
) -> f64 {
    if max_value <= 0.0 || value <= 0.0 {
        return globe_radius;
    }
    globe_radius + (value / max_value) * globe_radius * 2.0 * highest_bar_fraction
}

/// Radial lift of the static background hex mesh above the sphere surface.
///
/// Coarser resolutions produce larger hexagons that cut deeper chords into
/// the sphere, so the lift grows as resolution drops.
pub fn hex_mesh_offset(globe_radius: f64, resolution: u8) -> f64 {
    globe_radius * (5.0_f64.powi(5) - f64::from(resolution).powi(5)) * 0.000_001
}
