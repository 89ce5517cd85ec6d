//! Geodesic projection shared by bar geometry and overlay placement.
//!
//! Both the 3D bar meshes and the 2D overlay anchors are placed through the
//! single [`project`] implementation; any drift between two call sites would
//! cause visible misalignment between bars and their labels.

use glam::{DVec2, DVec3};

/// Spherical-to-Cartesian conversion.
///
/// `rel_altitude` scales the radius: 0 lands on the sphere of
/// `globe_radius`, 0.1 sits 10% above it. Pure and bit-reproducible for
/// identical inputs.
pub fn project(lat: f64, lng: f64, globe_radius: f64, rel_altitude: f64) -> DVec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (90.0 - lng).to_radians();
    let r = globe_radius * (1.0 + rel_altitude);
    DVec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`project`]: recover (lat, lng) in degrees from a point on or
/// above the sphere. Longitude is normalized to [-180, 180).
pub fn to_lat_lng(point: DVec3) -> (f64, f64) {
    let r = point.length();
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let phi = (point.y / r).acos();
    let theta = point.z.atan2(point.x);
    let lat = 90.0 - phi.to_degrees();
    let lng = (90.0 - theta.to_degrees() + 180.0).rem_euclid(360.0) - 180.0;
    (lat, lng)
}

/// Convert normalized device coordinates to pixel space with the origin at
/// the top-left corner of the viewport.
pub fn pixel_position(ndc: DVec2, width: f64, height: f64) -> DVec2 {
    DVec2::new(
        (ndc.x + 1.0) / 2.0 * width,
        (ndc.y - 1.0) / 2.0 * height * -1.0,
    )
}
