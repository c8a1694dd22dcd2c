//! Quadratic drag for a constant frontal area.

use core::f64::consts::PI;

use crate::atmosphere::density;

/// Drag force magnitude in newtons on a cylindrical body of frontal radius
/// `radius` moving at `velocity` through air at `height` above the launch
/// site. The caller applies the sign opposing motion.
pub fn drag_force(
    start_height: f64,
    height: f64,
    radius: f64,
    drag_coefficient: f64,
    velocity: f64,
) -> f64 {
    let area = PI * radius * radius;
    0.5 * density(start_height, height) * velocity * velocity * drag_coefficient * area
}
