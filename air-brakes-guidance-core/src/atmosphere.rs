//! Barometric air-density model.
//!
//! Density comes from the ideal gas law with a linear temperature lapse and a
//! tabulated standard-atmosphere pressure profile, anchored on the launch
//! site's reference altitude. Pure functions, no state.

use crate::interpolate::interp;

/// Ideal gas constant, J / (mol K).
const GAS_CONSTANT: f64 = 8.31447;
/// Molar mass of dry air, kg / mol.
const MOLAR_MASS_AIR: f64 = 0.0289644;
/// Temperature lapse rate, K / m.
const LAPSE_RATE: f64 = 0.0065;
/// Sea-level standard temperature, K.
const SEA_LEVEL_TEMPERATURE: f64 = 288.15;

/// Standard-atmosphere pressure by altitude ASL: (m, kPa). Clamped above
/// 9144 m, well past any flight this vehicle makes.
#[rustfmt::skip]
const PRESSURE_TABLE_KPA: [(f64, f64); 61] = [
    (0.0, 101.3), (152.0, 99.4), (305.0, 97.6),
    (457.0, 95.8), (610.0, 94.1), (762.0, 92.4),
    (914.0, 90.7), (1067.0, 89.1), (1219.0, 87.4),
    (1372.0, 85.8), (1524.0, 84.3), (1676.0, 82.7),
    (1829.0, 81.1), (1981.0, 79.6), (2134.0, 78.1),
    (2286.0, 76.7), (2438.0, 75.2), (2591.0, 73.8),
    (2743.0, 72.3), (2896.0, 71.0), (3048.0, 69.6),
    (3200.0, 68.3), (3353.0, 67.0), (3505.0, 65.7),
    (3658.0, 64.4), (3810.0, 63.1), (3962.0, 61.9),
    (4115.0, 60.7), (4267.0, 59.5), (4420.0, 58.3),
    (4572.0, 57.1), (4724.0, 56.0), (4877.0, 54.8),
    (5029.0, 53.8), (5182.0, 52.7), (5334.0, 51.5),
    (5486.0, 50.6), (5639.0, 49.5), (5791.0, 48.6),
    (5944.0, 47.5), (6096.0, 46.6), (6248.0, 45.6),
    (6401.0, 44.6), (6553.0, 43.7), (6706.0, 42.8),
    (6858.0, 41.9), (7010.0, 41.0), (7163.0, 40.1),
    (7315.0, 39.3), (7468.0, 38.4), (7620.0, 37.6),
    (7772.0, 36.8), (7925.0, 36.0), (8077.0, 35.2),
    (8230.0, 34.5), (8382.0, 33.7), (8534.0, 32.9),
    (8687.0, 32.2), (8839.0, 31.5), (8992.0, 30.8),
    (9144.0, 30.1),
];

/// Air density in kg/m^3 at `height` meters above the launch site, where the
/// launch site itself sits `start_height` meters above sea level.
pub fn density(start_height: f64, height: f64) -> f64 {
    let altitude = start_height + height;
    let temperature = SEA_LEVEL_TEMPERATURE - LAPSE_RATE * altitude;
    let pressure = interp(&PRESSURE_TABLE_KPA, altitude) * 1000.0;
    pressure * MOLAR_MASS_AIR / (GAS_CONSTANT * temperature)
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn sea_level_density() {
        assert_relative_eq!(density(0.0, 0.0), 1.2246767605769946, max_relative = 1e-4);
    }

    #[test]
    fn density_above_launch_site() {
        assert_relative_eq!(
            density(1220.0, 1000.0),
            0.9838932262942124,
            max_relative = 1e-4
        );
    }

    #[test]
    fn decreases_with_height() {
        let mut previous = density(1220.0, 0.0);
        for height in (250..5000).step_by(250) {
            let current = density(1220.0, height as f64);
            assert!(current < previous, "height={}", height);
            previous = current;
        }
    }
}
