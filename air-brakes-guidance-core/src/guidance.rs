//! Per-cycle guidance: two bracketing apogee predictions feed the air-brake
//! controller.

use serde::{Deserialize, Serialize};

use crate::acceleration::{AccelerationContext, AccelerationModel, MotorCurves};
use crate::controller::AirBrakesController;
use crate::interpolate::TabulatedCurve;
use crate::pid::PidGains;
use crate::telemetry::FlightState;
use crate::trajectory::VerletIntegrator;

/// Simulation step, s.
pub const DT: f64 = 0.05;
/// Step budget per apogee prediction; bounds the cycle's running time.
pub const MAX_PREDICTION_STEPS: usize = 4096;

/// Static vehicle and mission parameters, loaded once before flight.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleParameters {
    /// Burnout mass, kg.
    pub base_mass: f64,
    /// Frontal reference radius, m.
    pub radius: f64,
    /// Drag coefficient with the brakes fully retracted.
    pub retracted_drag_coefficient: f64,
    /// Drag coefficient with the brakes fully extended.
    pub extended_drag_coefficient: f64,
    /// Launch-site altitude above sea level, m.
    pub start_height: f64,
    /// Target apogee above the launch site, m.
    pub target_apogee: f32,
}

/// One control cycle: simulate the coast under both brake extremes, then let
/// the controller steer the midpoint of that window onto the target apogee.
pub struct ApogeeGuidance {
    parameters: VehicleParameters,
    controller: AirBrakesController,
}

impl ApogeeGuidance {
    pub fn new(parameters: VehicleParameters, gains: PidGains) -> Self {
        let controller = AirBrakesController::new(parameters.target_apogee, gains);
        Self {
            parameters,
            controller,
        }
    }

    /// Runs one cycle and returns the brake command (positive = more
    /// braking). `motor` covers the powered phase; `collected` replays
    /// accelerometer samples already observed this flight.
    pub fn update(
        &mut self,
        state: FlightState,
        motor: Option<MotorCurves>,
        collected: Option<TabulatedCurve>,
    ) -> f32 {
        let altitude_min = self.predicted_apogee(
            &state,
            self.parameters.extended_drag_coefficient,
            motor,
            collected,
        );
        let altitude_max = self.predicted_apogee(
            &state,
            self.parameters.retracted_drag_coefficient,
            motor,
            collected,
        );
        log_trace!(
            "apogee window at t={}: {} .. {} m",
            state.timestamp,
            altitude_min,
            altitude_max
        );

        let command = self.controller.update(
            altitude_min as f32,
            altitude_max as f32,
            state.timestamp as f32,
        );
        log_debug!("brake command: {}", command);
        command
    }

    pub fn controller_mut(&mut self) -> &mut AirBrakesController {
        &mut self.controller
    }

    fn predicted_apogee(
        &self,
        state: &FlightState,
        drag_coefficient: f64,
        motor: Option<MotorCurves>,
        collected: Option<TabulatedCurve>,
    ) -> f64 {
        let context = AccelerationContext {
            base_mass: self.parameters.base_mass,
            radius: self.parameters.radius,
            drag_coefficient,
            start_height: self.parameters.start_height,
        };
        let mut model = AccelerationModel::new(context);
        if let Some(motor) = motor {
            model = model.with_motor_curves(motor);
        }
        if let Some(collected) = collected {
            model = model.with_collected_data(collected);
        }

        VerletIntegrator::new(state.altitude, state.velocity, state.timestamp)
            .predict_apogee(DT, MAX_PREDICTION_STEPS, &model)
    }
}
