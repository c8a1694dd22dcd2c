// only use std when feature = "std" is enabled or during testing
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod fmt;

mod acceleration;
mod atmosphere;
mod controller;
mod drag;
mod guidance;
mod interpolate;
mod pid;
mod telemetry;
mod trajectory;

pub use acceleration::{AccelerationContext, AccelerationModel, GRAVITY, MotorCurves};
pub use atmosphere::density;
pub use controller::AirBrakesController;
pub use drag::drag_force;
pub use guidance::{ApogeeGuidance, DT, MAX_PREDICTION_STEPS, VehicleParameters};
pub use interpolate::{CurveError, TabulatedCurve};
pub use pid::{Pid, PidGains};
pub use telemetry::{FlightState, FlightStateBuffer, FlightStateReader, FlightStateWriter};
pub use trajectory::VerletIntegrator;

#[cfg(test)]
mod tests;
