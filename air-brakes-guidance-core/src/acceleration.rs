//! Net vertical acceleration of the vehicle.
//!
//! One model covers both flight regimes: with motor curves supplied it
//! simulates the powered ascent, without them it simulates the unpowered
//! coast at fixed burnout mass. Already-collected accelerometer samples take
//! priority over the physics model for times they cover, so the integrator
//! replays observed dynamics instead of re-deriving them.

use serde::{Deserialize, Serialize};

use crate::drag::drag_force;
use crate::interpolate::TabulatedCurve;

/// Standard gravity, m/s^2.
pub const GRAVITY: f64 = 9.80665;

/// Static physical parameters for one prediction run. The drag coefficient
/// is the only field that differs between the brake-retracted and
/// brake-extended runs.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerationContext {
    /// Vehicle mass without propellant, kg.
    pub base_mass: f64,
    /// Frontal reference radius, m.
    pub radius: f64,
    pub drag_coefficient: f64,
    /// Launch-site altitude above sea level, m.
    pub start_height: f64,
}

/// Motor thrust (N) and expended-propellant mass (kg) by burn time.
#[derive(Debug, Clone, Copy)]
pub struct MotorCurves<'a> {
    pub thrust: TabulatedCurve<'a>,
    pub mass: TabulatedCurve<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct AccelerationModel<'a> {
    context: AccelerationContext,
    motor: Option<MotorCurves<'a>>,
    collected: Option<TabulatedCurve<'a>>,
}

impl<'a> AccelerationModel<'a> {
    pub fn new(context: AccelerationContext) -> Self {
        Self {
            context,
            motor: None,
            collected: None,
        }
    }

    /// Supplies thrust/mass curves for powered-ascent prediction.
    pub fn with_motor_curves(mut self, motor: MotorCurves<'a>) -> Self {
        self.motor = Some(motor);
        self
    }

    /// Supplies accelerometer samples (time, m/s^2) already collected this
    /// flight; they override the physics model for times they cover.
    pub fn with_collected_data(mut self, samples: TabulatedCurve<'a>) -> Self {
        self.collected = Some(samples);
        self
    }

    pub fn context(&self) -> &AccelerationContext {
        &self.context
    }

    pub fn collected(&self) -> Option<&TabulatedCurve<'a>> {
        self.collected.as_ref()
    }

    /// Net vertical acceleration in m/s^2, up positive.
    pub fn acceleration(&self, velocity: f64, height: f64, time: f64) -> f64 {
        if let Some(collected) = &self.collected {
            if time <= collected.last_x() {
                return collected.sample(time);
            }
        }

        let (thrust, mass) = match &self.motor {
            Some(motor) => (
                motor.thrust.sample(time),
                self.context.base_mass + motor.mass.sample(time),
            ),
            None => (0.0, self.context.base_mass),
        };

        let drag = drag_force(
            self.context.start_height,
            height,
            self.context.radius,
            self.context.drag_coefficient,
            velocity,
        );

        let weight = mass * GRAVITY;
        let force = thrust - weight - libm::copysign(drag, velocity);
        force / mass
    }
}
