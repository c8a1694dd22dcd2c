//! Air-brake feedback controller.
//!
//! Turns the predicted apogee window (full brake vs. no brake) into a single
//! error signal for the owned PID element.

use crate::pid::{Pid, PidGains};

pub struct AirBrakesController {
    pid: Pid,
    altitude_target: f32,
}

impl AirBrakesController {
    pub fn new(altitude_target: f32, gains: PidGains) -> Self {
        Self {
            pid: Pid::new(gains),
            altitude_target,
        }
    }

    /// One controller update from the projected altitude window.
    ///
    /// `altitude_min` is the predicted apogee under full brake,
    /// `altitude_max` under no brake. The returned value is a brake
    /// actuation delta or target (the actuator contract decides which):
    /// positive means more braking, negative less.
    pub fn update(&mut self, altitude_min: f32, altitude_max: f32, timestamp: f32) -> f32 {
        let midpoint = altitude_min + (altitude_max - altitude_min) / 2.0;
        let error = midpoint - self.altitude_target;
        self.pid.update(error, timestamp)
    }

    pub fn altitude_target(&self) -> f32 {
        self.altitude_target
    }

    /// Access to the PID element, e.g. to configure clamping.
    pub fn pid_mut(&mut self) -> &mut Pid {
        &mut self.pid
    }
}
