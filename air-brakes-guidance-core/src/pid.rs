//! Generic PID element with optional input and output clamping.

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

/// Proportional-integral-derivative controller.
///
/// The accumulated error is never reset; it is the running sum of every
/// clamped error since construction. Bounds are absent by default and can be
/// toggled at any time without touching the accumulated error.
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    accumulated_error: f32,
    last_error: f32,
    last_timestamp: f32,
    input_bounds: Option<(f32, f32)>,
    output_bounds: Option<(f32, f32)>,
}

impl Pid {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            accumulated_error: 0.0,
            last_error: 0.0,
            last_timestamp: 0.0,
            input_bounds: None,
            output_bounds: None,
        }
    }

    /// Offers one error sample and returns the controller response.
    ///
    /// A timestamp that does not advance suppresses the derivative term
    /// instead of failing; the cycle still produces an output.
    pub fn update(&mut self, error: f32, timestamp: f32) -> f32 {
        let error = match self.input_bounds {
            Some((min, max)) => error.clamp(min, max),
            None => error,
        };

        self.accumulated_error += error;

        let dt = timestamp - self.last_timestamp;
        let derivative = if dt > 0.0 {
            (error - self.last_error) / dt
        } else {
            0.0
        };

        let mut output = self.gains.kp * error
            + self.gains.ki * self.accumulated_error
            + self.gains.kd * derivative;

        self.last_error = error;
        self.last_timestamp = timestamp;

        if let Some((min, max)) = self.output_bounds {
            output = output.clamp(min, max);
        }
        output
    }

    /// Clamps future error inputs into `[min, max]`.
    pub fn constrain_input(&mut self, min: f32, max: f32) {
        self.input_bounds = Some((min, max));
    }

    pub fn unconstrain_input(&mut self) {
        self.input_bounds = None;
    }

    /// Clamps future outputs into `[min, max]`.
    pub fn constrain_output(&mut self, min: f32, max: f32) {
        self.output_bounds = Some((min, max));
    }

    pub fn unconstrain_output(&mut self) {
        self.output_bounds = None;
    }

    pub fn accumulated_error(&self) -> f32 {
        self.accumulated_error
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    fn proportional() -> Pid {
        Pid::new(PidGains {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
        })
    }

    #[test]
    fn input_clamp_applies_before_everything() {
        let mut pid = proportional();
        pid.constrain_input(0.0, 0.5);
        // error 1000 clamps to 0.5 before the proportional term
        assert_relative_eq!(pid.update(1000.0, 1.0), 0.5);
        // the clamped error is what accumulates
        assert_relative_eq!(pid.accumulated_error(), 0.5);
    }

    #[test]
    fn integral_accumulates_without_reset() {
        let mut pid = Pid::new(PidGains {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
        });
        assert_relative_eq!(pid.update(2.0, 1.0), 2.0);
        assert_relative_eq!(pid.update(2.0, 2.0), 4.0);
        assert_relative_eq!(pid.update(-1.0, 3.0), 3.0);
    }

    #[test]
    fn derivative_tracks_error_slope() {
        let mut pid = Pid::new(PidGains {
            kp: 0.0,
            ki: 0.0,
            kd: 1.0,
        });
        pid.update(0.0, 1.0);
        // error rises by 3 over 2 seconds
        assert_relative_eq!(pid.update(3.0, 3.0), 1.5);
    }

    #[test]
    fn stale_timestamp_suppresses_derivative() {
        let mut pid = Pid::new(PidGains {
            kp: 1.0,
            ki: 0.0,
            kd: 100.0,
        });
        pid.update(1.0, 5.0);
        // same timestamp: derivative dropped, proportional term survives
        assert_relative_eq!(pid.update(2.0, 5.0), 2.0);
        // timestamp going backwards is treated the same way
        assert_relative_eq!(pid.update(3.0, 4.0), 3.0);
    }

    #[test]
    fn output_clamp_and_release() {
        let mut pid = proportional();
        pid.constrain_output(-1.0, 1.0);
        assert_relative_eq!(pid.update(10.0, 1.0), 1.0);
        assert_relative_eq!(pid.update(-10.0, 2.0), -1.0);

        pid.unconstrain_output();
        assert_relative_eq!(pid.update(10.0, 3.0), 10.0);
    }

    #[test]
    fn unconstrain_input_keeps_accumulated_error() {
        let mut pid = Pid::new(PidGains {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
        });
        pid.constrain_input(0.0, 1.0);
        pid.update(5.0, 1.0); // accumulates 1.0
        pid.unconstrain_input();
        assert_relative_eq!(pid.update(5.0, 2.0), 6.0);
    }
}
