//! Fixed-step Verlet integration of the vertical trajectory.
//!
//! Positions advance with the two-sample Verlet recurrence
//! `x[n+1] = 2 x[n] - x[n-1] + a dt^2`; velocity is recovered as a moving
//! average of recent position deltas so the drag term can be evaluated. The
//! apogee estimate is the position at the step where the recovered velocity
//! stops being positive.

use heapless::Deque;
use nalgebra::{Matrix2, Vector2};

use crate::acceleration::AccelerationModel;

/// Upper bound on the velocity-smoothing window, in steps.
pub const MAX_VELOCITY_WINDOW: usize = 32;

/// Span of the velocity moving average, ms.
const DEFAULT_VELOCITY_SMOOTHING_MS: f64 = 100.0;

/// Verlet-style integrator seeded from one flight-state snapshot.
///
/// The integrator itself is immutable; each `simulate`/`predict_apogee` call
/// runs an independent pass, so identical calls produce identical traces.
#[derive(Debug, Clone)]
pub struct VerletIntegrator {
    initial_value: f64,
    initial_velocity: f64,
    start_time: f64,
    acceleration_error_constant: f64,
    velocity_smoothing_ms: f64,
}

impl VerletIntegrator {
    pub fn new(initial_value: f64, initial_velocity: f64, start_time: f64) -> Self {
        Self {
            initial_value,
            initial_velocity,
            start_time,
            acceleration_error_constant: 0.0,
            velocity_smoothing_ms: DEFAULT_VELOCITY_SMOOTHING_MS,
        }
    }

    /// Acceleration bias applied when too few collected samples exist to
    /// estimate the accelerometer error, m/s^2.
    pub fn with_acceleration_error_constant(mut self, constant: f64) -> Self {
        self.acceleration_error_constant = constant;
        self
    }

    pub fn with_velocity_smoothing_ms(mut self, span_ms: f64) -> Self {
        self.velocity_smoothing_ms = span_ms;
        self
    }

    /// Fills `out` with position samples spaced `dt` seconds apart.
    pub fn simulate(&self, out: &mut [f64], dt: f64, model: &AccelerationModel) {
        self.simulate_with_bias(out, dt, model, 0.0);
    }

    /// Like `simulate`, with `acceleration_error` added to every physics
    /// sample. Used for the error envelope.
    pub fn simulate_with_bias(
        &self,
        out: &mut [f64],
        dt: f64,
        model: &AccelerationModel,
        acceleration_error: f64,
    ) {
        if out.is_empty() {
            return;
        }
        out[0] = self.initial_value;
        if out.len() == 1 {
            return;
        }
        // the seed sample projects the initial velocity over one second,
        // independent of dt
        out[1] = self.initial_value + self.initial_velocity;

        let window = self.velocity_window(dt);
        for index in 2..out.len() {
            let span = window.min(index - 1);
            let velocity = (out[index - 1] - out[index - 1 - span]) / (dt * span as f64);
            let height = out[index - 1] + velocity * dt;
            let time = self.start_time + dt * (index as f64 - 1.0);
            let acceleration = model.acceleration(velocity, height, time) + acceleration_error;
            out[index] = 2.0 * out[index - 1] - out[index - 2] + acceleration * dt * dt;
        }
    }

    /// Upper and lower position traces under an accelerometer error bias of
    /// +/- the estimate from the model's collected samples (or the configured
    /// error constant when there are none).
    pub fn error_envelope(
        &self,
        upper: &mut [f64],
        lower: &mut [f64],
        dt: f64,
        model: &AccelerationModel,
    ) {
        let error = match model.collected() {
            Some(samples) => self.accelerometer_error(samples.points(), dt),
            None => self.acceleration_error_constant,
        };
        self.simulate_with_bias(upper, dt, model, error);
        self.simulate_with_bias(lower, dt, model, -error);
    }

    /// Residual standard deviation of a least-squares line through the most
    /// recent collected (time, acceleration) samples; falls back to the
    /// configured error constant when fewer than two samples fit the window.
    pub fn accelerometer_error(&self, samples: &[(f64, f64)], dt: f64) -> f64 {
        let count = self.velocity_window(dt).min(samples.len());
        if count <= 1 {
            return self.acceleration_error_constant;
        }
        let recent = &samples[samples.len() - count..];

        let n = count as f64;
        let (mut sx, mut sy, mut sxx, mut sxy) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        for &(x, y) in recent {
            sx += x;
            sy += y;
            sxx += x * x;
            sxy += x * y;
        }
        let normal = Matrix2::new(sxx, sx, sx, n);
        let rhs = Vector2::new(sxy, sy);
        let Some(solution) = normal.lu().solve(&rhs) else {
            // degenerate sample times (all equal)
            return self.acceleration_error_constant;
        };
        let (slope, intercept) = (solution[0], solution[1]);

        let mut residual = 0.0;
        for &(x, y) in recent {
            let delta = slope * x + intercept - y;
            residual += delta * delta;
        }
        libm::sqrt(residual / n)
    }

    /// Steps forward until the recovered velocity crosses from positive to
    /// non-positive (apex) or `max_steps` is exhausted, and returns the
    /// position at that step.
    pub fn predict_apogee(&self, dt: f64, max_steps: usize, model: &AccelerationModel) -> f64 {
        if self.initial_velocity <= 0.0 {
            // already at or past apex
            return self.initial_value;
        }

        let window = self.velocity_window(dt);
        let mut positions: Deque<f64, { MAX_VELOCITY_WINDOW + 1 }> = Deque::new();
        let mut previous = self.initial_value;
        let mut current = self.initial_value + self.initial_velocity;
        let _ = positions.push_back(previous);
        let _ = positions.push_back(current);

        for index in 2..=max_steps {
            let span = positions.len() - 1;
            let oldest = positions.front().copied().unwrap_or(previous);
            let velocity = (current - oldest) / (dt * span as f64);
            if velocity <= 0.0 {
                return current;
            }

            let height = current + velocity * dt;
            let time = self.start_time + dt * (index as f64 - 1.0);
            let acceleration = model.acceleration(velocity, height, time);
            let next = 2.0 * current - previous + acceleration * dt * dt;

            previous = current;
            current = next;
            if positions.len() > window {
                positions.pop_front();
            }
            let _ = positions.push_back(current);
        }

        log_warn!("apogee search exhausted step budget of {}", max_steps);
        current
    }

    fn velocity_window(&self, dt: f64) -> usize {
        let steps = libm::ceil(self.velocity_smoothing_ms / (dt * 1000.0)) as usize;
        steps.clamp(1, MAX_VELOCITY_WINDOW)
    }
}
