//! Kinematic-limited step generation
//!
//! [`StepperAxis::chase_step`] is called every control-loop tick with the
//! step the axis should be at. It emits at most one step per call, and only
//! if that step keeps the axis within its speed and acceleration limits.
//! Otherwise it does nothing and the caller simply asks again next tick.
//!
//! # Kinematics
//!
//! The axis keeps a velocity estimate `v` (steps/s). Stepping in direction
//! `d` after an interval `dt` realises velocity `d / dt`, so the
//! acceleration of that step is
//!
//! ```text
//! a = (d - v * dt) / dt²
//! ```
//!
//! The intervals with `|a| <= max_accel` form a window; any interval is
//! fine while cruising at top speed toward the target. Within the window
//! the axis picks the shortest interval that still lets it stop on the
//! target (`v² <= 2 * max_accel * distance`), so it never arrives faster
//! than it could have braked.
//!
//! Steps run on an ideal schedule rather than on loop ticks. A step that
//! was polled before it fell due and fires on the next tick is charged
//! its ideal interval, and the few microseconds it fired late carry over
//! to the next step.
//!
//! When the target is behind a moving axis and reversing would be too
//! abrupt, the axis instead takes a braking step in its current direction
//! of travel, provided that step slows it down by a meaningful amount
//! without exceeding the limit.

use plotclock_hal::DelayUs;

use crate::config::{AxisConfig, HomingDelays};
use crate::traits::{Direction, StepperPins, SwitchState};

use super::homing::{HomingPoll, HomingProcedure};

const MICROS_PER_SECOND: f32 = 1_000_000.0;

/// One step/dir stepper axis
pub struct StepperAxis<P> {
    pins: P,
    config: AxisConfig,
    position: i32,
    velocity: f32,
    last_step_us: u32,
    /// How far the step schedule trails `last_step_us`
    lag_us: f32,
    /// Latest call since the last step that found the axis behind target
    last_poll_us: Option<u32>,
    min_step_us: u32,
}

/// Range of step intervals the acceleration limit allows, in µs
#[derive(Debug, Clone, Copy)]
struct StepWindow {
    shortest: f32,
    longest: f32,
}

/// A step chosen by `plan_step`
#[derive(Debug, Clone, Copy)]
struct PlannedStep {
    direction: Direction,
    /// Interval charged to the velocity estimate
    interval_us: f32,
    /// Schedule lag carried to the next step
    lag_us: f32,
}

impl<P: StepperPins> StepperAxis<P> {
    /// Create a new axis at step position 0, at rest
    pub fn new(pins: P, config: AxisConfig) -> Self {
        let min_step_us = config.limits.min_step_micros();
        Self {
            pins,
            config,
            position: 0,
            velocity: 0.0,
            last_step_us: 0,
            lag_us: 0.0,
            last_poll_us: None,
            min_step_us,
        }
    }

    /// Drive the step and direction lines to their idle levels
    pub fn init(&mut self) {
        self.pins.idle();
    }

    /// Current step position
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Overwrite the step position (homing, tests)
    pub fn set_position(&mut self, position: i32) {
        self.position = position;
    }

    /// Velocity estimate in steps/s
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Forget the velocity estimate and step schedule (axis known to be at rest)
    pub fn reset_velocity(&mut self) {
        self.velocity = 0.0;
        self.lag_us = 0.0;
        self.last_poll_us = None;
    }

    /// Timestamp of the last committed step
    pub fn last_step_us(&self) -> u32 {
        self.last_step_us
    }

    /// Shortest allowed interval between steps
    pub fn min_step_us(&self) -> u32 {
        self.min_step_us
    }

    /// Axis configuration
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    /// Pin bundle
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Mutable pin bundle
    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    /// Logical state of the home switch
    pub fn limit_state(&self) -> SwitchState {
        SwitchState::from_level(self.pins.limit_level(), self.config.limit_pin.inverted)
    }

    /// Move one step toward `target_step` if the kinematic limits allow it
    ///
    /// Returns `true` when the axis is at `target_step` after this call.
    /// A `false` return is backpressure, not an error: call again on a
    /// later tick.
    pub fn chase_step(&mut self, target_step: i32, now_us: u32) -> bool {
        if target_step == self.position {
            self.last_poll_us = None;
            return true;
        }

        let delta_us = now_us.wrapping_sub(self.last_step_us);
        if delta_us < self.min_step_us {
            self.last_poll_us = Some(now_us);
            return false;
        }

        let toward = Direction::of(target_step - self.position);
        let remaining = target_step.abs_diff(self.position);
        let Some(step) = self.plan_step(toward, remaining, delta_us) else {
            self.last_poll_us = Some(now_us);
            return false;
        };

        self.commit_step(step, now_us);
        self.position == target_step
    }

    /// Pick the step to take after `delta_us`, if any
    fn plan_step(
        &self,
        toward: Direction,
        remaining: u32,
        delta_us: u32,
    ) -> Option<PlannedStep> {
        let limits = self.config.limits;
        let speed = self.velocity * toward.signum();
        let window = self.step_window(speed);

        // Fastest interval from which the axis can still stop on the target
        let stop_speed =
            libm::sqrtf(2.0 * limits.max_accel * remaining as f32).min(limits.max_speed);
        let interval_us = (MICROS_PER_SECOND / stop_speed)
            .max(window.shortest)
            .min(window.longest);

        let scheduled_us = delta_us as f32 + self.lag_us;
        if scheduled_us >= interval_us {
            if self.polled_before(interval_us) {
                return Some(PlannedStep {
                    direction: toward,
                    interval_us,
                    lag_us: scheduled_us - interval_us,
                });
            }
            // Held back by the target, not the schedule: charge the real interval
            return Some(PlannedStep {
                direction: toward,
                interval_us: (delta_us as f32).max(window.shortest).min(window.longest),
                lag_us: 0.0,
            });
        }

        // Moving away from the target: brake with a step along the current
        // direction of travel, measured as acceleration along that travel
        if speed < 0.0 {
            let dt = delta_us as f32 / MICROS_PER_SECOND;
            let travel = libm::fabsf(speed);
            let braking = (1.0 / dt - travel) / dt;
            let hard_enough = braking <= -0.5 * limits.max_accel || travel * dt >= 2.0;
            if hard_enough && braking <= 0.0 && braking >= -limits.max_accel {
                return Some(PlannedStep {
                    direction: toward.opposite(),
                    interval_us: delta_us as f32,
                    lag_us: 0.0,
                });
            }
        }

        None
    }

    /// Step intervals toward the target allowed at `speed` (steps/s along it)
    fn step_window(&self, speed: f32) -> StepWindow {
        let limits = self.config.limits;
        let accel = limits.max_accel;
        let min_step = self.min_step_us as f32;

        // Smallest root of a(dt) = max_accel
        let shortest = if speed >= limits.max_speed {
            min_step
        } else {
            let root = libm::sqrtf(speed * speed + 4.0 * accel);
            let dt = if speed >= 0.0 {
                2.0 / (speed + root)
            } else {
                (root - speed) / (2.0 * accel)
            };
            (dt * MICROS_PER_SECOND).max(min_step)
        };

        // Smallest root of a(dt) = -max_accel; only exists when fast
        let longest = if speed > 0.0 && speed * speed >= 4.0 * accel {
            let root = libm::sqrtf(speed * speed - 4.0 * accel);
            2.0 / (speed + root) * MICROS_PER_SECOND
        } else {
            f32::INFINITY
        };

        StepWindow {
            shortest,
            longest: longest.max(shortest),
        }
    }

    /// A poll since the last step came before a step `interval_us` long fell due
    fn polled_before(&self, interval_us: f32) -> bool {
        let Some(poll) = self.last_poll_us else {
            return false;
        };
        poll.wrapping_sub(self.last_step_us) as f32 + self.lag_us < interval_us
    }

    fn commit_step(&mut self, step: PlannedStep, now_us: u32) {
        let max = self.config.limits.max_speed;
        let realised = step.direction.signum() * MICROS_PER_SECOND / step.interval_us;
        self.velocity = realised.clamp(-max, max);
        self.lag_us = step.lag_us;
        self.last_poll_us = None;

        self.pulse(step.direction);
        self.last_step_us = now_us;
    }

    /// Emit one step without any kinematic checks (homing)
    pub(crate) fn raw_step(&mut self, direction: Direction) {
        self.pulse(direction);
    }

    fn pulse(&mut self, direction: Direction) {
        self.position += direction.sign();
        let level = (direction == Direction::Positive) != self.config.flipped;
        self.pins.set_direction_level(level);
        self.pins.pulse_step();
    }

    /// Home against the limit switch using the configured delays
    ///
    /// Blocks until the switch has been found. There is no timeout: a switch
    /// that never changes state hangs here forever.
    pub fn home<D: DelayUs>(&mut self, delay: &mut D) {
        let delays = self.config.homing;
        self.home_with(delays, delay);
    }

    /// Home against the limit switch with explicit phase delays
    pub fn home_with<D: DelayUs>(&mut self, delays: HomingDelays, delay: &mut D) {
        let mut homing = HomingProcedure::new(delays);
        while let HomingPoll::Step { delay_us } = homing.poll(self) {
            delay.delay_us(delay_us);
        }
    }
}
