//! Geared hour arm, addressed in degrees

use plotclock_hal::DelayUs;

use crate::traits::StepperPins;

use super::stepper::StepperAxis;

/// Rotary arm pointing at the hour scale
pub struct HourAxis<P> {
    axis: StepperAxis<P>,
}

impl<P: StepperPins> HourAxis<P> {
    /// Create a new hour axis
    pub fn new(axis: StepperAxis<P>) -> Self {
        Self { axis }
    }

    /// Idle the outputs and home the arm
    pub fn init<D: DelayUs>(&mut self, delay: &mut D) {
        self.axis.init();
        self.axis.home(delay);
    }

    /// Angle to steps, rounded to nearest
    pub fn angle_to_steps(&self, degrees: f32) -> i32 {
        self.axis.config().units_to_steps(degrees)
    }

    /// Current arm angle
    pub fn angle_degrees(&self) -> f32 {
        self.axis.config().steps_to_units(self.axis.position())
    }

    /// Step toward `degrees` if the limits allow it
    pub fn chase_angle(&mut self, degrees: f32, now_us: u32) -> bool {
        let target = self.angle_to_steps(degrees);
        self.axis.chase_step(target, now_us)
    }

    /// Underlying stepper
    pub fn axis(&self) -> &StepperAxis<P> {
        &self.axis
    }

    /// Mutable underlying stepper
    pub fn axis_mut(&mut self) -> &mut StepperAxis<P> {
        &mut self.axis
    }
}
