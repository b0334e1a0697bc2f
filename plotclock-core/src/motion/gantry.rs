//! XY gantry carrying the pen, addressed in millimetres

use plotclock_hal::DelayUs;

use crate::path::Point;
use crate::traits::StepperPins;

use super::stepper::StepperAxis;

/// Two stepper axes moving the pen across the board
pub struct Gantry<X, Y> {
    x: StepperAxis<X>,
    y: StepperAxis<Y>,
}

impl<X: StepperPins, Y: StepperPins> Gantry<X, Y> {
    /// Create a new gantry from its two axes
    pub fn new(x: StepperAxis<X>, y: StepperAxis<Y>) -> Self {
        Self { x, y }
    }

    /// Idle the outputs and home both axes, Y first
    ///
    /// Blocks until both switches have been found.
    pub fn init<D: DelayUs>(&mut self, delay: &mut D) {
        self.y.init();
        self.x.init();

        self.y.home(delay);
        self.x.home(delay);
    }

    /// Target in millimetres to target in steps, rounded to nearest
    pub fn mm_to_steps(&self, point: Point) -> (i32, i32) {
        (
            self.x.config().units_to_steps(point.x),
            self.y.config().units_to_steps(point.y),
        )
    }

    /// Current pen position in millimetres
    pub fn position_mm(&self) -> Point {
        Point::new(
            self.x.config().steps_to_units(self.x.position()),
            self.y.config().steps_to_units(self.y.position()),
        )
    }

    /// Step both axes toward `target` if their limits allow it
    ///
    /// Both axes get their attempt on every call. Returns `true` only if
    /// both are on target afterwards.
    pub fn chase_point(&mut self, target: Point, now_us: u32) -> bool {
        let (tx, ty) = self.mm_to_steps(target);
        let x_reached = self.x.chase_step(tx, now_us);
        let y_reached = self.y.chase_step(ty, now_us);
        x_reached && y_reached
    }

    /// X axis
    pub fn x(&self) -> &StepperAxis<X> {
        &self.x
    }

    /// Y axis
    pub fn y(&self) -> &StepperAxis<Y> {
        &self.y
    }

    /// Mutable X axis
    pub fn x_mut(&mut self) -> &mut StepperAxis<X> {
        &mut self.x
    }

    /// Mutable Y axis
    pub fn y_mut(&mut self) -> &mut StepperAxis<Y> {
        &mut self.y
    }
}
