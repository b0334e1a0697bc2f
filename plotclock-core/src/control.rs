//! Per-tick control loop
//!
//! Each tick evaluates both path generators for the current time and lets
//! every axis take at most one step toward its target. Keeping time and
//! talking to the RTC and buttons is left to the caller, which passes in
//! the current time of day and how far into the minute it is.

use plotclock_hal::DelayUs;

use crate::config::ClockConfig;
use crate::motion::{Gantry, HourAxis, StepperAxis};
use crate::path::{HourPosMapper, MinutesPathMapper, Point};
use crate::time::WallClockTime;
use crate::traits::StepperPins;

/// Outcome of one control tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickStatus {
    /// Pen is on its target after this tick
    pub pen_on_target: bool,
    /// Arm is on its target after this tick
    pub arm_on_target: bool,
    /// Where the pen is heading (mm)
    pub pen_target: Point,
    /// Where the arm is heading (degrees)
    pub arm_target: f32,
}

/// The whole clock: gantry, hour arm and their path generators
pub struct PlotClock<X, Y, H> {
    gantry: Gantry<X, Y>,
    hour_axis: HourAxis<H>,
    minutes: MinutesPathMapper,
    hours: HourPosMapper,
}

impl<X: StepperPins, Y: StepperPins, H: StepperPins> PlotClock<X, Y, H> {
    /// Create a new clock from its parts
    pub fn new(
        gantry: Gantry<X, Y>,
        hour_axis: HourAxis<H>,
        minutes: MinutesPathMapper,
        hours: HourPosMapper,
    ) -> Self {
        Self {
            gantry,
            hour_axis,
            minutes,
            hours,
        }
    }

    /// Build the clock from one pin bundle per axis and the configuration
    pub fn from_pins(x: X, y: Y, hour: H, config: &ClockConfig) -> Self {
        Self::new(
            Gantry::new(
                StepperAxis::new(x, config.x.clone()),
                StepperAxis::new(y, config.y.clone()),
            ),
            HourAxis::new(StepperAxis::new(hour, config.hour.clone())),
            MinutesPathMapper::from_config(config),
            HourPosMapper::from_config(config),
        )
    }

    /// Home the gantry (Y, then X), then the hour arm
    ///
    /// Blocks until all three switches have been found.
    pub fn init<D: DelayUs>(&mut self, delay: &mut D) {
        #[cfg(feature = "defmt")]
        defmt::info!("Homing gantry");
        self.gantry.init(delay);

        #[cfg(feature = "defmt")]
        defmt::info!("Homing hour arm");
        self.hour_axis.init(delay);
    }

    /// Pen and arm targets for an instant
    pub fn targets(&self, time: &WallClockTime, elapsed_in_minute_us: u32) -> (Point, f32) {
        (
            self.minutes.position(time.minute, elapsed_in_minute_us),
            self.hours.position(time, elapsed_in_minute_us),
        )
    }

    /// Run one control tick
    pub fn tick(
        &mut self,
        time: &WallClockTime,
        elapsed_in_minute_us: u32,
        now_us: u32,
    ) -> TickStatus {
        let (pen_target, arm_target) = self.targets(time, elapsed_in_minute_us);

        TickStatus {
            pen_on_target: self.gantry.chase_point(pen_target, now_us),
            arm_on_target: self.hour_axis.chase_angle(arm_target, now_us),
            pen_target,
            arm_target,
        }
    }

    /// Gantry
    pub fn gantry(&self) -> &Gantry<X, Y> {
        &self.gantry
    }

    /// Mutable gantry
    pub fn gantry_mut(&mut self) -> &mut Gantry<X, Y> {
        &mut self.gantry
    }

    /// Hour arm
    pub fn hour_axis(&self) -> &HourAxis<H> {
        &self.hour_axis
    }

    /// Mutable hour arm
    pub fn hour_axis_mut(&mut self) -> &mut HourAxis<H> {
        &mut self.hour_axis
    }

    /// Minute path generator
    pub fn minutes(&self) -> &MinutesPathMapper {
        &self.minutes
    }

    /// Hour path generator
    pub fn hours(&self) -> &HourPosMapper {
        &self.hours
    }
}
