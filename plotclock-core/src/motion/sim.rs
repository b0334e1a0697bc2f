//! Simulated axis hardware for host tests

use crate::traits::StepperPins;
use plotclock_hal::DelayUs;

/// Carriage on a belt with a home switch at physical position 0
///
/// A high direction level moves the carriage toward positive physical
/// positions unless the motor is `mirrored`. The switch is wired
/// active-low and reads pressed at or below position 0.
#[derive(Debug, Clone)]
pub struct SimPins {
    pub physical: i32,
    pub mirrored: bool,
    pub dir_level: bool,
    pub pulses: u32,
    pub idled: bool,
}

impl SimPins {
    pub fn at(physical: i32) -> Self {
        Self {
            physical,
            mirrored: false,
            dir_level: false,
            pulses: 0,
            idled: false,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }
}

impl StepperPins for SimPins {
    fn set_direction_level(&mut self, high: bool) {
        self.dir_level = high;
    }

    fn pulse_step(&mut self) {
        let forward = self.dir_level != self.mirrored;
        self.physical += if forward { 1 } else { -1 };
        self.pulses += 1;
    }

    fn limit_level(&self) -> bool {
        // Pulled up, shorted to ground when pressed
        self.physical > 0
    }

    fn idle(&mut self) {
        self.dir_level = false;
        self.idled = true;
    }
}

/// Delay that only accumulates the requested time
#[derive(Debug, Default)]
pub struct SimDelay {
    pub total_us: u64,
    pub calls: u32,
}

impl DelayUs for SimDelay {
    fn delay_us(&mut self, us: u32) {
        self.total_us += us as u64;
        self.calls += 1;
    }
}
