//! Limit-switch homing
//!
//! Three phases, each stepping until the switch reaches a given state:
//!
//! 1. Fast toward the switch until it is pressed. If the axis started on
//!    the switch this phase ends immediately.
//! 2. Away from the switch until it releases.
//! 3. Slowly back toward the switch until it is pressed again, which gives
//!    a repeatable zero independent of the approach speed.
//!
//! The procedure is a poll-driven state machine so it can be tested
//! without real delays; [`StepperAxis::home`] wraps it in a blocking loop.

use crate::config::HomingDelays;
use crate::traits::{Direction, StepperPins, SwitchState};

use super::stepper::StepperAxis;

/// Number of homing phases
pub const HOMING_PHASES: usize = 3;

/// Travel direction relative to the home switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingDirection {
    /// Toward the switch (decreasing step count)
    Toward,
    /// Away from the switch
    Away,
}

impl HomingDirection {
    /// Logical step direction
    pub fn direction(self) -> Direction {
        match self {
            HomingDirection::Toward => Direction::Negative,
            HomingDirection::Away => Direction::Positive,
        }
    }
}

/// One homing phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingPhase {
    /// Which way to step
    pub direction: HomingDirection,
    /// Delay after each step
    pub step_delay_us: u32,
    /// Switch state that ends the phase
    pub until: SwitchState,
}

/// Result of one [`HomingProcedure::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPoll {
    /// A step was taken; wait `delay_us` before polling again
    Step { delay_us: u32 },
    /// Homing finished; the axis is at step 0
    Done,
}

/// Homing state machine
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingProcedure {
    phases: [HomingPhase; HOMING_PHASES],
    current: usize,
    steps: u32,
}

impl HomingProcedure {
    /// Build the three-phase plan with the given delays
    pub fn new(delays: HomingDelays) -> Self {
        Self {
            phases: [
                HomingPhase {
                    direction: HomingDirection::Toward,
                    step_delay_us: delays.fast_toward_us,
                    until: SwitchState::Pressed,
                },
                HomingPhase {
                    direction: HomingDirection::Away,
                    step_delay_us: delays.fast_away_us,
                    until: SwitchState::Released,
                },
                HomingPhase {
                    direction: HomingDirection::Toward,
                    step_delay_us: delays.slow_toward_us,
                    until: SwitchState::Pressed,
                },
            ],
            current: 0,
            steps: 0,
        }
    }

    /// The phase in progress, or `None` once done
    pub fn phase(&self) -> Option<&HomingPhase> {
        self.phases.get(self.current)
    }

    /// All phases in order
    pub fn phases(&self) -> &[HomingPhase; HOMING_PHASES] {
        &self.phases
    }

    /// Check whether homing has finished
    pub fn is_done(&self) -> bool {
        self.current >= HOMING_PHASES
    }

    /// Steps taken so far, across all phases
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Advance homing by at most one step
    ///
    /// Phases whose exit condition already holds complete without
    /// stepping. On the transition to [`HomingPoll::Done`] the axis
    /// position and velocity are reset to zero; later polls do nothing.
    pub fn poll<P: StepperPins>(&mut self, axis: &mut StepperAxis<P>) -> HomingPoll {
        while let Some(phase) = self.phases.get(self.current).copied() {
            if axis.limit_state() != phase.until {
                axis.raw_step(phase.direction.direction());
                self.steps += 1;
                return HomingPoll::Step {
                    delay_us: phase.step_delay_us,
                };
            }

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "{=str}: homing phase {} done after {} steps",
                axis.config().name.as_str(),
                self.current + 1,
                self.steps
            );

            self.current += 1;
            if self.is_done() {
                axis.set_position(0);
                axis.reset_velocity();
            }
        }

        HomingPoll::Done
    }
}
