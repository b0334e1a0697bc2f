//! Debounced push button with auto-repeat

use plotclock_hal::InputPin;

use crate::config::{ButtonConfig, PinConfig};

/// A push button on one input line
///
/// The line is only sampled once the debounce window after the last
/// observed change has passed. A press is reported once on the edge and
/// then again every repeat interval while the button stays down. A button
/// already held at [`Button::init`] reports nothing until it has been
/// released once.
pub struct Button<P> {
    pin: P,
    active_low: bool,
    debounce_us: u32,
    repeat_us: u32,
    pressed: bool,
    /// Seen released since `init`
    armed: bool,
    last_change_us: u32,
    last_repeat_us: u32,
}

impl<P: InputPin> Button<P> {
    /// Create a new button
    pub fn new(pin: P, active_low: bool, debounce_us: u32, repeat_us: u32) -> Self {
        Self {
            pin,
            active_low,
            debounce_us,
            repeat_us,
            pressed: false,
            armed: true,
            last_change_us: 0,
            last_repeat_us: 0,
        }
    }

    /// Create a button from its pin and the shared button timing
    pub fn from_config(pin: P, pin_config: &PinConfig, config: &ButtonConfig) -> Self {
        Self::new(pin, pin_config.inverted, config.debounce_us, config.repeat_us)
    }

    /// Latch the current state; a button held now stays silent until released
    pub fn init(&mut self, now_us: u32) {
        self.pressed = self.is_pressed();
        self.armed = !self.pressed;
        self.last_change_us = now_us;
        self.last_repeat_us = now_us;
    }

    /// Raw (undebounced) pressed state
    pub fn is_pressed(&self) -> bool {
        self.pin.is_high() != self.active_low
    }

    /// Check for a new press at `now_us`
    ///
    /// Returns `true` on the press edge, and once per repeat interval
    /// while held.
    pub fn new_press(&mut self, now_us: u32) -> bool {
        let mut pressed = self.pressed;

        if now_us.wrapping_sub(self.last_change_us) > self.debounce_us {
            pressed = self.is_pressed();
            if pressed != self.pressed {
                self.last_change_us = now_us;
            }
        }

        let edge = pressed && !self.pressed;
        let repeat = pressed && now_us.wrapping_sub(self.last_repeat_us) > self.repeat_us;
        self.pressed = pressed;
        if !pressed {
            self.armed = true;
        }

        if self.armed && (edge || repeat) {
            self.last_repeat_us = now_us;
            true
        } else {
            false
        }
    }
}
