//! Manual time setting

use plotclock_hal::InputPin;

use crate::config::ButtonConfig;
use crate::time::WallClockTime;

use super::button::Button;

/// Field stepped by the up/down buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdjustField {
    Hour,
    Minute,
}

/// Mode, up and down buttons
///
/// With the mode button released, up/down step the hour; while it is held
/// they step the minute. Each field wraps on its own without carrying into
/// the other.
pub struct TimeAdjuster<M, U, D> {
    mode: Button<M>,
    up: Button<U>,
    down: Button<D>,
}

impl<M: InputPin, U: InputPin, D: InputPin> TimeAdjuster<M, U, D> {
    /// Create a new adjuster from its three buttons
    pub fn new(mode: Button<M>, up: Button<U>, down: Button<D>) -> Self {
        Self { mode, up, down }
    }

    /// Create an adjuster from raw pins and the button configuration
    pub fn from_pins(mode: M, up: U, down: D, config: &ButtonConfig) -> Self {
        Self::new(
            Button::from_config(mode, &config.mode_pin, config),
            Button::from_config(up, &config.up_pin, config),
            Button::from_config(down, &config.down_pin, config),
        )
    }

    /// Latch the initial button states
    pub fn init(&mut self, now_us: u32) {
        self.mode.init(now_us);
        self.up.init(now_us);
        self.down.init(now_us);
    }

    /// Field the up/down buttons currently step
    pub fn field(&self) -> AdjustField {
        if self.mode.is_pressed() {
            AdjustField::Minute
        } else {
            AdjustField::Hour
        }
    }

    /// Service the buttons
    ///
    /// Returns the adjusted time if up or down registered a press; the
    /// caller writes it back to the time source and re-anchors its clock.
    pub fn update(&mut self, time: WallClockTime, now_us: u32) -> Option<WallClockTime> {
        let mut delta: i8 = 0;
        if self.up.new_press(now_us) {
            delta += 1;
        }
        if self.down.new_press(now_us) {
            delta -= 1;
        }

        if delta == 0 {
            return None;
        }

        let adjusted = match self.field() {
            AdjustField::Hour => time.adjust_hour(delta),
            AdjustField::Minute => time.adjust_minute(delta),
        };

        #[cfg(feature = "defmt")]
        defmt::info!("Time set to {}", adjusted);

        Some(adjusted)
    }
}
