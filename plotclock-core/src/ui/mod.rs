//! Front-panel buttons
//!
//! Three buttons set the clock by hand: a mode selector choosing hours or
//! minutes, and up/down buttons that step the selected field.

pub mod adjust;
pub mod button;

pub use adjust::TimeAdjuster;
pub use button::Button;

#[cfg(test)]
pub(crate) mod sim {
    use core::cell::Cell;

    use plotclock_hal::InputPin;

    /// Input line whose level the test controls from outside
    pub struct SharedLevel<'a>(pub &'a Cell<bool>);

    impl InputPin for SharedLevel<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }
}
