//! Plotclock Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware capabilities the clock
//! needs. Chip-specific crates implement them; the motion and path logic
//! in `plotclock-core` only ever sees these traits, which is what lets it
//! run against simulated pins and clocks in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  plotclock-firmware                     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  plotclock-core / plotclock-drivers     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  plotclock-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ plotclock-hal-  │
//!            │     rp2040      │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`time::MicrosClock`] - Free-running, wrapping microsecond counter
//! - [`time::DelayUs`] - Blocking microsecond delay
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
pub use time::{DelayUs, MicrosClock};
