//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in plotclock-core for the clock's peripherals:
//!
//! - Real-time clock (DS3231 over I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod rtc;
