//! Plotclock - Pen-Plotting Clock Firmware
//!
//! Main firmware binary for RP2040-based plotting clocks. A 2-axis gantry
//! traces a small glyph in the grid cell of the current minute while a
//! geared arm points at the hour.
//!
//! Boot sequence: load the embedded configuration, claim pins, home all
//! three axes, read the RTC. After that a single cooperative loop keeps
//! time, services the buttons and lets every axis take at most one step
//! per pass.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use plotclock_core::config::{parse_config, ClockConfig};
use plotclock_core::time::{ClockTracker, TimeSync, WallClockTime};
use plotclock_core::ui::TimeAdjuster;
use plotclock_core::PlotClock;
use plotclock_drivers::rtc::Ds3231;
use plotclock_hal::i2c::I2cConfig;
use plotclock_hal::MicrosClock;
use plotclock_hal_rp2040::pins::{I2C_SCL_PIN, I2C_SDA_PIN};
use plotclock_hal_rp2040::{
    I2cAdapter, PinBank, PinError, RpClock, RpDelay, RpInput, RpStepperPins,
};

/// Embedded configuration (compiled into firmware)
/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../clock.toml");

/// Interval between trace lines from the control loop
const TRACE_INTERVAL_US: u32 = 1_000_000;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Plotclock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    let (mut bank, remaining) = PinBank::from_peripherals(p);

    let (x, y, hour) = match take_axes(&mut bank, &config) {
        Ok(pins) => pins,
        Err(e) => {
            error!("Failed to claim axis pins: {}", e);
            halt().await
        }
    };

    let (mode, up, down) = match take_buttons(&mut bank, &config) {
        Ok(pins) => pins,
        Err(e) => {
            error!("Failed to claim button pins: {}", e);
            halt().await
        }
    };

    let mut clock = PlotClock::from_pins(x, y, hour, &config);
    clock.init(&mut RpDelay);
    info!("All axes homed");

    if config.rtc.sda_pin != I2C_SDA_PIN || config.rtc.scl_pin != I2C_SCL_PIN {
        warn!(
            "RTC pins gpio{}/gpio{} not supported, using gpio{}/gpio{}",
            config.rtc.sda_pin, config.rtc.scl_pin, I2C_SDA_PIN, I2C_SCL_PIN
        );
    }
    let i2c = I2cAdapter::blocking(
        remaining.i2c0,
        remaining.scl,
        remaining.sda,
        &I2cConfig::FAST,
    );
    let mut rtc = Ds3231::new(i2c);
    match rtc.init() {
        Ok(false) => info!("RTC initialized"),
        Ok(true) => warn!("RTC lost power, set the time with the buttons"),
        Err(e) => error!("RTC init failed: {}", e),
    }

    let micros = RpClock;
    let mut sync = TimeSync::new(rtc, config.rtc.resync_interval_us);

    let now = micros.now_micros();
    let start = match sync.init(now) {
        Ok(time) => time,
        Err(e) => {
            warn!("RTC read failed: {}, starting at midnight", e);
            WallClockTime::MIDNIGHT
        }
    };
    info!("Time is {}", start);

    let mut tracker = ClockTracker::new(start, now);
    let mut adjuster = TimeAdjuster::from_pins(mode, up, down, &config.buttons);
    adjuster.init(now);

    let mut last_trace_us = now;

    loop {
        let now = micros.now_micros();

        match sync.update(now) {
            Ok(Some(reading)) => {
                if tracker.sync(reading, now) {
                    info!("Clock re-anchored to RTC: {}", reading);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("RTC resync failed: {}", e),
        }

        if let Some(time) = adjuster.update(tracker.time(), now) {
            tracker.set(time, now);
            if let Err(e) = sync.set(&time) {
                warn!("RTC write failed: {}", e);
            }
        }

        if tracker.advance(now) {
            info!("Minute {}", tracker.time());
        }

        let status = clock.tick(&tracker.time(), tracker.elapsed_in_minute(now), now);

        if now.wrapping_sub(last_trace_us) >= TRACE_INTERVAL_US {
            last_trace_us = now;
            trace!("{} {}", tracker.time(), status);
        }

        yield_now().await;
    }
}

/// Parse and validate the embedded configuration
///
/// Falls back to the reference-rig defaults if the text is broken. The
/// build script validates clock.toml, so this only happens if it and the
/// parser disagree.
fn load_config() -> ClockConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using default configuration");
            return ClockConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Invalid embedded config: {}", e);
            error!("Using default configuration");
            ClockConfig::default()
        }
    }
}

/// Claim the step/dir/limit pins of all three axes
fn take_axes(
    bank: &mut PinBank,
    config: &ClockConfig,
) -> Result<(RpStepperPins, RpStepperPins, RpStepperPins), PinError> {
    Ok((
        RpStepperPins::from_config(bank, &config.x)?,
        RpStepperPins::from_config(bank, &config.y)?,
        RpStepperPins::from_config(bank, &config.hour)?,
    ))
}

/// Claim the mode/up/down button inputs
fn take_buttons(
    bank: &mut PinBank,
    config: &ClockConfig,
) -> Result<(RpInput, RpInput, RpInput), PinError> {
    let buttons = &config.buttons;
    Ok((
        RpInput::new(bank.take(buttons.mode_pin.pin)?, &buttons.mode_pin),
        RpInput::new(bank.take(buttons.up_pin.pin)?, &buttons.up_pin),
        RpInput::new(bank.take(buttons.down_pin.pin)?, &buttons.down_pin),
    ))
}

/// Park after a fatal setup error, keeping the defmt log alive
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
        trace!("Halted");
    }
}
