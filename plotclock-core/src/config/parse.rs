//! Minimal TOML parser for clock configuration
//!
//! Handles only the subset the clock needs, without allocation:
//! - `key = value` pairs (string, integer, float, boolean, integer array)
//! - `[section]` headers and `[axis name]` / `[axis.name]` headers
//! - Comments (`# ...`), including trailing comments
//!
//! Durations are written in milliseconds (`*_ms`) or seconds (`*_s`) and
//! stored in microseconds. Keys that are not set keep the reference-rig
//! defaults from [`ClockConfig::default`].

use super::hardware::{AxisConfig, PinConfig};
use super::types::ClockConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Unknown key for the current section
    InvalidKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    AxisX,
    AxisY,
    AxisHour,
    Grid,
    Square,
    Transitions,
    HourScale,
    Sweep,
    Buttons,
    Rtc,
}

/// Parse configuration text into a [`ClockConfig`]
///
/// The result is not validated; call [`ClockConfig::validate`] before use.
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::default();
    let mut section = Section::Root;
    // A [sweep] minutes list replaces the default mask
    let mut sweep_cleared = false;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;

        if section == Section::Sweep && key == "minutes" && !sweep_cleared {
            config.sweep.minutes = 0;
            sweep_cleared = true;
        }

        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

/// Parse section header like "grid", "axis x" or "axis.hour"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    let (kind, name) = match header.split_once(|c: char| c == '.' || c.is_whitespace()) {
        Some((kind, name)) => (kind.trim(), Some(name.trim())),
        None => (header, None),
    };

    match (kind, name) {
        ("axis", Some("x")) => Ok(Section::AxisX),
        ("axis", Some("y")) => Ok(Section::AxisY),
        ("axis", Some("hour")) => Ok(Section::AxisHour),
        ("grid", None) => Ok(Section::Grid),
        ("square", None) => Ok(Section::Square),
        ("transitions", None) => Ok(Section::Transitions),
        ("hour_scale", None) => Ok(Section::HourScale),
        ("sweep", None) => Ok(Section::Sweep),
        ("buttons", None) => Ok(Section::Buttons),
        ("rtc", None) => Ok(Section::Rtc),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ClockConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => Err(ParseError::InvalidKey),
        Section::AxisX => apply_axis(&mut config.x, key, value),
        Section::AxisY => apply_axis(&mut config.y, key, value),
        Section::AxisHour => apply_axis(&mut config.hour, key, value),
        Section::Grid => {
            let grid = &mut config.grid;
            match key {
                "origin_x" => grid.origin.x = parse_float(value)?,
                "origin_y" => grid.origin.y = parse_float(value)?,
                "column_pitch" => grid.column_pitch = parse_float(value)?,
                "row_pitch" => grid.row_pitch = parse_float(value)?,
                _ => return Err(ParseError::InvalidKey),
            }
            Ok(())
        }
        Section::Square => {
            let square = &mut config.square;
            match key {
                "width" => square.width = parse_float(value)?,
                "height" => square.height = parse_float(value)?,
                "period_ms" => square.period_us = parse_millis(value)?,
                _ => return Err(ParseError::InvalidKey),
            }
            Ok(())
        }
        Section::Transitions => {
            let transitions = &mut config.transitions;
            match key {
                "carriage_return_ms" => transitions.carriage_return_us = parse_millis(value)?,
                "zigzag_return_ms" => transitions.zigzag_return_us = parse_millis(value)?,
                _ => return Err(ParseError::InvalidKey),
            }
            Ok(())
        }
        Section::HourScale => {
            let scale = &mut config.hour_scale;
            match key {
                "start_hour" => scale.start_hour = parse_int(value)?,
                "skipped_slot" => scale.skipped_slot = parse_int(value)?,
                "deg_per_hour" => scale.deg_per_hour = parse_float(value)?,
                "offset_deg" => scale.offset_deg = parse_float(value)?,
                _ => return Err(ParseError::InvalidKey),
            }
            Ok(())
        }
        Section::Sweep => {
            match key {
                "window_ms" => config.sweep.window_us = parse_millis(value)?,
                "minutes" => {
                    for minute in parse_int_list::<u8>(value)? {
                        let minute = minute?;
                        if minute >= 60 {
                            return Err(ParseError::InvalidValue);
                        }
                        config.sweep.enable_minute(minute);
                    }
                }
                _ => return Err(ParseError::InvalidKey),
            }
            Ok(())
        }
        Section::Buttons => {
            let buttons = &mut config.buttons;
            match key {
                "mode_pin" => buttons.mode_pin = parse_pin_string(value)?,
                "up_pin" => buttons.up_pin = parse_pin_string(value)?,
                "down_pin" => buttons.down_pin = parse_pin_string(value)?,
                "debounce_ms" => buttons.debounce_us = parse_millis(value)?,
                "repeat_ms" => buttons.repeat_us = parse_millis(value)?,
                _ => return Err(ParseError::InvalidKey),
            }
            Ok(())
        }
        Section::Rtc => {
            let rtc = &mut config.rtc;
            match key {
                "sda_pin" => rtc.sda_pin = parse_pin_string(value)?.pin,
                "scl_pin" => rtc.scl_pin = parse_pin_string(value)?.pin,
                "resync_interval_s" => {
                    let secs: u32 = parse_int(value)?;
                    rtc.resync_interval_us =
                        secs.checked_mul(1_000_000).ok_or(ParseError::InvalidValue)?;
                }
                _ => return Err(ParseError::InvalidKey),
            }
            Ok(())
        }
    }
}

fn apply_axis(axis: &mut AxisConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "step_pin" => axis.step_pin = parse_pin_string(value)?,
        "dir_pin" => axis.dir_pin = parse_pin_string(value)?,
        "limit_pin" => axis.limit_pin = parse_pin_string(value)?,
        "flipped" => axis.flipped = parse_bool(value)?,
        "max_speed" => axis.limits.max_speed = parse_float(value)?,
        "max_accel" => axis.limits.max_accel = parse_float(value)?,
        "steps_per_unit" => axis.steps_per_unit = parse_float(value)?,
        "homing_fast_toward_us" => axis.homing.fast_toward_us = parse_int(value)?,
        "homing_fast_away_us" => axis.homing.fast_away_us = parse_int(value)?,
        "homing_slow_toward_us" => axis.homing.slow_toward_us = parse_int(value)?,
        _ => return Err(ParseError::InvalidKey),
    }
    Ok(())
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value; integers are accepted
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let v: f32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse a millisecond count into microseconds
fn parse_millis(value: &str) -> Result<u32, ParseError> {
    let ms: u32 = parse_int(value)?;
    ms.checked_mul(1000).ok_or(ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse an integer array like `[0, 30]` lazily
fn parse_int_list<'a, T: core::str::FromStr + 'a>(
    value: &'a str,
) -> Result<impl Iterator<Item = Result<T, ParseError>> + 'a, ParseError> {
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Err(ParseError::InvalidValue);
    }
    let inner = &value[1..value.len() - 1];

    Ok(inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_int::<T>))
}

/// Parse a pin string like "gpio11", "!gpio12", "^gpio4" or "^!gpio9"
///
/// `!` marks the pin active-low, `^` enables the internal pull-up.
pub fn parse_pin_string(value: &str) -> Result<PinConfig, ParseError> {
    let mut s = parse_string(value);
    let mut inverted = false;
    let mut pull_up = false;

    // Check for modifiers
    loop {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    // Parse "gpioNN"
    let num = s.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = num.parse().map_err(|_| ParseError::InvalidPin)?;
    if pin > 29 {
        return Err(ParseError::InvalidPin);
    }

    Ok(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}
