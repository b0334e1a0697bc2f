//! Build script for plotclock-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clock.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sections the firmware parser accepts, with their numeric keys
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "grid",
        &["origin_x", "origin_y", "column_pitch", "row_pitch"],
    ),
    ("square", &["width", "height", "period_ms"]),
    ("transitions", &["carriage_return_ms", "zigzag_return_ms"]),
    (
        "hour_scale",
        &["start_hour", "skipped_slot", "deg_per_hour", "offset_deg"],
    ),
    ("sweep", &["window_ms"]),
    ("buttons", &["debounce_ms", "repeat_ms"]),
    ("rtc", &["resync_interval_s"]),
];

const AXES: &[&str] = &["x", "y", "hour"];

const AXIS_NUMBERS: &[&str] = &[
    "max_speed",
    "max_accel",
    "steps_per_unit",
    "homing_fast_toward_us",
    "homing_fast_away_us",
    "homing_slow_toward_us",
];

const AXIS_PINS: &[&str] = &["step_pin", "dir_pin", "limit_pin"];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read clock.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in clock.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    let Some(root) = config.as_table() else {
        fail("clock.toml must be a table", &[]);
    };

    for (name, value) in root {
        match name.as_str() {
            "axis" => validate_axes(value, &mut errors),
            _ => match SECTIONS.iter().find(|(section, _)| *section == name.as_str()) {
                Some((_, numbers)) => validate_section(name, value, numbers, &mut errors),
                None => errors.push(format!("unknown section [{}]", name)),
            },
        }
    }

    if !errors.is_empty() {
        fail("Invalid configuration in clock.toml", &errors);
    }

    println!("cargo:warning=clock.toml validated successfully");
}

/// Validate the [axis.*] tables
fn validate_axes(value: &toml::Value, errors: &mut Vec<String>) {
    let Some(axes) = value.as_table() else {
        errors.push("[axis] must contain [axis.x], [axis.y] or [axis.hour]".to_string());
        return;
    };

    for (name, axis) in axes {
        if !AXES.contains(&name.as_str()) {
            errors.push(format!("unknown axis [axis.{}]", name));
            continue;
        }
        let Some(axis) = axis.as_table() else {
            errors.push(format!("[axis.{}] must be a table", name));
            continue;
        };

        for (key, value) in axis {
            let context = format!("[axis.{}] {}", name, key);
            match key.as_str() {
                "flipped" if !value.is_bool() => {
                    errors.push(format!("{} must be true or false", context))
                }
                "flipped" => {}
                k if AXIS_PINS.contains(&k) => check_pin(&context, value, errors),
                k if AXIS_NUMBERS.contains(&k) => check_positive(&context, value, errors),
                _ => errors.push(format!("unknown key {}", context)),
            }
        }
    }
}

/// Validate one of the flat sections
fn validate_section(name: &str, value: &toml::Value, numbers: &[&str], errors: &mut Vec<String>) {
    let Some(table) = value.as_table() else {
        errors.push(format!("[{}] must be a table", name));
        return;
    };

    for (key, value) in table {
        let context = format!("[{}] {}", name, key);
        match (name, key.as_str()) {
            ("sweep", "minutes") => check_minutes(&context, value, errors),
            ("buttons", "mode_pin" | "up_pin" | "down_pin") | ("rtc", "sda_pin" | "scl_pin") => {
                check_pin(&context, value, errors)
            }
            (_, k) if numbers.contains(&k) => check_positive(&context, value, errors),
            _ => errors.push(format!("unknown key {}", context)),
        }
    }
}

/// Pin strings: optional `!`/`^` prefixes, then `gpio0`..`gpio29`
fn check_pin(context: &str, value: &toml::Value, errors: &mut Vec<String>) {
    let Some(pin) = value.as_str() else {
        errors.push(format!("{} must be a string like \"gpio3\"", context));
        return;
    };

    let number = pin
        .trim_start_matches(['!', '^'])
        .strip_prefix("gpio")
        .and_then(|n| n.parse::<u8>().ok());

    match number {
        Some(n) if n <= 29 => {}
        _ => errors.push(format!("{} is not a valid pin: '{}'", context, pin)),
    }
}

/// Numbers must be non-negative; zero is caught by runtime validation
fn check_positive(context: &str, value: &toml::Value, errors: &mut Vec<String>) {
    let number = match value {
        toml::Value::Integer(i) => *i as f64,
        toml::Value::Float(f) => *f,
        _ => {
            errors.push(format!("{} must be a number", context));
            return;
        }
    };

    if number < 0.0 {
        errors.push(format!("{} must not be negative", context));
    }
}

fn check_minutes(context: &str, value: &toml::Value, errors: &mut Vec<String>) {
    let Some(minutes) = value.as_array() else {
        errors.push(format!("{} must be an array like [0, 30]", context));
        return;
    };

    for minute in minutes {
        match minute.as_integer() {
            Some(m) if (0..60).contains(&m) => {}
            _ => errors.push(format!("{} entries must be integers 0-59", context)),
        }
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let truncated = if line.chars().count() > 62 {
                    format!("{}...", line.chars().take(59).collect::<String>())
                } else {
                    line.to_string()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}
