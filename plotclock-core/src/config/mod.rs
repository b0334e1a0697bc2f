//! Configuration types
//!
//! Board-agnostic configuration structures plus the parser for the
//! configuration text embedded in the firmware image.

pub mod hardware;
pub mod parse;
pub mod types;

pub use hardware::*;
pub use parse::{parse_config, parse_pin_string, ParseError};
pub use types::*;
