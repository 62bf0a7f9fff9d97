//! WS2801 Core - Platform-agnostic Protokoll-Logik und Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Traits für Leitungen und Strips, den Bit-Transmitter
//! als Pure Function über diese Traits, die Fehler-Taxonomie und das
//! textuelle Kommando-Modell.

#![cfg_attr(not(test), no_std)]

pub mod error;
pub mod logic;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use error::{ConfigError, Error, LineError, ParseCommandError, ResourceError, Result};
pub use logic::{
    DEFAULT_AUTO_COMMIT, DEFAULT_NUM_LEDS, DEFAULT_REFRESH_RATE_MS, FLUSH_BYTES, LATCH_SETTLE_US,
    flush, frame_bytes, send_byte, send_frame, send_led,
};
pub use traits::{LedStrip, LineController, LineProvider};
pub use types::{BLANK, Led, Level, StripCommand, parse_script};
