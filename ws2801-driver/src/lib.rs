//! WS2801 Treiber - Linux Userspace
//!
//! Treibt einen WS2801 LED-Strip über ein Clock/Data-Leitungspaar
//! (Bit-Banging) oder über die Attribute der Kernel-Variante.
//!
//! - [`Ws2801`]: Userspace-Treiber mit Commit-Engine und Refresh-Task
//! - [`SysfsStrip`]: Client der Kernel-Variante
//! - [`command`]: textuelle Steuerung über beide Backends
//!
//! Beide Backends implementieren [`LedStrip`].

// Module
pub mod buffer;
pub mod command;
pub mod config;
pub mod hal;
pub mod sysfs;

mod commit;
mod driver;
mod refresh;
mod sync;

pub use buffer::LedBuffer;
pub use command::{ScriptError, execute, run_script};
pub use config::DriverConfig;
pub use driver::Ws2801;
pub use hal::PinPair;
pub use sysfs::SysfsStrip;

// Re-exports von ws2801-core
pub use ws2801_core::{
    ConfigError, Error, Led, LedStrip, Level, LineController, LineError, LineProvider,
    ResourceError, Result, StripCommand,
};

#[cfg(feature = "gpio-cdev")]
pub use hal::{CdevLines, GpioChip};
