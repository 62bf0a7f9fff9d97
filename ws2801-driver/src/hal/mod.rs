// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt Leitungs-Zugriffe hinter dem LineController Trait,
// um Testbarkeit und Wartbarkeit zu verbessern.

pub mod pins;

#[cfg(feature = "gpio-cdev")]
pub mod cdev;

pub use pins::PinPair;

#[cfg(feature = "gpio-cdev")]
pub use cdev::{CdevLines, GpioChip};
