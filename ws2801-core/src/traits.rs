//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Leitungs-Zugriff und für
//! komplette Strips ohne konkrete Implementierung.

use crate::error::{Error, LineError};
use crate::types::{Led, Level};

/// Trait für ein geclaimtes Leitungspaar (Clock + Data)
///
/// # Implementierungen
/// - **Pins:** `PinPair` (zwei `embedded_hal` OutputPins)
/// - **Linux:** `CdevLines` (GPIO Character Device, Feature `gpio-cdev`)
/// - **Testing:** `MockLines` (zeichnet jeden Pegelwechsel auf)
pub trait LineController: Send {
    /// Setzt Clock und Data in einem Schritt
    ///
    /// # Fehlerbehandlung
    /// Gibt `LineError::WriteRejected` zurück wenn das Handle den Schreibzugriff ablehnt
    fn set(&mut self, clock: Level, data: Level) -> Result<(), LineError>;

    /// Latch: beide Leitungen auf Low, der Strip übernimmt die Daten
    fn latch(&mut self) -> Result<(), LineError> {
        self.set(Level::Low, Level::Low)
    }
}

/// Beschafft Leitungspaare
///
/// `claim` ist atomar: entweder sind beide Leitungen belegt oder keine.
pub trait LineProvider {
    type Lines: LineController;

    fn claim(&mut self, clock: u32, data: u32) -> Result<Self::Lines, LineError>;
}

/// Backend-unabhängige Operationen auf einem LED-Strip
///
/// Alle Methoden nehmen `&self`; die Implementierungen schützen ihren
/// Zustand intern und dürfen von mehreren Threads genutzt werden.
pub trait LedStrip: Send + Sync {
    /// Aktuelle Anzahl der LEDs
    fn num_leds(&self) -> usize;

    /// Setzt eine einzelne LED
    ///
    /// Gibt `Error::Range` zurück wenn `index >= num_leds()`.
    fn set_led(&self, index: usize, color: Led) -> Result<(), Error>;

    /// Kopiert `colors` ab `offset` in den Buffer
    ///
    /// Schneidet still ab und gibt die Anzahl der tatsächlich kopierten
    /// LEDs zurück (0 wenn `offset` hinter dem Ende liegt).
    fn set_leds(&self, offset: usize, colors: &[Led]) -> Result<usize, Error>;

    /// Setzt alle LEDs auf eine Farbe
    fn fill(&self, color: Led) -> Result<(), Error>;

    /// Setzt alle LEDs auf (0, 0, 0)
    fn clear(&self) -> Result<(), Error>;

    /// Überträgt den aktuellen Buffer auf die Hardware
    fn commit(&self) -> Result<(), Error>;

    /// Refresh-Rate in Millisekunden, 0 deaktiviert
    fn set_refresh_rate(&self, refresh_rate_ms: u32) -> Result<(), Error>;

    fn refresh_rate(&self) -> u32;

    /// Auto-Commit: jede Änderung wird sofort übertragen
    fn set_auto_commit(&self, auto_commit: bool);

    fn auto_commit(&self) -> bool;

    /// Ändert die Länge des Strips; bestehende Werte bleiben erhalten
    fn resize(&self, num_leds: usize) -> Result<(), Error>;
}
