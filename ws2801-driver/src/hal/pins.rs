// Leitungspaar aus zwei embedded-hal OutputPins
//
// Für Plattformen, deren HAL bereits OutputPins liefert.

use embedded_hal::digital::OutputPin;
use ws2801_core::{Level, LineController, LineError};

/// Clock- und Data-Pin als [`LineController`]
pub struct PinPair<C, D> {
    clock: C,
    data: D,
}

impl<C: OutputPin, D: OutputPin> PinPair<C, D> {
    pub fn new(clock: C, data: D) -> Self {
        Self { clock, data }
    }

    /// Gibt die Pins zurück
    pub fn into_inner(self) -> (C, D) {
        (self.clock, self.data)
    }
}

impl<C, D> LineController for PinPair<C, D>
where
    C: OutputPin + Send,
    D: OutputPin + Send,
{
    fn set(&mut self, clock: Level, data: Level) -> Result<(), LineError> {
        // Data zuerst: bei der steigenden Clock-Flanke muss Data stabil sein
        self.data
            .set_state(data)
            .map_err(|_| LineError::WriteRejected)?;
        self.clock
            .set_state(clock)
            .map_err(|_| LineError::WriteRejected)
    }
}

// ============================================================================
// Tests
// ============================================================================
