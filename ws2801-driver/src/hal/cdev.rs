// Linux GPIO Character Device Backend (/dev/gpiochipN)
//
// Beide Leitungen werden mit einem einzigen Request angefordert und mit
// einem einzigen Aufruf geschrieben: entweder sind beide belegt oder keine.

use std::path::Path;

use gpio_cdev::{Chip, LineRequestFlags, MultiLineHandle};
use tracing::{debug, error};
use ws2801_core::{Level, LineController, LineError, LineProvider};

use crate::config::CONSUMER_LABEL;

/// Geöffneter GPIO-Chip
pub struct GpioChip {
    chip: Chip,
}

impl GpioChip {
    /// Öffnet einen Chip über seinen Pfad, z.B. `/dev/gpiochip0`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LineError> {
        let path = path.as_ref();
        let chip = Chip::new(path).map_err(|err| {
            error!(%err, path = %path.display(), "cannot open gpio chip");
            LineError::ClaimFailed
        })?;

        Ok(Self { chip })
    }

    /// Öffnet `/dev/gpiochip<index>`
    pub fn by_index(index: u32) -> Result<Self, LineError> {
        Self::open(format!("/dev/gpiochip{index}"))
    }
}

impl LineProvider for GpioChip {
    type Lines = CdevLines;

    fn claim(&mut self, clock: u32, data: u32) -> Result<CdevLines, LineError> {
        let num_lines = self.chip.num_lines();
        if let Some(&line) = [clock, data].iter().find(|&&line| line >= num_lines) {
            return Err(LineError::Unavailable(line));
        }

        let lines = self.chip.get_lines(&[clock, data]).map_err(|err| {
            error!(%err, clock, data, "cannot look up lines");
            LineError::ClaimFailed
        })?;

        let handle = lines
            .request(LineRequestFlags::OUTPUT, &[0, 0], CONSUMER_LABEL)
            .map_err(|err| {
                error!(%err, clock, data, "cannot request lines");
                LineError::ClaimFailed
            })?;

        debug!(clock, data, "lines claimed");
        Ok(CdevLines { handle })
    }
}

/// Geclaimtes Leitungspaar; wird beim Drop freigegeben
pub struct CdevLines {
    handle: MultiLineHandle,
}

fn value(level: Level) -> u8 {
    match level {
        Level::High => 1,
        Level::Low => 0,
    }
}

impl LineController for CdevLines {
    fn set(&mut self, clock: Level, data: Level) -> Result<(), LineError> {
        self.handle
            .set_values(&[value(clock), value(data)])
            .map_err(|_| LineError::WriteRejected)
    }
}
