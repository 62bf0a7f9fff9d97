//! Gemeinsame Mocks für die Integration Tests
//!
//! Die Mocks laufen auf dem Host und zeichnen jeden Leitungszustand auf.
//! Frames werden wie im Strip dekodiert: Data wird bei jeder steigenden
//! Clock-Flanke gesampelt, ein Latch schließt den Frame ab.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use rgb::RGB8;
use ws2801_driver::{DriverConfig, Level, LineController, LineError, LineProvider, Ws2801};

pub const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
pub const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
pub const BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 255 };
pub const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };

// ============================================================================
// Mock Lines
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Set { clock: Level, data: Level },
    Latch,
}

#[derive(Default)]
pub struct Recording {
    pub events: Vec<Event>,
    /// Simuliere Fehler beim nächsten Schreiben
    pub fail_next_write: bool,
    pub write_count: usize,
}

/// Leitungspaar, dessen Klone dieselbe Aufzeichnung teilen
///
/// Der Test behält einen Klon; der Treiber bekommt den anderen.
#[derive(Clone, Default)]
pub struct MockLines {
    inner: Arc<Mutex<Recording>>,
}

impl MockLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap()
    }

    pub fn fail_next_write(&self) {
        self.recording().fail_next_write = true;
    }

    /// Anzahl der lebenden Handles (Test + Treiber)
    pub fn handles(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    pub fn latches(&self) -> usize {
        self.recording()
            .events
            .iter()
            .filter(|event| **event == Event::Latch)
            .count()
    }

    /// Alle abgeschlossenen Frames als Bytes
    pub fn frames(&self) -> Vec<Vec<u8>> {
        let recording = self.recording();
        let mut frames = Vec::new();
        let mut bytes = Vec::new();
        let mut byte = 0u8;
        let mut bits = 0;
        let mut clock = Level::Low;

        for event in &recording.events {
            match *event {
                Event::Set {
                    clock: next,
                    data,
                } => {
                    if clock == Level::Low && next == Level::High {
                        byte = (byte << 1) | u8::from(data == Level::High);
                        bits += 1;
                        if bits == 8 {
                            bytes.push(byte);
                            byte = 0;
                            bits = 0;
                        }
                    }
                    clock = next;
                }
                Event::Latch => {
                    frames.push(std::mem::take(&mut bytes));
                    byte = 0;
                    bits = 0;
                    clock = Level::Low;
                }
            }
        }

        frames
    }

    /// Frames nach dem Spül-Frame der Initialisierung
    pub fn commits(&self) -> Vec<Vec<u8>> {
        self.frames().into_iter().skip(1).collect()
    }

    pub fn commit_count(&self) -> usize {
        self.latches().saturating_sub(1)
    }

    pub fn last_frame(&self) -> Option<Vec<u8>> {
        self.frames().pop()
    }
}

impl LineController for MockLines {
    fn set(&mut self, clock: Level, data: Level) -> Result<(), LineError> {
        let mut recording = self.recording();
        if recording.fail_next_write {
            recording.fail_next_write = false;
            return Err(LineError::WriteRejected);
        }

        recording.events.push(Event::Set { clock, data });
        recording.write_count += 1;
        Ok(())
    }

    fn latch(&mut self) -> Result<(), LineError> {
        self.set(Level::Low, Level::Low)?;
        self.recording().events.push(Event::Latch);
        Ok(())
    }
}

// ============================================================================
// Mock Provider
// ============================================================================

#[derive(Default)]
pub struct MockProvider {
    pub lines: MockLines,
    /// Simuliere Fehler beim nächsten Claim
    pub fail_next_claim: Option<LineError>,
    pub claims: Vec<(u32, u32)>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LineProvider for MockProvider {
    type Lines = MockLines;

    fn claim(&mut self, clock: u32, data: u32) -> Result<MockLines, LineError> {
        if let Some(err) = self.fail_next_claim.take() {
            return Err(err);
        }

        self.claims.push((clock, data));
        Ok(self.lines.clone())
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn config(num_leds: usize) -> DriverConfig {
    DriverConfig::default().with_num_leds(num_leds)
}

/// Treiber mit Mock-Leitungen; der Klon bleibt beim Test
pub fn driver(config: &DriverConfig) -> (Ws2801<MockLines>, MockLines) {
    let lines = MockLines::new();
    let driver = Ws2801::with_lines(config, lines.clone()).unwrap();
    (driver, lines)
}

/// Bytes eines Frames für die gegebenen Farben
pub fn frame(colors: &[RGB8]) -> Vec<u8> {
    colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
}

/// Pollt `condition` bis sie erfüllt ist oder `timeout` abläuft
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}
