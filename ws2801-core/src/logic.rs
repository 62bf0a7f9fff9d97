//! Bit-Transmitter für das WS2801 Protokoll
//!
//! Pure Functions über [`LineController`] (testbar ohne Hardware!).
//! Protokoll: taktsynchron, MSB zuerst. Der Strip übernimmt das Datenbit
//! bei der steigenden Clock-Flanke; ein Latch (Clock länger Low) schließt
//! den Frame ab.

use crate::error::LineError;
use crate::traits::LineController;
use crate::types::{Led, Level};

/// Null-Bytes, die bei der Initialisierung gesendet werden, um
/// undefinierte Zustände aus den Schieberegistern des Strips zu spülen
pub const FLUSH_BYTES: usize = 100;

/// Settle-Zeit nach dem Latch in Mikrosekunden
pub const LATCH_SETTLE_US: u64 = 1_000;

/// Default Refresh-Rate der Kernel-Variante in Millisekunden
pub const DEFAULT_REFRESH_RATE_MS: u32 = 5_000;

pub const DEFAULT_AUTO_COMMIT: bool = false;

pub const DEFAULT_NUM_LEDS: usize = 30;

/// Sendet ein Byte, MSB zuerst
///
/// Pro Bit: Data setzen, Clock Low → High → Low.
pub fn send_byte<L: LineController + ?Sized>(lines: &mut L, byte: u8) -> Result<(), LineError> {
    for shift in (0..8).rev() {
        let data = Level::from(byte & (1 << shift) != 0);
        lines.set(Level::Low, data)?;
        lines.set(Level::High, data)?;
        lines.set(Level::Low, data)?;
    }

    Ok(())
}

/// Sendet eine LED als Rot, Grün, Blau
pub fn send_led<L: LineController + ?Sized>(lines: &mut L, led: Led) -> Result<(), LineError> {
    send_byte(lines, led.r)?;
    send_byte(lines, led.g)?;
    send_byte(lines, led.b)
}

/// Sendet alle LEDs in Index-Reihenfolge und setzt danach den Latch
///
/// Die Settle-Zeit muss der Aufrufer abwarten (der Core kennt keine Uhr).
pub fn send_frame<L: LineController + ?Sized>(lines: &mut L, leds: &[Led]) -> Result<(), LineError> {
    for byte in frame_bytes(leds) {
        send_byte(lines, byte)?;
    }

    lines.latch()
}

/// Spült die Schieberegister mit [`FLUSH_BYTES`] Null-Bytes und setzt den Latch
pub fn flush<L: LineController + ?Sized>(lines: &mut L) -> Result<(), LineError> {
    for _ in 0..FLUSH_BYTES {
        send_byte(lines, 0)?;
    }

    lines.latch()
}

/// Byte-Folge eines Frames, so wie sie auf der Leitung erscheint
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use ws2801_core::frame_bytes;
/// let leds = [RGB8 { r: 1, g: 2, b: 3 }, RGB8 { r: 4, g: 5, b: 6 }];
/// let bytes: Vec<u8> = frame_bytes(&leds).collect();
/// assert_eq!(bytes, [1, 2, 3, 4, 5, 6]);
/// ```
pub fn frame_bytes(leds: &[Led]) -> impl Iterator<Item = u8> + '_ {
    leds.iter().flat_map(|led| [led.r, led.g, led.b])
}
