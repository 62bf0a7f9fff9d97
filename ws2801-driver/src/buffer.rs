// LED Buffer - der einzige geteilte, veränderliche Zustand
//
// Wird immer unter dem Data-Lock benutzt. Commits arbeiten nur auf
// Kopien (Snapshots), nie auf dem Buffer selbst.

use ws2801_core::{BLANK, ConfigError, Error, Led, ResourceError, Result};

/// Geordnete Folge von LEDs; Index = Position in der Schieberegister-Kette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedBuffer {
    leds: Vec<Led>,
}

impl LedBuffer {
    /// Allokiert einen schwarzen Buffer
    ///
    /// Allokations-Fehler werden als `ResourceError::Alloc` gemeldet statt abzubrechen.
    pub fn new(num_leds: usize) -> Result<Self> {
        let mut buffer = Self { leds: Vec::new() };
        buffer.resize(num_leds)?;
        Ok(buffer)
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    pub fn as_slice(&self) -> &[Led] {
        &self.leds
    }

    /// Kopie für Commits außerhalb des Data-Locks
    pub fn snapshot(&self) -> Vec<Led> {
        self.leds.clone()
    }

    pub fn set(&mut self, index: usize, color: Led) -> Result<()> {
        let len = self.leds.len();
        let led = self.leds.get_mut(index).ok_or(Error::Range { index, len })?;
        *led = color;
        Ok(())
    }

    /// Kopiert ab `offset`, abgeschnitten am Ende des Buffers
    ///
    /// Gibt die Anzahl der tatsächlich kopierten LEDs zurück.
    pub fn copy_from(&mut self, offset: usize, colors: &[Led]) -> usize {
        let Some(tail) = self.leds.get_mut(offset..) else {
            return 0;
        };

        let count = colors.len().min(tail.len());
        tail[..count].copy_from_slice(&colors[..count]);
        count
    }

    pub fn fill(&mut self, color: Led) {
        self.leds.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(BLANK);
    }

    /// Neue Länge; die ersten `min(alt, neu)` LEDs bleiben erhalten, der Rest ist schwarz
    pub fn resize(&mut self, num_leds: usize) -> Result<()> {
        if num_leds == 0 {
            return Err(ConfigError::EmptyStrip.into());
        }

        if let Some(additional) = num_leds.checked_sub(self.leds.len()) {
            self.leds
                .try_reserve_exact(additional)
                .map_err(|_| ResourceError::Alloc { num_leds })?;
        }

        self.leds.resize(num_leds, BLANK);
        self.leds.shrink_to_fit();
        Ok(())
    }
}

/// Alles, was der Data-Lock schützt
#[derive(Debug)]
pub(crate) struct StripState {
    pub(crate) leds: LedBuffer,
    /// 0 = Refresh aus
    pub(crate) refresh_rate_ms: u32,
    pub(crate) auto_commit: bool,
    /// Wird bei jedem expliziten Wecken des Refresh-Tasks erhöht
    pub(crate) wakeups: u64,
}

impl StripState {
    pub(crate) fn new(leds: LedBuffer, auto_commit: bool) -> Self {
        Self {
            leds,
            refresh_rate_ms: 0,
            auto_commit,
            wakeups: 0,
        }
    }

    /// Snapshot für den Auto-Commit, falls aktiv
    pub(crate) fn pending_commit(&self) -> Option<Vec<Led>> {
        self.auto_commit.then(|| self.leds.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    const A: Led = RGB8 { r: 1, g: 0, b: 0 };
    const B: Led = RGB8 { r: 0, g: 2, b: 0 };
    const C: Led = RGB8 { r: 0, g: 0, b: 3 };

    #[test]
    fn test_new_buffer_is_blank() {
        let buffer = LedBuffer::new(4).unwrap();
        assert_eq!(buffer.len(), 4);
        assert!(buffer.as_slice().iter().all(|&led| led == BLANK));
    }

    #[test]
    fn test_new_buffer_rejects_zero_length() {
        assert_eq!(
            LedBuffer::new(0),
            Err(Error::Config(ConfigError::EmptyStrip))
        );
    }

    #[test]
    fn test_set_out_of_range_leaves_buffer_unchanged() {
        let mut buffer = LedBuffer::new(3).unwrap();
        buffer.set(1, A).unwrap();

        assert_eq!(buffer.set(3, B), Err(Error::Range { index: 3, len: 3 }));
        assert_eq!(buffer.as_slice(), [BLANK, A, BLANK]);
    }

    #[test]
    fn test_copy_from_clips_at_end() {
        let mut buffer = LedBuffer::new(10).unwrap();
        let copied = buffer.copy_from(8, &[A, B, C]);

        assert_eq!(copied, 2);
        assert_eq!(buffer.as_slice()[8], A);
        assert_eq!(buffer.as_slice()[9], B);
        assert!(buffer.as_slice()[..8].iter().all(|&led| led == BLANK));
    }

    #[test]
    fn test_copy_from_offset_past_end() {
        let mut buffer = LedBuffer::new(2).unwrap();
        assert_eq!(buffer.copy_from(2, &[A]), 0);
        assert_eq!(buffer.copy_from(usize::MAX, &[A]), 0);
        assert_eq!(buffer.as_slice(), [BLANK, BLANK]);
    }

    #[test]
    fn test_resize_keeps_prefix() {
        let mut buffer = LedBuffer::new(3).unwrap();
        buffer.copy_from(0, &[A, B, C]);

        buffer.resize(2).unwrap();
        assert_eq!(buffer.as_slice(), [A, B]);

        buffer.resize(4).unwrap();
        assert_eq!(buffer.as_slice(), [A, B, BLANK, BLANK]);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut buffer = LedBuffer::new(3).unwrap();
        buffer.fill(C);
        assert_eq!(buffer.as_slice(), [C, C, C]);

        buffer.clear();
        assert_eq!(buffer.as_slice(), [BLANK, BLANK, BLANK]);
    }

    #[test]
    fn test_pending_commit_follows_flag() {
        let mut state = StripState::new(LedBuffer::new(1).unwrap(), false);
        assert_eq!(state.pending_commit(), None);

        state.auto_commit = true;
        assert_eq!(state.pending_commit(), Some(vec![BLANK]));
    }
}
