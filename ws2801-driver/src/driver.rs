//! Userspace WS2801 Treiber (Bit-Banging über ein Leitungspaar)
//!
//! Zwei Locks:
//! - **Data-Lock** schützt Buffer, Refresh-Rate und Auto-Commit-Flag und ist
//!   der Wait-Mutex des Refresh-Tasks.
//! - **Commit-Lock** (in der [`CommitEngine`]) schützt nur den Hardware-Pfad.
//!
//! Regel: nie Hardware-I/O unter dem Data-Lock. Mutation oder Snapshot unter
//! dem Data-Lock, Lock freigeben, dann (falls nötig) committen.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};
use ws2801_core::{
    LATCH_SETTLE_US, Led, LedStrip, LineController, LineProvider, ResourceError, Result, flush,
};

use crate::buffer::{LedBuffer, StripState};
use crate::commit::CommitEngine;
use crate::config::DriverConfig;
use crate::refresh::RefreshScheduler;
use crate::sync::lock;

/// Zustand, den Facade und Refresh-Task teilen
pub(crate) struct Shared<L> {
    pub(crate) data: Mutex<StripState>,
    pub(crate) wake: Condvar,
    pub(crate) engine: CommitEngine<L>,
}

/// WS2801 Strip an einem Clock/Data-Leitungspaar
///
/// # Beispiel
///
/// ```no_run
/// # use rgb::RGB8;
/// # use ws2801_driver::{DriverConfig, LineController, Result, Ws2801};
/// # fn demo<L: LineController + 'static>(lines: L) -> Result<()> {
/// let strip = Ws2801::with_lines(&DriverConfig::default().with_num_leds(10), lines)?;
/// strip.set_led(0, RGB8 { r: 255, g: 0, b: 0 })?;
/// strip.commit()?;
/// strip.free()
/// # }
/// ```
pub struct Ws2801<L: LineController + 'static> {
    shared: Arc<Shared<L>>,
    refresh: RefreshScheduler,
}

impl<L: LineController + 'static> Ws2801<L> {
    /// Initialisiert den Treiber über einen [`LineProvider`]
    ///
    /// Reihenfolge: Konfiguration prüfen → Buffer allokieren → Leitungen
    /// atomar anfordern → Strip spülen → optional Refresh starten.
    /// Bei jedem Fehler wird alles bereits Beschaffte wieder freigegeben.
    pub fn init<P>(config: &DriverConfig, provider: &mut P) -> Result<Self>
    where
        P: LineProvider<Lines = L>,
    {
        config.validate()?;
        let leds = LedBuffer::new(config.num_leds)?;

        let lines = provider
            .claim(config.clock_line, config.data_line)
            .map_err(|err| {
                error!(%err, clock = config.clock_line, data = config.data_line, "cannot claim lines");
                ResourceError::Lines(err)
            })?;

        Self::start(config, leds, lines)
    }

    /// Initialisiert den Treiber mit bereits geclaimten Leitungen
    pub fn with_lines(config: &DriverConfig, lines: L) -> Result<Self> {
        config.validate()?;
        let leds = LedBuffer::new(config.num_leds)?;

        Self::start(config, leds, lines)
    }

    fn start(config: &DriverConfig, leds: LedBuffer, mut lines: L) -> Result<Self> {
        // Undefinierte Zustände aus den Schieberegistern spülen
        if let Err(err) = flush(&mut lines) {
            error!(%err, "flushing the strip failed");
            return Err(ResourceError::Flush(err).into());
        }
        thread::sleep(Duration::from_micros(LATCH_SETTLE_US));

        let driver = Self {
            shared: Arc::new(Shared {
                data: Mutex::new(StripState::new(leds, config.auto_commit)),
                wake: Condvar::new(),
                engine: CommitEngine::new(lines),
            }),
            refresh: RefreshScheduler::new(),
        };

        // Bei Fehler räumt Drop den Treiber wieder ab
        if config.refresh_rate_ms > 0 {
            driver.set_refresh_rate(config.refresh_rate_ms)?;
        }

        info!(
            num_leds = config.num_leds,
            clock = config.clock_line,
            data = config.data_line,
            "ws2801 initialised"
        );
        Ok(driver)
    }

    fn data(&self) -> MutexGuard<'_, StripState> {
        lock(&self.shared.data)
    }

    /// Auto-Commit nach einer Mutation, ohne Data-Lock
    fn commit_pending(&self, pending: Option<Vec<Led>>) -> Result<()> {
        match pending {
            Some(snapshot) => self.shared.engine.commit(&snapshot),
            None => Ok(()),
        }
    }

    pub fn num_leds(&self) -> usize {
        self.data().leds.len()
    }

    /// Kopie des aktuellen Buffers
    pub fn leds(&self) -> Vec<Led> {
        self.data().leds.snapshot()
    }

    pub fn set_led(&self, index: usize, color: Led) -> Result<()> {
        let pending = {
            let mut state = self.data();
            state.leds.set(index, color)?;
            state.pending_commit()
        };
        self.commit_pending(pending)
    }

    pub fn set_leds(&self, offset: usize, colors: &[Led]) -> Result<usize> {
        let (copied, pending) = {
            let mut state = self.data();
            if offset >= state.leds.len() {
                return Ok(0);
            }
            let copied = state.leds.copy_from(offset, colors);
            // Nichts kopiert: keine Mutation, kein Auto-Commit
            let pending = if copied > 0 { state.pending_commit() } else { None };
            (copied, pending)
        };
        self.commit_pending(pending)?;
        Ok(copied)
    }

    /// Alle LEDs auf eine Farbe ("full on")
    pub fn fill(&self, color: Led) -> Result<()> {
        let pending = {
            let mut state = self.data();
            state.leds.fill(color);
            state.pending_commit()
        };
        self.commit_pending(pending)
    }

    pub fn clear(&self) -> Result<()> {
        let pending = {
            let mut state = self.data();
            state.leds.clear();
            state.pending_commit()
        };
        self.commit_pending(pending)
    }

    /// Überträgt einen Snapshot des aktuellen Buffers
    pub fn commit(&self) -> Result<()> {
        let snapshot = self.data().leds.snapshot();
        self.shared.engine.commit(&snapshot)
    }

    /// Alias für [`Ws2801::commit`]
    pub fn sync(&self) -> Result<()> {
        self.commit()
    }

    pub fn set_refresh_rate(&self, refresh_rate_ms: u32) -> Result<()> {
        self.refresh.set_rate(&self.shared, refresh_rate_ms)
    }

    pub fn refresh_rate(&self) -> u32 {
        self.data().refresh_rate_ms
    }

    /// `true` solange ein Refresh-Task lebt
    pub fn refresh_running(&self) -> bool {
        self.refresh.is_running()
    }

    /// Wirkt ab der nächsten Mutation
    pub fn set_auto_commit(&self, auto_commit: bool) {
        self.data().auto_commit = auto_commit;
    }

    pub fn auto_commit(&self) -> bool {
        self.data().auto_commit
    }

    /// Neue Strip-Länge
    ///
    /// Auch bei laufendem Refresh sicher: Commits lesen nur Snapshots,
    /// die unter demselben Data-Lock entstehen.
    pub fn resize(&self, num_leds: usize) -> Result<()> {
        self.data().leds.resize(num_leds)?;
        info!(num_leds, "strip resized");
        Ok(())
    }

    /// `true` nachdem ein Hardware-Fehler den Ausgabepfad stillgelegt hat
    pub fn output_failed(&self) -> bool {
        self.shared.engine.is_failed()
    }

    /// Gibt alle Ressourcen frei
    ///
    /// Stoppt zuerst den Refresh-Task (Join), schaltet dann unter dem
    /// Commit-Lock den Strip dunkel und gibt die Leitungen frei.
    pub fn free(mut self) -> Result<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        if self.shared.engine.is_released() {
            return Ok(());
        }

        let stopped = self.refresh.set_rate(&self.shared, 0);
        let num_leds = self.num_leds();
        let released = self.shared.engine.release(num_leds);

        info!("ws2801 released");
        stopped.and(released)
    }
}

impl<L: LineController + 'static> Drop for Ws2801<L> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            warn!(%err, "ws2801 teardown incomplete");
        }
    }
}

impl<L: LineController + 'static> LedStrip for Ws2801<L> {
    fn num_leds(&self) -> usize {
        Ws2801::num_leds(self)
    }

    fn set_led(&self, index: usize, color: Led) -> Result<()> {
        Ws2801::set_led(self, index, color)
    }

    fn set_leds(&self, offset: usize, colors: &[Led]) -> Result<usize> {
        Ws2801::set_leds(self, offset, colors)
    }

    fn fill(&self, color: Led) -> Result<()> {
        Ws2801::fill(self, color)
    }

    fn clear(&self) -> Result<()> {
        Ws2801::clear(self)
    }

    fn commit(&self) -> Result<()> {
        Ws2801::commit(self)
    }

    fn set_refresh_rate(&self, refresh_rate_ms: u32) -> Result<()> {
        Ws2801::set_refresh_rate(self, refresh_rate_ms)
    }

    fn refresh_rate(&self) -> u32 {
        Ws2801::refresh_rate(self)
    }

    fn set_auto_commit(&self, auto_commit: bool) {
        Ws2801::set_auto_commit(self, auto_commit);
    }

    fn auto_commit(&self) -> bool {
        Ws2801::auto_commit(self)
    }

    fn resize(&self, num_leds: usize) -> Result<()> {
        Ws2801::resize(self, num_leds)
    }
}
