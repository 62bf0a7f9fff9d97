//! Client für die Kernel-Variante des Treibers
//!
//! Der Kernel besitzt die Leitungen und den Refresh-Task; dieser Client hält
//! nur den Buffer im Userspace und schreibt ihn über die Geräte-Attribute
//! (`set_raw`, `commit`, `refresh_rate`, `num_leds`).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, info};
use ws2801_core::{
    DEFAULT_REFRESH_RATE_MS, Error, Led, LedStrip, LineError, ResourceError, Result, frame_bytes,
};

use crate::buffer::{LedBuffer, StripState};
use crate::config::SYSFS_DEVICES_DIR;
use crate::sync::lock;

const ATTR_COMMIT: &str = "commit";
const ATTR_REFRESH_RATE: &str = "refresh_rate";
const ATTR_SET_RAW: &str = "set_raw";
const ATTR_NUM_LEDS: &str = "num_leds";

struct Attributes {
    commit: File,
    refresh_rate: File,
    set_raw: File,
    num_leds: File,
}

impl Attributes {
    fn open(dir: &Path) -> Result<Self> {
        let open = |name: &str| {
            let path = dir.join(name);
            OpenOptions::new().write(true).open(&path).map_err(|err| {
                error!(%err, path = %path.display(), "unable to open attribute");
                Error::from(ResourceError::Attribute)
            })
        };

        // Schlägt ein open fehl, werden die bereits geöffneten Files gedroppt
        Ok(Self {
            commit: open(ATTR_COMMIT)?,
            refresh_rate: open(ATTR_REFRESH_RATE)?,
            set_raw: open(ATTR_SET_RAW)?,
            num_leds: open(ATTR_NUM_LEDS)?,
        })
    }
}

fn write_number(file: &mut File, value: impl std::fmt::Display) -> std::io::Result<()> {
    file.write_all(format!("{value}\n").as_bytes())
}

/// Strip, der von der Kernel-Variante angesteuert wird
pub struct SysfsStrip {
    dir: PathBuf,
    data: Mutex<StripState>,
    /// Commit-Lock; schützt auch die anderen Attribute.
    /// Nie gleichzeitig mit dem Data-Lock gehalten.
    attributes: Mutex<Attributes>,
}

impl SysfsStrip {
    /// Öffnet das Geräteverzeichnis `dir` und setzt die Strip-Länge
    pub fn init(dir: impl Into<PathBuf>, num_leds: usize) -> Result<Self> {
        let dir = dir.into();
        let leds = LedBuffer::new(num_leds)?;
        let mut attributes = Attributes::open(&dir)?;

        write_number(&mut attributes.num_leds, num_leds).map_err(|err| {
            error!(%err, "unable to write num_leds");
            ResourceError::Attribute
        })?;

        // Spiegelt den Startwert des Kernels, bis set_refresh_rate ihn überschreibt
        let mut state = StripState::new(leds, false);
        state.refresh_rate_ms = DEFAULT_REFRESH_RATE_MS;

        info!(dir = %dir.display(), num_leds, "ws2801 sysfs strip opened");
        Ok(Self {
            dir,
            data: Mutex::new(state),
            attributes: Mutex::new(attributes),
        })
    }

    /// Öffnet das Gerät `name` unter `/sys/devices/ws2801/devices`
    pub fn open_device(name: &str, num_leds: usize) -> Result<Self> {
        Self::init(Path::new(SYSFS_DEVICES_DIR).join(name), num_leds)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn data(&self) -> MutexGuard<'_, StripState> {
        lock(&self.data)
    }

    pub fn leds(&self) -> Vec<Led> {
        self.data().leds.snapshot()
    }

    fn write_frame(&self, leds: &[Led]) -> Result<()> {
        let raw: Vec<u8> = frame_bytes(leds).collect();
        let mut attributes = lock(&self.attributes);

        let written = attributes
            .set_raw
            .write_all(&raw)
            .and_then(|()| attributes.commit.write_all(b"\n"));

        written.map_err(|err| {
            error!(%err, "error during set_raw/commit");
            Error::HardwareIo(LineError::WriteRejected)
        })?;

        debug!(num_leds = leds.len(), "frame committed");
        Ok(())
    }

    fn commit_pending(&self, pending: Option<Vec<Led>>) -> Result<()> {
        match pending {
            Some(snapshot) => self.write_frame(&snapshot),
            None => Ok(()),
        }
    }
}

impl LedStrip for SysfsStrip {
    fn num_leds(&self) -> usize {
        self.data().leds.len()
    }

    fn set_led(&self, index: usize, color: Led) -> Result<()> {
        let pending = {
            let mut state = self.data();
            state.leds.set(index, color)?;
            state.pending_commit()
        };
        self.commit_pending(pending)
    }

    fn set_leds(&self, offset: usize, colors: &[Led]) -> Result<usize> {
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

    fn fill(&self, color: Led) -> Result<()> {
        let pending = {
            let mut state = self.data();
            state.leds.fill(color);
            state.pending_commit()
        };
        self.commit_pending(pending)
    }

    fn clear(&self) -> Result<()> {
        let pending = {
            let mut state = self.data();
            state.leds.clear();
            state.pending_commit()
        };
        self.commit_pending(pending)
    }

    fn commit(&self) -> Result<()> {
        let snapshot = self.data().leds.snapshot();
        self.write_frame(&snapshot)
    }

    /// Scheduling übernimmt der Kernel
    fn set_refresh_rate(&self, refresh_rate_ms: u32) -> Result<()> {
        let written = write_number(&mut lock(&self.attributes).refresh_rate, refresh_rate_ms);

        written.map_err(|err| {
            error!(%err, refresh_rate_ms, "unable to write refresh_rate");
            ResourceError::Attribute
        })?;

        self.data().refresh_rate_ms = refresh_rate_ms;
        Ok(())
    }

    fn refresh_rate(&self) -> u32 {
        self.data().refresh_rate_ms
    }

    fn set_auto_commit(&self, auto_commit: bool) {
        self.data().auto_commit = auto_commit;
    }

    fn auto_commit(&self) -> bool {
        self.data().auto_commit
    }

    fn resize(&self, num_leds: usize) -> Result<()> {
        let previous = {
            let mut state = self.data();
            let previous = state.leds.len();
            state.leds.resize(num_leds)?;
            previous
        };

        let written = write_number(&mut lock(&self.attributes).num_leds, num_leds);

        if let Err(err) = written {
            // Lokale Länge muss zur Länge im Kernel passen
            self.data().leds.resize(previous)?;
            error!(%err, num_leds, previous, "unable to write num_leds, length restored");
            return Err(ResourceError::Attribute.into());
        }

        Ok(())
    }
}
