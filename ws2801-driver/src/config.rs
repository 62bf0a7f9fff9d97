// Treiber-Konfiguration: Konstanten und Konstruktions-Parameter

use ws2801_core::{ConfigError, DEFAULT_AUTO_COMMIT, DEFAULT_NUM_LEDS};

// ============================================================================
// Leitungen
// ============================================================================

/// Consumer-Label beim Anfordern der GPIO-Leitungen
pub const CONSUMER_LABEL: &str = "ws2801";

/// Default Clock-Leitung (Offset auf dem GPIO-Chip)
pub const DEFAULT_CLOCK_LINE: u32 = 160;

/// Default Data-Leitung (Offset auf dem GPIO-Chip)
pub const DEFAULT_DATA_LINE: u32 = 162;

// ============================================================================
// Refresh-Task
// ============================================================================

/// Thread-Name des Refresh-Tasks
pub const REFRESH_THREAD_NAME: &str = "ws2801-refresh";

// ============================================================================
// Sysfs (Kernel-Variante)
// ============================================================================

/// Verzeichnis der Geräte der Kernel-Variante
pub const SYSFS_DEVICES_DIR: &str = "/sys/devices/ws2801/devices";

/// Konstruktions-Parameter des Treibers
///
/// ```
/// # use ws2801_driver::DriverConfig;
/// let config = DriverConfig::default()
///     .with_num_leds(50)
///     .with_lines(17, 27)
///     .with_refresh_rate(1000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    pub num_leds: usize,
    pub clock_line: u32,
    pub data_line: u32,
    /// Initiale Refresh-Rate in ms, 0 = aus
    pub refresh_rate_ms: u32,
    pub auto_commit: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            num_leds: DEFAULT_NUM_LEDS,
            clock_line: DEFAULT_CLOCK_LINE,
            data_line: DEFAULT_DATA_LINE,
            refresh_rate_ms: 0,
            auto_commit: DEFAULT_AUTO_COMMIT,
        }
    }
}

impl DriverConfig {
    pub fn with_num_leds(mut self, num_leds: usize) -> Self {
        self.num_leds = num_leds;
        self
    }

    pub fn with_lines(mut self, clock_line: u32, data_line: u32) -> Self {
        self.clock_line = clock_line;
        self.data_line = data_line;
        self
    }

    pub fn with_refresh_rate(mut self, refresh_rate_ms: u32) -> Self {
        self.refresh_rate_ms = refresh_rate_ms;
        self
    }

    pub fn with_auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = auto_commit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_leds == 0 {
            return Err(ConfigError::EmptyStrip);
        }
        if self.clock_line == self.data_line {
            return Err(ConfigError::SameLine(self.clock_line));
        }
        Ok(())
    }
}
