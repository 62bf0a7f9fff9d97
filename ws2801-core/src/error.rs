//! Fehler-Taxonomie für Treiber, Leitungen und Kommandos
//!
//! Alle Fehler sind `Copy` und kommen ohne Allokation aus,
//! damit sie auch im `no_std` Core verwendbar bleiben.

/// Result-Alias mit [`Error`] als Default
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Fehler einer einzelnen Leitungs-Operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Die Leitung existiert nicht oder ist bereits belegt
    #[error("line {0} is not available")]
    Unavailable(u32),
    /// Das Anfordern des Leitungspaares ist fehlgeschlagen
    #[error("claiming the line pair failed")]
    ClaimFailed,
    /// Der Schreibzugriff wurde vom Leitungs-Handle abgelehnt
    #[error("line write rejected")]
    WriteRejected,
}

/// Ungültige Konstruktions-Parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("strip length must not be zero")]
    EmptyStrip,
    #[error("clock and data must be distinct lines (both are {0})")]
    SameLine(u32),
}

/// Ressourcen, die nicht beschafft oder freigegeben werden konnten
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    #[error("cannot allocate buffer for {num_leds} LEDs")]
    Alloc { num_leds: usize },
    #[error("cannot acquire lines: {0}")]
    Lines(LineError),
    #[error("flushing the strip failed: {0}")]
    Flush(LineError),
    #[error("cannot spawn refresh task")]
    Spawn,
    #[error("cannot join refresh task")]
    Join,
    #[error("cannot open or write device attribute")]
    Attribute,
}

/// Fehler der Strip-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),
    #[error("LED index {index} out of range (strip has {len} LEDs)")]
    Range { index: usize, len: usize },
    /// Fatal: ein halb übertragener Frame lässt den Strip undefiniert zurück
    #[error("hardware write failed: {0}")]
    HardwareIo(LineError),
    /// Der Ausgabepfad wurde nach einem früheren Hardware-Fehler stillgelegt
    #[error("output path terminated after an earlier hardware failure")]
    OutputTerminated,
}

impl Error {
    /// `true` für Fehler, nach denen der Treiber neu initialisiert werden muss
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::HardwareIo(_) | Error::OutputTerminated)
    }
}

/// Fehler beim Parsen eines textuellen Kommandos
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command")]
    UnknownCommand,
    #[error("missing argument `{0}`")]
    MissingArgument(&'static str),
    #[error("invalid number for `{0}`")]
    InvalidNumber(&'static str),
    #[error("invalid boolean")]
    InvalidBool,
    #[error("unexpected trailing input")]
    TrailingInput,
}
