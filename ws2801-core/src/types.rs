//! Core Types für den WS2801 Strip
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

use crate::error::ParseCommandError;

/// Eine LED: drei unabhängige Byte-Kanäle, Reihenfolge auf der Leitung r, g, b
pub type Led = RGB8;

/// Pegel einer Ausgangsleitung
pub type Level = embedded_hal::digital::PinState;

/// Ausgeschaltete LED
pub const BLANK: Led = RGB8 { r: 0, g: 0, b: 0 };

/// Strip Command für die textuelle Steuerung
///
/// Eine Zeile pro Kommando, z.B. `set 3 255 0 0` oder `refresh_rate 500`.
/// Entspricht den Attributen der Kernel-Variante.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StripCommand {
    /// `set N R G B`
    Set { index: usize, color: Led },
    /// `full_on R G B`
    Fill(Led),
    /// `clear`
    Clear,
    /// `commit`
    Commit,
    /// `refresh_rate MS`
    RefreshRate(u32),
    /// `auto_commit B`
    AutoCommit(bool),
    /// `num_leds N`
    NumLeds(usize),
}

impl TryFrom<&str> for StripCommand {
    type Error = ParseCommandError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let mut args = line.split_whitespace();
        let name = args.next().ok_or(ParseCommandError::Empty)?;

        let cmd = match name {
            "set" => Self::Set {
                index: number(args.next(), "index")?,
                color: color(&mut args)?,
            },
            "full_on" => Self::Fill(color(&mut args)?),
            "clear" => Self::Clear,
            "commit" => Self::Commit,
            "refresh_rate" => Self::RefreshRate(number(args.next(), "refresh_rate")?),
            "auto_commit" => Self::AutoCommit(boolean(args.next())?),
            "num_leds" => Self::NumLeds(number(args.next(), "num_leds")?),
            _ => return Err(ParseCommandError::UnknownCommand),
        };

        match args.next() {
            Some(_) => Err(ParseCommandError::TrailingInput),
            None => Ok(cmd),
        }
    }
}

/// Parst ein mehrzeiliges Skript; leere Zeilen werden übersprungen
pub fn parse_script(
    script: &str,
) -> impl Iterator<Item = Result<StripCommand, ParseCommandError>> + '_ {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(StripCommand::try_from)
}

fn number<T: TryFrom<u64>>(arg: Option<&str>, name: &'static str) -> Result<T, ParseCommandError> {
    let arg = arg.ok_or(ParseCommandError::MissingArgument(name))?;

    // Wie kstrtouint mit Basis 0: Dezimal oder 0x-Hex
    let value = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => arg.parse::<u64>(),
    }
    .map_err(|_| ParseCommandError::InvalidNumber(name))?;

    T::try_from(value).map_err(|_| ParseCommandError::InvalidNumber(name))
}

fn color<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<Led, ParseCommandError> {
    Ok(RGB8 {
        r: number(args.next(), "r")?,
        g: number(args.next(), "g")?,
        b: number(args.next(), "b")?,
    })
}

fn boolean(arg: Option<&str>) -> Result<bool, ParseCommandError> {
    let arg = arg.ok_or(ParseCommandError::MissingArgument("auto_commit"))?;

    const TRUE: [&str; 5] = ["1", "y", "yes", "on", "true"];
    const FALSE: [&str; 5] = ["0", "n", "no", "off", "false"];

    if TRUE.iter().any(|t| arg.eq_ignore_ascii_case(t)) {
        Ok(true)
    } else if FALSE.iter().any(|f| arg.eq_ignore_ascii_case(f)) {
        Ok(false)
    } else {
        Err(ParseCommandError::InvalidBool)
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for StripCommand {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            StripCommand::Set { index, color } => {
                defmt::write!(
                    fmt,
                    "Set {{ index: {}, rgb: ({}, {}, {}) }}",
                    index,
                    color.r,
                    color.g,
                    color.b
                )
            }
            StripCommand::Fill(color) => {
                defmt::write!(fmt, "Fill {{ rgb: ({}, {}, {}) }}", color.r, color.g, color.b)
            }
            StripCommand::Clear => defmt::write!(fmt, "Clear"),
            StripCommand::Commit => defmt::write!(fmt, "Commit"),
            StripCommand::RefreshRate(ms) => defmt::write!(fmt, "RefreshRate({}ms)", ms),
            StripCommand::AutoCommit(on) => defmt::write!(fmt, "AutoCommit({})", on),
            StripCommand::NumLeds(n) => defmt::write!(fmt, "NumLeds({})", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let cmd = StripCommand::try_from("set 3 255 0 16").unwrap();
        assert_eq!(
            cmd,
            StripCommand::Set {
                index: 3,
                color: RGB8 { r: 255, g: 0, b: 16 }
            }
        );
    }

    #[test]
    fn test_parse_hex_refresh_rate() {
        let cmd = StripCommand::try_from("refresh_rate 0x10").unwrap();
        assert_eq!(cmd, StripCommand::RefreshRate(16));
    }

    #[test]
    fn test_parse_auto_commit_variants() {
        for on in ["1", "Y", "yes", "ON", "true"] {
            let line = format!("auto_commit {on}");
            assert_eq!(
                StripCommand::try_from(line.as_str()),
                Ok(StripCommand::AutoCommit(true))
            );
        }
        assert_eq!(
            StripCommand::try_from("auto_commit off"),
            Ok(StripCommand::AutoCommit(false))
        );
        assert_eq!(
            StripCommand::try_from("auto_commit maybe"),
            Err(ParseCommandError::InvalidBool)
        );
    }

    #[test]
    fn test_parse_color_out_of_range() {
        assert_eq!(
            StripCommand::try_from("full_on 256 0 0"),
            Err(ParseCommandError::InvalidNumber("r"))
        );
    }

    #[test]
    fn test_parse_missing_and_trailing() {
        assert_eq!(
            StripCommand::try_from("set 1 2 3"),
            Err(ParseCommandError::MissingArgument("b"))
        );
        assert_eq!(
            StripCommand::try_from("clear now"),
            Err(ParseCommandError::TrailingInput)
        );
        assert_eq!(
            StripCommand::try_from("blink"),
            Err(ParseCommandError::UnknownCommand)
        );
        assert_eq!(StripCommand::try_from("   "), Err(ParseCommandError::Empty));
    }

    #[test]
    fn test_parse_script_skips_blank_lines() {
        let cmds: Vec<_> = parse_script("clear\n\n  commit  \n").collect();
        assert_eq!(cmds, vec![Ok(StripCommand::Clear), Ok(StripCommand::Commit)]);
    }
}
