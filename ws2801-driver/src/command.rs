// Textuelle Steuerung: übersetzt StripCommands in LedStrip-Aufrufe
//
// Dünner Adapter wie die Sysfs-Attribute der Kernel-Variante.

use tracing::debug;
use ws2801_core::{Error, LedStrip, ParseCommandError, StripCommand, parse_script};

/// Führt ein einzelnes Kommando aus
pub fn execute<S: LedStrip + ?Sized>(strip: &S, cmd: StripCommand) -> Result<(), Error> {
    debug!(?cmd, "executing command");

    match cmd {
        StripCommand::Set { index, color } => strip.set_led(index, color),
        StripCommand::Fill(color) => strip.fill(color),
        StripCommand::Clear => strip.clear(),
        StripCommand::Commit => strip.commit(),
        StripCommand::RefreshRate(ms) => strip.set_refresh_rate(ms),
        StripCommand::AutoCommit(on) => {
            strip.set_auto_commit(on);
            Ok(())
        }
        StripCommand::NumLeds(n) => strip.resize(n),
    }
}

/// Fehler beim Ausführen eines Skripts; `command` zählt die Kommandos ab 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("command {command}: {source}")]
    Parse {
        command: usize,
        source: ParseCommandError,
    },
    #[error("command {command}: {source}")]
    Strip { command: usize, source: Error },
}

/// Parst das komplette Skript und führt es dann aus
///
/// Bei einem Parse-Fehler wird nichts ausgeführt. Die Ausführung stoppt beim
/// ersten fehlgeschlagenen Kommando. Gibt die Anzahl der Kommandos zurück.
pub fn run_script<S: LedStrip + ?Sized>(strip: &S, script: &str) -> Result<usize, ScriptError> {
    let commands = parse_script(script)
        .enumerate()
        .map(|(i, parsed)| {
            parsed.map_err(|source| ScriptError::Parse {
                command: i + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (i, cmd) in commands.iter().enumerate() {
        execute(strip, *cmd).map_err(|source| ScriptError::Strip {
            command: i + 1,
            source,
        })?;
    }

    Ok(commands.len())
}
