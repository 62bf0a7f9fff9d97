//! Integration Tests für die textuelle Steuerung

mod common;

use common::*;
use rgb::RGB8;
use ws2801_core::{BLANK, ParseCommandError};
use ws2801_driver::{ConfigError, Error, ScriptError, StripCommand, execute, run_script};

// ============================================================================
// Tests: execute()
// ============================================================================

#[test]
fn test_execute_set_and_commit() {
    let (driver, lines) = driver(&config(3));

    execute(
        &driver,
        StripCommand::Set {
            index: 2,
            color: BLUE,
        },
    )
    .unwrap();
    execute(&driver, StripCommand::Commit).unwrap();

    assert_eq!(lines.commits(), [frame(&[BLANK, BLANK, BLUE])]);
}

#[test]
fn test_execute_out_of_range() {
    let (driver, _lines) = driver(&config(3));

    let result = execute(
        &driver,
        StripCommand::Set {
            index: 7,
            color: RED,
        },
    );

    assert_eq!(result, Err(Error::Range { index: 7, len: 3 }));
}

#[test]
fn test_execute_settings() {
    let (driver, _lines) = driver(&config(3));

    execute(&driver, StripCommand::AutoCommit(true)).unwrap();
    execute(&driver, StripCommand::NumLeds(5)).unwrap();
    execute(&driver, StripCommand::RefreshRate(60_000)).unwrap();

    assert!(driver.auto_commit());
    assert_eq!(driver.num_leds(), 5);
    assert_eq!(driver.refresh_rate(), 60_000);
    assert!(driver.refresh_running());

    execute(&driver, StripCommand::RefreshRate(0)).unwrap();
    assert!(!driver.refresh_running());
}

// ============================================================================
// Tests: run_script()
// ============================================================================

#[test]
fn test_run_script() {
    let (driver, lines) = driver(&config(3));
    let script = "\
        full_on 10 20 30\n\
        set 1 0xff 0 0\n\
        \n\
        commit\n";

    let executed = run_script(&driver, script).unwrap();

    let dim = RGB8 { r: 10, g: 20, b: 30 };
    assert_eq!(executed, 3);
    assert_eq!(lines.commits(), [frame(&[dim, RED, dim])]);
}

#[test]
fn test_run_script_auto_commit() {
    let (driver, lines) = driver(&config(2));

    run_script(&driver, "auto_commit 1\nset 0 0 255 0\nclear\n").unwrap();

    assert_eq!(
        lines.commits(),
        [frame(&[GREEN, BLANK]), frame(&[BLANK, BLANK])]
    );
}

#[test]
fn test_run_script_parse_error_executes_nothing() {
    let (driver, lines) = driver(&config(2));

    let result = run_script(&driver, "set 0 255 0 0\ncommit\nblink 3\n");

    assert_eq!(
        result,
        Err(ScriptError::Parse {
            command: 3,
            source: ParseCommandError::UnknownCommand,
        })
    );
    assert_eq!(driver.leds(), [BLANK; 2]);
    assert_eq!(lines.commit_count(), 0);
}

#[test]
fn test_run_script_stops_at_failing_command() {
    let (driver, lines) = driver(&config(2));

    let result = run_script(&driver, "set 0 255 0 0\nnum_leds 0\ncommit\n");

    assert_eq!(
        result,
        Err(ScriptError::Strip {
            command: 2,
            source: Error::Config(ConfigError::EmptyStrip),
        })
    );
    // Kommando 1 wurde ausgeführt, Kommando 3 nicht mehr
    assert_eq!(driver.leds(), [RED, BLANK]);
    assert_eq!(lines.commit_count(), 0);
}

#[test]
fn test_run_script_error_message() {
    let (driver, _lines) = driver(&config(2));

    let err = run_script(&driver, "set 5 1 2 3").unwrap_err();

    assert_eq!(
        err.to_string(),
        "command 1: LED index 5 out of range (strip has 2 LEDs)"
    );
}

#[test]
fn test_run_empty_script() {
    let (driver, lines) = driver(&config(2));

    assert_eq!(run_script(&driver, "\n  \n"), Ok(0));
    assert_eq!(lines.commit_count(), 0);
}
