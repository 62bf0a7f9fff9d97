// Commit Engine - serialisiert alle Hardware-Zugriffe
//
// Der Commit-Lock besitzt das Leitungs-Handle selbst: wer überträgt,
// hält den Lock, und niemand kann das Handle freigeben, während ein
// Frame unterwegs ist. Der Data-Lock wird hier nie angefasst.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::{debug, error};
use ws2801_core::{BLANK, Error, LATCH_SETTLE_US, Led, LineController, Result, send_frame};

use crate::sync::lock;

enum Output<L> {
    Active(L),
    /// Nach einem Hardware-Fehler stillgelegt
    Failed,
    /// Bei der Freigabe abgegeben
    Released,
}

pub(crate) struct CommitEngine<L> {
    output: Mutex<Output<L>>,
    settle: Duration,
}

impl<L: LineController> CommitEngine<L> {
    pub(crate) fn new(lines: L) -> Self {
        Self {
            output: Mutex::new(Output::Active(lines)),
            settle: Duration::from_micros(LATCH_SETTLE_US),
        }
    }

    /// Überträgt einen Snapshot, setzt den Latch und wartet die Settle-Zeit ab
    ///
    /// Ein laufender Commit wird nie abgebrochen. Der erste Schreibfehler legt
    /// den Ausgabepfad still; alle weiteren Commits liefern `OutputTerminated`.
    pub(crate) fn commit(&self, leds: &[Led]) -> Result<()> {
        let mut output = lock(&self.output);

        let Output::Active(lines) = &mut *output else {
            return Err(Error::OutputTerminated);
        };

        if let Err(err) = send_frame(lines, leds) {
            error!(%err, num_leds = leds.len(), "line write failed during commit, output terminated");
            *output = Output::Failed;
            return Err(Error::HardwareIo(err));
        }

        thread::sleep(self.settle);
        debug!(num_leds = leds.len(), "frame committed");
        Ok(())
    }

    /// Schaltet den Strip dunkel und gibt das Leitungs-Handle frei
    ///
    /// Läuft unter dem Commit-Lock: ein Commit, der gerade überträgt,
    /// wird zuerst zu Ende gebracht.
    pub(crate) fn release(&self, num_leds: usize) -> Result<()> {
        let mut output = lock(&self.output);

        let result = match &mut *output {
            Output::Active(lines) => {
                let blank = vec![BLANK; num_leds];
                match send_frame(lines, &blank) {
                    Ok(()) => {
                        thread::sleep(self.settle);
                        Ok(())
                    }
                    Err(err) => Err(Error::HardwareIo(err)),
                }
            }
            Output::Failed | Output::Released => Ok(()),
        };

        // Handle wird hier gedroppt, noch unter dem Lock
        *output = Output::Released;
        result
    }

    pub(crate) fn is_released(&self) -> bool {
        matches!(*lock(&self.output), Output::Released)
    }

    pub(crate) fn is_failed(&self) -> bool {
        matches!(*lock(&self.output), Output::Failed)
    }
}
