// Refresh Scheduler - optionaler Hintergrund-Task
//
// Zustände: Stopped (Rate 0, kein Task) und Running(Rate, genau ein Task).
// Übergänge laufen nur über `set_rate`. Der Control-Lock serialisiert die
// Übergänge untereinander; Rate und Weck-Zähler ändern sich nur unter dem
// Data-Lock. Lock-Reihenfolge: Control → Data, niemals umgekehrt.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};
use ws2801_core::{LineController, ResourceError, Result};

use crate::config::REFRESH_THREAD_NAME;
use crate::driver::Shared;
use crate::sync::lock;

pub(crate) struct RefreshScheduler {
    task: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl RefreshScheduler {
    pub(crate) fn new() -> Self {
        Self {
            task: Mutex::new(None),
        }
    }

    /// Übergang Stopped ↔ Running bzw. neues Intervall
    ///
    /// - Stopped → Running(n): Task starten; bei Fehler bleibt es Stopped
    /// - Running → Running(n): Intervall setzen und Task sofort wecken
    /// - Running → Stopped: Task wecken und joinen, bevor die Methode zurückkehrt
    ///
    /// Ist der Task seit dem letzten Aufruf an einem Hardware-Fehler gestorben,
    /// wird das erkannt, der Scheduler auf Stopped gesetzt und der Fehler des
    /// Tasks zurückgegeben.
    pub(crate) fn set_rate<L>(&self, shared: &Arc<Shared<L>>, refresh_rate_ms: u32) -> Result<()>
    where
        L: LineController + 'static,
    {
        let mut task = lock(&self.task);

        if task.as_ref().is_some_and(JoinHandle::is_finished) {
            lock(&shared.data).refresh_rate_ms = 0;
            let result = join(task.take());
            warn!("refresh task had already exited, scheduler reset to stopped");
            result?;
        }

        let mut state = lock(&shared.data);
        let old = state.refresh_rate_ms;

        if old == refresh_rate_ms {
            return Ok(());
        }

        state.refresh_rate_ms = refresh_rate_ms;

        if old == 0 {
            let worker = Arc::clone(shared);
            let spawned = thread::Builder::new()
                .name(REFRESH_THREAD_NAME.into())
                .spawn(move || refresh_loop(&worker));

            match spawned {
                Ok(handle) => {
                    *task = Some(handle);
                    info!(refresh_rate_ms, "refresh task started");
                    Ok(())
                }
                Err(err) => {
                    state.refresh_rate_ms = 0;
                    error!(%err, "cannot spawn refresh task");
                    Err(ResourceError::Spawn.into())
                }
            }
        } else if refresh_rate_ms == 0 {
            state.wakeups = state.wakeups.wrapping_add(1);
            drop(state);
            shared.wake.notify_all();

            // Join ohne Data-Lock: der Task braucht ihn, um Rate 0 zu sehen
            let result = join(task.take());
            info!("refresh task stopped");
            if let Err(err) = result {
                // Der Task ist gestorben bevor er Rate 0 sehen konnte; gestoppt ist er trotzdem
                warn!(%err, "refresh task had failed before stop");
            }
            Ok(())
        } else {
            state.wakeups = state.wakeups.wrapping_add(1);
            drop(state);
            shared.wake.notify_all();
            debug!(old, refresh_rate_ms, "refresh rate changed");
            Ok(())
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        lock(&self.task)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Joint den Task und liefert dessen Ergebnis
fn join(task: Option<JoinHandle<Result<()>>>) -> Result<()> {
    let Some(handle) = task else {
        return Ok(());
    };

    match handle.join() {
        Ok(result) => result,
        Err(_) => {
            error!("refresh task panicked");
            Err(ResourceError::Join.into())
        }
    }
}

/// Hintergrund-Schleife
///
/// Wartet mit Timeout = Intervall auf das Wecksignal. Timeout → Commit eines
/// Snapshots. Explizites Wecken → Intervall neu lesen (kann 0 geworden sein).
fn refresh_loop<L: LineController>(shared: &Shared<L>) -> Result<()> {
    let mut state = lock(&shared.data);

    loop {
        let refresh_rate_ms = state.refresh_rate_ms;
        if refresh_rate_ms == 0 {
            break;
        }

        let seen = state.wakeups;
        let (guard, timeout) = shared
            .wake
            .wait_timeout_while(
                state,
                Duration::from_millis(refresh_rate_ms.into()),
                |state| state.wakeups == seen,
            )
            .unwrap_or_else(PoisonError::into_inner);
        state = guard;

        if !timeout.timed_out() {
            continue;
        }

        let snapshot = state.leds.snapshot();
        drop(state);

        if let Err(err) = shared.engine.commit(&snapshot) {
            error!(%err, "refresh task terminated by hardware failure");
            return Err(err);
        }

        state = lock(&shared.data);
    }

    debug!("refresh task exiting");
    Ok(())
}
