use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock ohne Panic bei Poisoning
///
/// Geschützt sind nur Farbwerte und Zähler, die nie halb geschrieben werden.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
