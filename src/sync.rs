//! Locking helpers for the gateway.

/// A mutex that keeps working after a panic while it was held.
///
/// Table operations validate before they mutate, so a poisoned table is
/// still consistent and can be used as is.
#[derive(Debug, Default)]
pub struct Mutex<T>(std::sync::Mutex<T>);

impl<T> Mutex<T> {
    pub const fn new(value: T) -> Self {
        Self(std::sync::Mutex::new(value))
    }

    pub fn lock(&self) -> std::sync::MutexGuard<'_, T> {
        self.0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
