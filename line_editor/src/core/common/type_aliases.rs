// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, MutexGuard, PoisonError};

/// Disambiguate the type of `StdMutex` from any async mutex a host application uses.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Shared, lockable value. The line reader keeps its display (renderer and last painted
/// frame) behind one of these, so that a resize watcher or a "print above the prompt"
/// call from another thread takes the same lock as the reading thread when it paints.
pub type Safe<T> = Arc<StdMutex<T>>;

/// Lock a [`StdMutex`] even if a panicking thread poisoned it. Only used by callers that
/// repaint or print, where a half-updated state is still better than losing output.
pub fn lock_ignoring_poison<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
