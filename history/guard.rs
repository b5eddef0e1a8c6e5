/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Re-entrancy guard around command execution.
//!
//! The engine is single-threaded; the guard rejects logical re-entrancy (a
//! command handler calling back into the engine), it does not arbitrate
//! threads.

use std::cell::Cell;

use super::error::HistoryError;

/// Flag set exactly while an apply or revert function is running.
#[derive(Debug, Default)]
pub(crate) struct ExecutionGuard {
    executing: Cell<bool>,
}

impl ExecutionGuard {
    pub(crate) fn is_held(&self) -> bool {
        self.executing.get()
    }

    /// Acquire the guard for the lifetime of the returned scope.
    ///
    /// Fails if an apply/revert is already in flight. The scope releases the
    /// flag on drop, so unwinding out of a command never leaves the engine
    /// locked.
    pub(crate) fn enter(&self) -> Result<GuardScope<'_>, HistoryError> {
        if self.executing.get() {
            return Err(HistoryError::ReentrantExecution);
        }
        self.executing.set(true);
        Ok(GuardScope { guard: self })
    }
}

pub(crate) struct GuardScope<'a> {
    guard: &'a ExecutionGuard,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.guard.executing.set(false);
    }
}
