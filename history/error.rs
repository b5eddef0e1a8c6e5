/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Error taxonomy for the history engine.

use super::batch::BatchToken;

/// Errors from the history engine.
///
/// All of these report contract violations: operations are synchronous and
/// in-memory, so they either succeed deterministically or fail here. There
/// are no retryable conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// A command is already registered under this key.
    DuplicateCommand(String),
    /// No command is registered under this key.
    UnknownCommand(String),
    /// An apply/revert function called back into the engine while its own
    /// invocation was still in flight.
    ReentrantExecution,
    /// `stop_batch` was called with a token that is not the innermost open
    /// batch. Batches must close in reverse order of opening.
    BatchMismatch {
        expected: BatchToken,
        found: BatchToken,
    },
    /// `stop_batch` was called while no batch was open.
    NoOpenBatch,
    /// Options passed to a command did not match its registered payload type.
    PayloadType {
        key: String,
        expected: &'static str,
    },
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::DuplicateCommand(key) => {
                write!(f, "command '{key}' is already registered")
            },
            HistoryError::UnknownCommand(key) => {
                write!(f, "no command registered under '{key}'")
            },
            HistoryError::ReentrantExecution => {
                write!(f, "re-entrant history operation from within an active apply/revert")
            },
            HistoryError::BatchMismatch { expected, found } => {
                write!(f, "stop_batch token mismatch: innermost batch is {expected}, got {found}")
            },
            HistoryError::NoOpenBatch => write!(f, "stop_batch called with no batch open"),
            HistoryError::PayloadType { key, expected } => {
                write!(f, "payload for command '{key}' is not a {expected}")
            },
        }
    }
}

impl std::error::Error for HistoryError {}
