/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Executed-command records and their read-only snapshots.

use super::batch::BatchToken;
use super::command::{CommandDefinition, CommandPayload};

/// The stored result of one executed command invocation.
///
/// `options` plus the command's apply is enough to redo the invocation;
/// `revert_options` plus its revert is enough to undo it.
pub(crate) struct CommandRecord<C> {
    pub(crate) key: String,
    /// The command itself, not just its key: unregistering a command never
    /// invalidates history that already references it.
    pub(crate) command: CommandDefinition<C>,
    /// Forward options. Rewritten when a revert hands back fresh replay data.
    pub(crate) options: Box<dyn CommandPayload>,
    /// Captured on the original forward pass; authoritative thereafter.
    pub(crate) revert_options: Box<dyn CommandPayload>,
}

/// One undo/redo stack entry: a single invocation or a committed batch.
pub(crate) enum HistoryRecord<C> {
    Command(CommandRecord<C>),
    Batch {
        token: BatchToken,
        records: Vec<HistoryRecord<C>>,
    },
}

impl<C> HistoryRecord<C> {
    /// Deep-copied snapshot for external inspection.
    pub(crate) fn snapshot(&self) -> RecordSnapshot {
        match self {
            HistoryRecord::Command(record) => RecordSnapshot::Command {
                key: record.key.clone(),
                options: record.options.clone(),
                revert_options: record.revert_options.clone(),
            },
            HistoryRecord::Batch { token, records } => RecordSnapshot::Batch {
                token: *token,
                records: records.iter().map(HistoryRecord::snapshot).collect(),
            },
        }
    }
}

/// Read-only, deeply cloned view of a stack entry.
#[derive(Debug, Clone)]
pub enum RecordSnapshot {
    Command {
        key: String,
        options: Box<dyn CommandPayload>,
        revert_options: Box<dyn CommandPayload>,
    },
    Batch {
        token: BatchToken,
        records: Vec<RecordSnapshot>,
    },
}

impl RecordSnapshot {
    /// Command key for a single record, `None` for a batch.
    pub fn key(&self) -> Option<&str> {
        match self {
            RecordSnapshot::Command { key, .. } => Some(key),
            RecordSnapshot::Batch { .. } => None,
        }
    }

    /// Number of direct sub-records (1 for a single command).
    pub fn len(&self) -> usize {
        match self {
            RecordSnapshot::Command { .. } => 1,
            RecordSnapshot::Batch { records, .. } => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
