/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Batch identity and the open-batch bookkeeping.
//!
//! A batch groups several executed commands into one atomic undo/redo unit.
//! Only the innermost open batch receives pushes; batches must close in
//! reverse order of opening.

use std::fmt;

use uuid::Uuid;

use super::record::HistoryRecord;

/// Opaque identity of one batch, minted by the caller that opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchToken(Uuid);

impl BatchToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch:{}", self.0)
    }
}

/// An in-progress batch accumulating records until its `stop_batch`.
pub(crate) struct OpenBatch<C> {
    pub(crate) token: BatchToken,
    pub(crate) records: Vec<HistoryRecord<C>>,
}
