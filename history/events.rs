/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Lifecycle event bus for history observers.
//!
//! Consumers (a "can undo" toolbar indicator, autosave, diagnostics)
//! subscribe per event kind and recompute derived state when notified. The
//! engine holds no UI state itself.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::batch::BatchToken;

/// Whether a change ran a command forward or backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Apply,
    Revert,
}

/// A history lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// About to run one command invocation (forward or backward, single or
    /// inside a batch walk).
    BeforeChange {
        key: String,
        direction: ChangeDirection,
    },
    /// One command invocation finished.
    Change {
        key: String,
        direction: ChangeDirection,
    },
    BeforeUndo,
    /// A top-level undo step completed.
    Undo,
    BeforeRedo,
    /// A top-level redo step completed.
    Redo,
    RegisterCommand { key: String },
    UnregisterCommand { key: String },
    BatchStarted { token: BatchToken },
    /// A non-empty batch closed and was pushed as one record.
    BatchCommitted { token: BatchToken, len: usize },
    /// An empty batch closed and produced no record.
    BatchDiscarded { token: BatchToken },
}

impl HistoryEvent {
    pub fn kind(&self) -> HistoryEventKind {
        match self {
            HistoryEvent::BeforeChange { .. } => HistoryEventKind::BeforeChange,
            HistoryEvent::Change { .. } => HistoryEventKind::Change,
            HistoryEvent::BeforeUndo => HistoryEventKind::BeforeUndo,
            HistoryEvent::Undo => HistoryEventKind::Undo,
            HistoryEvent::BeforeRedo => HistoryEventKind::BeforeRedo,
            HistoryEvent::Redo => HistoryEventKind::Redo,
            HistoryEvent::RegisterCommand { .. } => HistoryEventKind::RegisterCommand,
            HistoryEvent::UnregisterCommand { .. } => HistoryEventKind::UnregisterCommand,
            HistoryEvent::BatchStarted { .. } => HistoryEventKind::BatchStarted,
            HistoryEvent::BatchCommitted { .. } => HistoryEventKind::BatchCommitted,
            HistoryEvent::BatchDiscarded { .. } => HistoryEventKind::BatchDiscarded,
        }
    }
}

/// Subscription key: handlers attach to one kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryEventKind {
    BeforeChange,
    Change,
    BeforeUndo,
    Undo,
    BeforeRedo,
    Redo,
    RegisterCommand,
    UnregisterCommand,
    BatchStarted,
    BatchCommitted,
    BatchDiscarded,
}

/// Handle returned by `on`, used to detach the handler again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler = Rc<RefCell<dyn FnMut(&HistoryEvent)>>;

#[derive(Default)]
pub(crate) struct EventBus {
    handlers: RefCell<HashMap<HistoryEventKind, Vec<(HandlerId, Handler)>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub(crate) fn on(
        &self,
        kind: HistoryEventKind,
        handler: impl FnMut(&HistoryEvent) + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.handlers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    pub(crate) fn off(&self, kind: HistoryEventKind, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(list) = handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        before != list.len()
    }

    pub(crate) fn emit(&self, event: &HistoryEvent) {
        // Snapshot the handler list so handlers may subscribe/unsubscribe
        // while the bus is mid-emit.
        let list: Vec<Handler> = {
            let handlers = self.handlers.borrow();
            match handlers.get(&event.kind()) {
                Some(list) => list.iter().map(|(_, handler)| Rc::clone(handler)).collect(),
                None => return,
            }
        };
        for handler in list {
            // A handler whose own callback triggers further events must not
            // re-enter itself; skip it for the nested emission.
            if let Ok(mut handler) = handler.try_borrow_mut() {
                handler(event);
            }
        }
    }
}
