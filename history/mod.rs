/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Generic command-based undo/redo history engine.
//!
//! One `History` instance per open document. Commands are registered once
//! as `(apply, revert)` pairs keyed by string; `execute` runs apply,
//! captures the returned revert options, and records the invocation for a
//! later `undo`/`redo`. Batches group several invocations into one atomic
//! undo unit, nesting strictly LIFO. Observers subscribe to lifecycle
//! events on the bus.
//!
//! The engine is generic over a context type `C` (the document being
//! edited); command functions receive `&mut C`, so the engine itself holds
//! no document state. History is ephemeral: it lives and dies with the
//! engine instance.

mod batch;
mod command;
mod error;
mod events;
mod guard;
mod record;

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;

pub use batch::BatchToken;
use batch::OpenBatch;
pub use command::{CommandDefinition, CommandPayload};
pub use error::HistoryError;
use events::EventBus;
pub use events::{ChangeDirection, HandlerId, HistoryEvent, HistoryEventKind};
use guard::ExecutionGuard;
use record::{CommandRecord, HistoryRecord};
pub use record::RecordSnapshot;

/// Default cap on retained undo steps.
pub const DEFAULT_HISTORY_LIMIT: NonZeroUsize = NonZeroUsize::new(128).unwrap();

/// What `execute` does when no command is registered under the key.
///
/// The lenient variants tolerate setup races where callers fire commands
/// before async registration finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCommandPolicy {
    /// Silently ignore the call.
    Ignore,
    /// Ignore the call, logging a warning.
    #[default]
    Warn,
    /// Fail with [`HistoryError::UnknownCommand`].
    Fail,
}

/// Command-based undo/redo history for one editing context.
pub struct History<C> {
    commands: RefCell<HashMap<String, CommandDefinition<C>>>,
    undo_stack: RefCell<Vec<HistoryRecord<C>>>,
    redo_stack: RefCell<Vec<HistoryRecord<C>>>,
    open_batches: RefCell<Vec<OpenBatch<C>>>,
    guard: ExecutionGuard,
    events: EventBus,
    missing_command_policy: Cell<MissingCommandPolicy>,
    history_limit: Cell<NonZeroUsize>,
}

impl<C> Default for History<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> History<C> {
    pub fn new() -> Self {
        Self {
            commands: RefCell::new(HashMap::new()),
            undo_stack: RefCell::new(Vec::new()),
            redo_stack: RefCell::new(Vec::new()),
            open_batches: RefCell::new(Vec::new()),
            guard: ExecutionGuard::default(),
            events: EventBus::default(),
            missing_command_policy: Cell::new(MissingCommandPolicy::default()),
            history_limit: Cell::new(DEFAULT_HISTORY_LIMIT),
        }
    }

    // ===== Configuration =====

    pub fn missing_command_policy(&self) -> MissingCommandPolicy {
        self.missing_command_policy.get()
    }

    pub fn set_missing_command_policy(&self, policy: MissingCommandPolicy) {
        self.missing_command_policy.set(policy);
    }

    pub fn history_limit(&self) -> NonZeroUsize {
        self.history_limit.get()
    }

    /// Cap the undo stack, trimming oldest entries immediately if needed.
    pub fn set_history_limit(&self, limit: NonZeroUsize) {
        self.history_limit.set(limit);
        let mut undo_stack = self.undo_stack.borrow_mut();
        if undo_stack.len() > limit.get() {
            let excess = undo_stack.len() - limit.get();
            undo_stack.drain(0..excess);
        }
    }

    // ===== Event subscription =====

    /// Attach a handler for one kind of lifecycle event.
    pub fn on(
        &self,
        kind: HistoryEventKind,
        handler: impl FnMut(&HistoryEvent) + 'static,
    ) -> HandlerId {
        self.events.on(kind, handler)
    }

    /// Detach a handler. Returns whether anything was removed.
    pub fn off(&self, kind: HistoryEventKind, id: HandlerId) -> bool {
        self.events.off(kind, id)
    }

    // ===== Command registry =====

    /// Register a typed command under a unique key.
    ///
    /// `apply` performs the forward mutation and returns revert options;
    /// `revert` undoes it and may return fresh forward options for redo.
    /// Fails if the key is taken: commands are immutable for the lifetime
    /// of their registry entry.
    pub fn register_command<O, R>(
        &self,
        key: &str,
        apply: impl Fn(&mut C, &O) -> R + 'static,
        revert: impl Fn(&mut C, &R) -> Option<O> + 'static,
    ) -> Result<(), HistoryError>
    where
        O: Any + Clone + fmt::Debug,
        R: Any + Clone + fmt::Debug,
    {
        self.register_command_definition(key, CommandDefinition::new(key, apply, revert))
    }

    /// Register a pre-built definition, e.g. one handed back by
    /// [`History::unregister_command`].
    pub fn register_command_definition(
        &self,
        key: &str,
        definition: CommandDefinition<C>,
    ) -> Result<(), HistoryError> {
        if self.guard.is_held() {
            return Err(HistoryError::ReentrantExecution);
        }
        {
            let mut commands = self.commands.borrow_mut();
            if commands.contains_key(key) {
                return Err(HistoryError::DuplicateCommand(key.to_string()));
            }
            commands.insert(key.to_string(), definition);
        }
        self.events.emit(&HistoryEvent::RegisterCommand {
            key: key.to_string(),
        });
        Ok(())
    }

    /// Remove a command, transferring its definition back to the caller.
    ///
    /// Recorded history referencing the command stays undoable/redoable.
    pub fn unregister_command(&self, key: &str) -> Result<CommandDefinition<C>, HistoryError> {
        if self.guard.is_held() {
            return Err(HistoryError::ReentrantExecution);
        }
        let removed = self
            .commands
            .borrow_mut()
            .remove(key)
            .ok_or_else(|| HistoryError::UnknownCommand(key.to_string()))?;
        self.events.emit(&HistoryEvent::UnregisterCommand {
            key: key.to_string(),
        });
        Ok(removed)
    }

    // ===== Execution =====

    /// Run a command forward and record it for undo.
    ///
    /// The record lands in the innermost open batch, or directly on the
    /// undo stack (clearing redo history, standard linear-history
    /// semantics). An unknown key follows the configured
    /// [`MissingCommandPolicy`].
    pub fn execute<O>(&self, ctx: &mut C, key: &str, options: O) -> Result<(), HistoryError>
    where
        O: Any + Clone + fmt::Debug,
    {
        if self.guard.is_held() {
            return Err(HistoryError::ReentrantExecution);
        }
        self.events.emit(&HistoryEvent::BeforeChange {
            key: key.to_string(),
            direction: ChangeDirection::Apply,
        });

        let command = self.commands.borrow().get(key).cloned();
        let Some(command) = command else {
            return match self.missing_command_policy.get() {
                MissingCommandPolicy::Ignore => Ok(()),
                MissingCommandPolicy::Warn => {
                    log::warn!("execute ignored: no command registered under '{key}'");
                    Ok(())
                },
                MissingCommandPolicy::Fail => Err(HistoryError::UnknownCommand(key.to_string())),
            };
        };

        let options: Box<dyn CommandPayload> = Box::new(options);
        let revert_options = {
            let _scope = self.guard.enter()?;
            (command.apply)(ctx, options.as_ref())?
        };

        self.push_record(HistoryRecord::Command(CommandRecord {
            key: key.to_string(),
            command,
            options,
            revert_options,
        }));
        self.events.emit(&HistoryEvent::Change {
            key: key.to_string(),
            direction: ChangeDirection::Apply,
        });
        Ok(())
    }

    /// Undo the most recent record. Returns whether a step was taken.
    ///
    /// Batches revert their contents in reverse order: last applied, first
    /// undone. A revert returning fresh forward options rewrites the
    /// record, so the following redo replays with corrected data.
    pub fn undo(&self, ctx: &mut C) -> bool {
        if self.guard.is_held() || self.undo_stack.borrow().is_empty() {
            return false;
        }
        self.events.emit(&HistoryEvent::BeforeUndo);
        let record = self.undo_stack.borrow_mut().pop();
        let Some(mut record) = record else {
            // A BeforeUndo handler drained the stack.
            return false;
        };
        self.revert_record(ctx, &mut record);
        self.redo_stack.borrow_mut().push(record);
        self.events.emit(&HistoryEvent::Undo);
        true
    }

    /// Redo the most recently undone record. Returns whether a step was
    /// taken.
    ///
    /// Batches replay in original order. Apply's return value is ignored
    /// here: the revert options captured on the original forward pass stay
    /// authoritative.
    pub fn redo(&self, ctx: &mut C) -> bool {
        if self.guard.is_held() || self.redo_stack.borrow().is_empty() {
            return false;
        }
        self.events.emit(&HistoryEvent::BeforeRedo);
        let record = self.redo_stack.borrow_mut().pop();
        let Some(record) = record else {
            return false;
        };
        self.apply_record(ctx, &record);
        self.undo_stack.borrow_mut().push(record);
        self.events.emit(&HistoryEvent::Redo);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.guard.is_held() && !self.undo_stack.borrow().is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.guard.is_held() && !self.redo_stack.borrow().is_empty()
    }

    fn revert_record(&self, ctx: &mut C, record: &mut HistoryRecord<C>) {
        match record {
            HistoryRecord::Batch { records, .. } => {
                for sub in records.iter_mut().rev() {
                    self.revert_record(ctx, sub);
                }
            },
            HistoryRecord::Command(record) => {
                self.events.emit(&HistoryEvent::BeforeChange {
                    key: record.key.clone(),
                    direction: ChangeDirection::Revert,
                });
                let result = match self.guard.enter() {
                    Ok(_scope) => (record.command.revert)(ctx, record.revert_options.as_ref()),
                    Err(error) => Err(error),
                };
                match result {
                    Ok(Some(new_options)) => record.options = new_options,
                    Ok(None) => {},
                    // Unreachable for records built by `execute`, which
                    // checks payload types up front.
                    Err(error) => log::error!("revert of '{}' failed: {error}", record.key),
                }
                self.events.emit(&HistoryEvent::Change {
                    key: record.key.clone(),
                    direction: ChangeDirection::Revert,
                });
            },
        }
    }

    fn apply_record(&self, ctx: &mut C, record: &HistoryRecord<C>) {
        match record {
            HistoryRecord::Batch { records, .. } => {
                for sub in records {
                    self.apply_record(ctx, sub);
                }
            },
            HistoryRecord::Command(record) => {
                self.events.emit(&HistoryEvent::BeforeChange {
                    key: record.key.clone(),
                    direction: ChangeDirection::Apply,
                });
                let result = match self.guard.enter() {
                    Ok(_scope) => (record.command.apply)(ctx, record.options.as_ref()).map(|_| ()),
                    Err(error) => Err(error),
                };
                if let Err(error) = result {
                    log::error!("replay of '{}' failed: {error}", record.key);
                }
                self.events.emit(&HistoryEvent::Change {
                    key: record.key.clone(),
                    direction: ChangeDirection::Apply,
                });
            },
        }
    }

    fn push_record(&self, record: HistoryRecord<C>) {
        {
            let mut open_batches = self.open_batches.borrow_mut();
            if let Some(innermost) = open_batches.last_mut() {
                innermost.records.push(record);
                return;
            }
        }
        self.push_undo(record);
    }

    fn push_undo(&self, record: HistoryRecord<C>) {
        self.redo_stack.borrow_mut().clear();
        let mut undo_stack = self.undo_stack.borrow_mut();
        undo_stack.push(record);
        let limit = self.history_limit.get().get();
        if undo_stack.len() > limit {
            let excess = undo_stack.len() - limit;
            undo_stack.drain(0..excess);
        }
    }

    // ===== Batching =====

    /// Open a batch; subsequent executes accumulate into it until the
    /// matching [`History::stop_batch`].
    pub fn start_batch(&self, token: BatchToken) -> Result<(), HistoryError> {
        if self.guard.is_held() {
            return Err(HistoryError::ReentrantExecution);
        }
        self.open_batches.borrow_mut().push(OpenBatch {
            token,
            records: Vec::new(),
        });
        self.events.emit(&HistoryEvent::BatchStarted { token });
        Ok(())
    }

    /// Close the innermost batch.
    ///
    /// Fails without touching the batch stack if `token` is not the
    /// innermost open batch. A non-empty batch becomes one record in the
    /// parent batch or on the undo stack; an empty batch is discarded.
    pub fn stop_batch(&self, token: BatchToken) -> Result<(), HistoryError> {
        if self.guard.is_held() {
            return Err(HistoryError::ReentrantExecution);
        }
        let closed = {
            let mut open_batches = self.open_batches.borrow_mut();
            match open_batches.last() {
                None => return Err(HistoryError::NoOpenBatch),
                Some(innermost) if innermost.token != token => {
                    return Err(HistoryError::BatchMismatch {
                        expected: innermost.token,
                        found: token,
                    });
                },
                Some(_) => {},
            }
            match open_batches.pop() {
                Some(closed) => closed,
                None => return Err(HistoryError::NoOpenBatch),
            }
        };

        if closed.records.is_empty() {
            self.events.emit(&HistoryEvent::BatchDiscarded { token });
            return Ok(());
        }
        let len = closed.records.len();
        self.push_record(HistoryRecord::Batch {
            token,
            records: closed.records,
        });
        self.events.emit(&HistoryEvent::BatchCommitted { token, len });
        Ok(())
    }

    /// Run `action` inside a batch, closing it on every exit path
    /// (including unwind).
    pub fn execute_batch<T>(
        &self,
        ctx: &mut C,
        token: BatchToken,
        action: impl FnOnce(&Self, &mut C) -> T,
    ) -> Result<T, HistoryError> {
        self.start_batch(token)?;
        let scope = BatchScope {
            history: self,
            token,
            armed: true,
        };
        let value = action(self, ctx);
        scope.commit()?;
        Ok(value)
    }

    /// Async variant of [`History::execute_batch`]: the batch stays open
    /// until the future settles. The engine itself never suspends; only
    /// the close is deferred.
    pub async fn execute_async_batch<T>(
        &self,
        token: BatchToken,
        action: impl Future<Output = T>,
    ) -> Result<T, HistoryError> {
        self.start_batch(token)?;
        let scope = BatchScope {
            history: self,
            token,
            armed: true,
        };
        let value = action.await;
        scope.commit()?;
        Ok(value)
    }

    // ===== Introspection =====

    /// Registered command keys, sorted.
    pub fn command_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.commands.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn undo_stack_len(&self) -> usize {
        self.undo_stack.borrow().len()
    }

    pub fn redo_stack_len(&self) -> usize {
        self.redo_stack.borrow().len()
    }

    /// Deep-copied view of the undo stack, oldest first.
    pub fn undo_stack_snapshot(&self) -> Vec<RecordSnapshot> {
        self.undo_stack
            .borrow()
            .iter()
            .map(HistoryRecord::snapshot)
            .collect()
    }

    /// Deep-copied view of the redo stack, oldest first.
    pub fn redo_stack_snapshot(&self) -> Vec<RecordSnapshot> {
        self.redo_stack
            .borrow()
            .iter()
            .map(HistoryRecord::snapshot)
            .collect()
    }

    /// Tokens of currently open batches, outermost first.
    pub fn open_batch_tokens(&self) -> Vec<BatchToken> {
        self.open_batches
            .borrow()
            .iter()
            .map(|batch| batch.token)
            .collect()
    }
}

/// Closes a batch when dropped, unless defused by `commit`. Keeps the
/// batch stack balanced when a batched action unwinds.
struct BatchScope<'a, C> {
    history: &'a History<C>,
    token: BatchToken,
    armed: bool,
}

impl<C> BatchScope<'_, C> {
    fn commit(mut self) -> Result<(), HistoryError> {
        self.armed = false;
        self.history.stop_batch(self.token)
    }
}

impl<C> Drop for BatchScope<'_, C> {
    fn drop(&mut self) {
        if self.armed
            && let Err(error) = self.history.stop_batch(self.token)
        {
            log::error!("failed to close batch during unwind: {error}");
        }
    }
}
