/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Type-erased command payloads and typed command registration.
//!
//! Commands carry heterogeneous option types, so the registry stores them
//! behind erased function pointers. `CommandDefinition::new` is the typed
//! boundary: it wraps a concrete `(apply, revert)` pair and downcasts
//! payloads on the way in, surfacing mismatches as `HistoryError`.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::error::HistoryError;

/// Data carried by one command invocation: forward options or the revert
/// options captured by apply.
///
/// Blanket-implemented for any `'static` type that is `Clone + Debug`, so
/// callers register commands with plain structs. Cloning backs the
/// deep-copied introspection snapshots.
pub trait CommandPayload: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn CommandPayload>;
}

impl<T> CommandPayload for T
where
    T: Any + Clone + fmt::Debug,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn CommandPayload> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn CommandPayload> {
    fn clone(&self) -> Self {
        self.as_ref().clone_boxed()
    }
}

impl dyn CommandPayload {
    /// Typed view of an erased payload.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

pub(crate) type ApplyFn<C> =
    dyn Fn(&mut C, &dyn CommandPayload) -> Result<Box<dyn CommandPayload>, HistoryError>;
pub(crate) type RevertFn<C> =
    dyn Fn(&mut C, &dyn CommandPayload) -> Result<Option<Box<dyn CommandPayload>>, HistoryError>;

/// A registered command: one erased apply/revert pair.
///
/// History records hold a clone of this handle, so already-recorded history
/// keeps working after `unregister_command`.
pub struct CommandDefinition<C> {
    pub(crate) apply: Rc<ApplyFn<C>>,
    pub(crate) revert: Rc<RevertFn<C>>,
}

impl<C> Clone for CommandDefinition<C> {
    fn clone(&self) -> Self {
        Self {
            apply: Rc::clone(&self.apply),
            revert: Rc::clone(&self.revert),
        }
    }
}

impl<C> fmt::Debug for CommandDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition").finish_non_exhaustive()
    }
}

impl<C> CommandDefinition<C> {
    /// Wrap a typed apply/revert pair into erased form.
    ///
    /// `apply` performs the forward mutation and returns the data needed to
    /// undo it. `revert` undoes the mutation; returning `Some(options)`
    /// hands back fresh forward options for a later redo (used when revert
    /// must pin down state apply derived on the fly, e.g. a minted id).
    pub fn new<O, R>(
        key: &str,
        apply: impl Fn(&mut C, &O) -> R + 'static,
        revert: impl Fn(&mut C, &R) -> Option<O> + 'static,
    ) -> Self
    where
        O: Any + Clone + fmt::Debug,
        R: Any + Clone + fmt::Debug,
    {
        let apply_key = key.to_string();
        let revert_key = key.to_string();
        Self {
            apply: Rc::new(move |ctx, options| {
                let options = options.as_any().downcast_ref::<O>().ok_or_else(|| {
                    HistoryError::PayloadType {
                        key: apply_key.clone(),
                        expected: std::any::type_name::<O>(),
                    }
                })?;
                Ok(Box::new(apply(ctx, options)) as Box<dyn CommandPayload>)
            }),
            revert: Rc::new(move |ctx, revert_options| {
                let revert_options = revert_options
                    .as_any()
                    .downcast_ref::<R>()
                    .ok_or_else(|| HistoryError::PayloadType {
                        key: revert_key.clone(),
                        expected: std::any::type_name::<R>(),
                    })?;
                Ok(revert(ctx, revert_options)
                    .map(|options| Box::new(options) as Box<dyn CommandPayload>))
            }),
        }
    }
}
