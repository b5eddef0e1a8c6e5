/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Core library of a desktop mind-map/markdown editor.
//!
//! Two halves:
//! - `history`: a generic command-based undo/redo engine. One instance per
//!   open document; every mutating operation runs through it.
//! - `graph`: the mind-map document model and the undoable command set
//!   registered against it.
//!
//! UI layers (rendering, widgets, markdown highlighting) live elsewhere and
//! drive this crate through a `History<GraphDocument>`.

pub mod graph;
pub mod history;

/// Crate version, for smoke tests and diagnostics surfaces.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
