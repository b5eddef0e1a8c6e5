/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod harness;

mod batching;
mod editing;
mod undo_redo;

#[test]
fn scenarios_binary_smoke_runs() {
    assert!(!mindgraph::VERSION.is_empty());
}
