// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document assembly with shape resolution.
//!
//! Walks the label tree depth-first and mirrors it one-to-one into
//! output nodes, resolving each shape reference through the container
//! and the backend. Shape failures degrade the affected node only: the
//! node is still emitted, its children are still visited, siblings are
//! untouched.

use tracing::warn;

use fcstd_lite_core::{Error as CoreError, FcstdContainer, LabelNode};

use crate::backend::ShapeBackend;
use crate::output::{NodeStatus, OutputNode};

/// Assembles the output tree for a parsed label tree.
///
/// The result mirrors the input exactly: same node count, same
/// depth-first order, same names and property bags.
pub fn assemble(
    root: &LabelNode,
    container: &mut FcstdContainer,
    backend: &dyn ShapeBackend,
) -> OutputNode {
    let (status, shape) = match &root.shape_ref {
        None => (NodeStatus::Ok, None),
        Some(shape_ref) => match container.read_entry(shape_ref) {
            Ok(payload) => match backend.decode(&payload) {
                Ok(graph) => (NodeStatus::Ok, Some(graph)),
                Err(err) => {
                    warn!(
                        identifier = %root.identifier,
                        shape_ref = %shape_ref,
                        error = %err,
                        "shape payload failed to decode"
                    );
                    (NodeStatus::DecodeFailed, None)
                }
            },
            Err(CoreError::EntryNotFound(_)) => {
                warn!(
                    identifier = %root.identifier,
                    shape_ref = %shape_ref,
                    "referenced shape entry missing from container"
                );
                (NodeStatus::MissingReference, None)
            }
            Err(err) => {
                // The entry exists but could not be read back; treat it
                // like a payload failure rather than a missing file.
                warn!(
                    identifier = %root.identifier,
                    shape_ref = %shape_ref,
                    error = %err,
                    "shape entry unreadable"
                );
                (NodeStatus::DecodeFailed, None)
            }
        },
    };

    let children = root
        .children
        .iter()
        .map(|child| assemble(child, container, backend))
        .collect();

    OutputNode {
        identifier: root.identifier.clone(),
        label: root.label.clone(),
        type_tag: root.type_tag.clone(),
        properties: root.properties.clone(),
        shape_ref: root.shape_ref.clone(),
        status,
        notes: root.notes.clone(),
        shape,
        children,
    }
}
