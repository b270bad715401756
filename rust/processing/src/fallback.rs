// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structure-only synthesis for when the geometry backend is unavailable.
//!
//! Produces a placeholder document that preserves everything the parser
//! extracted — hierarchy, labels, types, property bags, shape entry
//! names — with no shape data at all. The synthesizer never touches the
//! container: shape references stay metadata.

use fcstd_lite_core::LabelNode;

use crate::output::{NodeStatus, OutputNode};

/// Synthesizes a fallback output tree from a parsed label tree.
///
/// Every node carries `status == Fallback` and no shape; the result is a
/// one-to-one structural mirror of the input.
pub fn synthesize(root: &LabelNode) -> OutputNode {
    OutputNode {
        identifier: root.identifier.clone(),
        label: root.label.clone(),
        type_tag: root.type_tag.clone(),
        properties: root.properties.clone(),
        shape_ref: root.shape_ref.clone(),
        status: NodeStatus::Fallback,
        notes: root.notes.clone(),
        shape: None,
        children: root.children.iter().map(synthesize).collect(),
    }
}
