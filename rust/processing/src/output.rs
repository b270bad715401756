// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconstructed document model.
//!
//! An [`OutputNode`] mirrors one label node one-to-one, adding the
//! resolved shape (when decoded) and a per-node status. The tree of
//! output nodes plus the backend capability flag is the conversion's
//! primary deliverable; `to_json` gives the external storage layer a
//! lossless serialized form.

use serde::{Deserialize, Serialize};

use fcstd_lite_core::{LabelNote, PropertyBag};
use fcstd_lite_topology::TopologyGraph;

use crate::error::ConvertError;

/// Per-node conversion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    /// Shape decoded (or the node carries no shape reference).
    Ok,
    /// The referenced shape entry is missing from the container.
    MissingReference,
    /// The shape payload exists but failed structural decode.
    DecodeFailed,
    /// Structure-only synthesis: the geometry backend was unavailable.
    Fallback,
}

/// Which pipeline produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Native,
    Fallback,
}

/// One node of the reconstructed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputNode {
    pub identifier: String,
    pub label: String,
    pub type_tag: String,
    pub properties: PropertyBag,
    /// Shape entry name, retained as metadata even when the shape itself
    /// was not (or could not be) decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_ref: Option<String>,
    pub status: NodeStatus,
    /// Structural anomalies inherited from parsing.
    pub notes: Vec<LabelNote>,
    /// Decoded topology, present only for `status == Ok` nodes with a
    /// shape reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<TopologyGraph>,
    pub children: Vec<OutputNode>,
}

impl OutputNode {
    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutputNode::node_count)
            .sum::<usize>()
    }

    /// Depth-first (pre-order) iterator over this subtree.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst { stack: vec![self] }
    }
}

/// Pre-order traversal over an output tree.
pub struct DepthFirst<'a> {
    stack: Vec<&'a OutputNode>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a OutputNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Children pushed in reverse so the first child pops next.
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// The completed conversion result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedDocument {
    pub capability: Capability,
    pub root: OutputNode,
}

impl ConvertedDocument {
    /// Total number of nodes in the document.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Serializes the whole document, hierarchy and decoded topology
    /// included, for the external storage layer.
    pub fn to_json(&self) -> Result<String, ConvertError> {
        serde_json::to_string_pretty(self).map_err(|e| ConvertError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(identifier: &str, children: Vec<OutputNode>) -> OutputNode {
        OutputNode {
            identifier: identifier.to_string(),
            label: identifier.to_string(),
            type_tag: "Part::Feature".to_string(),
            properties: PropertyBag::default(),
            shape_ref: None,
            status: NodeStatus::Ok,
            notes: Vec::new(),
            shape: None,
            children,
        }
    }

    #[test]
    fn depth_first_is_preorder() {
        let tree = node(
            "root",
            vec![
                node("a", vec![node("a1", vec![]), node("a2", vec![])]),
                node("b", vec![]),
            ],
        );

        let order: Vec<&str> = tree
            .iter_depth_first()
            .map(|n| n.identifier.as_str())
            .collect();
        assert_eq!(order, ["root", "a", "a1", "a2", "b"]);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let doc = ConvertedDocument {
            capability: Capability::Fallback,
            root: node("root", vec![node("child", vec![])]),
        };

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"fallback\""));

        let back: ConvertedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&NodeStatus::MissingReference).unwrap();
        assert_eq!(json, "\"missing-reference\"");
        let json = serde_json::to_string(&NodeStatus::DecodeFailed).unwrap();
        assert_eq!(json, "\"decode-failed\"");
    }
}
