// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsed label-tree model.
//!
//! A [`LabelNode`] is one entry of the document hierarchy: a named, typed
//! object, possibly referencing a shape payload by entry name. The tree is
//! built once by the parser, consumed read-only by the assembly stage and
//! discarded at the end of the conversion.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A typed property value from the structure document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Get as string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as float. Integers coerce.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as bool.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as list.
    #[inline]
    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Free-form property bag attached to a label node.
pub type PropertyBag = FxHashMap<String, PropertyValue>;

/// A structural anomaly recorded while parsing. Notes are attached to the
/// affected node and never abort the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelNote {
    /// A later object declaration reused this node's identifier; the later
    /// declaration was dropped.
    DuplicateIdentifier(String),
    /// A group link named an identifier with no parsed object behind it,
    /// or one already claimed by an earlier group. The link was dropped.
    DanglingChildReference(String),
    /// The object declared no display label; one was derived from its type
    /// tag and identifier.
    DefaultedLabel,
    /// The object was unreachable through group links (e.g. a link cycle)
    /// and was re-attached under the document root.
    Reparented,
}

/// One node of the parsed label tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelNode {
    /// Stable identifier as assigned by the source document.
    pub identifier: String,
    /// Display name. Never empty: defaulted (and flagged) when the source
    /// declares none.
    pub label: String,
    /// Type tag, e.g. `Part::Box` or `App::DocumentObjectGroup`.
    pub type_tag: String,
    /// Shape payload entry name, recorded but never eagerly read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_ref: Option<String>,
    /// Properties not central to geometry (color, visibility, placement).
    pub properties: PropertyBag,
    /// Structural anomalies attached to this node.
    pub notes: Vec<LabelNote>,
    /// Ordered children. Every non-root node has exactly one parent.
    pub children: Vec<LabelNode>,
}

impl LabelNode {
    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(LabelNode::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(identifier: &str) -> LabelNode {
        LabelNode {
            identifier: identifier.to_string(),
            label: identifier.to_string(),
            type_tag: "Part::Feature".to_string(),
            shape_ref: None,
            properties: PropertyBag::default(),
            notes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn node_count_includes_all_descendants() {
        let mut root = leaf("root");
        let mut group = leaf("group");
        group.children.push(leaf("a"));
        group.children.push(leaf("b"));
        root.children.push(group);

        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn property_value_accessors() {
        assert_eq!(PropertyValue::Str("x".to_string()).as_str(), Some("x"));
        assert_eq!(PropertyValue::Int(3).as_float(), Some(3.0));
        assert_eq!(PropertyValue::Float(1.5).as_float(), Some(1.5));
        assert_eq!(PropertyValue::Bool(true).as_bool(), Some(true));
        assert!(PropertyValue::Bool(true).as_str().is_none());

        let list = PropertyValue::List(vec![PropertyValue::Int(1), PropertyValue::Int(2)]);
        assert_eq!(list.as_list().map(|l| l.len()), Some(2));
    }
}
