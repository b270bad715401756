// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sub-shape kinds, arena indices and child references.
//!
//! Every decoded sub-shape record gets a dense index into its owning
//! [`TopologyGraph`](crate::TopologyGraph). Indices are plain positions:
//! payloads address records 1-based, the arena stores them 0-based.

use serde::{Deserialize, Serialize};

/// Discriminant for decoded sub-shape records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeKind {
    Vertex,
    Edge,
    Wire,
    Face,
    Shell,
    Solid,
    CompoundSolid,
    Compound,
    /// A record whose kind token was not recognized. It keeps its index
    /// and participates in the graph structure, but its detailed geometry
    /// could not be interpreted.
    Opaque,
}

impl ShapeKind {
    /// Maps a payload kind token to its shape kind.
    pub fn from_token(token: &str) -> Option<ShapeKind> {
        match token {
            "Ve" => Some(ShapeKind::Vertex),
            "Ed" => Some(ShapeKind::Edge),
            "Wi" => Some(ShapeKind::Wire),
            "Fa" => Some(ShapeKind::Face),
            "Sh" => Some(ShapeKind::Shell),
            "So" => Some(ShapeKind::Solid),
            "CS" => Some(ShapeKind::CompoundSolid),
            "Co" => Some(ShapeKind::Compound),
            _ => None,
        }
    }

    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Vertex => "Vertex",
            ShapeKind::Edge => "Edge",
            ShapeKind::Wire => "Wire",
            ShapeKind::Face => "Face",
            ShapeKind::Shell => "Shell",
            ShapeKind::Solid => "Solid",
            ShapeKind::CompoundSolid => "CompoundSolid",
            ShapeKind::Compound => "Compound",
            ShapeKind::Opaque => "Opaque",
        }
    }

    /// Returns `true` if a record of this kind may reference a child of
    /// kind `child` directly. A face references wires and a surface
    /// carrier, never vertices; compounds and opaque records may hold
    /// anything.
    pub fn accepts_child(&self, child: ShapeKind) -> bool {
        match self {
            ShapeKind::Vertex => false,
            ShapeKind::Edge => matches!(child, ShapeKind::Vertex | ShapeKind::Opaque),
            ShapeKind::Wire => matches!(child, ShapeKind::Edge | ShapeKind::Opaque),
            ShapeKind::Face => matches!(child, ShapeKind::Wire | ShapeKind::Opaque),
            ShapeKind::Shell => matches!(child, ShapeKind::Face | ShapeKind::Opaque),
            ShapeKind::Solid => matches!(child, ShapeKind::Shell | ShapeKind::Opaque),
            ShapeKind::CompoundSolid => matches!(child, ShapeKind::Solid | ShapeKind::Opaque),
            ShapeKind::Compound => true,
            ShapeKind::Opaque => true,
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of a sub-shape record within one graph. Zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeIndex(pub u32);

/// Index of a curve carrier within one graph. Zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveIndex(pub u32);

/// Index of a surface carrier within one graph. Zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceIndex(pub u32);

/// Index of a placement within one graph. Zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationIndex(pub u32);

impl std::fmt::Display for ShapeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traversal orientation of a child reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reversed,
}

/// An orientation-signed reference to a shared sub-shape record.
///
/// Orientation lives on the reference, not the record, so a record shared
/// by several parents stays one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    pub index: ShapeIndex,
    pub orientation: Orientation,
}
