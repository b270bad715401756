// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Index-based ownership arena for one decoded shape.
//!
//! The [`TopologyGraph`] is the single owner of every sub-shape record and
//! geometric carrier decoded from one payload. Parent records hold child
//! *indices*, never copies, so a sub-shape referenced by several parents
//! (an edge shared by two faces of a solid) is one record with one
//! identity. The graph is a DAG, not a tree, and is never mutated after
//! decode.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::{CurveCarrier, Location, SurfaceCarrier};
use crate::kinds::{ChildRef, CurveIndex, LocationIndex, ShapeIndex, ShapeKind, SurfaceIndex};

/// One typed sub-shape record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub kind: ShapeKind,
    /// Ordered, orientation-signed references to shared children.
    pub children: SmallVec<[ChildRef; 4]>,
    /// Curve carrier, present on edge records only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveIndex>,
    /// Surface carrier, present on face records only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<SurfaceIndex>,
    /// Placement, optional on any record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationIndex>,
}

/// The decoded in-memory form of one BREP payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyGraph {
    pub(crate) records: Vec<ShapeRecord>,
    pub(crate) curves: Vec<CurveCarrier>,
    pub(crate) surfaces: Vec<SurfaceCarrier>,
    pub(crate) locations: Vec<Location>,
    pub(crate) root: ShapeIndex,
}

impl TopologyGraph {
    /// All records in declaration order.
    pub fn records(&self) -> &[ShapeRecord] {
        &self.records
    }

    /// Returns the record at the given index, or `None` if out of range.
    pub fn record(&self, index: ShapeIndex) -> Option<&ShapeRecord> {
        self.records.get(index.0 as usize)
    }

    /// Index of the result shape.
    pub fn root(&self) -> ShapeIndex {
        self.root
    }

    /// The result shape's record. The decoder guarantees the root index
    /// is valid.
    pub fn root_record(&self) -> &ShapeRecord {
        &self.records[self.root.0 as usize]
    }

    /// Returns the number of sub-shape records.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Returns the number of records of one kind.
    pub fn count_of(&self, kind: ShapeKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    /// Per-kind record counts, for diagnostics and summaries.
    pub fn summary(&self) -> FxHashMap<ShapeKind, usize> {
        let mut counts = FxHashMap::default();
        for record in &self.records {
            *counts.entry(record.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Child references of a record, or `None` if the index is invalid.
    pub fn children(&self, index: ShapeIndex) -> Option<&[ChildRef]> {
        self.record(index).map(|r| r.children.as_slice())
    }

    /// Returns the curve carrier at the given index.
    pub fn curve(&self, index: CurveIndex) -> Option<&CurveCarrier> {
        self.curves.get(index.0 as usize)
    }

    /// Returns the surface carrier at the given index.
    pub fn surface(&self, index: SurfaceIndex) -> Option<&SurfaceCarrier> {
        self.surfaces.get(index.0 as usize)
    }

    /// Returns the placement at the given index.
    pub fn location(&self, index: LocationIndex) -> Option<&Location> {
        self.locations.get(index.0 as usize)
    }

    /// Returns the number of curve carriers.
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Returns the number of surface carriers.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns the number of placements.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Orientation;

    fn child(index: u32, orientation: Orientation) -> ChildRef {
        ChildRef {
            index: ShapeIndex(index),
            orientation,
        }
    }

    fn record(kind: ShapeKind, children: &[ChildRef]) -> ShapeRecord {
        ShapeRecord {
            kind,
            children: children.iter().copied().collect(),
            curve: None,
            surface: None,
            location: None,
        }
    }

    /// Two edges sharing both vertices, as in a closed loop.
    fn two_edge_loop() -> TopologyGraph {
        TopologyGraph {
            records: vec![
                record(ShapeKind::Vertex, &[]),
                record(ShapeKind::Vertex, &[]),
                record(
                    ShapeKind::Edge,
                    &[
                        child(0, Orientation::Forward),
                        child(1, Orientation::Forward),
                    ],
                ),
                record(
                    ShapeKind::Edge,
                    &[
                        child(1, Orientation::Forward),
                        child(0, Orientation::Reversed),
                    ],
                ),
                record(
                    ShapeKind::Wire,
                    &[
                        child(2, Orientation::Forward),
                        child(3, Orientation::Forward),
                    ],
                ),
            ],
            curves: Vec::new(),
            surfaces: Vec::new(),
            locations: Vec::new(),
            root: ShapeIndex(4),
        }
    }

    #[test]
    fn counts_by_kind() {
        let graph = two_edge_loop();
        assert_eq!(graph.record_count(), 5);
        assert_eq!(graph.count_of(ShapeKind::Vertex), 2);
        assert_eq!(graph.count_of(ShapeKind::Edge), 2);
        assert_eq!(graph.count_of(ShapeKind::Wire), 1);
        assert_eq!(graph.count_of(ShapeKind::Face), 0);

        let summary = graph.summary();
        assert_eq!(summary.get(&ShapeKind::Edge), Some(&2));
        assert_eq!(summary.get(&ShapeKind::Face), None);
    }

    #[test]
    fn shared_children_are_one_identity() {
        let graph = two_edge_loop();
        let first = graph.children(ShapeIndex(2)).unwrap();
        let second = graph.children(ShapeIndex(3)).unwrap();

        // Both edges reference vertex 0; the resolved records are the
        // same memory, not copies.
        assert_eq!(first[0].index, ShapeIndex(0));
        assert_eq!(second[1].index, ShapeIndex(0));
        let a = graph.record(first[0].index).unwrap() as *const ShapeRecord;
        let b = graph.record(second[1].index).unwrap() as *const ShapeRecord;
        assert_eq!(a, b);
    }

    #[test]
    fn root_record_access() {
        let graph = two_edge_loop();
        assert_eq!(graph.root(), ShapeIndex(4));
        assert_eq!(graph.root_record().kind, ShapeKind::Wire);
    }

    #[test]
    fn out_of_range_lookups_are_none() {
        let graph = two_edge_loop();
        assert!(graph.record(ShapeIndex(99)).is_none());
        assert!(graph.curve(CurveIndex(0)).is_none());
    }
}
