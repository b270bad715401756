// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FCStd-Lite Topology
//!
//! BREP shape payload decoder and shared-subshape topology graph.
//!
//! One payload decodes into one [`TopologyGraph`]: an index-based arena
//! of typed sub-shape records (vertex, edge, wire, face, shell, solid,
//! compound) where parents reference shared children by index. The graph
//! is a DAG because BREP sharing is intentional — an edge bordering two
//! faces is one record, not two copies. Geometric carriers (curves,
//! surfaces, placements) ride along as opaque parameter blocks; this
//! crate never evaluates geometry.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fcstd_lite_topology::{decode, ShapeKind};
//!
//! let graph = decode(&payload_bytes)?;
//! println!(
//!     "{} records, {} faces",
//!     graph.record_count(),
//!     graph.count_of(ShapeKind::Face)
//! );
//! ```

pub mod decode;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod kinds;
mod lexer;

pub use decode::decode;
pub use error::{Error, Result};
pub use geometry::{CurveCarrier, Location, SurfaceCarrier};
pub use graph::{ShapeRecord, TopologyGraph};
pub use kinds::{
    ChildRef, CurveIndex, LocationIndex, Orientation, ShapeIndex, ShapeKind, SurfaceIndex,
};
