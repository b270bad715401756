// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FCStd-Lite Processing
//!
//! The conversion pipeline: FCStd container bytes in, reconstructed
//! hierarchical document out.
//!
//! ```rust,ignore
//! use fcstd_lite_processing::convert;
//!
//! let doc = convert(container_bytes, geometry_backend_available())?;
//! let json = doc.to_json()?;
//! ```
//!
//! When the geometry backend is unavailable the pipeline still returns
//! the full hierarchy with all metadata, explicitly flagged as
//! `fallback` — never silently presented as a full conversion.

pub mod assembler;
pub mod backend;
pub mod error;
pub mod fallback;
pub mod orchestrator;
pub mod output;

pub use assembler::assemble;
pub use backend::{DisabledBackend, NativeBackend, ShapeBackend};
pub use error::{ConvertError, DecodeFailure};
pub use fallback::synthesize;
pub use orchestrator::convert;
pub use output::{Capability, ConvertedDocument, DepthFirst, NodeStatus, OutputNode};
