// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # FCStd-Lite Core
//!
//! Container access and structure-document parsing for FreeCAD `.FCStd`
//! documents.
//!
//! An FCStd document is a ZIP archive: an XML structure document
//! (`Document.xml`) describing the object hierarchy, plus BREP shape
//! payloads referenced by entry name. This crate opens the container and
//! turns the structure document into a [`LabelNode`] tree; shape payloads
//! are left to `fcstd-lite-topology`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fcstd_lite_core::{parse_document, FcstdContainer};
//!
//! let mut container = FcstdContainer::open(bytes)?;
//! let xml = container.read_document()?;
//! let root = parse_document(&xml)?;
//! println!("{} labels", root.node_count());
//! ```

pub mod container;
pub mod error;
pub mod model;
pub mod parser;

pub use container::{FcstdContainer, DOCUMENT_ENTRY, GUI_DOCUMENT_ENTRY};
pub use error::{Error, Result};
pub use model::{LabelNode, LabelNote, PropertyBag, PropertyValue};
pub use parser::{parse_document, DOCUMENT_TYPE_TAG};
