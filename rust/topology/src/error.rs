// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for shape payload decoding.
//!
//! Every variant here means one shape payload is structurally unusable.
//! Decode failures never abort a whole conversion; the owning document
//! node is degraded instead.

use crate::kinds::ShapeKind;

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a BREP shape payload.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The payload is not ASCII/UTF-8 text.
    #[error("shape payload is not valid UTF-8 text")]
    NotText,

    /// The payload does not start with a CASCADE topology header.
    #[error("shape payload has no CASCADE topology header")]
    BadMagic,

    /// The payload ended before a required element.
    #[error("truncated shape payload: expected {0}")]
    Truncated(&'static str),

    /// A token did not match what the grammar requires at that point.
    #[error("unexpected token {found:?} on line {line}: expected {expected}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        line: usize,
    },

    /// A numeric field failed to parse.
    #[error("invalid number {found:?} on line {line}")]
    InvalidNumber { found: String, line: usize },

    /// The payload declares no sub-shape records at all.
    #[error("shape payload declares no sub-shape records")]
    EmptyShape,

    /// A reference points outside its declared pool.
    #[error("{what} index {index} out of range: {count} declared")]
    IndexOutOfRange {
        what: &'static str,
        index: u32,
        count: usize,
    },

    /// A record references a child its kind cannot contain.
    #[error("record {record} of kind {parent} cannot reference a child of kind {child}")]
    IncompatibleChild {
        record: u32,
        parent: ShapeKind,
        child: ShapeKind,
    },

    /// A record of a kind with no carrier slot declared a carrier.
    #[error("record {record} of kind {kind} cannot carry geometry reference {reference}")]
    UnexpectedCarrier {
        record: u32,
        kind: ShapeKind,
        reference: u32,
    },

    /// A record is reachable from itself through child references.
    #[error("cyclic sub-shape reference through record {0}")]
    CyclicReference(u32),
}
