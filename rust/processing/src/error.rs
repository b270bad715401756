// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the conversion pipeline.

use thiserror::Error;

/// Fatal conversion failures. Anything here aborts the whole `convert`
/// call; per-node shape problems never reach this type — they degrade
/// the affected node's status instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input is not a readable container archive.
    #[error("not a valid FCStd container: {0}")]
    NotAContainer(String),

    /// The structure document is missing or unparsable.
    #[error("malformed structure document: {0}")]
    MalformedStructure(String),

    /// The finished document failed to serialize.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<fcstd_lite_core::Error> for ConvertError {
    fn from(err: fcstd_lite_core::Error) -> Self {
        use fcstd_lite_core::Error as CoreError;
        match err {
            CoreError::NotAContainer(msg) => ConvertError::NotAContainer(msg),
            // At orchestration level a missing entry means the structure
            // document itself; shape entries are handled per node.
            CoreError::EntryNotFound(name) => {
                ConvertError::MalformedStructure(format!("container has no {name} entry"))
            }
            CoreError::MalformedStructure(msg) => ConvertError::MalformedStructure(msg),
        }
    }
}

/// Why a backend could not produce a topology graph for one payload.
/// Always recoverable: the owning node is degraded, the conversion
/// continues.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    /// The payload failed structural decode.
    #[error("shape payload failed to decode: {0}")]
    Malformed(#[from] fcstd_lite_topology::Error),

    /// The backend cannot decode payloads at all.
    #[error("geometry backend unavailable")]
    Unavailable,
}
