// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for container access and structure-document parsing.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening a container or parsing its
/// structure document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes are not a readable archive. Fatal for the whole
    /// conversion.
    #[error("not a valid FCStd container: {0}")]
    NotAContainer(String),

    /// A named entry is missing from the container. Recoverable when the
    /// entry is a shape payload; fatal only for the structure document.
    #[error("container entry not found: {0}")]
    EntryNotFound(String),

    /// The structure document could not be parsed. Fatal for the whole
    /// conversion.
    #[error("malformed structure document: {0}")]
    MalformedStructure(String),
}

impl Error {
    /// Shorthand for a [`Error::MalformedStructure`] with a formatted message.
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedStructure(msg.into())
    }
}
