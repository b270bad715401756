// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FCStd container access.
//!
//! An FCStd document is a ZIP archive holding a structure document
//! (`Document.xml`), an optional presentation document
//! (`GuiDocument.xml`, never parsed by the core) and the BREP shape
//! payloads referenced by name from the structure document.
//!
//! The whole input is held in memory for the duration of one conversion;
//! containers are small (tens of MB), so no streaming is attempted. Each
//! conversion opens a fresh handle and nothing is cached across calls.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::{Error, Result};

/// Conventional name of the structure document entry.
pub const DOCUMENT_ENTRY: &str = "Document.xml";

/// Conventional name of the presentation document entry. Listed for
/// callers that want to skip it; the core never reads it.
pub const GUI_DOCUMENT_ENTRY: &str = "GuiDocument.xml";

/// An opened FCStd container.
pub struct FcstdContainer {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    entries: Vec<String>,
}

impl FcstdContainer {
    /// Opens a container from raw bytes.
    ///
    /// Rejects non-archive input with [`Error::NotAContainer`]; errors
    /// from the underlying zip reader never escape unwrapped.
    pub fn open(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::NotAContainer(e.to_string()))?;

        // Entry listing in central-directory order, directories excluded.
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive
                .by_index(i)
                .map_err(|e| Error::NotAContainer(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            entries.push(entry.name().to_string());
        }

        Ok(Self { archive, entries })
    }

    /// Entry names in archive order, directories excluded.
    pub fn entry_names(&self) -> &[String] {
        &self.entries
    }

    /// Returns `true` if the container holds an entry with this exact name.
    pub fn has_entry(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e == name)
    }

    /// Reads one entry fully into memory.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| Error::EntryNotFound(name.to_string()))?;

        let mut contents = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut contents)
            .map_err(|e| Error::NotAContainer(format!("unreadable entry {name}: {e}")))?;
        Ok(contents)
    }

    /// Reads the structure document entry.
    pub fn read_document(&mut self) -> Result<Vec<u8>> {
        self.read_entry(DOCUMENT_ENTRY)
    }
}
