// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Top-level conversion entry point.
//!
//! One `convert` call runs the whole pipeline synchronously:
//! open container → parse structure document → assemble (native) or
//! synthesize (fallback). Fatal errors — bad archive, missing or
//! unparsable structure document — abort the call; per-node shape
//! failures never do. The caller supplies the backend availability probe
//! result; the core never initializes a backend itself.

use tracing::{debug, info};

use fcstd_lite_core::{parse_document, FcstdContainer};

use crate::assembler::assemble;
use crate::backend::{DisabledBackend, NativeBackend, ShapeBackend};
use crate::error::ConvertError;
use crate::fallback::synthesize;
use crate::output::{Capability, ConvertedDocument};

/// Converts one container into a reconstructed document.
///
/// Independent calls share no state and are safe to run in parallel.
pub fn convert(
    container_bytes: Vec<u8>,
    backend_available: bool,
) -> Result<ConvertedDocument, ConvertError> {
    let mut container = FcstdContainer::open(container_bytes)?;
    debug!(entries = container.entry_names().len(), "container opened");

    let xml = container.read_document()?;
    let root_label = parse_document(&xml)?;
    debug!(labels = root_label.node_count(), "structure parsed");

    let backend: &dyn ShapeBackend = if backend_available {
        &NativeBackend
    } else {
        &DisabledBackend
    };

    let (capability, root) = if backend.available() {
        (
            Capability::Native,
            assemble(&root_label, &mut container, backend),
        )
    } else {
        (Capability::Fallback, synthesize(&root_label))
    };

    info!(
        capability = ?capability,
        nodes = root.node_count(),
        "conversion complete"
    );

    Ok(ConvertedDocument { capability, root })
}
