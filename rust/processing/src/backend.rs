//! Pluggable shape-decoding capability.
//!
//! The geometry backend is modeled as a narrow capability interface:
//! one native implementation that decodes real payloads and one no-op
//! implementation for when no kernel is present. Which one runs is a
//! per-conversion tagged choice driven by the caller's availability
//! probe — the core never initializes or configures a backend itself.

use fcstd_lite_topology::{decode, TopologyGraph};

use crate::error::DecodeFailure;

/// A shape-decoding backend.
pub trait ShapeBackend {
    /// Whether this backend can decode shape payloads at all.
    fn available(&self) -> bool;

    /// Decodes one BREP payload into a topology graph.
    fn decode(&self, payload: &[u8]) -> Result<TopologyGraph, DecodeFailure>;
}

/// The built-in decoder.
pub struct NativeBackend;

impl ShapeBackend for NativeBackend {
    fn available(&self) -> bool {
        true
    }

    fn decode(&self, payload: &[u8]) -> Result<TopologyGraph, DecodeFailure> {
        Ok(decode(payload)?)
    }
}

/// The no-op backend used when no geometry kernel is present. It refuses
/// byte-level shape access entirely.
pub struct DisabledBackend;

impl ShapeBackend for DisabledBackend {
    fn available(&self) -> bool {
        false
    }

    fn decode(&self, _payload: &[u8]) -> Result<TopologyGraph, DecodeFailure> {
        Err(DecodeFailure::Unavailable)
    }
}
