// crates/commit-gate-core/src/runtime/collision.rs
// ============================================================================
// Module: Commit Gate Collision Detector
// Description: Streaming comparison of file contents against collision signatures.
// Purpose: Reject payloads engineered to collide with trusted content.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The detector streams a content reader once, computes every supported
//! digest and looks the result up in its signature set. It never buffers a
//! whole file and never keeps the reader beyond the call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Read;

use crate::core::CollisionSignature;
use crate::core::ContentDigests;
use crate::core::SignatureSet;

// ============================================================================
// SECTION: Detector
// ============================================================================

/// Matches content against a fixed set of collision signatures.
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    /// Known collision signatures.
    signatures: SignatureSet,
}

impl CollisionDetector {
    /// Creates a detector over the given signatures.
    #[must_use]
    pub const fn new(signatures: SignatureSet) -> Self {
        Self {
            signatures,
        }
    }

    /// Creates a detector over the builtin signatures.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(SignatureSet::builtin())
    }

    /// Returns the signature set.
    #[must_use]
    pub const fn signatures(&self) -> &SignatureSet {
        &self.signatures
    }

    /// Streams `reader` to EOF and returns the matching signature, if any.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the stream cannot be read.
    pub fn scan<R: Read + ?Sized>(
        &self,
        reader: &mut R,
    ) -> io::Result<Option<&CollisionSignature>> {
        let digests = ContentDigests::from_reader(reader)?;
        Ok(self.signatures.find(&digests))
    }
}
