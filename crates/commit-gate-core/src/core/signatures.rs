// crates/commit-gate-core/src/core/signatures.rs
// ============================================================================
// Module: Commit Gate Collision Signatures
// Description: Reference set of content digests of known collision payloads.
// Purpose: Identify files engineered to share a digest with different content.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A collision signature is the digest of a publicly known colliding payload.
//! Matching is exact digest equality. The builtin set carries the SHA-1
//! digest shared by both SHAttered PDF files; deployments may add more.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::ContentDigests;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::HashDigest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// SHA-1 digest shared by `shattered-1.pdf` and `shattered-2.pdf`.
pub const SHATTERED_SHA1: &str = "38762cf7f55934b34d179ae6a4c80cadccbb7f0a";

// ============================================================================
// SECTION: Signature
// ============================================================================

/// Digest of a known colliding payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionSignature {
    /// Short label naming the attack or payload.
    pub label: String,
    /// Digest to match exactly.
    pub digest: HashDigest,
}

impl CollisionSignature {
    /// Creates a signature.
    #[must_use]
    pub fn new(label: impl Into<String>, digest: HashDigest) -> Self {
        Self {
            label: label.into(),
            digest,
        }
    }

    /// Returns true when the content digests contain this signature.
    #[must_use]
    pub fn matches(&self, digests: &ContentDigests) -> bool {
        digests.get(self.digest.algorithm) == &self.digest
    }
}

// ============================================================================
// SECTION: Signature Set
// ============================================================================

/// Ordered set of collision signatures.
///
/// # Invariants
/// - No two entries share the same digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    /// Signatures in insertion order.
    signatures: Vec<CollisionSignature>,
}

impl SignatureSet {
    /// Creates an empty signature set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            signatures: Vec::new(),
        }
    }

    /// Returns the builtin signature set.
    #[must_use]
    pub fn builtin() -> Self {
        let mut set = Self::new();
        set.insert(CollisionSignature::new(
            "shattered",
            HashDigest {
                algorithm: HashAlgorithm::Sha1,
                value: SHATTERED_SHA1.to_string(),
            },
        ));
        set
    }

    /// Adds a signature; returns false when the digest is already present.
    pub fn insert(&mut self, signature: CollisionSignature) -> bool {
        if self.signatures.iter().any(|known| known.digest == signature.digest) {
            return false;
        }
        self.signatures.push(signature);
        true
    }

    /// Returns the first signature matching the content digests.
    #[must_use]
    pub fn find(&self, digests: &ContentDigests) -> Option<&CollisionSignature> {
        self.signatures.iter().find(|signature| signature.matches(digests))
    }

    /// Returns the number of signatures.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Returns true when the set holds no signatures.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Iterates over signatures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CollisionSignature> {
        self.signatures.iter()
    }
}

impl Extend<CollisionSignature> for SignatureSet {
    fn extend<T: IntoIterator<Item = CollisionSignature>>(&mut self, iter: T) {
        for signature in iter {
            self.insert(signature);
        }
    }
}
