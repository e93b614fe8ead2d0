// crates/commit-gate-core/src/core/hashing.rs
// ============================================================================
// Module: Commit Gate Content Hashing
// Description: Streaming SHA-1/SHA-256 digests of transaction file contents.
// Purpose: Provide the digests compared against known collision signatures.
// Dependencies: serde, sha1, sha2, thiserror
// ============================================================================

//! ## Overview
//! File contents are streamed once through every supported hash algorithm so
//! the collision detector can compare against signatures of any algorithm
//! without re-reading the stream. Digests are represented as lowercase hex.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io;
use std::io::Read;

use serde::Deserialize;
use serde::Serialize;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Read buffer size used when streaming content.
const STREAM_BUFFER_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported hash algorithms for collision signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-1 (the digest targeted by published collision attacks).
    Sha1,
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the digest length in bytes.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// Returns a stable display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
        }
    }
}

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// Content hash representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HashDigest {
    /// Hash algorithm identifier.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

impl HashDigest {
    /// Creates a new digest from raw bytes.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex_encode(bytes),
        }
    }

    /// Parses a hex digest, accepting either case.
    ///
    /// # Errors
    ///
    /// Returns [`DigestParseError`] when the text is not hex or has the wrong
    /// length for the algorithm.
    pub fn from_hex(algorithm: HashAlgorithm, text: &str) -> Result<Self, DigestParseError> {
        let value = text.trim().to_ascii_lowercase();
        if !value.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(DigestParseError::NotHex);
        }
        let expected = algorithm.digest_len() * 2;
        if value.len() != expected {
            return Err(DigestParseError::Length {
                algorithm,
                expected,
                actual: value.len(),
            });
        }
        Ok(Self {
            algorithm,
            value,
        })
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.label(), self.value)
    }
}

/// Errors raised when parsing hex digests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestParseError {
    /// Text contains non-hex characters.
    #[error("digest must be hex encoded")]
    NotHex,
    /// Text length does not match the algorithm.
    #[error(
        "{label} digest must have {expected} hex characters, got {actual}",
        label = .algorithm.label()
    )]
    Length {
        /// Algorithm the digest was parsed for.
        algorithm: HashAlgorithm,
        /// Expected number of hex characters.
        expected: usize,
        /// Actual number of hex characters.
        actual: usize,
    },
}

// ============================================================================
// SECTION: Content Digests
// ============================================================================

/// Digests of one content stream under every supported algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigests {
    /// SHA-1 digest.
    pub sha1: HashDigest,
    /// SHA-256 digest.
    pub sha256: HashDigest,
}

impl ContentDigests {
    /// Streams a reader to EOF and returns its digests.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the stream cannot be read.
    pub fn from_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut sha1 = Sha1::new();
        let mut sha256 = Sha256::new();
        let mut buffer = vec![0_u8; STREAM_BUFFER_BYTES];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            sha1.update(&buffer[..read]);
            sha256.update(&buffer[..read]);
        }
        Ok(Self {
            sha1: HashDigest::new(HashAlgorithm::Sha1, &sha1.finalize()),
            sha256: HashDigest::new(HashAlgorithm::Sha256, &sha256.finalize()),
        })
    }

    /// Hashes an in-memory byte slice.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            sha1: HashDigest::new(HashAlgorithm::Sha1, &Sha1::digest(bytes)),
            sha256: HashDigest::new(HashAlgorithm::Sha256, &Sha256::digest(bytes)),
        }
    }

    /// Returns the digest for the requested algorithm.
    #[must_use]
    pub const fn get(&self, algorithm: HashAlgorithm) -> &HashDigest {
        match algorithm {
            HashAlgorithm::Sha1 => &self.sha1,
            HashAlgorithm::Sha256 => &self.sha256,
        }
    }
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
