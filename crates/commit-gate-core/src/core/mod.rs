// crates/commit-gate-core/src/core/mod.rs
// ============================================================================
// Module: Commit Gate Core Types
// Description: Repository, transaction, and signature data model.
// Purpose: Provide stable types shared by interfaces, providers, and runtime.
// Dependencies: serde, sha1, sha2
// ============================================================================

//! ## Overview
//! Core types describe the repository under check, the transaction being
//! committed, its changed paths and the hash signatures used by the collision
//! detector. None of these types perform I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod changes;
pub mod commit;
pub mod hashing;
pub mod identifiers;
pub mod repository;
pub mod signatures;
pub mod tags;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use changes::ChangeParseError;
pub use changes::ChangeStatus;
pub use changes::ChangedPath;
pub use commit::CommitInfo;
pub use hashing::ContentDigests;
pub use hashing::DigestParseError;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use identifiers::RepositoryId;
pub use identifiers::TransactionId;
pub use repository::Repository;
pub use signatures::CollisionSignature;
pub use signatures::SHATTERED_SHA1;
pub use signatures::SignatureSet;
pub use tags::ImmutableTagConfiguration;
