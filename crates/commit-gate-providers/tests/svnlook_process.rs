// crates/commit-gate-providers/tests/svnlook_process.rs
// ============================================================================
// Module: Svnlook Introspector Tests
// Description: Process-backed introspection against a scripted svnlook.
// Purpose: Validate output limits, exit handling, and content streaming.
// ============================================================================

//! Integration tests for the `svnlook` introspector using a shell script
//! stand-in for the real binary.

#![cfg(unix)]
#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::io::Read;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use commit_gate_core::CollisionDetector;
use commit_gate_core::CommitGate;
use commit_gate_core::GateError;
use commit_gate_core::HookInvocation;
use commit_gate_core::ImmutableTagConfiguration;
use commit_gate_core::IntrospectionError;
use commit_gate_core::NoopDiagnosticSink;
use commit_gate_core::Repository;
use commit_gate_core::RepositoryId;
use commit_gate_core::TransactionId;
use commit_gate_core::TransactionIntrospector;
use commit_gate_providers::RepositoryEntry;
use commit_gate_providers::StaticRepositoryRegistry;
use commit_gate_providers::Svnlook;
use commit_gate_providers::SvnlookConfig;
use tempfile::TempDir;

/// Scripted stand-in for `svnlook <sub> -t <txn> <repos> [-- path]`.
const FAKE_SVNLOOK: &str = r#"#!/bin/sh
sub="$1"
txn="$3"
if [ "$5" = "--" ]; then
  path="$6"
else
  path="$5"
  case "$path" in
    -*) echo "svnlook: invalid option: $path" >&2; exit 1 ;;
  esac
fi
if [ "$txn" = "noisy" ]; then
  head -c 262144 /dev/zero | tr '\000' 'e' >&2
fi
if [ "$txn" = "missing" ]; then
  echo "svnlook: E160007: No such transaction '$txn'" >&2
  exit 1
fi
case "$sub" in
  changed)
    if [ "$txn" = "big" ]; then
      i=0
      while [ $i -lt 200 ]; do echo "A   trunk/file-$i.txt"; i=$((i+1)); done
    else
      printf 'A   trunk/new.txt\nD   trunk/old.txt\nU   tags/v1/readme.txt\n'
    fi
    ;;
  log)
    if [ "$txn" = "binary" ]; then printf '\377\376'; else printf 'story #7 import\n\n'; fi
    ;;
  author)
    printf 'alice\n'
    ;;
  cat)
    case "$path" in
      trunk/new.txt) printf 'hello world' ;;
      -notes.txt) printf 'dash leading' ;;
      tags/v1/readme.txt) printf 'release notes' ;;
      trunk/large.bin) head -c 1048576 /dev/zero ;;
      *) echo "svnlook: E160013: Path '$path' does not exist" >&2; exit 1 ;;
    esac
    ;;
  *)
    exit 2
    ;;
esac
"#;

/// Writes the fake binary into a temp dir.
fn fake_svnlook() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let binary = dir.path().join("svnlook");
    fs::write(&binary, FAKE_SVNLOOK).unwrap();
    fs::set_permissions(&binary, fs::Permissions::from_mode(0o755)).unwrap();
    (dir, binary)
}

fn svnlook(binary: &Path, max_listing_bytes: usize) -> Svnlook {
    Svnlook::new(SvnlookConfig {
        binary: binary.to_path_buf(),
        max_listing_bytes,
        max_message_bytes: 1024,
    })
}

fn repository() -> Repository {
    Repository::new(RepositoryId::from_raw(1).unwrap(), "project", "/srv/svn/project")
}

fn txn(id: &str) -> TransactionId {
    TransactionId::new(id)
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

#[test]
fn reads_listing_message_and_author() {
    let (_dir, binary) = fake_svnlook();
    let svnlook = svnlook(&binary, 4096);
    let repo = repository();

    let lines = svnlook.changed_path_lines(&repo, &txn("5-a")).unwrap();
    assert_eq!(lines, vec!["A   trunk/new.txt", "D   trunk/old.txt", "U   tags/v1/readme.txt"]);
    assert_eq!(svnlook.commit_message(&repo, &txn("5-a")).unwrap(), "story #7 import");
    assert_eq!(svnlook.author(&repo, &txn("5-a")).unwrap(), "alice");
}

#[test]
fn non_zero_exit_is_a_failure_with_diagnostics() {
    let (_dir, binary) = fake_svnlook();
    let err =
        svnlook(&binary, 4096).changed_path_lines(&repository(), &txn("missing")).unwrap_err();
    match err {
        IntrospectionError::Failed(message) => assert!(message.contains("No such transaction")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn oversized_listing_is_rejected() {
    let (_dir, binary) = fake_svnlook();
    let err = svnlook(&binary, 256).changed_path_lines(&repository(), &txn("big")).unwrap_err();
    assert!(matches!(err, IntrospectionError::InvalidOutput(message) if message.contains("256")));
}

#[test]
fn non_utf8_output_is_rejected() {
    let (_dir, binary) = fake_svnlook();
    let err = svnlook(&binary, 4096).commit_message(&repository(), &txn("binary")).unwrap_err();
    assert!(matches!(err, IntrospectionError::InvalidOutput(_)));
}

#[test]
fn heavy_stderr_does_not_stall_metadata_reads() {
    let (_dir, binary) = fake_svnlook();
    let svnlook = svnlook(&binary, 4096);
    let lines = svnlook.changed_path_lines(&repository(), &txn("noisy")).unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(svnlook.author(&repository(), &txn("noisy")).unwrap(), "alice");
}

#[test]
fn missing_binary_cannot_spawn() {
    let dir = TempDir::new().unwrap();
    let svnlook = svnlook(&dir.path().join("absent"), 4096);
    let err = svnlook.author(&repository(), &txn("1")).unwrap_err();
    assert!(matches!(err, IntrospectionError::Spawn(_)));
}

// ============================================================================
// SECTION: Content
// ============================================================================

#[test]
fn content_is_streamed() {
    let (_dir, binary) = fake_svnlook();
    let svnlook = svnlook(&binary, 4096);
    let mut stream = svnlook.file_content(&repository(), &txn("5-a"), "trunk/new.txt").unwrap();
    let mut content = String::new();
    stream.read_to_string(&mut content).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn paths_starting_with_dash_are_not_options() {
    let (_dir, binary) = fake_svnlook();
    let svnlook = svnlook(&binary, 4096);
    let mut stream = svnlook.file_content(&repository(), &txn("5-a"), "-notes.txt").unwrap();
    let mut content = String::new();
    stream.read_to_string(&mut content).unwrap();
    assert_eq!(content, "dash leading");
}

#[test]
fn heavy_stderr_does_not_stall_content_reads() {
    let (_dir, binary) = fake_svnlook();
    let svnlook = svnlook(&binary, 4096);
    let mut stream = svnlook.file_content(&repository(), &txn("noisy"), "trunk/new.txt").unwrap();
    let mut content = String::new();
    stream.read_to_string(&mut content).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn failed_cat_surfaces_at_end_of_stream() {
    let (_dir, binary) = fake_svnlook();
    let svnlook = svnlook(&binary, 4096);
    let mut stream = svnlook.file_content(&repository(), &txn("5-a"), "trunk/nope.txt").unwrap();
    let mut content = Vec::new();
    let err = stream.read_to_end(&mut content).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(err.to_string().contains("trunk/nope.txt"));
}

#[test]
fn dropping_a_partial_stream_releases_the_process() {
    let (_dir, binary) = fake_svnlook();
    let svnlook = svnlook(&binary, 4096);
    for _ in 0..3 {
        let mut stream =
            svnlook.file_content(&repository(), &txn("5-a"), "trunk/large.bin").unwrap();
        let mut head = [0_u8; 16];
        stream.read_exact(&mut head).unwrap();
        drop(stream);
    }
}

// ============================================================================
// SECTION: Gate
// ============================================================================

#[test]
fn gate_runs_against_svnlook_and_registry() {
    let (_dir, binary) = fake_svnlook();
    let registry = StaticRepositoryRegistry::new(vec![RepositoryEntry::new(
        repository(),
        ImmutableTagConfiguration::new("tags/v1", ""),
    )]);
    let gate = CommitGate::open(
        &HookInvocation::new("/srv/svn/project/", "5-a"),
        &registry,
        svnlook(&binary, 4096),
        registry.clone(),
        CollisionDetector::builtin(),
        Arc::new(NoopDiagnosticSink),
    )
    .unwrap();

    assert_eq!(gate.context().commit_info().changed_paths().len(), 3);
    assert!(matches!(gate.assert_commit_to_tag_is_allowed(), Err(GateError::CommitToTagDenied)));
    gate.assert_commit_does_not_contain_known_collision().unwrap();
}

#[test]
fn gate_reports_unreadable_transaction() {
    let (_dir, binary) = fake_svnlook();
    let registry = StaticRepositoryRegistry::new(vec![RepositoryEntry::new(
        repository(),
        ImmutableTagConfiguration::default(),
    )]);
    let result = CommitGate::open(
        &HookInvocation::new("/srv/svn/project", "missing"),
        &registry,
        svnlook(&binary, 4096),
        registry.clone(),
        CollisionDetector::builtin(),
        Arc::new(NoopDiagnosticSink),
    );
    assert!(matches!(result, Err(GateError::Introspection(_))));
}
