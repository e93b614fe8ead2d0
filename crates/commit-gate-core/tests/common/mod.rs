// crates/commit-gate-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: In-memory fakes for every gate collaborator.
// Purpose: Reduce duplication across integration tests for commit-gate-core.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io;
use std::io::Cursor;
use std::io::Read;
use std::num::NonZeroU64;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use commit_gate_core::CollisionDetector;
use commit_gate_core::CommitGate;
use commit_gate_core::CommitMessageValidator;
use commit_gate_core::GateError;
use commit_gate_core::HookInvocation;
use commit_gate_core::ImmutableTagConfiguration;
use commit_gate_core::ImmutableTagStore;
use commit_gate_core::IntrospectionError;
use commit_gate_core::MemoryDiagnosticSink;
use commit_gate_core::ReferenceError;
use commit_gate_core::Repository;
use commit_gate_core::RepositoryError;
use commit_gate_core::RepositoryId;
use commit_gate_core::RepositoryResolver;
use commit_gate_core::TagStoreError;
use commit_gate_core::TransactionId;
use commit_gate_core::TransactionIntrospector;

/// Repository path used by every fixture.
pub const REPO_PATH: &str = "/var/lib/svn/project";

/// Transaction identifier used by every fixture.
pub const TXN: &str = "12-c";

/// Returns the fixture repository.
pub fn repository() -> Repository {
    Repository::new(RepositoryId::new(NonZeroU64::MIN), "project", REPO_PATH)
}

/// Returns the fixture hook invocation.
pub fn invocation() -> HookInvocation {
    HookInvocation::new(REPO_PATH, TXN)
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolver knowing a single repository.
pub struct FakeResolver {
    pub repository: Repository,
}

impl Default for FakeResolver {
    fn default() -> Self {
        Self {
            repository: repository(),
        }
    }
}

impl RepositoryResolver for FakeResolver {
    fn resolve_by_path(&self, path: &Path) -> Result<Repository, RepositoryError> {
        if path == self.repository.path() {
            Ok(self.repository.clone())
        } else {
            Err(RepositoryError::NotFound(path.display().to_string()))
        }
    }
}

// ============================================================================
// SECTION: Introspector
// ============================================================================

/// Shared counters observed by tests after the gate consumed the fake.
#[derive(Clone, Default)]
pub struct Probe {
    pub listing_calls: Arc<AtomicUsize>,
    pub message_calls: Arc<AtomicUsize>,
    pub author_calls: Arc<AtomicUsize>,
    pub opened: Arc<Mutex<Vec<String>>>,
    pub released: Arc<AtomicUsize>,
}

impl Probe {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// Introspector serving fixed lines and file contents.
#[derive(Default)]
pub struct FakeIntrospector {
    pub lines: Vec<String>,
    pub message: String,
    pub author: String,
    pub files: BTreeMap<String, Vec<u8>>,
    pub unreadable: BTreeSet<String>,
    pub failing_streams: BTreeSet<String>,
    pub listing_error: bool,
    pub probe: Probe,
}

impl FakeIntrospector {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(ToString::to_string).collect(),
            message: "story #1 initial import".to_string(),
            author: "alice".to_string(),
            ..Self::default()
        }
    }

    pub fn file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.insert(path.to_string(), content.to_vec());
        self
    }
}

/// Stream counting its own release.
pub struct TrackedStream {
    inner: Cursor<Vec<u8>>,
    fail: bool,
    released: Arc<AtomicUsize>,
}

impl Read for TrackedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::other("stream broke"));
        }
        self.inner.read(buf)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl TransactionIntrospector for FakeIntrospector {
    fn changed_path_lines(
        &self,
        _repository: &Repository,
        _transaction: &TransactionId,
    ) -> Result<Vec<String>, IntrospectionError> {
        self.probe.listing_calls.fetch_add(1, Ordering::SeqCst);
        if self.listing_error {
            return Err(IntrospectionError::Failed("svnlook: no such transaction".to_string()));
        }
        Ok(self.lines.clone())
    }

    fn commit_message(
        &self,
        _repository: &Repository,
        _transaction: &TransactionId,
    ) -> Result<String, IntrospectionError> {
        self.probe.message_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.message.clone())
    }

    fn author(
        &self,
        _repository: &Repository,
        _transaction: &TransactionId,
    ) -> Result<String, IntrospectionError> {
        self.probe.author_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.author.clone())
    }

    fn file_content<'a>(
        &'a self,
        _repository: &Repository,
        _transaction: &TransactionId,
        path: &str,
    ) -> Result<Box<dyn Read + 'a>, IntrospectionError> {
        self.probe.opened.lock().unwrap().push(path.to_string());
        if self.unreadable.contains(path) {
            return Err(IntrospectionError::Failed(format!("path '{path}' not found")));
        }
        let content = self.files.get(path).cloned().unwrap_or_default();
        Ok(Box::new(TrackedStream {
            inner: Cursor::new(content),
            fail: self.failing_streams.contains(path),
            released: Arc::clone(&self.probe.released),
        }))
    }
}

// ============================================================================
// SECTION: Tag Store
// ============================================================================

/// Tag store returning one configuration.
#[derive(Default)]
pub struct FakeTagStore {
    pub config: ImmutableTagConfiguration,
    pub broken: bool,
}

impl FakeTagStore {
    pub fn new(paths: &str, whitelist: &str) -> Self {
        Self {
            config: ImmutableTagConfiguration::new(paths, whitelist),
            broken: false,
        }
    }
}

impl ImmutableTagStore for FakeTagStore {
    fn immutable_tags(
        &self,
        _repository: &Repository,
    ) -> Result<ImmutableTagConfiguration, TagStoreError> {
        if self.broken {
            return Err(TagStoreError::Backend("database unavailable".to_string()));
        }
        Ok(self.config.clone())
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Validator requiring a fixed substring.
pub struct RequiresSubstring(pub &'static str);

impl CommitMessageValidator for RequiresSubstring {
    fn validate(&self, _repository: &Repository, message: &str) -> Result<(), ReferenceError> {
        if message.contains(self.0) {
            Ok(())
        } else {
            Err(ReferenceError::InvalidReference(format!("message must reference {}", self.0)))
        }
    }
}

// ============================================================================
// SECTION: Gate Builders
// ============================================================================

/// Opens a gate over the fakes with the builtin detector.
pub fn open_gate(
    introspector: FakeIntrospector,
    tags: FakeTagStore,
) -> Result<(CommitGate<FakeIntrospector, FakeTagStore>, Arc<MemoryDiagnosticSink>), GateError> {
    open_gate_with(introspector, tags, CollisionDetector::builtin())
}

/// Opens a gate over the fakes with a custom detector.
pub fn open_gate_with(
    introspector: FakeIntrospector,
    tags: FakeTagStore,
    detector: CollisionDetector,
) -> Result<(CommitGate<FakeIntrospector, FakeTagStore>, Arc<MemoryDiagnosticSink>), GateError> {
    let sink = Arc::new(MemoryDiagnosticSink::new());
    let gate = CommitGate::open(
        &invocation(),
        &FakeResolver::default(),
        introspector,
        tags,
        detector,
        sink.clone(),
    )?;
    Ok((gate, sink))
}
