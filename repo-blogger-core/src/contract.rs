//! # contract: capability seams between the pipeline and the outside world
//!
//! The pipeline itself is pure string work. Everything that touches a network
//! or a database sits behind one of the traits below so the orchestrator can
//! be driven by real clients or by `mockall` mocks.
//!
//! - [`Collector`] turns a repository URL into a [`Snapshot`]. It cannot fail:
//!   collection problems degrade to an empty snapshot.
//! - [`Store`] persists records and reports a [`StoreStatus`] instead of an
//!   error, so an absent or broken database never stops a run.
//! - [`Publisher`] pushes rendered HTML to a blog platform and reports a
//!   [`PublishOutcome`].
//!
//! Mocks are generated for tests and, with the `test-export-mocks` feature,
//! for dependent crates.

use async_trait::async_trait;
use serde_json::Value;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::model::{QueuedPrompt, Snapshot};

/// Boxed error used at the async trait seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single persistence call.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreStatus {
    /// The row was accepted; carries whatever the backend returned.
    Ok(Value),
    /// The backend rejected the row or could not be reached.
    Error(String),
    /// No backing store is configured.
    NotConfigured,
}

impl StoreStatus {
    /// Short tag for logs and reports: `ok`, `error` or `noop`.
    pub fn tag(&self) -> &'static str {
        match self {
            StoreStatus::Ok(_) => "ok",
            StoreStatus::Error(_) => "error",
            StoreStatus::NotConfigured => "noop",
        }
    }
}

/// Result of a single publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Accepted by the target; the canonical link if the target returned one.
    Published(Option<String>),
    Failed(String),
    NotConfigured,
}

impl PublishOutcome {
    pub fn link(&self) -> Option<&str> {
        match self {
            PublishOutcome::Published(link) => link.as_deref(),
            _ => None,
        }
    }
}

/// Collects a [`Snapshot`] for a repository URL.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Collector: Send + Sync {
    /// Never fails; unreachable or unreadable repositories yield an empty snapshot.
    async fn collect(&self, repo_url: &str) -> Snapshot;
}

/// Table-oriented persistence.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert one record into `table`.
    async fn insert(&self, table: &str, record: Value) -> StoreStatus;

    /// Prompts still waiting for an image worker. Empty when no store is configured.
    async fn fetch_waiting_prompts(&self) -> Result<Vec<QueuedPrompt>, BoxError>;
}

/// A blog platform the rendered article can be pushed to.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Target name used in logs (e.g. `wordpress`).
    fn name(&self) -> &'static str;

    async fn publish(&self, title: &str, html: &str) -> PublishOutcome;
}
