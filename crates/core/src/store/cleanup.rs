//! Best-effort cleanup of unreferenced blobs.
//!
//! The durable card record is the source of truth; the blob store is
//! advisory. A sweep never errors: every blob is handled independently and
//! every outcome is collected, so one blob's failure cannot abort or mask
//! another's. Failures are logged for manual remediation, never retried.

use std::collections::BTreeSet;

use futures::future::join_all;
use tracing::{debug, error};

use super::blob::BlobOps;

/// Outcome of sweeping one blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobOutcome {
    /// The blob existed and was deleted.
    Deleted,
    /// The blob was already absent (idempotent no-op, counted as success).
    AlreadyAbsent,
    /// Deletion failed; the blob may still exist.
    Failed(String),
}

impl BlobOutcome {
    /// Whether this outcome counts as success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Deleted | Self::AlreadyAbsent)
    }
}

/// Collected outcomes of one cleanup pass.
#[derive(Debug, Default)]
pub struct CleanupReport {
    outcomes: Vec<(String, BlobOutcome)>,
}

impl CleanupReport {
    /// All per-blob outcomes, in blob-name order.
    #[must_use]
    pub fn outcomes(&self) -> &[(String, BlobOutcome)] {
        &self.outcomes
    }

    /// Number of blobs handled successfully (deleted or already absent).
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_success())
            .count()
    }

    /// Number of blobs whose deletion failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Delete a set of blobs, independently and concurrently.
///
/// Dispatched after - never before - the owning record's mutation has been
/// committed and acknowledged to the caller. The pass itself never errors;
/// if the store is entirely unreachable it degrades to a logged no-op.
pub async fn delete_blobs<S: BlobOps>(store: &S, names: BTreeSet<String>) -> CleanupReport {
    let sweeps = names.into_iter().map(|name| async move {
        let outcome = sweep_one(store, &name).await;
        (name, outcome)
    });

    let report = CleanupReport {
        outcomes: join_all(sweeps).await,
    };
    debug!(
        deleted = report.succeeded(),
        failed = report.failed(),
        "blob cleanup pass finished"
    );
    report
}

async fn sweep_one<S: BlobOps>(store: &S, name: &str) -> BlobOutcome {
    match store.exists(name).await {
        Ok(false) => return BlobOutcome::AlreadyAbsent,
        Ok(true) => {}
        Err(e) => {
            // Cannot confirm existence: attempt the delete anyway, it is
            // idempotent and accepts not-found as success.
            debug!(blob = %name, error = %e, "existence check failed, attempting delete");
        }
    }

    match store.delete(name).await {
        Ok(()) => BlobOutcome::Deleted,
        Err(e) => {
            error!(blob = %name, operation = "delete", error = %e, "blob cleanup failed");
            BlobOutcome::Failed(e.to_string())
        }
    }
}
