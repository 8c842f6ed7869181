//! Detached background sync tasks.
//!
//! Every collection mutation made while authenticated schedules its remote
//! call here: spawned, never awaited, never retried. The structured log is
//! the only observable effect of a failure; local state is never rolled
//! back. Tasks in flight at the same time race freely - ordering at the
//! server is not this client's concern.

use std::future::Future;

use tracing::{debug, warn};

use crate::api::ApiError;

/// Spawn a fire-and-forget remote call.
///
/// Outside an async runtime (plain unit tests, mostly) there is nothing to
/// spawn onto; the sync is skipped and logged, matching the usual
/// degraded-but-working posture of this client.
pub(crate) fn spawn_remote<F>(collection: &'static str, op: &'static str, fut: F)
where
    F: Future<Output = Result<(), ApiError>> + Send + 'static,
{
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        debug!(collection, op, "no async runtime; skipping remote sync");
        return;
    };

    handle.spawn(async move {
        match fut.await {
            Ok(()) => debug!(collection, op, "remote sync applied"),
            Err(error) => {
                warn!(collection, op, %error, "remote sync failed; keeping local state");
            }
        }
    });
}
