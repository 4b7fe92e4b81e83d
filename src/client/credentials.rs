//! Bearer token resolution: task-local overrides on top of a stored default.

use std::future::Future;

use parking_lot::RwLock;

tokio::task_local! {
    static TOKEN_OVERRIDE: String;
}

/// Override visible to the current task, if any.
///
/// Overrides follow the task that polls the future passed to [`with_token`], not the
/// OS thread, so they survive `.await` points and worker migration. Tasks started
/// with `tokio::spawn` do not inherit them.
pub fn current_override() -> Option<String> {
    TOKEN_OVERRIDE.try_with(Clone::clone).ok()
}

/// Run `future` with `token` as the active override.
///
/// The enclosing override (or none) becomes visible again when `future` completes,
/// fails, or is dropped before completion.
pub async fn with_token<F: Future>(token: impl Into<String>, future: F) -> F::Output {
    TOKEN_OVERRIDE.scope(token.into(), future).await
}

/// Synchronous variant of [`with_token`].
pub fn with_token_sync<R>(token: impl Into<String>, f: impl FnOnce() -> R) -> R {
    TOKEN_OVERRIDE.sync_scope(token.into(), f)
}

/// Stored default token shared by every clone of a client.
///
/// Writes are expected from a single logical owner; concurrent writers race and the
/// last one wins.
#[derive(Debug, Default)]
pub(crate) struct CredentialStore {
    stored: RwLock<Option<String>>,
}

impl CredentialStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            stored: RwLock::new(token),
        }
    }

    pub fn stored(&self) -> Option<String> {
        self.stored.read().clone()
    }

    pub fn set(&self, token: String) {
        *self.stored.write() = Some(token);
        tracing::debug!("stored bearer token replaced");
    }

    pub fn clear(&self) {
        if self.stored.write().take().is_some() {
            tracing::debug!("stored bearer token cleared");
        }
    }

    /// Token for the next request: explicit, then override, then stored default.
    pub fn resolve(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_owned)
            .or_else(current_override)
            .or_else(|| self.stored())
    }
}
