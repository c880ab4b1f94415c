use jornada_storage::error::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("no student is signed in")]
    NoSession,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A catalog or enrollment read failed. Callers show an empty or error view.
    #[error("failed to fetch {what}: {source}")]
    FetchFailed {
        what: &'static str,
        #[source]
        source: StorageError,
    },

    /// Another writer won a race for the same enrollment. Re-read and retry.
    #[error("enrollment changed concurrently: {key}")]
    MutationConflict { key: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl PortalError {
    pub(crate) fn fetch(what: &'static str) -> impl FnOnce(StorageError) -> PortalError {
        move |source| {
            tracing::warn!(what, error = %source, "fetch failed");
            PortalError::FetchFailed { what, source }
        }
    }
}
