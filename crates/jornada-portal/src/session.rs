use std::sync::Arc;

use tokio::sync::watch;

use crate::error::PortalError;

/// The signed-in student, if any.
///
/// Cloning shares the underlying state; subscribers are notified on every
/// sign-in and sign-out.
#[derive(Clone)]
pub struct Session {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session with nobody signed in.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn signed_in(student_id: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(student_id);
        session
    }

    pub fn sign_in(&self, student_id: impl Into<String>) {
        let student_id = student_id.into();
        tracing::info!(student_id = %student_id, "student signed in");
        self.tx.send_replace(Some(student_id));
    }

    pub fn sign_out(&self) {
        if self.tx.send_replace(None).is_some() {
            tracing::info!("student signed out");
        }
    }

    pub fn student_id(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn require_student(&self) -> Result<String, PortalError> {
        self.student_id().ok_or(PortalError::NoSession)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}
