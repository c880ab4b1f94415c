use std::sync::Arc;

use jornada_portal::portal::StudentPortal;
use jornada_portal::session::Session;
use jornada_storage::store::{CatalogStore, EnrollmentStore};

use crate::middleware::auth::{AuthUser, TokenVerifier};

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub enrollments: Arc<dyn EnrollmentStore>,
    pub verifier: TokenVerifier,
}

impl AppState {
    /// A portal signed in as the caller. Lives for one request.
    pub fn portal(&self, user: &AuthUser) -> StudentPortal {
        StudentPortal::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.enrollments),
            Session::signed_in(user.sub.clone()),
        )
    }
}
