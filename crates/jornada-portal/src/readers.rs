//! Catalog and enrollment readers.
//!
//! Every read failure becomes `PortalError::FetchFailed`, which callers turn
//! into an empty or error view.

use jornada_core::models::catalog::{CatalogCourse, CatalogJourney};
use jornada_storage::store::{CatalogStore, EnrollmentStore};

use crate::error::PortalError;
use crate::mutator::Enrolled;

pub async fn read_courses(store: &dyn CatalogStore) -> Result<Vec<CatalogCourse>, PortalError> {
    let courses = store
        .list_active_courses()
        .await
        .map_err(PortalError::fetch("courses"))?;
    tracing::debug!(count = courses.len(), "read active courses");
    Ok(courses)
}

pub async fn read_journeys(store: &dyn CatalogStore) -> Result<Vec<CatalogJourney>, PortalError> {
    let journeys = store
        .list_active_journeys()
        .await
        .map_err(PortalError::fetch("journeys"))?;
    tracing::debug!(count = journeys.len(), "read active journeys");
    Ok(journeys)
}

/// One catalog entity of `E`'s kind, or `NotFound`.
pub async fn read_entity<E: Enrolled>(
    store: &dyn CatalogStore,
    id: &str,
) -> Result<E::Entity, PortalError> {
    E::get_entity(store, id)
        .await
        .map_err(PortalError::fetch(E::KIND))?
        .ok_or_else(|| PortalError::NotFound {
            kind: E::KIND,
            id: id.to_string(),
        })
}

pub async fn read_enrollments<E: Enrolled>(
    store: &dyn EnrollmentStore,
    student_id: &str,
) -> Result<Vec<E>, PortalError> {
    let records = E::list(store, student_id)
        .await
        .map_err(PortalError::fetch("enrollments"))?;
    tracing::debug!(kind = E::KIND, student_id, count = records.len(), "read enrollments");
    Ok(records)
}
