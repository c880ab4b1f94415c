//! Store interfaces consumed by the portal.
//!
//! Catalog reads are student-agnostic. Enrollment writes carry an explicit
//! [`Precondition`]: creates must not find an existing record, updates must
//! match the version that was read. Implementations enforce both atomically.

use std::future::Future;
use std::pin::Pin;

use jornada_core::models::catalog::{CatalogCourse, CatalogJourney};
use jornada_core::models::enrollment::{Enrollment, StudentCourse, StudentJourney};
use jornada_core::s3_keys;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A record together with the version tag it was read or written at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub record: T,
    pub etag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// Create only. Fails with `AlreadyExists` if a record is present.
    MustNotExist,
    /// Update only. Fails with `PreconditionFailed` if the stored version differs.
    IfMatch(String),
}

pub trait CatalogStore: Send + Sync {
    /// Active courses ordered by name.
    fn list_active_courses(&self) -> BoxFuture<'_, Result<Vec<CatalogCourse>, StorageError>>;

    /// Active journeys ordered by title.
    fn list_active_journeys(&self) -> BoxFuture<'_, Result<Vec<CatalogJourney>, StorageError>>;

    /// A course by id, active or not. None = doesn't exist.
    fn get_course<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogCourse>, StorageError>>;

    /// A journey by id, active or not. None = doesn't exist.
    fn get_journey<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogJourney>, StorageError>>;
}

pub trait EnrollmentStore: Send + Sync {
    fn list_student_courses<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StudentCourse>, StorageError>>;

    fn list_student_journeys<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StudentJourney>, StorageError>>;

    fn find_student_course<'a>(
        &'a self,
        student_id: &'a str,
        course_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<StudentCourse>>, StorageError>>;

    fn find_student_journey<'a>(
        &'a self,
        student_id: &'a str,
        journey_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<StudentJourney>>, StorageError>>;

    fn upsert_student_course<'a>(
        &'a self,
        record: &'a StudentCourse,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<StudentCourse>, StorageError>>;

    fn upsert_student_journey<'a>(
        &'a self,
        record: &'a StudentJourney,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<StudentJourney>, StorageError>>;
}

/// Check a record is fit to persist and return its key.
pub(crate) fn enrollment_key<E: Enrollment>(
    record: &E,
    key_fn: fn(&str, &str) -> String,
) -> Result<String, StorageError> {
    let student_id = s3_keys::check_id(record.student_id())?;
    let catalog_id = s3_keys::check_id(record.catalog_id())?;
    record.validate()?;
    Ok(key_fn(student_id, catalog_id))
}

pub(crate) fn sort_courses(courses: &mut [CatalogCourse]) {
    courses.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

pub(crate) fn sort_journeys(journeys: &mut [CatalogJourney]) {
    journeys.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
}
