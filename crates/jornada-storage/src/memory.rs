//! In-memory store.
//!
//! Honors the same write contract as the S3 store (create-if-absent,
//! update-if-match), which makes it a faithful stand-in for tests and local
//! runs.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

use jornada_core::models::catalog::{CatalogCourse, CatalogJourney};
use jornada_core::models::enrollment::{Enrollment, StudentCourse, StudentJourney};
use jornada_core::s3_keys;

use crate::error::StorageError;
use crate::store::{
    enrollment_key, sort_courses, sort_journeys, BoxFuture, CatalogStore, EnrollmentStore,
    Precondition, Versioned,
};

type PairKey = (String, String);

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    courses: BTreeMap<String, CatalogCourse>,
    journeys: BTreeMap<String, CatalogJourney>,
    student_courses: BTreeMap<PairKey, Versioned<StudentCourse>>,
    student_journeys: BTreeMap<PairKey, Versioned<StudentJourney>>,
    version: u64,
    fail_reads: bool,
}

impl Inner {
    fn next_etag(&mut self) -> String {
        self.version += 1;
        format!("\"v{}\"", self.version)
    }

    fn check_reads(&self) -> Result<(), StorageError> {
        if self.fail_reads {
            return Err(StorageError::ListObjects("memory store reads disabled".to_string()));
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish or replace a catalog course.
    pub async fn put_course(&self, course: CatalogCourse) {
        self.inner.lock().await.courses.insert(course.id.clone(), course);
    }

    /// Publish or replace a catalog journey.
    pub async fn put_journey(&self, journey: CatalogJourney) {
        self.inner.lock().await.journeys.insert(journey.id.clone(), journey);
    }

    /// Make every subsequent read fail, as an unreachable backend would.
    pub async fn set_fail_reads(&self, fail: bool) {
        self.inner.lock().await.fail_reads = fail;
    }

    /// Number of enrollment records of both kinds held for `student_id`.
    pub async fn enrollment_count(&self, student_id: &str) -> usize {
        let inner = self.inner.lock().await;
        inner.student_courses.keys().filter(|(s, _)| s == student_id).count()
            + inner.student_journeys.keys().filter(|(s, _)| s == student_id).count()
    }
}

/// Same id rules as the S3 key layout, so reads refuse what S3 would refuse.
fn checked_pair(student_id: &str, catalog_id: &str) -> Result<PairKey, StorageError> {
    Ok((
        s3_keys::check_id(student_id)?.to_string(),
        s3_keys::check_id(catalog_id)?.to_string(),
    ))
}

fn list_for<T: Clone>(map: &BTreeMap<PairKey, Versioned<T>>, student_id: &str) -> Vec<T> {
    map.iter()
        .filter(|((s, _), _)| s == student_id)
        .map(|(_, v)| v.record.clone())
        .collect()
}

fn write<T: Enrollment + Clone>(
    map: &mut BTreeMap<PairKey, Versioned<T>>,
    etag: String,
    key: String,
    record: &T,
    precondition: &Precondition,
) -> Result<Versioned<T>, StorageError> {
    let pair = (record.student_id().to_string(), record.catalog_id().to_string());
    match (precondition, map.get(&pair)) {
        (Precondition::MustNotExist, Some(_)) => return Err(StorageError::AlreadyExists { key }),
        (Precondition::IfMatch(_), None) => return Err(StorageError::NotFound { key }),
        (Precondition::IfMatch(expected), Some(current)) if current.etag != *expected => {
            return Err(StorageError::PreconditionFailed { key });
        }
        _ => {}
    }

    let stored = Versioned {
        record: record.clone(),
        etag,
    };
    map.insert(pair, stored.clone());
    tracing::debug!(key = %key, etag = %stored.etag, "enrollment written");
    Ok(stored)
}

impl CatalogStore for MemoryStore {
    fn list_active_courses(&self) -> BoxFuture<'_, Result<Vec<CatalogCourse>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner.check_reads()?;
            let mut courses: Vec<_> = inner.courses.values().filter(|c| c.active).cloned().collect();
            sort_courses(&mut courses);
            Ok(courses)
        })
    }

    fn list_active_journeys(&self) -> BoxFuture<'_, Result<Vec<CatalogJourney>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner.check_reads()?;
            let mut journeys: Vec<_> = inner.journeys.values().filter(|j| j.active).cloned().collect();
            sort_journeys(&mut journeys);
            Ok(journeys)
        })
    }

    fn get_course<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogCourse>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner.check_reads()?;
            Ok(inner.courses.get(s3_keys::check_id(id)?).cloned())
        })
    }

    fn get_journey<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogJourney>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner.check_reads()?;
            Ok(inner.journeys.get(s3_keys::check_id(id)?).cloned())
        })
    }
}

impl EnrollmentStore for MemoryStore {
    fn list_student_courses<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StudentCourse>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner.check_reads()?;
            Ok(list_for(&inner.student_courses, s3_keys::check_id(student_id)?))
        })
    }

    fn list_student_journeys<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StudentJourney>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner.check_reads()?;
            Ok(list_for(&inner.student_journeys, s3_keys::check_id(student_id)?))
        })
    }

    fn find_student_course<'a>(
        &'a self,
        student_id: &'a str,
        course_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<StudentCourse>>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner.check_reads()?;
            let pair = checked_pair(student_id, course_id)?;
            Ok(inner.student_courses.get(&pair).cloned())
        })
    }

    fn find_student_journey<'a>(
        &'a self,
        student_id: &'a str,
        journey_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<StudentJourney>>, StorageError>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            inner.check_reads()?;
            let pair = checked_pair(student_id, journey_id)?;
            Ok(inner.student_journeys.get(&pair).cloned())
        })
    }

    fn upsert_student_course<'a>(
        &'a self,
        record: &'a StudentCourse,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<StudentCourse>, StorageError>> {
        Box::pin(async move {
            let key = enrollment_key(record, s3_keys::student_course)?;
            let mut inner = self.inner.lock().await;
            let etag = inner.next_etag();
            write(&mut inner.student_courses, etag, key, record, precondition)
        })
    }

    fn upsert_student_journey<'a>(
        &'a self,
        record: &'a StudentJourney,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<StudentJourney>, StorageError>> {
        Box::pin(async move {
            let key = enrollment_key(record, s3_keys::student_journey)?;
            let mut inner = self.inner.lock().await;
            let etag = inner.next_etag();
            write(&mut inner.student_journeys, etag, key, record, precondition)
        })
    }
}
