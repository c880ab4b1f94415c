//! S3-backed catalog and enrollment store.
//!
//! Each record is one JSON object under the layout in
//! [`jornada_core::s3_keys`]. Enrollment creates use `If-None-Match: *` and
//! updates use `If-Match`, so S3 itself enforces one record per
//! `(student, catalog entity)` pair and rejects lost updates.

use aws_sdk_s3::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use jornada_core::models::catalog::{CatalogCourse, CatalogJourney};
use jornada_core::models::enrollment::{StudentCourse, StudentJourney};
use jornada_core::s3_keys;

use crate::error::StorageError;
use crate::objects;
use crate::state;
use crate::store::{
    enrollment_key, sort_courses, sort_journeys, BoxFuture, CatalogStore, EnrollmentStore,
    Precondition, Versioned,
};

#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Load every JSON record under `prefix`.
    ///
    /// Keys that vanish between list and get are skipped, as are records that
    /// fail to parse (logged).
    async fn list_records<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StorageError> {
        let keys = objects::list_objects(&self.client, &self.bucket, prefix).await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys.iter().filter(|k| k.ends_with(".json")) {
            match state::load_json::<T>(&self.client, &self.bucket, key).await {
                Ok((record, _)) => records.push(record),
                Err(StorageError::NotFound { .. }) => {
                    tracing::debug!(key = %key, "object removed during listing");
                }
                Err(StorageError::Serialization(e)) => {
                    tracing::warn!(key = %key, error = %e, "skipping malformed record");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(prefix, count = records.len(), "listed records");
        Ok(records)
    }

    async fn find<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Versioned<T>>, StorageError> {
        let found = state::load_json_opt::<T>(&self.client, &self.bucket, key).await?;
        Ok(found.map(|(record, etag)| Versioned { record, etag }))
    }

    async fn write<T: Serialize + Clone + Sync>(
        &self,
        key: &str,
        record: &T,
        precondition: &Precondition,
    ) -> Result<Versioned<T>, StorageError> {
        let etag = match precondition {
            Precondition::MustNotExist => {
                state::create_json(&self.client, &self.bucket, key, record).await?
            }
            Precondition::IfMatch(expected) => {
                state::save_json_if_match(&self.client, &self.bucket, key, record, expected).await?
            }
        };

        tracing::info!(key = %key, etag = %etag, "enrollment written");
        Ok(Versioned {
            record: record.clone(),
            etag,
        })
    }
}

impl CatalogStore for S3Store {
    fn list_active_courses(&self) -> BoxFuture<'_, Result<Vec<CatalogCourse>, StorageError>> {
        Box::pin(async move {
            let mut courses: Vec<CatalogCourse> =
                self.list_records(s3_keys::CATALOG_COURSES_PREFIX).await?;
            courses.retain(|c| c.active);
            sort_courses(&mut courses);
            Ok(courses)
        })
    }

    fn list_active_journeys(&self) -> BoxFuture<'_, Result<Vec<CatalogJourney>, StorageError>> {
        Box::pin(async move {
            let mut journeys: Vec<CatalogJourney> =
                self.list_records(s3_keys::CATALOG_JOURNEYS_PREFIX).await?;
            journeys.retain(|j| j.active);
            sort_journeys(&mut journeys);
            Ok(journeys)
        })
    }

    fn get_course<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogCourse>, StorageError>> {
        Box::pin(async move {
            let key = s3_keys::catalog_course(s3_keys::check_id(id)?);
            Ok(self.find(&key).await?.map(|v| v.record))
        })
    }

    fn get_journey<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogJourney>, StorageError>> {
        Box::pin(async move {
            let key = s3_keys::catalog_journey(s3_keys::check_id(id)?);
            Ok(self.find(&key).await?.map(|v| v.record))
        })
    }
}

impl EnrollmentStore for S3Store {
    fn list_student_courses<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StudentCourse>, StorageError>> {
        Box::pin(async move {
            let prefix = s3_keys::student_courses_prefix(s3_keys::check_id(student_id)?);
            self.list_records(&prefix).await
        })
    }

    fn list_student_journeys<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StudentJourney>, StorageError>> {
        Box::pin(async move {
            let prefix = s3_keys::student_journeys_prefix(s3_keys::check_id(student_id)?);
            self.list_records(&prefix).await
        })
    }

    fn find_student_course<'a>(
        &'a self,
        student_id: &'a str,
        course_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<StudentCourse>>, StorageError>> {
        Box::pin(async move {
            let key = s3_keys::student_course(
                s3_keys::check_id(student_id)?,
                s3_keys::check_id(course_id)?,
            );
            self.find(&key).await
        })
    }

    fn find_student_journey<'a>(
        &'a self,
        student_id: &'a str,
        journey_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<StudentJourney>>, StorageError>> {
        Box::pin(async move {
            let key = s3_keys::student_journey(
                s3_keys::check_id(student_id)?,
                s3_keys::check_id(journey_id)?,
            );
            self.find(&key).await
        })
    }

    fn upsert_student_course<'a>(
        &'a self,
        record: &'a StudentCourse,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<StudentCourse>, StorageError>> {
        Box::pin(async move {
            let key = enrollment_key(record, s3_keys::student_course)?;
            self.write(&key, record, precondition).await
        })
    }

    fn upsert_student_journey<'a>(
        &'a self,
        record: &'a StudentJourney,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<StudentJourney>, StorageError>> {
        Box::pin(async move {
            let key = enrollment_key(record, s3_keys::student_journey)?;
            self.write(&key, record, precondition).await
        })
    }
}
