//! The enrollment mutator: bookmark toggle and first-time save.
//!
//! Both are read-then-write against the enrollment store. The write carries a
//! precondition, so a concurrent writer (another tab, another device) makes
//! it fail instead of silently producing a second record or losing an update.
//! A lost create is retried once as an update with the same intent.

use jiff::Timestamp;

use jornada_core::bookmark::{self, BookmarkChange, SaveOutcome, SaveResult, ToggleOutcome};
use jornada_core::models::catalog::{CatalogCourse, CatalogEntity, CatalogJourney};
use jornada_core::models::enrollment::{Enrollment, StudentCourse, StudentJourney};
use jornada_storage::error::StorageError;
use jornada_storage::store::{BoxFuture, CatalogStore, EnrollmentStore, Precondition, Versioned};

use crate::error::PortalError;

/// Dispatch from an enrollment type to the store operations for its kind.
pub trait Enrolled: Enrollment + Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn get_entity<'a>(
        store: &'a dyn CatalogStore,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Self::Entity>, StorageError>>;

    fn list<'a>(
        store: &'a dyn EnrollmentStore,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Self>, StorageError>>;

    fn find<'a>(
        store: &'a dyn EnrollmentStore,
        student_id: &'a str,
        catalog_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<Self>>, StorageError>>;

    fn upsert<'a>(
        store: &'a dyn EnrollmentStore,
        record: &'a Self,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<Self>, StorageError>>;
}

impl Enrolled for StudentCourse {
    const KIND: &'static str = "course";

    fn get_entity<'a>(
        store: &'a dyn CatalogStore,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogCourse>, StorageError>> {
        store.get_course(id)
    }

    fn list<'a>(
        store: &'a dyn EnrollmentStore,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Self>, StorageError>> {
        store.list_student_courses(student_id)
    }

    fn find<'a>(
        store: &'a dyn EnrollmentStore,
        student_id: &'a str,
        catalog_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<Self>>, StorageError>> {
        store.find_student_course(student_id, catalog_id)
    }

    fn upsert<'a>(
        store: &'a dyn EnrollmentStore,
        record: &'a Self,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<Self>, StorageError>> {
        store.upsert_student_course(record, precondition)
    }
}

impl Enrolled for StudentJourney {
    const KIND: &'static str = "journey";

    fn get_entity<'a>(
        store: &'a dyn CatalogStore,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<CatalogJourney>, StorageError>> {
        store.get_journey(id)
    }

    fn list<'a>(
        store: &'a dyn EnrollmentStore,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Self>, StorageError>> {
        store.list_student_journeys(student_id)
    }

    fn find<'a>(
        store: &'a dyn EnrollmentStore,
        student_id: &'a str,
        catalog_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<Self>>, StorageError>> {
        store.find_student_journey(student_id, catalog_id)
    }

    fn upsert<'a>(
        store: &'a dyn EnrollmentStore,
        record: &'a Self,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<Self>, StorageError>> {
        store.upsert_student_journey(record, precondition)
    }
}

/// Toggle the student's bookmark on `entity`, creating the enrollment on
/// first use.
pub async fn toggle_bookmark<E>(
    store: &dyn EnrollmentStore,
    student_id: &str,
    entity: &E::Entity,
) -> Result<BookmarkChange<E>, PortalError>
where
    E: Enrolled,
    E::Entity: Clone + Send + Sync,
{
    let catalog_id = entity.id();
    let existing = E::find(store, student_id, catalog_id)
        .await
        .map_err(PortalError::fetch("enrollment"))?;
    let current = existing.as_ref().map(|v| &v.record);
    let desired = bookmark::toggle_target(current);
    let change = bookmark::plan_toggle(current, student_id, entity, Timestamp::now());

    let precondition = match &existing {
        None => Precondition::MustNotExist,
        Some(v) => Precondition::IfMatch(v.etag.clone()),
    };

    match E::upsert(store, &change.record, &precondition).await {
        Ok(saved) => {
            tracing::info!(
                kind = E::KIND,
                student_id,
                catalog_id,
                outcome = ?change.outcome,
                bookmarked = saved.record.is_bookmarked(),
                "bookmark toggled"
            );
            Ok(BookmarkChange {
                outcome: change.outcome,
                record: saved.record,
            })
        }
        Err(StorageError::AlreadyExists { key }) => {
            tracing::warn!(kind = E::KIND, key = %key, "enrollment created concurrently, retrying as update");
            apply_bookmark::<E>(store, student_id, catalog_id, desired, key).await
        }
        Err(StorageError::PreconditionFailed { key }) => {
            tracing::warn!(kind = E::KIND, key = %key, "bookmark toggle lost to a concurrent update");
            Err(PortalError::MutationConflict { key })
        }
        Err(e) => Err(e.into()),
    }
}

/// Bring an existing enrollment's bookmark to `desired`. Used after a lost
/// create, when the record the other writer made is now the one to update.
async fn apply_bookmark<E>(
    store: &dyn EnrollmentStore,
    student_id: &str,
    catalog_id: &str,
    desired: bool,
    key: String,
) -> Result<BookmarkChange<E>, PortalError>
where
    E: Enrolled,
    E::Entity: Clone + Send + Sync,
{
    let Some(current) = E::find(store, student_id, catalog_id)
        .await
        .map_err(PortalError::fetch("enrollment"))?
    else {
        return Err(PortalError::MutationConflict { key });
    };

    if current.record.is_bookmarked() == desired {
        return Ok(BookmarkChange {
            outcome: ToggleOutcome::Updated,
            record: current.record,
        });
    }

    let mut record = current.record.clone();
    record.set_bookmarked(desired, Timestamp::now());
    match E::upsert(store, &record, &Precondition::IfMatch(current.etag)).await {
        Ok(saved) => {
            tracing::info!(kind = E::KIND, student_id, catalog_id, "bookmark applied after retry");
            Ok(BookmarkChange {
                outcome: ToggleOutcome::Updated,
                record: saved.record,
            })
        }
        Err(StorageError::AlreadyExists { key } | StorageError::PreconditionFailed { key }) => {
            Err(PortalError::MutationConflict { key })
        }
        Err(e) => Err(e.into()),
    }
}

/// Enroll the student in `entity` as a saved item, unless already enrolled.
/// An existing enrollment is returned untouched.
pub async fn save<E>(
    store: &dyn EnrollmentStore,
    student_id: &str,
    entity: &E::Entity,
) -> Result<SaveResult<E>, PortalError>
where
    E: Enrolled,
    E::Entity: Clone + Send + Sync,
{
    let catalog_id = entity.id();
    if let Some(existing) = E::find(store, student_id, catalog_id)
        .await
        .map_err(PortalError::fetch("enrollment"))?
    {
        tracing::debug!(kind = E::KIND, student_id, catalog_id, "already saved");
        return Ok(SaveResult {
            outcome: SaveOutcome::AlreadySaved,
            record: existing.record,
        });
    }

    let record = E::enroll(student_id, entity, Timestamp::now());
    match E::upsert(store, &record, &Precondition::MustNotExist).await {
        Ok(saved) => {
            tracing::info!(kind = E::KIND, student_id, catalog_id, "saved");
            Ok(SaveResult {
                outcome: SaveOutcome::Created,
                record: saved.record,
            })
        }
        Err(StorageError::AlreadyExists { key }) => {
            let current = E::find(store, student_id, catalog_id)
                .await
                .map_err(PortalError::fetch("enrollment"))?
                .ok_or(PortalError::MutationConflict { key })?;
            Ok(SaveResult {
                outcome: SaveOutcome::AlreadySaved,
                record: current.record,
            })
        }
        Err(e) => Err(e.into()),
    }
}
