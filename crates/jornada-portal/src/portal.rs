//! Session-gated facade over the readers, the projector and the mutator.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use jornada_core::bookmark::{BookmarkChange, SaveResult};
use jornada_core::models::catalog::{CatalogCourse, CatalogEntity, CatalogJourney};
use jornada_core::models::enrollment::{Enrollment, StudentCourse, StudentJourney};
use jornada_core::projection::{project, Views};
use jornada_storage::store::{CatalogStore, EnrollmentStore};

use crate::detail::JourneyDetail;
use crate::error::PortalError;
use crate::mutator::{self, Enrolled};
use crate::readers;
use crate::session::Session;

/// A catalog slice and the student's enrollments of the same kind, as fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Board<C, E> {
    pub catalog: Vec<C>,
    pub enrollments: Vec<E>,
}

impl<C: CatalogEntity, E: Enrollment> Board<C, E> {
    pub fn views(&self) -> Views<'_, C, E> {
        project(&self.catalog, &self.enrollments)
    }
}

pub type CourseBoard = Board<CatalogCourse, StudentCourse>;

pub type JourneyBoard = Board<CatalogJourney, StudentJourney>;

/// Enrollment slices for the current student. Dropped whenever the session
/// changes.
struct EnrollmentCache {
    session: watch::Receiver<Option<String>>,
    student_id: Option<String>,
    courses: Option<Vec<StudentCourse>>,
    journeys: Option<Vec<StudentJourney>>,
}

impl EnrollmentCache {
    fn sync(&mut self, student_id: &str) {
        let changed = self.session.has_changed().unwrap_or(true);
        if changed {
            self.session.borrow_and_update();
        }
        if changed || self.student_id.as_deref() != Some(student_id) {
            if self.courses.is_some() || self.journeys.is_some() {
                tracing::debug!("session changed, dropping cached enrollments");
            }
            self.student_id = Some(student_id.to_string());
            self.courses = None;
            self.journeys = None;
        }
    }
}

trait Cached: Enrolled {
    fn slot(cache: &mut EnrollmentCache) -> &mut Option<Vec<Self>>;
}

impl Cached for StudentCourse {
    fn slot(cache: &mut EnrollmentCache) -> &mut Option<Vec<Self>> {
        &mut cache.courses
    }
}

impl Cached for StudentJourney {
    fn slot(cache: &mut EnrollmentCache) -> &mut Option<Vec<Self>> {
        &mut cache.journeys
    }
}

pub struct StudentPortal {
    catalog: Arc<dyn CatalogStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    session: Session,
    cache: Mutex<EnrollmentCache>,
}

impl StudentPortal {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        session: Session,
    ) -> Self {
        let cache = EnrollmentCache {
            session: session.subscribe(),
            student_id: None,
            courses: None,
            journeys: None,
        };
        Self {
            catalog,
            enrollments,
            session,
            cache: Mutex::new(cache),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn course_board(&self) -> Result<CourseBoard, PortalError> {
        let student_id = self.session.require_student()?;
        let catalog = readers::read_courses(self.catalog.as_ref()).await?;
        let enrollments = self.enrollments_of::<StudentCourse>(&student_id).await?;
        Ok(Board {
            catalog,
            enrollments,
        })
    }

    pub async fn journey_board(&self) -> Result<JourneyBoard, PortalError> {
        let student_id = self.session.require_student()?;
        let catalog = readers::read_journeys(self.catalog.as_ref()).await?;
        let enrollments = self.enrollments_of::<StudentJourney>(&student_id).await?;
        Ok(Board {
            catalog,
            enrollments,
        })
    }

    pub async fn toggle_course_bookmark(
        &self,
        course_id: &str,
    ) -> Result<BookmarkChange<StudentCourse>, PortalError> {
        self.toggle::<StudentCourse>(course_id).await
    }

    pub async fn toggle_journey_bookmark(
        &self,
        journey_id: &str,
    ) -> Result<BookmarkChange<StudentJourney>, PortalError> {
        self.toggle::<StudentJourney>(journey_id).await
    }

    pub async fn save_course(&self, course_id: &str) -> Result<SaveResult<StudentCourse>, PortalError> {
        self.save::<StudentCourse>(course_id).await
    }

    pub async fn save_journey(
        &self,
        journey_id: &str,
    ) -> Result<SaveResult<StudentJourney>, PortalError> {
        self.save::<StudentJourney>(journey_id).await
    }

    /// Detail for a journey, addressed by its catalog id or by the id of the
    /// student's enrollment in it.
    pub async fn journey_detail(&self, id: &str) -> Result<JourneyDetail, PortalError> {
        let student_id = self.session.require_student()?;
        let journeys = self.enrollments_of::<StudentJourney>(&student_id).await?;

        let by_enrollment = Uuid::parse_str(id)
            .ok()
            .and_then(|uuid| journeys.iter().find(|j| j.id == uuid));
        let journey_id = match by_enrollment {
            Some(enrollment) => enrollment.journey_id.clone(),
            None => id.to_string(),
        };

        let journey =
            readers::read_entity::<StudentJourney>(self.catalog.as_ref(), &journey_id).await?;
        let enrollment = journeys.iter().find(|j| j.journey_id == journey_id).cloned();
        let courses = self.enrollments_of::<StudentCourse>(&student_id).await?;

        Ok(JourneyDetail::compose(journey, enrollment, &courses, &journeys))
    }

    async fn toggle<E>(&self, catalog_id: &str) -> Result<BookmarkChange<E>, PortalError>
    where
        E: Cached,
        E::Entity: Clone + Send + Sync,
    {
        let student_id = self.session.require_student()?;
        let entity = readers::read_entity::<E>(self.catalog.as_ref(), catalog_id).await?;
        let change =
            mutator::toggle_bookmark::<E>(self.enrollments.as_ref(), &student_id, &entity).await?;
        self.refresh::<E>(&student_id).await;
        Ok(change)
    }

    async fn save<E>(&self, catalog_id: &str) -> Result<SaveResult<E>, PortalError>
    where
        E: Cached,
        E::Entity: Clone + Send + Sync,
    {
        let student_id = self.session.require_student()?;
        let entity = readers::read_entity::<E>(self.catalog.as_ref(), catalog_id).await?;
        let result = mutator::save::<E>(self.enrollments.as_ref(), &student_id, &entity).await?;
        self.refresh::<E>(&student_id).await;
        Ok(result)
    }

    async fn enrollments_of<E: Cached>(&self, student_id: &str) -> Result<Vec<E>, PortalError> {
        let mut cache = self.cache.lock().await;
        cache.sync(student_id);
        if let Some(records) = E::slot(&mut cache) {
            return Ok(records.clone());
        }

        let records = readers::read_enrollments::<E>(self.enrollments.as_ref(), student_id).await?;
        *E::slot(&mut cache) = Some(records.clone());
        Ok(records)
    }

    /// Re-fetch a slice after a write so the next read sees it. A failed
    /// re-fetch leaves the slice empty, to be fetched again on next read.
    async fn refresh<E: Cached>(&self, student_id: &str) {
        let mut cache = self.cache.lock().await;
        cache.sync(student_id);
        *E::slot(&mut cache) = None;

        match readers::read_enrollments::<E>(self.enrollments.as_ref(), student_id).await {
            Ok(records) => *E::slot(&mut cache) = Some(records),
            Err(e) => tracing::warn!(kind = E::KIND, error = %e, "re-fetch after write failed"),
        }
    }
}
