#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jornada_core::models::catalog::{CatalogCourse, CatalogJourney};
use jornada_core::models::enrollment::{StudentCourse, StudentJourney};
use jornada_core::models::step_ref::{CourseStepRef, JourneyStepRef};
use jornada_storage::error::StorageError;
use jornada_storage::memory::MemoryStore;
use jornada_storage::store::{BoxFuture, EnrollmentStore, Precondition, Versioned};

pub fn grammar_basics() -> CatalogCourse {
    course("c1", "Grammar Basics")
}

pub fn course(id: &str, name: &str) -> CatalogCourse {
    CatalogCourse {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(format!("About {name}")),
        level: Some("A2".to_string()),
        duration_minutes: 45,
        first_lesson_label: Some("Lesson 1".to_string()),
        cover_url: None,
        company_logo_url: None,
        active: true,
    }
}

pub fn business_english() -> CatalogJourney {
    CatalogJourney {
        id: "j1".to_string(),
        title: "Business English".to_string(),
        description: Some("Emails, calls and meetings".to_string()),
        cover_url: Some("https://cdn.example.com/j1.jpg".to_string()),
        duration_hours: 10,
        number_of_steps: 3,
        course_steps: vec![
            CourseStepRef {
                id: Some("c1".to_string()),
                title: Some("Grammar Basics".to_string()),
                description: None,
                duration_minutes: Some(45),
            },
            CourseStepRef {
                id: Some("c2".to_string()),
                title: Some("Email Writing".to_string()),
                description: None,
                duration_minutes: None,
            },
        ],
        journey_steps: vec![JourneyStepRef {
            id: Some("j2".to_string()),
            title: Some("Meetings".to_string()),
            description: None,
            duration_minutes: Some(90),
            number_of_steps: None,
        }],
        active: true,
    }
}

pub fn empty_journey(id: &str) -> CatalogJourney {
    CatalogJourney {
        id: id.to_string(),
        title: "Coming Soon".to_string(),
        description: None,
        cover_url: None,
        duration_hours: 0,
        number_of_steps: 0,
        course_steps: Vec::new(),
        journey_steps: Vec::new(),
        active: true,
    }
}

pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.put_course(grammar_basics()).await;
    store.put_course(course("c2", "Email Writing")).await;
    store.put_journey(business_english()).await;
    store.put_journey(empty_journey("j9")).await;
    Arc::new(store)
}

/// Enrollment store that lets a competing writer (another tab, another
/// device) land its write between the mutator's read and its own write.
///
/// Each race fires once, on the first course write of the matching kind.
pub struct RacingStore {
    pub inner: Arc<MemoryStore>,
    race_create: AtomicBool,
    race_update: AtomicBool,
    competitor_bookmarked: bool,
}

impl RacingStore {
    /// A competitor creates the record first, with `competitor_bookmarked`.
    pub fn new(inner: Arc<MemoryStore>, competitor_bookmarked: bool) -> Self {
        Self {
            inner,
            race_create: AtomicBool::new(true),
            race_update: AtomicBool::new(false),
            competitor_bookmarked,
        }
    }

    /// A competitor updates the record first, so the mutator's version is stale.
    pub fn updates_only(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            race_create: AtomicBool::new(false),
            race_update: AtomicBool::new(true),
            competitor_bookmarked: false,
        }
    }

    /// Race the retried update as well as the create.
    pub fn and_updates(self) -> Self {
        self.race_update.store(true, Ordering::SeqCst);
        self
    }

    async fn compete(
        &self,
        record: &StudentCourse,
        precondition: &Precondition,
    ) -> Result<(), StorageError> {
        match precondition {
            Precondition::MustNotExist if self.race_create.swap(false, Ordering::SeqCst) => {
                let mut competitor = record.clone();
                competitor.id = uuid::Uuid::new_v4();
                competitor.bookmarked = self.competitor_bookmarked;
                self.inner
                    .upsert_student_course(&competitor, &Precondition::MustNotExist)
                    .await?;
            }
            Precondition::IfMatch(_) if self.race_update.swap(false, Ordering::SeqCst) => {
                let Some(current) = self
                    .inner
                    .find_student_course(&record.student_id, &record.course_id)
                    .await?
                else {
                    return Ok(());
                };
                let mut competitor = current.record.clone();
                competitor.study_time_minutes += 99;
                self.inner
                    .upsert_student_course(&competitor, &Precondition::IfMatch(current.etag))
                    .await?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl EnrollmentStore for RacingStore {
    fn list_student_courses<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StudentCourse>, StorageError>> {
        self.inner.list_student_courses(student_id)
    }

    fn list_student_journeys<'a>(
        &'a self,
        student_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<StudentJourney>, StorageError>> {
        self.inner.list_student_journeys(student_id)
    }

    fn find_student_course<'a>(
        &'a self,
        student_id: &'a str,
        course_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<StudentCourse>>, StorageError>> {
        self.inner.find_student_course(student_id, course_id)
    }

    fn find_student_journey<'a>(
        &'a self,
        student_id: &'a str,
        journey_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Versioned<StudentJourney>>, StorageError>> {
        self.inner.find_student_journey(student_id, journey_id)
    }

    fn upsert_student_course<'a>(
        &'a self,
        record: &'a StudentCourse,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<StudentCourse>, StorageError>> {
        Box::pin(async move {
            self.compete(record, precondition).await?;
            self.inner.upsert_student_course(record, precondition).await
        })
    }

    fn upsert_student_journey<'a>(
        &'a self,
        record: &'a StudentJourney,
        precondition: &'a Precondition,
    ) -> BoxFuture<'a, Result<Versioned<StudentJourney>, StorageError>> {
        self.inner.upsert_student_journey(record, precondition)
    }
}
