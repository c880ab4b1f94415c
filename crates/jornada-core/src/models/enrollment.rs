use jiff::Timestamp;
use serde::{de, Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::catalog::{CatalogCourse, CatalogEntity, CatalogJourney};
use crate::models::step_ref::{self, CourseStepRef, JourneyStepRef};

/// A whole-number percentage in `0..=100`. Serialized as a bare number;
/// out-of-range values are rejected on deserialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct Percent(u8);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const FULL: Percent = Percent(100);

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if value > 100 {
            return Err(CoreError::PercentOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percent {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(p: Percent) -> Self {
        p.0
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Percent::new(value).map_err(de::Error::custom)
    }
}

/// Per-student join record against one catalog entity.
///
/// At most one record exists per `(student_id, catalog_id)`. Records are
/// created on the first save or bookmark and are never deleted; removing a
/// bookmark only clears the flag.
pub trait Enrollment {
    type Entity: CatalogEntity;

    /// Build the first-time record for `entity`: bookmarked, zeroed counters,
    /// and a snapshot of the entity's denormalized fields.
    fn enroll(student_id: &str, entity: &Self::Entity, now: Timestamp) -> Self;

    fn student_id(&self) -> &str;

    /// Foreign key of the catalog entity this record tracks.
    fn catalog_id(&self) -> &str;

    fn is_bookmarked(&self) -> bool;

    fn set_bookmarked(&mut self, bookmarked: bool, now: Timestamp);

    fn is_in_progress(&self) -> bool;

    fn is_completed(&self) -> bool;

    fn validate(&self) -> Result<(), CoreError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StudentCourse {
    pub id: Uuid,
    pub student_id: String,
    pub course_id: String,
    /// Course name at enrollment time.
    pub title: Option<String>,
    pub progress_percent: Percent,
    pub study_time_minutes: u32,
    pub bookmarked: bool,
    /// Snapshot of the parent course; may be stale.
    pub course: CatalogCourse,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Enrollment for StudentCourse {
    type Entity = CatalogCourse;

    fn enroll(student_id: &str, course: &CatalogCourse, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            course_id: course.id.clone(),
            title: Some(course.name.clone()),
            progress_percent: Percent::ZERO,
            study_time_minutes: 0,
            bookmarked: true,
            course: course.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn student_id(&self) -> &str {
        &self.student_id
    }

    fn catalog_id(&self) -> &str {
        &self.course_id
    }

    fn is_bookmarked(&self) -> bool {
        self.bookmarked
    }

    fn set_bookmarked(&mut self, bookmarked: bool, now: Timestamp) {
        self.bookmarked = bookmarked;
        self.updated_at = now;
    }

    fn is_in_progress(&self) -> bool {
        self.study_time_minutes > 0 && self.progress_percent < Percent::FULL
    }

    fn is_completed(&self) -> bool {
        self.progress_percent == Percent::FULL
    }

    fn validate(&self) -> Result<(), CoreError> {
        // Percent is range-checked on construction; nothing cross-field to check.
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StudentJourney {
    pub id: Uuid,
    pub student_id: String,
    pub journey_id: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub current_step: u32,
    pub number_of_steps: u32,
    /// Step snapshots copied from the parent journey at enrollment time.
    #[serde(default, deserialize_with = "step_ref::lenient_list")]
    #[ts(as = "Vec<CourseStepRef>")]
    pub course_steps: Vec<CourseStepRef>,
    #[serde(default, deserialize_with = "step_ref::lenient_list")]
    #[ts(as = "Vec<JourneyStepRef>")]
    pub journey_steps: Vec<JourneyStepRef>,
    pub bookmarked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StudentJourney {
    /// Share of steps finished, rounded down. Zero for a journey without steps.
    pub fn progress_percent(&self) -> Percent {
        journey_progress(self.current_step, self.number_of_steps)
    }
}

/// `current / total` as a percentage, rounded down and clamped to 100.
pub fn journey_progress(current: u32, total: u32) -> Percent {
    if total == 0 {
        return Percent::ZERO;
    }
    let pct = (u64::from(current) * 100 / u64::from(total)).min(100);
    // Clamped to 100 above.
    Percent(pct as u8)
}

impl Enrollment for StudentJourney {
    type Entity = CatalogJourney;

    fn enroll(student_id: &str, journey: &CatalogJourney, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            journey_id: journey.id.clone(),
            title: journey.title.clone(),
            description: journey.description.clone(),
            cover_url: journey.cover_url.clone(),
            current_step: 0,
            number_of_steps: journey.number_of_steps,
            course_steps: journey.course_steps.clone(),
            journey_steps: journey.journey_steps.clone(),
            bookmarked: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn student_id(&self) -> &str {
        &self.student_id
    }

    fn catalog_id(&self) -> &str {
        &self.journey_id
    }

    fn is_bookmarked(&self) -> bool {
        self.bookmarked
    }

    fn set_bookmarked(&mut self, bookmarked: bool, now: Timestamp) {
        self.bookmarked = bookmarked;
        self.updated_at = now;
    }

    fn is_in_progress(&self) -> bool {
        0 < self.current_step && self.current_step < self.number_of_steps
    }

    fn is_completed(&self) -> bool {
        self.number_of_steps > 0 && self.current_step == self.number_of_steps
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.current_step > self.number_of_steps {
            return Err(CoreError::StepOutOfRange {
                current: self.current_step,
                total: self.number_of_steps,
            });
        }
        Ok(())
    }
}
