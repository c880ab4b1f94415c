use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::step_ref::{self, CourseStepRef, JourneyStepRef};

/// Anything a student can discover in the catalog and enroll in.
pub trait CatalogEntity {
    fn id(&self) -> &str;

    fn cover_url(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogCourse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub duration_minutes: u32,
    /// Label of the first lesson, shown as "next lesson" on course cards.
    #[serde(default)]
    pub first_lesson_label: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub company_logo_url: Option<String>,
    pub active: bool,
}

impl CatalogEntity for CatalogCourse {
    fn id(&self) -> &str {
        &self.id
    }

    fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }
}

/// A learning journey: an ordered composition of course steps followed by
/// nested journey steps.
///
/// The embedded step refs are denormalized snapshots taken when the journey
/// was authored. They may lag behind the live catalog entities they point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogJourney {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub duration_hours: u32,
    #[serde(default)]
    pub number_of_steps: u32,
    #[serde(default, deserialize_with = "step_ref::lenient_list")]
    #[ts(as = "Vec<CourseStepRef>")]
    pub course_steps: Vec<CourseStepRef>,
    #[serde(default, deserialize_with = "step_ref::lenient_list")]
    #[ts(as = "Vec<JourneyStepRef>")]
    pub journey_steps: Vec<JourneyStepRef>,
    pub active: bool,
}

impl CatalogEntity for CatalogJourney {
    fn id(&self) -> &str {
        &self.id
    }

    fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }
}
