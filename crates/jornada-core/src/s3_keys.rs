//! S3 key/path conventions.
//!
//! Pure string functions. Enrollment keys are derived
//! from `(student_id, catalog_id)`, so the pair maps to exactly one object.

use crate::error::CoreError;

pub const CATALOG_COURSES_PREFIX: &str = "catalog/courses/";

pub const CATALOG_JOURNEYS_PREFIX: &str = "catalog/journeys/";

pub fn catalog_course(id: &str) -> String {
    format!("{CATALOG_COURSES_PREFIX}{id}.json")
}

pub fn catalog_journey(id: &str) -> String {
    format!("{CATALOG_JOURNEYS_PREFIX}{id}.json")
}

pub fn student_courses_prefix(student_id: &str) -> String {
    format!("students/{student_id}/courses/")
}

pub fn student_course(student_id: &str, course_id: &str) -> String {
    format!("students/{student_id}/courses/{course_id}.json")
}

pub fn student_journeys_prefix(student_id: &str) -> String {
    format!("students/{student_id}/journeys/")
}

pub fn student_journey(student_id: &str, journey_id: &str) -> String {
    format!("students/{student_id}/journeys/{journey_id}.json")
}

/// Reject ids that would escape their key segment.
pub fn check_id(id: &str) -> Result<&str, CoreError> {
    if id.is_empty() || id.contains('/') || id == "." || id == ".." {
        return Err(CoreError::InvalidId(id.to_string()));
    }
    Ok(id)
}
