use serde::Serialize;

use jornada_core::cover::resolve_cover;
use jornada_core::models::catalog::CatalogJourney;
use jornada_core::models::enrollment::{journey_progress, Percent, StudentCourse, StudentJourney};
use jornada_core::steps::{expand_steps_with, EnrollmentProgress, Step};

/// Everything the journey page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyDetail {
    pub journey: CatalogJourney,
    pub enrollment: Option<StudentJourney>,
    pub bookmarked: bool,
    pub display_cover: String,
    pub course_count: usize,
    pub journey_count: usize,
    pub completed_steps: u32,
    pub total_steps: u32,
    pub progress_percent: Percent,
    pub steps: Vec<Step>,
    /// False when the journey has no steps of either kind; the page shows an
    /// explicit "no content" state rather than an empty list.
    pub has_content: bool,
}

impl JourneyDetail {
    /// Compose the detail from the live journey and the student's enrollments.
    ///
    /// Steps come from the live journey, not the enrollment snapshot, with
    /// per-step progress taken from the student's own course and journey
    /// enrollments.
    pub fn compose(
        journey: CatalogJourney,
        enrollment: Option<StudentJourney>,
        student_courses: &[StudentCourse],
        student_journeys: &[StudentJourney],
    ) -> Self {
        let lookup = EnrollmentProgress::new(student_courses, student_journeys);
        let steps: Vec<Step> = expand_steps_with(&journey, &lookup).collect();

        // The enrollment may predate a catalog edit that removed steps.
        let total_steps = journey.number_of_steps;
        let completed_steps = enrollment
            .as_ref()
            .map_or(0, |e| e.current_step)
            .min(total_steps);

        Self {
            bookmarked: enrollment.as_ref().is_some_and(|e| e.bookmarked),
            display_cover: resolve_cover(journey.cover_url.as_deref()).to_string(),
            course_count: journey.course_steps.len(),
            journey_count: journey.journey_steps.len(),
            completed_steps,
            total_steps,
            progress_percent: journey_progress(completed_steps, total_steps),
            has_content: !steps.is_empty(),
            steps,
            journey,
            enrollment,
        }
    }
}
