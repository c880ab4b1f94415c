//! Journey step expansion.
//!
//! A journey's structure is its course steps followed by its nested journey
//! steps, each in the order the catalog declares them. Expansion numbers the
//! concatenation from 1 and attaches the progress representation that fits
//! each step's kind.

use std::collections::HashMap;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::catalog::CatalogJourney;
use crate::models::enrollment::{Percent, StudentCourse, StudentJourney};
use crate::models::step_ref::{CourseStepRef, JourneyStepRef};

/// Assumed size of a nested journey whose ref does not declare one.
pub const DEFAULT_NESTED_JOURNEY_STEPS: u32 = 4;
/// Lessons shown for every course step.
pub const COURSE_STEP_LESSONS: u32 = 10;
/// Lessons shown for a nested journey whose ref does not declare a size.
pub const DEFAULT_NESTED_JOURNEY_LESSONS: u32 = 5;
pub const DEFAULT_COURSE_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_JOURNEY_DURATION_MINUTES: u32 = 40;
pub const UNTITLED_COURSE: &str = "Untitled course";
pub const UNTITLED_JOURNEY: &str = "Untitled journey";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StepKind {
    Course,
    Journey,
}

/// Progress of one step. Course steps report a percentage; nested journey
/// steps report finished steps out of a total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum StepProgress {
    Course {
        percent: Percent,
    },
    Journey {
        completed_steps: u32,
        total_steps: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Step {
    /// 1-based, contiguous across course and journey steps.
    pub number: u32,
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_label: String,
    pub lessons: u32,
    #[serde(flatten)]
    pub progress: StepProgress,
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self.progress {
            StepProgress::Course { .. } => StepKind::Course,
            StepProgress::Journey { .. } => StepKind::Journey,
        }
    }
}

/// Anything carrying a journey's embedded step refs.
pub trait StepSource {
    fn course_steps(&self) -> &[CourseStepRef];

    fn journey_steps(&self) -> &[JourneyStepRef];
}

impl StepSource for CatalogJourney {
    fn course_steps(&self) -> &[CourseStepRef] {
        &self.course_steps
    }

    fn journey_steps(&self) -> &[JourneyStepRef] {
        &self.journey_steps
    }
}

impl StepSource for StudentJourney {
    fn course_steps(&self) -> &[CourseStepRef] {
        &self.course_steps
    }

    fn journey_steps(&self) -> &[JourneyStepRef] {
        &self.journey_steps
    }
}

/// Per-step progress source consulted during expansion.
pub trait StepProgressLookup {
    fn course_percent(&self, _course_id: &str) -> Option<Percent> {
        None
    }

    fn journey_completed_steps(&self, _journey_id: &str) -> Option<u32> {
        None
    }
}

/// Reports no progress: every course step at 0%, every nested journey at 0 steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl StepProgressLookup for NoProgress {}

/// Progress drawn from a student's own enrollments, keyed by catalog id.
#[derive(Debug, Default)]
pub struct EnrollmentProgress<'a> {
    courses: HashMap<&'a str, Percent>,
    journeys: HashMap<&'a str, u32>,
}

impl<'a> EnrollmentProgress<'a> {
    pub fn new(courses: &'a [StudentCourse], journeys: &'a [StudentJourney]) -> Self {
        Self {
            courses: courses
                .iter()
                .map(|c| (c.course_id.as_str(), c.progress_percent))
                .collect(),
            journeys: journeys
                .iter()
                .map(|j| (j.journey_id.as_str(), j.current_step))
                .collect(),
        }
    }
}

impl StepProgressLookup for EnrollmentProgress<'_> {
    fn course_percent(&self, course_id: &str) -> Option<Percent> {
        self.courses.get(course_id).copied()
    }

    fn journey_completed_steps(&self, journey_id: &str) -> Option<u32> {
        self.journeys.get(journey_id).copied()
    }
}

/// Expand a journey's steps with no per-step progress.
pub fn expand_steps<S: StepSource + ?Sized>(source: &S) -> Steps<'_, NoProgress> {
    expand_steps_with(source, &NoProgress)
}

/// Expand a journey's steps, taking per-step progress from `lookup`.
pub fn expand_steps_with<'a, S, L>(source: &'a S, lookup: &'a L) -> Steps<'a, L>
where
    S: StepSource + ?Sized,
    L: StepProgressLookup + ?Sized,
{
    Steps {
        courses: source.course_steps(),
        journeys: source.journey_steps(),
        lookup,
        next: 0,
    }
}

/// Lazy, finite sequence of expanded steps. Clone it or call
/// [`Steps::restart`] to walk it again.
pub struct Steps<'a, L: ?Sized> {
    courses: &'a [CourseStepRef],
    journeys: &'a [JourneyStepRef],
    lookup: &'a L,
    next: usize,
}

impl<L: ?Sized> Clone for Steps<'_, L> {
    fn clone(&self) -> Self {
        Self {
            courses: self.courses,
            journeys: self.journeys,
            lookup: self.lookup,
            next: self.next,
        }
    }
}

impl<L: ?Sized> Steps<'_, L> {
    pub fn restart(&mut self) {
        self.next = 0;
    }

    fn total(&self) -> usize {
        self.courses.len() + self.journeys.len()
    }
}

impl<L: StepProgressLookup + ?Sized> Iterator for Steps<'_, L> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let index = self.next;
        let number = u32::try_from(index + 1).ok()?;
        let step = if let Some(course) = self.courses.get(index) {
            course_step(number, index, course, self.lookup)
        } else {
            let offset = index - self.courses.len();
            let journey = self.journeys.get(offset)?;
            journey_step(number, offset, journey, self.lookup)
        };
        self.next += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<L: StepProgressLookup + ?Sized> ExactSizeIterator for Steps<'_, L> {}

impl<L: StepProgressLookup + ?Sized> FusedIterator for Steps<'_, L> {}

fn course_step<L: StepProgressLookup + ?Sized>(
    number: u32,
    index: usize,
    course: &CourseStepRef,
    lookup: &L,
) -> Step {
    let percent = course
        .id
        .as_deref()
        .and_then(|id| lookup.course_percent(id))
        .unwrap_or(Percent::ZERO);

    Step {
        number,
        id: course.id.clone().unwrap_or_else(|| format!("course-{index}")),
        title: course.title.clone().unwrap_or_else(|| UNTITLED_COURSE.to_string()),
        description: course.description.clone().unwrap_or_default(),
        duration_label: duration_label(course.duration_minutes, DEFAULT_COURSE_DURATION_MINUTES),
        lessons: COURSE_STEP_LESSONS,
        progress: StepProgress::Course { percent },
    }
}

fn journey_step<L: StepProgressLookup + ?Sized>(
    number: u32,
    index: usize,
    journey: &JourneyStepRef,
    lookup: &L,
) -> Step {
    // A declared size of zero is treated as undeclared.
    let declared = journey.number_of_steps.filter(|n| *n > 0);
    let total_steps = declared.unwrap_or(DEFAULT_NESTED_JOURNEY_STEPS);
    let completed_steps = journey
        .id
        .as_deref()
        .and_then(|id| lookup.journey_completed_steps(id))
        .unwrap_or(0)
        .min(total_steps);

    Step {
        number,
        id: journey.id.clone().unwrap_or_else(|| format!("journey-{index}")),
        title: journey.title.clone().unwrap_or_else(|| UNTITLED_JOURNEY.to_string()),
        description: journey.description.clone().unwrap_or_default(),
        duration_label: duration_label(journey.duration_minutes, DEFAULT_JOURNEY_DURATION_MINUTES),
        lessons: declared.unwrap_or(DEFAULT_NESTED_JOURNEY_LESSONS),
        progress: StepProgress::Journey {
            completed_steps,
            total_steps,
        },
    }
}

fn duration_label(minutes: Option<u32>, default: u32) -> String {
    let minutes = minutes.filter(|m| *m > 0).unwrap_or(default);
    format!("{minutes}min")
}
