//! Pure planning for the bookmark toggle and first-time save.
//!
//! These decide what record should be written given what was read. Writing
//! it, and resolving races with other writers, is the caller's job.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::enrollment::Enrollment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ToggleOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SaveOutcome {
    Created,
    AlreadySaved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkChange<E> {
    pub outcome: ToggleOutcome,
    pub record: E,
}

/// Plan a bookmark toggle.
///
/// With no existing record, a new bookmarked enrollment is created. Otherwise
/// the existing record's flag is flipped.
pub fn plan_toggle<E>(
    existing: Option<&E>,
    student_id: &str,
    entity: &E::Entity,
    now: Timestamp,
) -> BookmarkChange<E>
where
    E: Enrollment + Clone,
{
    match existing {
        None => BookmarkChange {
            outcome: ToggleOutcome::Created,
            record: E::enroll(student_id, entity, now),
        },
        Some(current) => {
            let mut record = current.clone();
            record.set_bookmarked(!current.is_bookmarked(), now);
            BookmarkChange {
                outcome: ToggleOutcome::Updated,
                record,
            }
        }
    }
}

/// The bookmark value a toggle is trying to reach, given what was read.
pub fn toggle_target<E: Enrollment>(existing: Option<&E>) -> bool {
    existing.is_none_or(|e| !e.is_bookmarked())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveResult<E> {
    pub outcome: SaveOutcome,
    pub record: E,
}
