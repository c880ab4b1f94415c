//! The categorized views over a catalog slice and a student's enrollments.
//!
//! Projection is a pure function of its two inputs. Catalog items are matched
//! to enrollments by foreign key, never by comparing snapshots.

use std::collections::HashMap;

use serde::Serialize;

use crate::cover::resolve_cover;
use crate::models::catalog::{CatalogCourse, CatalogEntity, CatalogJourney};
use crate::models::enrollment::{Enrollment, StudentCourse, StudentJourney};

/// A catalog item as shown in the Discover view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discovered<'a, C> {
    #[serde(flatten)]
    pub item: &'a C,
    pub bookmarked: bool,
    pub display_cover: &'a str,
}

/// The four views. Membership may overlap across views; order follows the
/// input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views<'a, C, E> {
    pub discover: Vec<Discovered<'a, C>>,
    pub saved: Vec<&'a E>,
    pub in_progress: Vec<&'a E>,
    pub completed: Vec<&'a E>,
}

pub type CourseViews<'a> = Views<'a, CatalogCourse, StudentCourse>;

pub type JourneyViews<'a> = Views<'a, CatalogJourney, StudentJourney>;

pub fn project<'a, C, E>(catalog: &'a [C], enrollments: &'a [E]) -> Views<'a, C, E>
where
    C: CatalogEntity,
    E: Enrollment,
{
    // If the uniqueness invariant was ever violated upstream, the first record wins.
    let mut by_catalog_id: HashMap<&str, &E> = HashMap::with_capacity(enrollments.len());
    for enrollment in enrollments {
        by_catalog_id.entry(enrollment.catalog_id()).or_insert(enrollment);
    }

    let discover = catalog
        .iter()
        .map(|item| Discovered {
            item,
            bookmarked: by_catalog_id
                .get(item.id())
                .is_some_and(|e| e.is_bookmarked()),
            display_cover: resolve_cover(item.cover_url()),
        })
        .collect();

    Views {
        discover,
        saved: enrollments.iter().filter(|e| e.is_bookmarked()).collect(),
        in_progress: enrollments.iter().filter(|e| e.is_in_progress()).collect(),
        completed: enrollments.iter().filter(|e| e.is_completed()).collect(),
    }
}
