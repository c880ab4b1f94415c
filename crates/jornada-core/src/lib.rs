//! jornada-core
//!
//! Pure domain types for the learning portal: the catalog, per-student
//! enrollments, journey step expansion and the categorized views.
//! No AWS SDK dependency.

pub mod bookmark;
pub mod cover;
pub mod error;
pub mod models;
pub mod projection;
pub mod s3_keys;
pub mod steps;
