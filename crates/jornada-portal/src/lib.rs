//! jornada-portal
//!
//! Student-facing operations over the catalog and enrollment stores: the
//! readers, the bookmark mutator, and a session-gated facade that keeps the
//! student's enrollments fresh after every write.

pub mod detail;
pub mod error;
pub mod mutator;
pub mod portal;
pub mod readers;
pub mod session;
