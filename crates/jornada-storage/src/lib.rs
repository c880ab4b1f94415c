//! jornada-storage
//!
//! Catalog and enrollment persistence. Thin wrapper around the AWS S3 SDK,
//! plus an in-memory store with the same write contract.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod state;
pub mod store;
