pub mod catalog;
pub mod enrollment;
pub mod step_ref;
