/// The collaborator contracts the coordinator talks through.
pub mod traits;

/// In-memory collaborators.
pub mod memory;

/// HTTP collaborators for the school backend.
#[cfg(feature = "rest")]
pub mod rest;

pub use traits::{ScheduleStorage, SubjectRegistry};
