use crate::schedule::slot::{ScheduleSlot, SlotDraft, SlotId};
use crate::schedule::timetable::ClassRef;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// Where a class's schedule is persisted.
///
/// Implementations own transport concerns such as timeouts and retries. Any
/// error they return is treated as one opaque storage failure.
#[async_trait]
pub trait ScheduleStorage: Send + Sync + Debug {
    /// Every slot of the class, across all days.
    async fn list_for_class(&self, class: &ClassRef) -> Result<Vec<ScheduleSlot>>;

    /// Save a draft. The returned slot carries the id storage assigned.
    async fn create(&self, class: &ClassRef, draft: &SlotDraft) -> Result<ScheduleSlot>;

    /// Overwrite the stored slot with the same id. Storage only confirms, it
    /// does not echo the record.
    ///
    /// Returns the confirmation message.
    async fn update(&self, class: &ClassRef, slot: &ScheduleSlot) -> Result<String>;

    /// Delete a slot. Returns the confirmation message.
    async fn delete(&self, class: &ClassRef, id: &SlotId) -> Result<String>;

    /// Read back a single slot.
    ///
    /// `Ok(None)` means the backend can't do this, and callers have to trust
    /// what they sent instead.
    async fn fetch_slot(&self, _class: &ClassRef, _id: &SlotId) -> Result<Option<ScheduleSlot>> {
        Ok(None)
    }
}

/// Supplies the subjects that may be taught to a class.
#[async_trait]
pub trait SubjectRegistry: Send + Sync + Debug {
    /// An empty list means the registry has no opinion for this class.
    async fn subjects_for_class(&self, class: &ClassRef) -> Result<Vec<String>>;
}
