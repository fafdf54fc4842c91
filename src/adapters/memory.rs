//! In-process collaborators for tests and offline runs.

use super::traits::{ScheduleStorage, SubjectRegistry};
use crate::schedule::slot::{ScheduleSlot, SlotDraft, SlotId};
use crate::schedule::timetable::ClassRef;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    classes: HashMap<ClassRef, Vec<ScheduleSlot>>,
    fail_next: usize,
}

/// A schedule store kept in a `HashMap`.
///
/// Ids are random UUIDs. Failures can be injected to exercise error paths,
/// and every call is counted so tests can check nothing reached storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    readback: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also answer [`ScheduleStorage::fetch_slot`].
    pub fn with_readback(mut self) -> Self {
        self.readback = true;
        self
    }

    pub fn seed(&self, class: &ClassRef, slots: impl IntoIterator<Item = ScheduleSlot>) {
        self.tables
            .lock()
            .classes
            .entry(class.clone())
            .or_default()
            .extend(slots);
    }

    /// The next `count` calls fail.
    pub fn fail_next(&self, count: usize) {
        self.tables.lock().fail_next = count;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stored(&self, class: &ClassRef) -> Vec<ScheduleSlot> {
        self.tables
            .lock()
            .classes
            .get(class)
            .cloned()
            .unwrap_or_default()
    }

    fn begin(&self, operation: &str) -> Result<parking_lot::MutexGuard<'_, Tables>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock();
        if tables.fail_next > 0 {
            tables.fail_next -= 1;
            bail!("injected failure in {operation}");
        }
        Ok(tables)
    }
}

#[async_trait]
impl ScheduleStorage for MemoryStorage {
    async fn list_for_class(&self, class: &ClassRef) -> Result<Vec<ScheduleSlot>> {
        let tables = self.begin("list")?;
        Ok(tables.classes.get(class).cloned().unwrap_or_default())
    }

    async fn create(&self, class: &ClassRef, draft: &SlotDraft) -> Result<ScheduleSlot> {
        let mut tables = self.begin("create")?;
        let slot = draft.clone().confirm(SlotId::new(Uuid::new_v4().to_string()));
        tables
            .classes
            .entry(class.clone())
            .or_default()
            .push(slot.clone());
        Ok(slot)
    }

    async fn update(&self, class: &ClassRef, slot: &ScheduleSlot) -> Result<String> {
        let mut tables = self.begin("update")?;
        let stored = tables
            .classes
            .get_mut(class)
            .and_then(|slots| slots.iter_mut().find(|s| s.id == slot.id))
            .ok_or_else(|| anyhow!("Schedule entry {} not found", slot.id))?;
        *stored = slot.clone();
        Ok("Schedule updated successfully".to_string())
    }

    async fn delete(&self, class: &ClassRef, id: &SlotId) -> Result<String> {
        let mut tables = self.begin("delete")?;
        let slots = tables
            .classes
            .get_mut(class)
            .ok_or_else(|| anyhow!("No schedule for class {class}"))?;
        let before = slots.len();
        slots.retain(|s| &s.id != id);
        if slots.len() == before {
            bail!("Schedule entry {id} not found");
        }
        Ok("Schedule deleted successfully".to_string())
    }

    async fn fetch_slot(&self, class: &ClassRef, id: &SlotId) -> Result<Option<ScheduleSlot>> {
        if !self.readback {
            return Ok(None);
        }
        let tables = self.begin("fetch")?;
        Ok(tables
            .classes
            .get(class)
            .and_then(|slots| slots.iter().find(|s| &s.id == id))
            .cloned())
    }
}

/// A fixed subject list per class.
#[derive(Debug, Default)]
pub struct StaticSubjectRegistry {
    subjects: HashMap<ClassRef, Vec<String>>,
}

impl StaticSubjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subjects<S: Into<String>>(
        mut self,
        class: &ClassRef,
        subjects: impl IntoIterator<Item = S>,
    ) -> Self {
        self.subjects
            .insert(class.clone(), subjects.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl SubjectRegistry for StaticSubjectRegistry {
    async fn subjects_for_class(&self, class: &ClassRef) -> Result<Vec<String>> {
        Ok(self.subjects.get(class).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schedule::slot::{DayOfWeek, SlotKind};
    use crate::schedule::time::TimeInterval;

    fn draft() -> SlotDraft {
        SlotDraft::new(
            DayOfWeek::Monday,
            TimeInterval::from_hhmm("09:00", "10:00").unwrap(),
            SlotKind::lesson("Maths", "Mr. X"),
        )
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let storage = MemoryStorage::new();
        let class = ClassRef::new("7A", "school-1");
        let a = storage.create(&class, &draft()).await.unwrap();
        let b = storage.create(&class, &draft()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(storage.list_for_class(&class).await.unwrap().len(), 2);
        assert_eq!(storage.calls(), 3);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let storage = MemoryStorage::new();
        let class = ClassRef::new("7A", "school-1");
        storage.fail_next(1);
        assert!(storage.create(&class, &draft()).await.is_err());
        assert!(storage.create(&class, &draft()).await.is_ok());
        assert_eq!(storage.stored(&class).len(), 1);
    }

    #[tokio::test]
    async fn readback_is_opt_in() {
        let class = ClassRef::new("7A", "school-1");
        let plain = MemoryStorage::new();
        let slot = plain.create(&class, &draft()).await.unwrap();
        assert_eq!(plain.fetch_slot(&class, &slot.id).await.unwrap(), None);

        let readback = MemoryStorage::new().with_readback();
        let slot = readback.create(&class, &draft()).await.unwrap();
        assert_eq!(readback.fetch_slot(&class, &slot.id).await.unwrap(), Some(slot));
    }

    #[tokio::test]
    async fn unknown_ids_fail() {
        let storage = MemoryStorage::new();
        let class = ClassRef::new("7A", "school-1");
        storage.create(&class, &draft()).await.unwrap();
        assert!(storage.delete(&class, &SlotId::new("nope")).await.is_err());
    }
}
