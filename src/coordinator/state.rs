use crate::error::{Result, TimetableError};
use crate::schedule::slot::{SlotId, SlotKind};
use crate::schedule::timetable::{ClassRef, ClassTimetable};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;

/// Where a known slot is in its lifecycle.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize)]
pub enum SlotPhase {
    /// Matches what storage last confirmed.
    Confirmed,
    /// An update or delete is waiting on storage.
    Pending,
}

/// Everything the coordinator guards with one lock.
#[derive(Debug)]
pub(crate) struct State {
    pub class: ClassRef,
    /// Bumped whenever another class is selected, so late replies for the
    /// previous class are dropped.
    pub generation: u64,
    pub timetable: ClassTimetable,
    pub subjects: Vec<String>,
    pub pending: HashSet<SlotId>,
}

impl State {
    pub fn new(class: ClassRef, timetable: ClassTimetable, subjects: Vec<String>) -> Self {
        Self {
            class,
            generation: 0,
            timetable,
            subjects,
            pending: HashSet::new(),
        }
    }

    /// Field checks that need no round trip.
    pub fn validate_kind(&self, kind: &SlotKind) -> Result<()> {
        kind.validate()?;
        if let SlotKind::Lesson { subject_name, .. } = kind {
            let subject = subject_name.trim();
            if !self.subjects.is_empty() && !self.subjects.iter().any(|s| s.trim() == subject) {
                return Err(TimetableError::validation(
                    "subjectName",
                    format!("`{subject}` is not taught to class {}", self.class),
                ));
            }
        }
        Ok(())
    }

    pub fn phase(&self, id: &SlotId) -> Option<SlotPhase> {
        if self.pending.contains(id) {
            Some(SlotPhase::Pending)
        } else if self.timetable.contains(id) {
            Some(SlotPhase::Confirmed)
        } else {
            None
        }
    }
}

/// Marks a slot as pending until dropped.
///
/// Dropping also happens when the caller abandons the request future, so a
/// slot never stays locked.
pub(crate) struct PendingGuard<'a> {
    state: &'a Mutex<State>,
    id: SlotId,
    pub generation: u64,
}

impl<'a> PendingGuard<'a> {
    /// Caller passes the already locked state.
    pub fn acquire(
        lock: &'a Mutex<State>,
        state: &mut State,
        id: &SlotId,
    ) -> Result<PendingGuard<'a>> {
        if !state.pending.insert(id.clone()) {
            return Err(TimetableError::SlotBusy(id.clone()));
        }
        Ok(PendingGuard {
            state: lock,
            id: id.clone(),
            generation: state.generation,
        })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.generation == self.generation {
            state.pending.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn state(subjects: &[&str]) -> State {
        State::new(
            ClassRef::new("7A", "s1"),
            ClassTimetable::new(),
            subjects.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn registry_constrains_subjects() {
        let state = state(&["Maths", "Physics"]);
        assert!(state.validate_kind(&SlotKind::lesson("Physics", "Dr. Rao")).is_ok());
        assert!(matches!(
            state.validate_kind(&SlotKind::lesson("Latin", "Dr. Rao")),
            Err(TimetableError::Validation { field: "subjectName", .. })
        ));
    }

    #[test]
    fn empty_registry_allows_any_subject() {
        assert!(state(&[]).validate_kind(&SlotKind::lesson("Latin", "Dr. Rao")).is_ok());
    }

    #[test]
    fn guard_blocks_second_acquire_until_dropped() {
        let lock = Mutex::new(state(&[]));
        let id = SlotId::new("a");

        let guard = {
            let mut state = lock.lock();
            PendingGuard::acquire(&lock, &mut state, &id).unwrap()
        };
        assert_eq!(lock.lock().phase(&id), Some(SlotPhase::Pending));
        {
            let mut state = lock.lock();
            assert!(matches!(
                PendingGuard::acquire(&lock, &mut state, &id),
                Err(TimetableError::SlotBusy(_))
            ));
        }

        drop(guard);
        assert_eq!(lock.lock().phase(&id), None);
    }
}
