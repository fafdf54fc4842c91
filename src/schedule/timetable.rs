use super::slot::{DayOfWeek, ScheduleSlot, SlotId};
use super::time::TimeInterval;
use log::warn;
use serde::Serialize;

/// Which class a timetable belongs to. Both ids are passed to the
/// collaborators untouched.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize)]
pub struct ClassRef {
    pub class_id: String,
    pub school_id: String,
}

impl ClassRef {
    pub fn new(class_id: impl Into<String>, school_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            school_id: school_id.into(),
        }
    }
}

impl std::fmt::Display for ClassRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.school_id, self.class_id)
    }
}

/// All slots of one class across the week.
///
/// Slot ids are unique. Slots on the same day may overlap.
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize)]
pub struct ClassTimetable {
    slots: Vec<ScheduleSlot>,
}

impl ClassTimetable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a storage listing. A repeated id keeps the later record.
    pub fn from_slots(slots: impl IntoIterator<Item = ScheduleSlot>) -> Self {
        let mut timetable = Self::new();
        for slot in slots {
            if timetable.get(&slot.id).is_some() {
                warn!("Duplicate slot id {} in listing, keeping the later one", slot.id);
            }
            timetable.upsert(slot);
        }
        timetable
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduleSlot> {
        self.slots.iter()
    }

    pub fn get(&self, id: &SlotId) -> Option<&ScheduleSlot> {
        self.slots.iter().find(|slot| &slot.id == id)
    }

    pub fn contains(&self, id: &SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn slots_for_day(&self, day: DayOfWeek) -> Vec<&ScheduleSlot> {
        self.slots.iter().filter(|slot| slot.day == day).collect()
    }

    pub fn intervals_for_day(&self, day: DayOfWeek) -> Vec<TimeInterval> {
        self.slots
            .iter()
            .filter(|slot| slot.day == day)
            .map(|slot| slot.interval)
            .collect()
    }

    /// Slots on `day` that overlap `interval`.
    pub fn overlapping(
        &self,
        day: DayOfWeek,
        interval: TimeInterval,
    ) -> impl Iterator<Item = &ScheduleSlot> {
        self.slots
            .iter()
            .filter(move |slot| slot.day == day && slot.interval.overlaps(&interval))
    }

    /// Insert, or replace the slot carrying the same id in place.
    pub fn upsert(&mut self, slot: ScheduleSlot) {
        match self.slots.iter_mut().find(|s| s.id == slot.id) {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
    }

    pub fn remove(&mut self, id: &SlotId) -> Option<ScheduleSlot> {
        let idx = self.slots.iter().position(|slot| &slot.id == id)?;
        Some(self.slots.remove(idx))
    }
}
