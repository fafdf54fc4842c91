//! coordinator：持有一个班级的课表，并通过存储接口增删改
//!
//! Nothing is applied locally before storage confirms it. The one exception
//! is the content of an update: storage only confirms, so the slot is read
//! back when the storage can do that and rebuilt from the patch otherwise.

mod state;

pub use state::SlotPhase;

use crate::adapters::traits::{ScheduleStorage, SubjectRegistry};
use crate::error::{Result, TimetableError};
use crate::layout::{self, LayoutConfig, PositionedSlot};
use crate::schedule::slot::{DayOfWeek, ScheduleSlot, SlotDraft, SlotId, SlotKind, SlotPatch};
use crate::schedule::time::TimeInterval;
use crate::schedule::timetable::{ClassRef, ClassTimetable};
use log::{debug, info, warn};
use parking_lot::Mutex;
use state::{PendingGuard, State};
use std::sync::Arc;

/// Owns the timetable of the selected class.
///
/// Reads are synchronous. Writes suspend only while storage is working, and
/// a slot with a request in flight refuses a second one with
/// [`TimetableError::SlotBusy`].
#[derive(Debug)]
pub struct ScheduleCoordinator {
    storage: Arc<dyn ScheduleStorage>,
    registry: Option<Arc<dyn SubjectRegistry>>,
    layout: LayoutConfig,
    state: Mutex<State>,
}

async fn load(
    storage: &dyn ScheduleStorage,
    registry: Option<&dyn SubjectRegistry>,
    class: &ClassRef,
) -> Result<(ClassTimetable, Vec<String>)> {
    let slots = storage
        .list_for_class(class)
        .await
        .map_err(TimetableError::Storage)?;
    let subjects = match registry {
        Some(registry) => registry
            .subjects_for_class(class)
            .await
            .map_err(TimetableError::Storage)?,
        None => Vec::new(),
    };
    Ok((ClassTimetable::from_slots(slots), subjects))
}

impl ScheduleCoordinator {
    /// Load `class` and start coordinating it.
    pub async fn open(
        storage: Arc<dyn ScheduleStorage>,
        registry: Option<Arc<dyn SubjectRegistry>>,
        class: ClassRef,
        layout: LayoutConfig,
    ) -> Result<Self> {
        let (timetable, subjects) = load(storage.as_ref(), registry.as_deref(), &class).await?;
        info!(
            "Loaded {} slots and {} subjects for class {}",
            timetable.len(),
            subjects.len(),
            class
        );

        Ok(Self {
            storage,
            registry,
            layout,
            state: Mutex::new(State::new(class, timetable, subjects)),
        })
    }

    pub fn class(&self) -> ClassRef {
        self.state.lock().class.clone()
    }

    pub fn layout_config(&self) -> LayoutConfig {
        self.layout
    }

    /// A copy of the current timetable.
    pub fn snapshot(&self) -> ClassTimetable {
        self.state.lock().timetable.clone()
    }

    pub fn phase(&self, id: &SlotId) -> Option<SlotPhase> {
        self.state.lock().phase(id)
    }

    pub fn is_pending(&self, id: &SlotId) -> bool {
        self.phase(id) == Some(SlotPhase::Pending)
    }

    /// Drawable rectangles for one day of the current timetable.
    pub fn positioned_slots_for_day(&self, day: DayOfWeek) -> Vec<PositionedSlot> {
        let state = self.state.lock();
        layout::layout_day(self.layout.window, state.timetable.slots_for_day(day))
    }

    pub fn positioned_week(&self) -> Vec<(DayOfWeek, Vec<PositionedSlot>)> {
        let state = self.state.lock();
        layout::layout_week(self.layout.window, &state.timetable)
    }

    /// Candidate interval for a click on `day`, or `None` if it would collide.
    pub fn snap_pointer_to_candidate(&self, day: DayOfWeek, pointer: f64) -> Option<TimeInterval> {
        let existing = self.state.lock().timetable.intervals_for_day(day);
        layout::snap_pointer(self.layout.window, self.layout.snap, pointer, &existing)
    }

    /// Candidate interval for a drag on `day`, or `None` if it would collide.
    pub fn snap_drag_to_candidate(
        &self,
        day: DayOfWeek,
        from: f64,
        to: f64,
    ) -> Option<TimeInterval> {
        let existing = self.state.lock().timetable.intervals_for_day(day);
        layout::snap_drag(self.layout.window, self.layout.snap, from, to, &existing)
    }

    /// Save a new slot.
    ///
    /// Overlapping an existing slot is allowed but logged. When storage
    /// fails the draft is dropped and local state is untouched.
    pub async fn create(&self, draft: SlotDraft) -> Result<ScheduleSlot> {
        let (class, generation) = {
            let state = self.state.lock();
            state.validate_kind(&draft.kind)?;

            let clashes: Vec<String> = state
                .timetable
                .overlapping(draft.day, draft.interval)
                .map(|slot| slot.id.to_string())
                .collect();
            if !clashes.is_empty() {
                warn!(
                    "New slot {} {} overlaps {}",
                    draft.day,
                    draft.interval,
                    clashes.join(", ")
                );
            }
            (state.class.clone(), state.generation)
        };

        debug!("Creating {} {} for {}", draft.day, draft.interval, class);
        let slot = self
            .storage
            .create(&class, &draft)
            .await
            .map_err(TimetableError::Storage)?;

        let mut state = self.state.lock();
        if state.generation == generation {
            state.timetable.upsert(slot.clone());
        } else {
            debug!("Class changed while creating {}, not showing it", slot.id);
        }
        Ok(slot)
    }

    /// Snap a click and create a slot there.
    ///
    /// `Ok(None)` when the click lands on an existing slot, in which case
    /// storage is never contacted.
    pub async fn create_at_pointer(
        &self,
        day: DayOfWeek,
        pointer: f64,
        kind: SlotKind,
    ) -> Result<Option<ScheduleSlot>> {
        let Some(interval) = self.snap_pointer_to_candidate(day, pointer) else {
            return Ok(None);
        };
        self.create(SlotDraft::new(day, interval, kind)).await.map(Some)
    }

    /// Replace the interval and kind of a slot.
    pub async fn update(&self, id: &SlotId, patch: SlotPatch) -> Result<ScheduleSlot> {
        let (class, current, guard) = {
            let mut state = self.state.lock();
            let current = state
                .timetable
                .get(id)
                .cloned()
                .ok_or_else(|| TimetableError::NotFound(id.clone()))?;
            state.validate_kind(&patch.kind)?;
            let guard = PendingGuard::acquire(&self.state, &mut state, id)?;
            (state.class.clone(), current, guard)
        };

        let proposed = current.patched(&patch);
        debug!("Updating {} to {} {}", id, proposed.interval, proposed.kind.title());
        let message = self
            .storage
            .update(&class, &proposed)
            .await
            .map_err(TimetableError::Storage)?;
        debug!("Storage confirmed update of {}: {}", id, message);

        let confirmed = match self.storage.fetch_slot(&class, id).await {
            Ok(Some(slot)) => slot,
            Ok(None) => proposed,
            Err(e) => {
                warn!("Reading back slot {} failed, keeping the patch as sent: {:#}", id, e);
                proposed
            }
        };

        {
            let mut state = self.state.lock();
            if state.generation == guard.generation {
                state.timetable.upsert(confirmed.clone());
            }
        }
        drop(guard);
        Ok(confirmed)
    }

    /// Delete a slot. It stays in the local timetable if storage fails.
    pub async fn remove(&self, id: &SlotId) -> Result<()> {
        let (class, guard) = {
            let mut state = self.state.lock();
            if !state.timetable.contains(id) {
                return Err(TimetableError::NotFound(id.clone()));
            }
            let guard = PendingGuard::acquire(&self.state, &mut state, id)?;
            (state.class.clone(), guard)
        };

        let message = self
            .storage
            .delete(&class, id)
            .await
            .map_err(TimetableError::Storage)?;
        debug!("Storage confirmed delete of {}: {}", id, message);

        {
            let mut state = self.state.lock();
            if state.generation == guard.generation {
                state.timetable.remove(id);
            }
        }
        drop(guard);
        Ok(())
    }

    /// Re-read the timetable of the current class from storage.
    pub async fn refresh(&self) -> Result<()> {
        let class = self.class();
        let (timetable, subjects) =
            load(self.storage.as_ref(), self.registry.as_deref(), &class).await?;

        let mut state = self.state.lock();
        if state.class == class {
            debug!("Refreshed class {}: {} slots", class, timetable.len());
            state.timetable = timetable;
            state.subjects = subjects;
        }
        Ok(())
    }

    /// Select another class. On failure the current class stays selected.
    pub async fn switch_class(&self, class: ClassRef) -> Result<()> {
        let (timetable, subjects) =
            load(self.storage.as_ref(), self.registry.as_deref(), &class).await?;
        info!("Switching to class {} ({} slots)", class, timetable.len());

        let mut state = self.state.lock();
        state.generation += 1;
        state.class = class;
        state.timetable = timetable;
        state.subjects = subjects;
        state.pending.clear();
        Ok(())
    }
}
