//! layout：把一天的课表条目排成可绘制的矩形
//!
//! The pass runs in three steps and is recomputed from scratch on every
//! change: [`cluster::group_overlaps`] → [`column::assign_columns`] →
//! [`position::PositionedSlot`].

/// 把重叠的条目分成簇
pub mod cluster;

/// 簇内贪心分配列
pub mod column;

/// 计算相对于时间窗口的位置和大小
pub mod position;

/// 把指针位置吸附到时间网格
pub mod snap;

pub use cluster::group_overlaps;
pub use column::{assign_columns, OverlapCluster};
pub use position::{DayWindow, PositionedSlot, SlotRect};
pub use snap::{snap_drag, snap_pointer, try_snap_pointer, SnapConfig};

use crate::schedule::slot::{DayOfWeek, ScheduleSlot};
use crate::schedule::timetable::ClassTimetable;
use serde::{Deserialize, Serialize};

/// Viewport parameters shared by layout and snapping.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub window: DayWindow,
    pub snap: SnapConfig,
}

/// Lay out the slots of one day.
///
/// Output follows cluster order, and `(start, end)` order within a cluster.
/// Slots outside the window are kept with zero height; see
/// [`PositionedSlot::is_visible`].
pub fn layout_day<'a>(
    window: DayWindow,
    slots: impl IntoIterator<Item = &'a ScheduleSlot>,
) -> Vec<PositionedSlot> {
    group_overlaps(slots)
        .into_iter()
        .map(assign_columns)
        .flat_map(|cluster| {
            let column_count = cluster.column_count;
            cluster
                .members
                .into_iter()
                .zip(cluster.column_indices)
                .map(move |(slot, column)| {
                    PositionedSlot::new(window, slot.clone(), column, column_count)
                })
        })
        .collect()
}

/// Lay out every working day of a timetable.
pub fn layout_week(
    window: DayWindow,
    timetable: &ClassTimetable,
) -> Vec<(DayOfWeek, Vec<PositionedSlot>)> {
    DayOfWeek::ALL
        .into_iter()
        .map(|day| (day, layout_day(window, timetable.slots_for_day(day))))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::schedule::time::TimeInterval;

    pub fn intervals(pairs: &[(&str, &str)]) -> Vec<TimeInterval> {
        pairs
            .iter()
            .map(|(start, end)| TimeInterval::from_hhmm(start, end).unwrap())
            .collect()
    }

    /// Deterministic pseudo-random day, 06:00 to 20:00 in 5 minute steps.
    pub fn random_day(seed: u64, count: usize) -> Vec<TimeInterval> {
        let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
        let mut next = move |bound: u64| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % bound
        };

        (0..count)
            .map(|_| {
                let start = 360 + next(160) as u16 * 5;
                let length = 5 + next(24) as u16 * 5;
                TimeInterval::new(start, start + length).unwrap()
            })
            .collect()
    }
}
