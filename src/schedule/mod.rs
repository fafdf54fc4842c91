/* 时间相关封装
 * HH:MM 解析与格式化，TimeInterval
 */
pub mod time;

/* 课表条目：课程或休息，以及草稿与修改 */
pub mod slot;

/* 一个班级一周的全部条目 */
pub mod timetable;

pub use slot::{BreakType, DayOfWeek, ScheduleSlot, SlotDraft, SlotId, SlotKind, SlotPatch};
pub use time::{format_hhmm, parse_hhmm, TimeInterval, Timed};
pub use timetable::{ClassRef, ClassTimetable};
