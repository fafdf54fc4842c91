//! Weekly class-timetable layout engine.
//!
//! Lays out each day's lessons and breaks into non-overlapping columns,
//! snaps pointer positions to a time grid for new slots, and keeps one
//! class's timetable in sync with the school backend.

/// 课表数据：时间、条目、班级课表
pub mod schedule;

/// 重叠分组、分列、位置计算和网格吸附
pub mod layout;

/// 对接外部存储和科目列表
pub mod adapters;

/// 持有课表并协调增删改
pub mod coordinator;

/// 错误类型
pub mod error;

/// 命令行程序用到的配置和日志
pub mod app;

pub use coordinator::{ScheduleCoordinator, SlotPhase};
pub use error::{Result, TimetableError};
