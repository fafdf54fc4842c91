use super::time::{TimeInterval, Timed};
use crate::error::{Result, TimetableError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier handed out by the schedule storage once a slot is saved.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six working days. There are no lessons on Sunday.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 6] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_ascii_lowercase();
                lower == name || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| TimetableError::InvalidDay(s.to_string()))
    }
}

impl TryFrom<chrono::Weekday> for DayOfWeek {
    type Error = TimetableError;

    fn try_from(weekday: chrono::Weekday) -> Result<Self> {
        match weekday {
            chrono::Weekday::Mon => Ok(DayOfWeek::Monday),
            chrono::Weekday::Tue => Ok(DayOfWeek::Tuesday),
            chrono::Weekday::Wed => Ok(DayOfWeek::Wednesday),
            chrono::Weekday::Thu => Ok(DayOfWeek::Thursday),
            chrono::Weekday::Fri => Ok(DayOfWeek::Friday),
            chrono::Weekday::Sat => Ok(DayOfWeek::Saturday),
            chrono::Weekday::Sun => Err(TimetableError::InvalidDay("Sunday".to_string())),
        }
    }
}

impl From<DayOfWeek> for chrono::Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => chrono::Weekday::Mon,
            DayOfWeek::Tuesday => chrono::Weekday::Tue,
            DayOfWeek::Wednesday => chrono::Weekday::Wed,
            DayOfWeek::Thursday => chrono::Weekday::Thu,
            DayOfWeek::Friday => chrono::Weekday::Fri,
            DayOfWeek::Saturday => chrono::Weekday::Sat,
        }
    }
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum BreakType {
    #[serde(rename = "Lunch")]
    Lunch,
    #[serde(rename = "Short Break")]
    ShortBreak,
    #[serde(rename = "Assembly")]
    Assembly,
    #[serde(rename = "Free Period")]
    FreePeriod,
}

impl BreakType {
    pub const ALL: [BreakType; 4] = [
        BreakType::Lunch,
        BreakType::ShortBreak,
        BreakType::Assembly,
        BreakType::FreePeriod,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BreakType::Lunch => "Lunch",
            BreakType::ShortBreak => "Short Break",
            BreakType::Assembly => "Assembly",
            BreakType::FreePeriod => "Free Period",
        }
    }
}

impl std::fmt::Display for BreakType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BreakType {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        BreakType::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TimetableError::validation("breakType", format!("unknown break type `{s}`"))
            })
    }
}

/// What happens during a slot.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub enum SlotKind {
    Lesson {
        subject_name: String,
        teacher_name: String,
    },
    Break {
        break_type: BreakType,
    },
}

impl SlotKind {
    pub fn lesson(subject_name: impl Into<String>, teacher_name: impl Into<String>) -> Self {
        SlotKind::Lesson {
            subject_name: subject_name.into(),
            teacher_name: teacher_name.into(),
        }
    }

    /// A lesson needs both a subject and a teacher. Break types are a closed
    /// enum, so any `Break` is already well formed.
    pub fn validate(&self) -> Result<()> {
        if let SlotKind::Lesson {
            subject_name,
            teacher_name,
        } = self
        {
            if subject_name.trim().is_empty() {
                return Err(TimetableError::validation(
                    "subjectName",
                    "a lesson needs a subject",
                ));
            }
            if teacher_name.trim().is_empty() {
                return Err(TimetableError::validation(
                    "teacherName",
                    "a lesson needs a teacher",
                ));
            }
        }
        Ok(())
    }

    pub fn title(&self) -> String {
        match self {
            SlotKind::Lesson {
                subject_name,
                teacher_name,
            } => format!("{subject_name} ({teacher_name})"),
            SlotKind::Break { break_type } => break_type.to_string(),
        }
    }
}

/// A lesson or break that storage has confirmed.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub id: SlotId,
    pub day: DayOfWeek,
    pub interval: TimeInterval,
    pub kind: SlotKind,
}

impl ScheduleSlot {
    /// Apply a patch the way the backend is assumed to: verbatim.
    pub fn patched(&self, patch: &SlotPatch) -> ScheduleSlot {
        ScheduleSlot {
            id: self.id.clone(),
            day: self.day,
            interval: patch.interval,
            kind: patch.kind.clone(),
        }
    }
}

impl Timed for ScheduleSlot {
    fn interval(&self) -> TimeInterval {
        self.interval
    }
}

/// A slot that has not been saved yet and therefore has no id.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct SlotDraft {
    pub day: DayOfWeek,
    pub interval: TimeInterval,
    pub kind: SlotKind,
}

impl SlotDraft {
    pub fn new(day: DayOfWeek, interval: TimeInterval, kind: SlotKind) -> Self {
        Self {
            day,
            interval,
            kind,
        }
    }

    pub fn confirm(self, id: SlotId) -> ScheduleSlot {
        ScheduleSlot {
            id,
            day: self.day,
            interval: self.interval,
            kind: self.kind,
        }
    }
}

/// Full replacement of a slot's interval and kind. Id and day are kept.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct SlotPatch {
    pub interval: TimeInterval,
    pub kind: SlotKind,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_day_names() {
        assert_eq!("monday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Monday);
        assert_eq!("Sat".parse::<DayOfWeek>().unwrap(), DayOfWeek::Saturday);
        assert_eq!(" Wednesday ".parse::<DayOfWeek>().unwrap(), DayOfWeek::Wednesday);
        assert!(matches!(
            "Sunday".parse::<DayOfWeek>(),
            Err(TimetableError::InvalidDay(_))
        ));
        assert!("Mo".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn sunday_is_not_a_school_day() {
        assert!(DayOfWeek::try_from(chrono::Weekday::Sun).is_err());
        for day in DayOfWeek::ALL {
            let weekday: chrono::Weekday = day.into();
            assert_eq!(DayOfWeek::try_from(weekday).unwrap(), day);
        }
    }

    #[test]
    fn break_types_are_a_closed_set() {
        assert_eq!("short break".parse::<BreakType>().unwrap(), BreakType::ShortBreak);
        assert_eq!("Free Period".parse::<BreakType>().unwrap(), BreakType::FreePeriod);
        assert!(matches!(
            "Recess".parse::<BreakType>(),
            Err(TimetableError::Validation { field: "breakType", .. })
        ));
        assert_eq!(
            serde_json::to_string(&BreakType::ShortBreak).unwrap(),
            r#""Short Break""#
        );
    }

    #[test]
    fn lesson_needs_subject_and_teacher() {
        assert!(matches!(
            SlotKind::lesson("", "Mr. X").validate(),
            Err(TimetableError::Validation { field: "subjectName", .. })
        ));
        assert!(matches!(
            SlotKind::lesson("Maths", "  ").validate(),
            Err(TimetableError::Validation { field: "teacherName", .. })
        ));
        assert!(SlotKind::lesson("Maths", "Mr. X").validate().is_ok());
        assert!(SlotKind::Break {
            break_type: BreakType::Lunch
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn patch_keeps_id_and_day() {
        let slot = SlotDraft::new(
            DayOfWeek::Tuesday,
            TimeInterval::from_hhmm("09:00", "10:00").unwrap(),
            SlotKind::lesson("Maths", "Mr. X"),
        )
        .confirm(SlotId::new("a1"));
        let patch = SlotPatch {
            interval: TimeInterval::from_hhmm("11:00", "11:30").unwrap(),
            kind: SlotKind::Break {
                break_type: BreakType::Assembly,
            },
        };
        let patched = slot.patched(&patch);
        assert_eq!(patched.id, SlotId::new("a1"));
        assert_eq!(patched.day, DayOfWeek::Tuesday);
        assert_eq!(patched.interval, patch.interval);
        assert_eq!(patched.kind.title(), "Assembly");
    }
}
