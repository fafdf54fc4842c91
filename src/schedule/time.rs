/* Some utilities to deal with time of day
 * Minutes: offset from midnight, the unit everything else computes in
 * TimeInterval: packing start and end minutes of one slot
 */
use crate::error::{Result, TimetableError};
use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Parse a zero-padded 24-hour `HH:MM` string into minutes since midnight.
pub fn parse_hhmm(text: &str) -> Result<u16> {
    let invalid = || TimetableError::InvalidTimeFormat(text.to_string());

    let bytes = text.as_bytes();
    let [h1, h2, b':', m1, m2] = bytes[..] else {
        return Err(invalid());
    };
    if ![h1, h2, m1, m2].iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let hour = u16::from(h1 - b'0') * 10 + u16::from(h2 - b'0');
    let minute = u16::from(m1 - b'0') * 10 + u16::from(m2 - b'0');
    if hour >= 24 || minute >= 60 {
        return Err(invalid());
    }

    Ok(hour * 60 + minute)
}

/// Like [`parse_hhmm`], but also accepts `24:00` as the end of the day.
pub fn parse_end_hhmm(text: &str) -> Result<u16> {
    if text == "24:00" {
        return Ok(MINUTES_PER_DAY);
    }
    parse_hhmm(text)
}

/// Format minutes since midnight as `HH:MM`. The end of the day is `24:00`.
pub fn format_hhmm(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// A half-open `[start, end)` range of minutes within one day.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr", into = "IntervalRepr")]
pub struct TimeInterval {
    start: u16,
    end: u16,
}

impl TimeInterval {
    pub fn new(start: u16, end: u16) -> Result<Self> {
        if start >= MINUTES_PER_DAY || end > MINUTES_PER_DAY || end <= start {
            return Err(TimetableError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Caller guarantees `start < end <= 1440`.
    pub(crate) const fn new_unchecked(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub fn from_hhmm(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_hhmm(start)?, parse_end_hhmm(end)?)
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn minutes(&self) -> u16 {
        self.end - self.start
    }

    /// Touching intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

/// Anything laid out on a day column.
pub trait Timed {
    fn interval(&self) -> TimeInterval;
}

impl Timed for TimeInterval {
    fn interval(&self) -> TimeInterval {
        *self
    }
}

impl<T: Timed + ?Sized> Timed for &T {
    fn interval(&self) -> TimeInterval {
        (**self).interval()
    }
}

#[derive(Serialize, Deserialize)]
struct IntervalRepr {
    start: String,
    end: String,
}

impl TryFrom<IntervalRepr> for TimeInterval {
    type Error = TimetableError;

    fn try_from(repr: IntervalRepr) -> Result<Self> {
        Self::from_hhmm(&repr.start, &repr.end)
    }
}

impl From<TimeInterval> for IntervalRepr {
    fn from(interval: TimeInterval) -> Self {
        Self {
            start: format_hhmm(interval.start),
            end: format_hhmm(interval.end),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_accepts_well_formed_times() {
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("07:00").unwrap(), 420);
        assert_eq!(parse_hhmm("09:07").unwrap(), 547);
        assert_eq!(parse_hhmm("23:59").unwrap(), 1439);
    }

    #[test]
    fn parse_rejects_malformed_times() {
        for text in ["", "9:00", "09:0", "24:00", "12:60", "ab:cd", "09-00", "09:000", " 09:00"] {
            let err = parse_hhmm(text).unwrap_err();
            assert!(
                matches!(err, TimetableError::InvalidTimeFormat(ref t) if t == text),
                "{text:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn end_of_day_only_allowed_as_end() {
        assert_eq!(parse_end_hhmm("24:00").unwrap(), 1440);
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_end_hhmm("24:01").is_err());
        assert_eq!(format_hhmm(1440), "24:00");
    }

    #[test]
    fn minutes_round_trip() {
        for m in 0..MINUTES_PER_DAY {
            assert_eq!(parse_hhmm(&format_hhmm(m)).unwrap(), m);
        }
    }

    #[test]
    fn text_round_trip() {
        for h in 0..24 {
            for m in 0..60 {
                let text = format!("{h:02}:{m:02}");
                assert_eq!(format_hhmm(parse_hhmm(&text).unwrap()), text);
            }
        }
    }

    #[test]
    fn interval_rejects_empty_or_inverted() {
        assert!(matches!(
            TimeInterval::new(600, 600),
            Err(TimetableError::InvalidInterval { start: 600, end: 600 })
        ));
        assert!(TimeInterval::new(600, 540).is_err());
        assert!(TimeInterval::new(1440, 1441).is_err());
        assert!(TimeInterval::from_hhmm("23:00", "24:00").is_ok());
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = TimeInterval::from_hhmm("08:00", "09:00").unwrap();
        let b = TimeInterval::from_hhmm("09:00", "10:00").unwrap();
        let c = TimeInterval::from_hhmm("08:30", "09:30").unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c) && c.overlaps(&b));
        assert_eq!(a.minutes(), 60);
        assert_eq!(c.to_string(), "08:30-09:30");
    }

    #[test]
    fn interval_serializes_as_hhmm() {
        let interval = TimeInterval::from_hhmm("09:00", "10:30").unwrap();
        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, r#"{"start":"09:00","end":"10:30"}"#);
        let back: TimeInterval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, interval);
        assert!(serde_json::from_str::<TimeInterval>(r#"{"start":"10:00","end":"09:00"}"#).is_err());
    }
}
