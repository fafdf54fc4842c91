use crate::error::Result;
use crate::schedule::slot::ScheduleSlot;
use crate::schedule::time::TimeInterval;
use serde::{Deserialize, Serialize};

/// The visible time range of a day column.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayWindow(TimeInterval);

impl DayWindow {
    pub fn new(start: u16, end: u16) -> Result<Self> {
        Ok(Self(TimeInterval::new(start, end)?))
    }

    pub fn from_hhmm(start: &str, end: &str) -> Result<Self> {
        Ok(Self(TimeInterval::from_hhmm(start, end)?))
    }

    pub fn start(&self) -> u16 {
        self.0.start()
    }

    pub fn end(&self) -> u16 {
        self.0.end()
    }

    pub fn span(&self) -> u16 {
        self.0.minutes()
    }

    pub fn clamp(&self, minutes: u16) -> u16 {
        minutes.clamp(self.start(), self.end())
    }

    pub fn interval(&self) -> TimeInterval {
        self.0
    }
}

/// 07:00 to 19:00.
impl Default for DayWindow {
    fn default() -> Self {
        Self(TimeInterval::new_unchecked(7 * 60, 19 * 60))
    }
}

impl std::fmt::Display for DayWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A rectangle inside a day column, every edge a fraction of the column.
#[derive(PartialEq, Debug, Clone, Copy, Serialize)]
pub struct SlotRect {
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
}

impl SlotRect {
    /// Parts of the interval outside the window are cut off. An interval
    /// entirely outside collapses to zero height at the nearest edge.
    pub fn compute(
        window: DayWindow,
        interval: TimeInterval,
        column_index: usize,
        column_count: usize,
    ) -> SlotRect {
        let span = f64::from(window.span());
        let start = window.clamp(interval.start());
        let end = window.clamp(interval.end());
        let columns = column_count.max(1);
        let width = 1.0 / columns as f64;

        SlotRect {
            top: f64::from(start - window.start()) / span,
            height: f64::from(end - start) / span,
            left: column_index.min(columns - 1) as f64 * width,
            width,
        }
    }
}

/// A slot ready to be drawn.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct PositionedSlot {
    pub slot: ScheduleSlot,
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
    pub column_index: usize,
    pub column_count: usize,
}

impl PositionedSlot {
    pub fn new(
        window: DayWindow,
        slot: ScheduleSlot,
        column_index: usize,
        column_count: usize,
    ) -> Self {
        let rect = SlotRect::compute(window, slot.interval, column_index, column_count);
        Self {
            slot,
            top: rect.top,
            height: rect.height,
            left: rect.left,
            width: rect.width,
            column_index,
            column_count,
        }
    }

    /// Slots that fall entirely outside the window have nothing to draw.
    pub fn is_visible(&self) -> bool {
        self.height > 0.0
    }

    pub fn rect(&self) -> SlotRect {
        SlotRect {
            top: self.top,
            height: self.height,
            left: self.left,
            width: self.width,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn interval(start: &str, end: &str) -> TimeInterval {
        TimeInterval::from_hhmm(start, end).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn window_must_not_be_empty() {
        assert!(DayWindow::new(600, 600).is_err());
        assert!(DayWindow::from_hhmm("19:00", "07:00").is_err());
        let window = DayWindow::default();
        assert_eq!((window.start(), window.end(), window.span()), (420, 1140, 720));
        assert_eq!(window.to_string(), "07:00-19:00");
    }

    #[test]
    fn side_by_side_halves() {
        let window = DayWindow::default();
        let first = SlotRect::compute(window, interval("09:00", "10:00"), 0, 2);
        let second = SlotRect::compute(window, interval("09:30", "10:30"), 1, 2);

        assert!(close(first.top, 120.0 / 720.0));
        assert!(close(first.height, 60.0 / 720.0));
        assert!(close(first.left, 0.0) && close(first.width, 0.5));
        assert!(close(second.top, 150.0 / 720.0));
        assert!(close(second.left, 0.5) && close(second.width, 0.5));
    }

    #[test]
    fn thirds() {
        let rect = SlotRect::compute(DayWindow::default(), interval("10:00", "11:00"), 2, 3);
        assert!(close(rect.width, 1.0 / 3.0));
        assert!(close(rect.left, 2.0 / 3.0));
    }

    #[test]
    fn clipped_at_window_edges() {
        let window = DayWindow::default();
        let early = SlotRect::compute(window, interval("06:00", "08:00"), 0, 1);
        assert!(close(early.top, 0.0));
        assert!(close(early.height, 60.0 / 720.0));

        let late = SlotRect::compute(window, interval("18:30", "21:00"), 0, 1);
        assert!(close(late.top + late.height, 1.0));
    }

    #[test]
    fn outside_window_has_no_height() {
        let window = DayWindow::default();
        let before = SlotRect::compute(window, interval("05:00", "06:00"), 0, 1);
        let after = SlotRect::compute(window, interval("20:00", "21:00"), 0, 1);
        assert_eq!(before.height, 0.0);
        assert_eq!(after.height, 0.0);
        assert!(close(before.top, 0.0));
        assert!(close(after.top, 1.0));
    }
}
