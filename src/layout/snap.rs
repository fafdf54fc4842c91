use super::position::DayWindow;
use crate::error::{Result, TimetableError};
use crate::schedule::time::TimeInterval;
use log::debug;
use serde::{Deserialize, Serialize};

/// Time grid used when turning pointer positions into intervals.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Grid step in minutes, counted from the window start.
    pub granularity: u16,
    /// Length of a slot created by a single click.
    pub default_duration: u16,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            granularity: 15,
            default_duration: 30,
        }
    }
}

impl SnapConfig {
    pub fn new(granularity: u16, default_duration: u16) -> Result<Self> {
        if granularity == 0 {
            return Err(TimetableError::validation(
                "granularity",
                "snap granularity must be at least one minute",
            ));
        }
        if default_duration == 0 {
            return Err(TimetableError::validation(
                "defaultDuration",
                "default duration must be at least one minute",
            ));
        }
        Ok(Self {
            granularity,
            default_duration,
        })
    }
}

/// Round a pointer fraction to the nearest grid line, kept at least one grid
/// step before the window end. `None` when the window is shorter than a step.
fn snap_to_grid(window: DayWindow, snap: SnapConfig, pointer: f64) -> Option<u16> {
    let granularity = snap.granularity.max(1);
    let last_start = window.end().checked_sub(granularity)?;
    if last_start < window.start() {
        return None;
    }

    let pointer = if pointer.is_nan() { 0.0 } else { pointer.clamp(0.0, 1.0) };
    let offset = pointer * f64::from(window.span());
    let steps = (offset / f64::from(granularity)).round() as u16;
    let snapped = window.start().saturating_add(steps.saturating_mul(granularity));

    // last_start is not necessarily on the grid, step back to the last line before it
    let last_on_grid = window.start() + (last_start - window.start()) / granularity * granularity;
    Some(snapped.min(last_on_grid))
}

fn reject_overlaps(candidate: TimeInterval, existing: &[TimeInterval]) -> Result<TimeInterval> {
    if let Some(hit) = existing.iter().find(|other| other.overlaps(&candidate)) {
        debug!("Snap candidate {} collides with {}", candidate, hit);
        return Err(TimetableError::OverlapRejected);
    }
    Ok(candidate)
}

/// Like [`snap_pointer`], but says why no candidate was produced.
pub fn try_snap_pointer(
    window: DayWindow,
    snap: SnapConfig,
    pointer: f64,
    existing: &[TimeInterval],
) -> Result<TimeInterval> {
    let start = snap_to_grid(window, snap, pointer).ok_or(TimetableError::InvalidInterval {
        start: window.start(),
        end: window.end(),
    })?;

    let mut end = window.clamp(start.saturating_add(snap.default_duration));
    if end <= start {
        end = start + snap.granularity;
    }

    reject_overlaps(TimeInterval::new(start, end)?, existing)
}

/// Turn a click at `pointer` (fraction of the day column, top = 0) into a
/// candidate interval of the default duration.
///
/// Returns `None` when the candidate would overlap one of `existing`. That is
/// a normal miss, not an error.
pub fn snap_pointer(
    window: DayWindow,
    snap: SnapConfig,
    pointer: f64,
    existing: &[TimeInterval],
) -> Option<TimeInterval> {
    try_snap_pointer(window, snap, pointer, existing).ok()
}

/// Turn a drag between two pointer fractions into a candidate interval.
///
/// Both ends snap to the grid. A drag shorter than one grid step still
/// yields one step. Collisions are rejected the same way as for a click.
pub fn snap_drag(
    window: DayWindow,
    snap: SnapConfig,
    from: f64,
    to: f64,
    existing: &[TimeInterval],
) -> Option<TimeInterval> {
    let a = snap_to_grid(window, snap, from)?;
    let b = snap_to_grid(window, snap, to)?;
    let start = a.min(b);
    let end = window.clamp(a.max(b)).max(start + snap.granularity);

    let candidate = TimeInterval::new(start, end).ok()?;
    reject_overlaps(candidate, existing).ok()
}
