use serde::{Deserialize, Serialize};

/// One timed, volumed water addition within a brew.
///
/// Zero-volume steps are pacing actions (swirls, pauses, drawdown waits):
/// they occupy a time window but add no water and never count as pours.
///
/// The serialized field names (`time`, `endTime`) match the JSON records the
/// recipe exchange format carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PourStep {
    /// Start of the step's window, seconds from brew start.
    #[serde(rename = "time")]
    pub start: u32,
    /// End of the window, exclusive. Always greater than `start`.
    #[serde(rename = "endTime")]
    pub end: u32,
    /// Water to add during the window, milliliters. Zero for pacing steps.
    pub volume: f64,
    pub label: String,
}

impl PourStep {
    pub fn new(start: u32, end: u32, volume: f64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            volume,
            label: label.into(),
        }
    }

    /// Window length in seconds.
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }

    /// True for steps that actually add water.
    pub fn is_pour(&self) -> bool {
        self.volume > 0.0
    }
}

/// An ordered pour schedule. Steps are kept in non-decreasing `start` order
/// by the generators; edits through [`crate::methods::CustomMethod`] keep
/// each step's window well-formed but not the relative ordering, which is
/// why the custom method measures duration cyclically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule(pub Vec<PourStep>);

impl Schedule {
    pub fn steps(&self) -> &[PourStep] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total brew time on an absolute timeline: the latest window end.
    /// Zero for an empty schedule.
    pub fn total_duration(&self) -> u32 {
        self.0.iter().map(|s| s.end).max().unwrap_or(0)
    }

    /// Total brew time when step windows are treated as consecutive
    /// spans rather than absolute positions: the sum of window lengths in
    /// the given order. This is how the custom builder measures its brew.
    pub fn cycle_duration(&self) -> u32 {
        self.0.iter().map(PourStep::duration).sum()
    }

    /// Water added across the whole schedule. Pacing steps contribute
    /// nothing by construction (volume 0).
    pub fn total_water(&self) -> f64 {
        self.0.iter().map(|s| s.volume).sum()
    }

    /// Number of real pours, excluding zero-volume pacing steps.
    pub fn pour_count(&self) -> usize {
        self.0.iter().filter(|s| s.is_pour()).count()
    }

    /// Index of the step whose window contains `seconds`
    /// (`start <= seconds < end`), searching in order. `None` whenever no
    /// window matches; callers treat that as a valid "nothing active" state.
    pub fn active_at(&self, seconds: u32) -> Option<usize> {
        self.0
            .iter()
            .position(|s| seconds >= s.start && seconds < s.end)
    }

    /// True when steps appear in non-decreasing start order.
    pub fn is_ordered(&self) -> bool {
        self.0.windows(2).all(|w| w[0].start <= w[1].start)
    }
}

/// Seconds as `m:ss`, the schedule-row format (`1:05`, `0:45`).
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Seconds as `mm:ss`, the timer-readout format (`01:05`).
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Schedule {
        Schedule(vec![
            PourStep::new(0, 45, 84.0, "bloom"),
            PourStep::new(45, 90, 0.0, "swirl"),
            PourStep::new(90, 165, 126.0, "body"),
        ])
    }

    #[test]
    fn test_durations() {
        let s = sample();
        assert_eq!(s.total_duration(), 165);
        assert_eq!(s.cycle_duration(), 165);
        assert_eq!(Schedule::default().total_duration(), 0);
    }

    #[test]
    fn test_cycle_duration_ignores_gaps() {
        // Windows laid out with a hole; the cyclic measure only sums spans.
        let s = Schedule(vec![
            PourStep::new(0, 30, 40.0, "a"),
            PourStep::new(100, 130, 40.0, "b"),
        ]);
        assert_eq!(s.cycle_duration(), 60);
        assert_eq!(s.total_duration(), 130);
    }

    #[test]
    fn test_water_and_pour_count_skip_pacing_steps() {
        let s = sample();
        assert_relative_eq!(s.total_water(), 210.0, epsilon = 1e-9);
        assert_eq!(s.pour_count(), 2);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_active_step_lookup() {
        let s = sample();
        assert_eq!(s.active_at(0), Some(0));
        assert_eq!(s.active_at(44), Some(0));
        assert_eq!(s.active_at(45), Some(1));
        assert_eq!(s.active_at(164), Some(2));
        // End bound is exclusive; past the last window nothing is active.
        assert_eq!(s.active_at(165), None);
    }

    #[test]
    fn test_no_active_step_before_first_window() {
        let s = Schedule(vec![PourStep::new(10, 20, 5.0, "late start")]);
        assert_eq!(s.active_at(0), None);
        assert_eq!(s.active_at(10), Some(0));
    }

    #[test]
    fn test_ordering_check() {
        assert!(sample().is_ordered());
        let shuffled = Schedule(vec![
            PourStep::new(50, 60, 1.0, "b"),
            PourStep::new(0, 45, 1.0, "a"),
        ]);
        assert!(!shuffled.is_ordered());
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(45), "0:45");
        assert_eq!(format_time(165), "2:45");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
    }
}
