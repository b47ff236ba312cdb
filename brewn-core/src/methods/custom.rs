//! The hand-authored method: recipe metadata plus a step list edited one
//! field at a time. Edits keep every window at least one second wide.

use serde::{Deserialize, Serialize};

use crate::error::BrewError;
use crate::schedule::{PourStep, Schedule};

/// Editing ceiling for any step bound: 20 minutes.
pub const MAX_SECONDS: u32 = 1200;

/// A user-authored brew method. Steps are addressed by position; positions
/// are stable identity here, nothing carries a separate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMethod {
    pub title: String,
    pub creator: String,
    pub coffee_grams: f64,
    pub tags: Vec<String>,
    pub grind_size: String,
    pub roast_level: String,
    pub water_temp: f64,
    steps: Schedule,
}

impl Default for CustomMethod {
    /// The seed method every custom brew starts from.
    fn default() -> Self {
        Self {
            title: "Make your Own".to_string(),
            creator: "Yourself".to_string(),
            coffee_grams: 14.0,
            tags: vec!["filter".to_string(), "v60".to_string()],
            grind_size: "fine".to_string(),
            roast_level: "medium".to_string(),
            water_temp: 90.0,
            steps: Schedule(vec![PourStep::new(0, 60, 40.0, "Bloom (click to change)")]),
        }
    }
}

impl CustomMethod {
    pub fn schedule(&self) -> &Schedule {
        &self.steps
    }

    /// Brew length: the sum of step spans in authored order, not the latest
    /// end time. Custom steps are cycle-relative, unlike the fixed methods.
    pub fn total_duration(&self) -> u32 {
        self.steps.cycle_duration()
    }

    pub fn total_water(&self) -> f64 {
        self.steps.total_water()
    }

    /// Water-to-coffee ratio of the authored schedule.
    pub fn ratio(&self) -> Result<f64, BrewError> {
        if self.coffee_grams <= 0.0 {
            return Err(BrewError::InvalidParameter(format!(
                "coffee dose must be positive, got {}",
                self.coffee_grams
            )));
        }
        Ok(self.total_water() / self.coffee_grams)
    }

    pub fn set_coffee_grams(&mut self, grams: f64) -> Result<(), BrewError> {
        if grams <= 0.0 {
            return Err(BrewError::InvalidParameter(format!(
                "coffee dose must be positive, got {grams}"
            )));
        }
        self.coffee_grams = grams;
        Ok(())
    }

    /// Append a step right after the last one: a 30 s zero-volume window
    /// the user then fills in, capped at the editing ceiling.
    pub fn add_step(&mut self) {
        let start = self
            .steps
            .0
            .last()
            .map(|s| s.end.min(MAX_SECONDS - 10))
            .unwrap_or(0);
        let end = (start + 30).min(MAX_SECONDS);
        self.steps.0.push(PourStep::new(start, end, 0.0, ""));
    }

    /// Remove the step at `index`. The last remaining step stays put.
    pub fn remove_step(&mut self, index: usize) -> Result<(), BrewError> {
        self.check_index(index)?;
        if self.steps.len() == 1 {
            return Err(BrewError::InvalidParameter(
                "a method keeps at least one step".to_string(),
            ));
        }
        self.steps.0.remove(index);
        Ok(())
    }

    /// Move a step's start. Moving it onto or past the end drags the end
    /// along to keep a one-second span.
    pub fn set_start(&mut self, index: usize, start: u32) -> Result<(), BrewError> {
        self.check_index(index)?;
        let step = &mut self.steps.0[index];
        step.start = start.min(MAX_SECONDS - 1);
        if step.start >= step.end {
            step.end = (step.start + 1).min(MAX_SECONDS);
        }
        Ok(())
    }

    /// Move a step's end. Moving it onto or past the start drags the start
    /// back to keep a one-second span.
    pub fn set_end(&mut self, index: usize, end: u32) -> Result<(), BrewError> {
        self.check_index(index)?;
        let step = &mut self.steps.0[index];
        step.end = end.clamp(1, MAX_SECONDS);
        if step.end <= step.start {
            step.start = step.end - 1;
        }
        Ok(())
    }

    pub fn set_volume(&mut self, index: usize, volume: f64) -> Result<(), BrewError> {
        self.check_index(index)?;
        if volume < 0.0 {
            return Err(BrewError::InvalidParameter(format!(
                "pour volume cannot be negative, got {volume}"
            )));
        }
        self.steps.0[index].volume = volume;
        Ok(())
    }

    pub fn set_label(&mut self, index: usize, label: impl Into<String>) -> Result<(), BrewError> {
        self.check_index(index)?;
        self.steps.0[index].label = label.into();
        Ok(())
    }

    /// Replace the whole step list, e.g. from an imported recipe. Every
    /// window must already be well-formed.
    pub fn replace_steps(&mut self, steps: Vec<PourStep>) -> Result<(), BrewError> {
        if steps.is_empty() {
            return Err(BrewError::InvalidParameter(
                "a method keeps at least one step".to_string(),
            ));
        }
        for (i, step) in steps.iter().enumerate() {
            if step.start >= step.end {
                return Err(BrewError::InvalidParameter(format!(
                    "step {} window [{}, {}) is empty",
                    i + 1,
                    step.start,
                    step.end
                )));
            }
            if step.end > MAX_SECONDS {
                return Err(BrewError::InvalidParameter(format!(
                    "step {} ends past the {MAX_SECONDS}s ceiling",
                    i + 1
                )));
            }
            if step.volume < 0.0 {
                return Err(BrewError::InvalidParameter(format!(
                    "step {} has a negative volume",
                    i + 1
                )));
            }
        }
        self.steps = Schedule(steps);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), BrewError> {
        if index >= self.steps.len() {
            return Err(BrewError::InvalidParameter(format!(
                "no step at position {index}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_seed_method() {
        let m = CustomMethod::default();
        assert_eq!(m.schedule().len(), 1);
        assert_eq!(m.total_duration(), 60);
        assert_relative_eq!(m.total_water(), 40.0, epsilon = 1e-9);
        assert_relative_eq!(m.ratio().unwrap(), 40.0 / 14.0, epsilon = 1e-9);
    }

    #[test]
    fn test_add_step_continues_from_last_end() {
        let mut m = CustomMethod::default();
        m.add_step();
        let added = &m.schedule().steps()[1];
        assert_eq!((added.start, added.end), (60, 90));
        assert_eq!(added.volume, 0.0);
        assert_eq!(added.label, "");
    }

    #[test]
    fn test_add_step_respects_ceiling() {
        let mut m = CustomMethod::default();
        m.set_start(0, 1100).unwrap();
        m.set_end(0, MAX_SECONDS).unwrap();
        m.add_step();
        let added = &m.schedule().steps()[1];
        assert_eq!(added.start, MAX_SECONDS - 10);
        assert_eq!(added.end, MAX_SECONDS);
    }

    #[test]
    fn test_remove_keeps_last_step() {
        let mut m = CustomMethod::default();
        assert!(m.remove_step(0).is_err());
        m.add_step();
        m.remove_step(0).unwrap();
        assert_eq!(m.schedule().len(), 1);
        assert!(m.remove_step(5).is_err());
    }

    #[test]
    fn test_start_moved_past_end_drags_end() {
        let mut m = CustomMethod::default();
        // step is [0, 60); pushing start to 60 must leave [60, 61)
        m.set_start(0, 60).unwrap();
        let s = &m.schedule().steps()[0];
        assert_eq!((s.start, s.end), (60, 61));

        m.set_start(0, 200).unwrap();
        let s = &m.schedule().steps()[0];
        assert_eq!((s.start, s.end), (200, 201));
    }

    #[test]
    fn test_end_moved_before_start_drags_start() {
        let mut m = CustomMethod::default();
        m.set_start(0, 100).unwrap();
        m.set_end(0, 100).unwrap();
        let s = &m.schedule().steps()[0];
        assert_eq!((s.start, s.end), (99, 100));

        m.set_end(0, 1).unwrap();
        let s = &m.schedule().steps()[0];
        assert_eq!((s.start, s.end), (0, 1));
    }

    #[test]
    fn test_bounds_clamp_to_ceiling() {
        let mut m = CustomMethod::default();
        m.set_start(0, 5000).unwrap();
        let s = &m.schedule().steps()[0];
        assert_eq!((s.start, s.end), (MAX_SECONDS - 1, MAX_SECONDS));

        m.set_end(0, 5000).unwrap();
        assert_eq!(m.schedule().steps()[0].end, MAX_SECONDS);
    }

    #[test]
    fn test_cycle_duration_sums_spans_in_order() {
        let mut m = CustomMethod::default();
        m.add_step();
        m.set_start(1, 30).unwrap();
        m.set_end(1, 50).unwrap();
        // [0,60) and [30,50): overlapping on an absolute timeline, but the
        // custom brew concatenates spans: 60 + 20.
        assert_eq!(m.total_duration(), 80);
    }

    #[test]
    fn test_volume_edits() {
        let mut m = CustomMethod::default();
        m.set_volume(0, 55.5).unwrap();
        assert_relative_eq!(m.total_water(), 55.5, epsilon = 1e-9);
        assert!(m.set_volume(0, -1.0).is_err());
        assert_relative_eq!(m.total_water(), 55.5, epsilon = 1e-9);
    }

    #[test]
    fn test_replace_steps_validation() {
        let mut m = CustomMethod::default();
        assert!(m.replace_steps(vec![]).is_err());
        assert!(
            m.replace_steps(vec![PourStep::new(10, 10, 1.0, "empty window")])
                .is_err()
        );
        assert!(
            m.replace_steps(vec![PourStep::new(0, MAX_SECONDS + 1, 1.0, "too long")])
                .is_err()
        );
        // a failed replace leaves the prior steps alone
        assert_eq!(m.schedule().len(), 1);
        assert_eq!(m.schedule().steps()[0].label, "Bloom (click to change)");

        m.replace_steps(vec![
            PourStep::new(0, 30, 60.0, "bloom"),
            PourStep::new(30, 90, 120.0, "main"),
        ])
        .unwrap();
        assert_eq!(m.total_duration(), 90);
    }

    #[test]
    fn test_coffee_dose_guard() {
        let mut m = CustomMethod::default();
        assert!(m.set_coffee_grams(0.0).is_err());
        assert!(m.set_coffee_grams(-3.0).is_err());
        m.set_coffee_grams(20.0).unwrap();
        assert_relative_eq!(m.ratio().unwrap(), 2.0, epsilon = 1e-9);
    }
}
