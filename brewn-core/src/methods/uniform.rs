//! Fixed-interval methods: a flat ratio, a fixed pour count, and a timing
//! layout. Each named method is a `UniformConfig` constant; the generator is
//! shared.

use crate::error::BrewError;
use crate::schedule::{PourStep, Schedule};

/// Timing layout for a uniform-interval method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Back-to-back equal windows, one pour each.
    EvenWindows {
        window_secs: u32,
        bloom_label: &'static str,
    },
    /// A long bloom window, then short pour pulses separated by
    /// equal-length pauses, with a swirl during the bloom and a final
    /// drawdown wait. The swirls and pauses carry no water.
    BloomAndPulse {
        bloom_secs: u32,
        pulse_secs: u32,
        pause_secs: u32,
        early_swirl: (u32, u32),
        drawdown: (u32, u32),
    },
}

/// A named fixed-interval method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformConfig {
    pub title: &'static str,
    pub creator: &'static str,
    pub tags: &'static [&'static str],
    /// Water to coffee ratio.
    pub ratio: f64,
    /// Number of real pours the water is divided into.
    pub pours: u32,
    pub water_temp: u32,
    pub grind_size: &'static str,
    pub layout: Layout,
}

/// Four equal pours on 45 s windows at 1:15.
pub const SIMPLE: UniformConfig = UniformConfig {
    title: "Simple Brew",
    creator: "AI",
    tags: &["filter", "v60"],
    ratio: 15.0,
    pours: 4,
    water_temp: 90,
    grind_size: "medium",
    layout: Layout::EvenWindows {
        window_secs: 45,
        bloom_label: "bloom",
    },
};

/// James Hoffmann's single-cup recipe: 1:16.67, a 50 s bloom and four
/// 10 s pulses with 10 s rests, then a swirl-and-drawdown wait to 3:00.
pub const BETTER_ONE: UniformConfig = UniformConfig {
    title: "The Better One Cup",
    creator: "James Hoffmann",
    tags: &["filter", "v60"],
    ratio: 16.67,
    pours: 5,
    water_temp: 90,
    grind_size: "medium-fine",
    layout: Layout::BloomAndPulse {
        bloom_secs: 50,
        pulse_secs: 10,
        pause_secs: 10,
        early_swirl: (10, 15),
        drawdown: (120, 180),
    },
};

/// Input for a uniform-interval schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformParams {
    pub coffee_grams: f64,
    pub config: UniformConfig,
}

impl UniformParams {
    pub fn new(coffee_grams: f64, config: UniformConfig) -> Self {
        Self {
            coffee_grams,
            config,
        }
    }

    pub fn total_water(&self) -> f64 {
        self.coffee_grams * self.config.ratio
    }

    /// Build the pour schedule. The configured pour count must fit the
    /// layout; a count the layout cannot place is a configuration error,
    /// never a division fault.
    pub fn schedule(&self) -> Result<Schedule, BrewError> {
        let pours = self.config.pours;
        let min_pours = match self.config.layout {
            Layout::EvenWindows { .. } => 1,
            Layout::BloomAndPulse { .. } => 2,
        };
        if pours < min_pours {
            return Err(BrewError::InvalidParameter(format!(
                "{} needs at least {} pours, configured {}",
                self.config.title, min_pours, pours
            )));
        }

        let each = self.total_water() / f64::from(pours);
        let running_total = |i: u32| format!("~{:.1}ml Total", f64::from(i) * each);

        let steps = match self.config.layout {
            Layout::EvenWindows {
                window_secs,
                bloom_label,
            } => (0..pours)
                .map(|i| {
                    let label = if i == 0 {
                        bloom_label.to_string()
                    } else {
                        running_total(i + 1)
                    };
                    PourStep::new(i * window_secs, (i + 1) * window_secs, each, label)
                })
                .collect(),
            Layout::BloomAndPulse {
                bloom_secs,
                pulse_secs,
                pause_secs,
                early_swirl,
                drawdown,
            } => {
                let mut steps = vec![
                    PourStep::new(0, bloom_secs, each, "Bloom"),
                    PourStep::new(early_swirl.0, early_swirl.1, 0.0, "Gentle Swirl"),
                ];
                let mut cursor = bloom_secs;
                for i in 1..pours - 1 {
                    steps.push(PourStep::new(
                        cursor,
                        cursor + pulse_secs,
                        each,
                        running_total(i + 1),
                    ));
                    steps.push(PourStep::new(
                        cursor + pulse_secs,
                        cursor + pulse_secs + pause_secs,
                        0.0,
                        "Pause",
                    ));
                    cursor += pulse_secs + pause_secs;
                }
                steps.push(PourStep::new(
                    cursor,
                    cursor + pulse_secs,
                    each,
                    running_total(pours),
                ));
                steps.push(PourStep::new(
                    drawdown.0,
                    drawdown.1,
                    0.0,
                    "Gentle Swirl, Wait for Drawdown",
                ));
                steps
            }
        };

        Ok(Schedule(steps))
    }
}
