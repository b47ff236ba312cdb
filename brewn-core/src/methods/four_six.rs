//! Tetsu Kasuya's 4:6 method: 40% of the water in two adjustable early
//! pours, 60% spread evenly over a body phase chosen by mouthfeel.

use serde::{Deserialize, Serialize};

use crate::schedule::{PourStep, Schedule};

/// Brew ratio, water to coffee.
pub const RATIO: f64 = 15.0;
/// Share of the water that goes to the two flavor pours.
pub const FIRST_PHASE_SHARE: f64 = 0.4;
/// How far the taste selector moves the 50/50 flavor split.
pub const SPLIT_SHIFT: f64 = 0.1;
/// Each flavor pour gets a fixed 45 s window.
pub const FLAVOR_WINDOW_SECS: u32 = 45;
/// Nominal end of the brew; body pours divide the time left after 90 s.
pub const NOMINAL_TOTAL_SECS: u32 = 165;

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoastLevel {
    Light,
    #[default]
    Medium,
    Dark,
}

impl RoastLevel {
    /// Recommended water temperature, °C. Display-only.
    pub fn water_temp(self) -> u32 {
        match self {
            RoastLevel::Light => 93,
            RoastLevel::Medium => 90,
            RoastLevel::Dark => 85,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TasteBalance {
    #[default]
    Neutral,
    Sweetness,
    Acidity,
}

impl TasteBalance {
    /// Fractions of the first-phase water going to the 1st and 2nd pour.
    /// Sweetness holds water back from the opening pour; acidity front-loads
    /// it. The two fractions always sum to 1.
    pub fn split(self) -> (f64, f64) {
        let base = 0.5;
        match self {
            TasteBalance::Neutral => (base, base),
            TasteBalance::Sweetness => (base - SPLIT_SHIFT, base + SPLIT_SHIFT),
            TasteBalance::Acidity => (base + SPLIT_SHIFT, base - SPLIT_SHIFT),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BodyStrength {
    Thinner,
    #[default]
    Medium,
    Stronger,
}

impl BodyStrength {
    /// Number of pours the 60% body phase is divided into.
    pub fn body_pours(self) -> u32 {
        match self {
            BodyStrength::Thinner => 2,
            BodyStrength::Medium => 3,
            BodyStrength::Stronger => 4,
        }
    }
}

/// Input for the 4:6 schedule.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FourSixParams {
    pub coffee_grams: f64,
    pub roast: RoastLevel,
    pub taste: TasteBalance,
    pub body: BodyStrength,
}

impl Default for FourSixParams {
    fn default() -> Self {
        Self {
            coffee_grams: 14.0,
            roast: RoastLevel::default(),
            taste: TasteBalance::default(),
            body: BodyStrength::default(),
        }
    }
}

impl FourSixParams {
    pub fn total_water(&self) -> f64 {
        self.coffee_grams * RATIO
    }

    pub fn first_phase_water(&self) -> f64 {
        self.total_water() * FIRST_PHASE_SHARE
    }

    pub fn second_phase_water(&self) -> f64 {
        self.total_water() * (1.0 - FIRST_PHASE_SHARE)
    }

    pub fn water_temp(&self) -> u32 {
        self.roast.water_temp()
    }

    /// Total pours: two flavor pours plus the body pours.
    pub fn pour_count(&self) -> u32 {
        2 + self.body.body_pours()
    }

    /// Build the pour schedule. Two flavor pours on fixed 45 s windows,
    /// then the body phase in equal windows ending at the nominal total.
    pub fn schedule(&self) -> Schedule {
        let first_phase = self.first_phase_water();
        let (first_ratio, second_ratio) = self.taste.split();

        let mut steps = vec![
            PourStep::new(
                0,
                FLAVOR_WINDOW_SECS,
                first_phase * first_ratio,
                "1st (bloom)",
            ),
            PourStep::new(
                FLAVOR_WINDOW_SECS,
                2 * FLAVOR_WINDOW_SECS,
                first_phase * second_ratio,
                "2nd (balance)",
            ),
        ];

        let body_pours = self.body.body_pours();
        let body_start = 2 * FLAVOR_WINDOW_SECS;
        let window = (NOMINAL_TOTAL_SECS - body_start) / body_pours;
        let each_volume = self.second_phase_water() / f64::from(body_pours);

        let mut cursor = body_start;
        for i in 0..body_pours {
            // Last window absorbs the integer-division remainder so the
            // schedule always closes exactly on the nominal total.
            let end = if i == body_pours - 1 {
                NOMINAL_TOTAL_SECS
            } else {
                cursor + window
            };
            steps.push(PourStep::new(
                cursor,
                end,
                each_volume,
                format!("{} (body)", ordinal(3 + i)),
            ));
            cursor = end;
        }

        Schedule(steps)
    }
}

/// `1` -> `1st`, `2` -> `2nd`, `3` -> `3rd`, `4` -> `4th`, ...
fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
