//! Cold brew: no pour schedule, just a steep-time table and a coupled
//! dose/liquid/ratio triangle. Grounds absorb 17-22% of the liquid, so the
//! calculator reports a yield range rather than a single number.

use serde::{Deserialize, Serialize};

use crate::error::BrewError;

/// Ratio at and above which the result drinks as-is.
pub const RTD_RATIO: f64 = 10.0;
/// Grounds absorption bounds, fractions of the steeping liquid.
pub const ABSORPTION_MIN: f64 = 0.17;
pub const ABSORPTION_MAX: f64 = 0.22;

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlavourStrength {
    Lighter,
    #[default]
    Balanced,
    Bold,
    ExtraBold,
}

impl FlavourStrength {
    /// Steep time in hours.
    pub fn steep_hours(self) -> u32 {
        match self {
            FlavourStrength::Lighter => 12,
            FlavourStrength::Balanced => 16,
            FlavourStrength::Bold => 20,
            FlavourStrength::ExtraBold => 24,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LiquidType {
    #[default]
    Water,
    Milk,
}

impl LiquidType {
    pub fn as_str(self) -> &'static str {
        match self {
            LiquidType::Water => "water",
            LiquidType::Milk => "milk",
        }
    }
}

/// Display classification of the finished liquid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Liquidity {
    /// Ready to drink.
    Rtd,
    Concentrate,
}

impl Liquidity {
    pub fn as_str(self) -> &'static str {
        match self {
            Liquidity::Rtd => "RTD",
            Liquidity::Concentrate => "Concentrate",
        }
    }
}

/// Cold brew parameters. `coffee_grams`, `liquid_ml` and `ratio` stay
/// coupled: changing any one rederives the dependent one through the
/// setters, so construct with [`ColdBrewParams::new`] and mutate through
/// them.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ColdBrewParams {
    coffee_grams: f64,
    liquid_ml: f64,
    ratio: f64,
    pub strength: FlavourStrength,
    pub liquid_type: LiquidType,
}

impl Default for ColdBrewParams {
    fn default() -> Self {
        Self {
            coffee_grams: 20.0,
            liquid_ml: 200.0,
            ratio: 10.0,
            strength: FlavourStrength::default(),
            liquid_type: LiquidType::default(),
        }
    }
}

impl ColdBrewParams {
    pub fn new(
        coffee_grams: f64,
        ratio: f64,
        strength: FlavourStrength,
        liquid_type: LiquidType,
    ) -> Result<Self, BrewError> {
        let mut params = Self {
            strength,
            liquid_type,
            ..Self::default()
        };
        params.set_coffee_grams(coffee_grams)?;
        params.set_ratio(ratio)?;
        Ok(params)
    }

    pub fn coffee_grams(&self) -> f64 {
        self.coffee_grams
    }

    pub fn liquid_ml(&self) -> f64 {
        self.liquid_ml
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Change the dose; the ratio follows the fixed liquid amount.
    pub fn set_coffee_grams(&mut self, grams: f64) -> Result<(), BrewError> {
        if grams <= 0.0 {
            return Err(BrewError::InvalidParameter(format!(
                "coffee dose must be positive, got {grams}"
            )));
        }
        self.coffee_grams = grams;
        self.ratio = self.liquid_ml / grams;
        Ok(())
    }

    /// Change the liquid amount; the ratio follows the fixed dose.
    pub fn set_liquid_ml(&mut self, ml: f64) -> Result<(), BrewError> {
        if ml <= 0.0 {
            return Err(BrewError::InvalidParameter(format!(
                "liquid amount must be positive, got {ml}"
            )));
        }
        self.liquid_ml = ml;
        self.ratio = ml / self.coffee_grams;
        Ok(())
    }

    /// Change the ratio; the liquid amount follows the fixed dose.
    pub fn set_ratio(&mut self, ratio: f64) -> Result<(), BrewError> {
        if ratio <= 0.0 {
            return Err(BrewError::InvalidParameter(format!(
                "ratio must be positive, got {ratio}"
            )));
        }
        self.ratio = ratio;
        self.liquid_ml = self.coffee_grams * ratio;
        Ok(())
    }

    pub fn steep_hours(&self) -> u32 {
        self.strength.steep_hours()
    }

    /// Liquid left after the grounds take their share, best and worst case.
    pub fn yield_range_ml(&self) -> (f64, f64) {
        (
            self.liquid_ml * (1.0 - ABSORPTION_MAX),
            self.liquid_ml * (1.0 - ABSORPTION_MIN),
        )
    }

    pub fn average_yield_ml(&self) -> f64 {
        let (lo, hi) = self.yield_range_ml();
        (lo + hi) / 2.0
    }

    pub fn liquidity(&self) -> Liquidity {
        if self.ratio >= RTD_RATIO {
            Liquidity::Rtd
        } else {
            Liquidity::Concentrate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(FlavourStrength::Lighter, 12)]
    #[case(FlavourStrength::Balanced, 16)]
    #[case(FlavourStrength::Bold, 20)]
    #[case(FlavourStrength::ExtraBold, 24)]
    fn test_steep_hours_table(#[case] strength: FlavourStrength, #[case] hours: u32) {
        assert_eq!(strength.steep_hours(), hours);
    }

    #[test]
    fn test_dose_change_rederives_ratio() {
        let mut p = ColdBrewParams::default();
        p.set_coffee_grams(25.0).unwrap();
        assert_relative_eq!(p.ratio(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(p.liquid_ml(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_liquid_change_rederives_ratio() {
        let mut p = ColdBrewParams::default();
        p.set_liquid_ml(300.0).unwrap();
        assert_relative_eq!(p.ratio(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(p.coffee_grams(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ratio_change_rederives_liquid() {
        let mut p = ColdBrewParams::default();
        p.set_ratio(12.0).unwrap();
        assert_relative_eq!(p.liquid_ml(), 240.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_inputs_are_rejected() {
        let mut p = ColdBrewParams::default();
        assert!(p.set_coffee_grams(0.0).is_err());
        assert!(p.set_liquid_ml(-10.0).is_err());
        assert!(p.set_ratio(0.0).is_err());
        // a rejected edit leaves the triangle untouched
        assert_relative_eq!(p.ratio(), 10.0, epsilon = 1e-9);
        assert!(ColdBrewParams::new(0.0, 10.0, FlavourStrength::Balanced, LiquidType::Water).is_err());
    }

    #[test]
    fn test_yield_range() {
        let p = ColdBrewParams::default();
        let (lo, hi) = p.yield_range_ml();
        assert_relative_eq!(lo, 156.0, epsilon = 1e-9);
        assert_relative_eq!(hi, 166.0, epsilon = 1e-9);
        assert_relative_eq!(p.average_yield_ml(), 161.0, epsilon = 1e-9);
    }

    #[test]
    fn test_liquidity_classification() {
        let mut p = ColdBrewParams::default();
        assert_eq!(p.liquidity(), Liquidity::Rtd);
        p.set_ratio(9.9).unwrap();
        assert_eq!(p.liquidity(), Liquidity::Concentrate);
        p.set_ratio(10.0).unwrap();
        assert_eq!(p.liquidity(), Liquidity::Rtd);
    }
}
