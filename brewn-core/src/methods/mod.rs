//! The brewing methods. Each module owns one calculator; [`Method`] is the
//! tagged surface the presentation layer drives, so page-level code never
//! duplicates per-method arithmetic.

pub mod cold_brew;
pub mod custom;
pub mod four_six;
pub mod uniform;

pub use cold_brew::{ColdBrewParams, FlavourStrength, Liquidity, LiquidType};
pub use custom::{CustomMethod, MAX_SECONDS};
pub use four_six::{BodyStrength, FourSixParams, RoastLevel, TasteBalance};
pub use uniform::{UniformConfig, UniformParams, BETTER_ONE, SIMPLE};

use crate::error::BrewError;
use crate::schedule::Schedule;
use crate::timer::BrewTimer;

/// A pour-schedule method, one variant per calculator.
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    FourSix(FourSixParams),
    Uniform(UniformParams),
    Custom(CustomMethod),
}

impl Method {
    pub fn title(&self) -> &str {
        match self {
            Method::FourSix(_) => "The 4:6 Method",
            Method::Uniform(p) => p.config.title,
            Method::Custom(m) => &m.title,
        }
    }

    pub fn creator(&self) -> &str {
        match self {
            Method::FourSix(_) => "Tetsu Kasuya",
            Method::Uniform(p) => p.config.creator,
            Method::Custom(m) => &m.creator,
        }
    }

    pub fn schedule(&self) -> Result<Schedule, BrewError> {
        match self {
            Method::FourSix(p) => Ok(p.schedule()),
            Method::Uniform(p) => p.schedule(),
            Method::Custom(m) => Ok(m.schedule().clone()),
        }
    }

    pub fn total_water(&self) -> f64 {
        match self {
            Method::FourSix(p) => p.total_water(),
            Method::Uniform(p) => p.total_water(),
            Method::Custom(m) => m.total_water(),
        }
    }

    /// Brew length the timer runs against. Fixed methods live on an
    /// absolute timeline (latest window end); the custom method
    /// concatenates its spans instead.
    pub fn total_duration(&self) -> Result<u32, BrewError> {
        match self {
            Method::FourSix(p) => Ok(p.schedule().total_duration()),
            Method::Uniform(p) => Ok(p.schedule()?.total_duration()),
            Method::Custom(m) => Ok(m.total_duration()),
        }
    }

    /// A fresh timer sized to this method's brew.
    pub fn timer(&self) -> Result<BrewTimer, BrewError> {
        Ok(BrewTimer::new(self.total_duration()?))
    }
}
