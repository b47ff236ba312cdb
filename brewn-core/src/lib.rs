//! Core brew calculators for BREWn: per-method pour-schedule generation,
//! the shared brew timer, and the recipe exchange paths (JSON import/export
//! and URL share tokens). Pure logic only; presentation lives in the CLI.

pub mod error;
pub mod methods;
pub mod recipe;
pub mod schedule;
pub mod share;
pub mod timer;

pub use error::BrewError;
pub use recipe::BrewRecipe;
pub use schedule::{format_clock, format_time, PourStep, Schedule};
pub use timer::{BrewTimer, TimerPhase};
