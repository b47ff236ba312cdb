//! The shareable recipe record: what a custom method looks like on disk and
//! inside a share link. Field names are fixed by the exchange format, so
//! they stay camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::error::BrewError;
use crate::methods::CustomMethod;
use crate::schedule::{PourStep, Schedule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrewRecipe {
    pub title: String,
    pub creator: String,
    #[serde(rename = "coffeeGram")]
    pub coffee_gram: f64,
    pub tags: Vec<String>,
    #[serde(rename = "grindSize")]
    pub grind_size: String,
    #[serde(rename = "roastLevel")]
    pub roast_level: String,
    #[serde(rename = "waterTemp")]
    pub water_temp: f64,
    pub schedules: Vec<PourStep>,
}

impl BrewRecipe {
    /// Parse an uploaded recipe. Any missing or wrong-typed field fails
    /// the whole import; a recipe with no steps is rejected too. Callers
    /// keep their current state on failure.
    pub fn from_json(json: &str) -> Result<Self, BrewError> {
        let recipe: BrewRecipe =
            serde_json::from_str(json).map_err(|e| BrewError::InvalidRecipe(e.to_string()))?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Serialize for export. Round-trips through [`BrewRecipe::from_json`].
    pub fn to_json_pretty(&self) -> Result<String, BrewError> {
        serde_json::to_string_pretty(self).map_err(|e| BrewError::InvalidRecipe(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), BrewError> {
        if self.coffee_gram <= 0.0 {
            return Err(BrewError::InvalidRecipe(format!(
                "coffeeGram must be positive, got {}",
                self.coffee_gram
            )));
        }
        if self.schedules.is_empty() {
            return Err(BrewError::InvalidRecipe(
                "recipe carries no schedule steps".to_string(),
            ));
        }
        for (i, step) in self.schedules.iter().enumerate() {
            if step.start >= step.end {
                return Err(BrewError::InvalidRecipe(format!(
                    "schedule step {} window [{}, {}) is empty",
                    i + 1,
                    step.start,
                    step.end
                )));
            }
            if step.volume < 0.0 {
                return Err(BrewError::InvalidRecipe(format!(
                    "schedule step {} has a negative volume",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    pub fn schedule(&self) -> Schedule {
        Schedule(self.schedules.clone())
    }
}

impl From<&CustomMethod> for BrewRecipe {
    fn from(method: &CustomMethod) -> Self {
        Self {
            title: method.title.clone(),
            creator: method.creator.clone(),
            coffee_gram: method.coffee_grams,
            tags: method.tags.clone(),
            grind_size: method.grind_size.clone(),
            roast_level: method.roast_level.clone(),
            water_temp: method.water_temp,
            schedules: method.schedule().0.clone(),
        }
    }
}

impl CustomMethod {
    /// Build an editable method from an imported recipe. Fails without
    /// touching anything if the steps break the editor's invariants.
    pub fn from_recipe(recipe: &BrewRecipe) -> Result<Self, BrewError> {
        recipe.validate()?;
        let mut method = CustomMethod::default();
        method.replace_steps(recipe.schedules.clone())?;
        method.set_coffee_grams(recipe.coffee_gram)?;
        method.title = recipe.title.clone();
        method.creator = recipe.creator.clone();
        method.tags = recipe.tags.clone();
        method.grind_size = recipe.grind_size.clone();
        method.roast_level = recipe.roast_level.clone();
        method.water_temp = recipe.water_temp;
        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        r#"{
            "title": "Evening V60",
            "creator": "Okta",
            "coffeeGram": 15,
            "tags": ["filter", "v60"],
            "grindSize": "medium-fine",
            "roastLevel": "light",
            "waterTemp": 92,
            "schedules": [
                { "time": 0, "endTime": 45, "volume": 50, "label": "Bloom" },
                { "time": 45, "endTime": 120, "volume": 175, "label": "Main pour" }
            ]
        }"#
        .to_string()
    }

    #[test]
    fn test_import_and_round_trip() {
        let recipe = BrewRecipe::from_json(&sample_json()).unwrap();
        assert_eq!(recipe.title, "Evening V60");
        assert_eq!(recipe.schedules.len(), 2);
        assert_eq!(recipe.schedules[0].end, 45);

        let exported = recipe.to_json_pretty().unwrap();
        let reparsed = BrewRecipe::from_json(&exported).unwrap();
        assert_eq!(reparsed, recipe);
    }

    #[test]
    fn test_missing_schedules_field_is_rejected() {
        let json = sample_json().replace("\"schedules\"", "\"renamed\"");
        assert!(matches!(
            BrewRecipe::from_json(&json),
            Err(BrewError::InvalidRecipe(_))
        ));
    }

    #[test]
    fn test_wrong_typed_field_is_rejected() {
        let json = sample_json().replace("\"coffeeGram\": 15", "\"coffeeGram\": \"fifteen\"");
        assert!(BrewRecipe::from_json(&json).is_err());

        let json = sample_json().replace("\"time\": 0", "\"time\": \"zero\"");
        assert!(BrewRecipe::from_json(&json).is_err());
    }

    #[test]
    fn test_empty_schedule_list_is_rejected() {
        let mut recipe = BrewRecipe::from_json(&sample_json()).unwrap();
        recipe.schedules.clear();
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let json = sample_json().replace(
            "\"title\"",
            "\"theme\": \"dark\", \"title\"",
        );
        assert!(BrewRecipe::from_json(&json).is_ok());
    }

    #[test]
    fn test_custom_method_round_trip() {
        let mut method = CustomMethod::default();
        method.title = "Mine".to_string();
        method.add_step();
        method.set_volume(1, 80.0).unwrap();

        let recipe = BrewRecipe::from(&method);
        assert_eq!(recipe.title, "Mine");
        assert_eq!(recipe.schedules.len(), 2);

        let rebuilt = CustomMethod::from_recipe(&recipe).unwrap();
        assert_eq!(rebuilt, method);
    }

    #[test]
    fn test_failed_import_leaves_caller_state_alone() {
        let current = CustomMethod::default();
        let mut recipe = BrewRecipe::from_json(&sample_json()).unwrap();
        recipe.schedules[0].end = recipe.schedules[0].start;
        assert!(CustomMethod::from_recipe(&recipe).is_err());
        // the editing session the import would have replaced is untouched
        assert_eq!(current, CustomMethod::default());
    }
}
