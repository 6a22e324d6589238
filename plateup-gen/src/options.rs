//! Player-facing option block as handed over by the host's option layer.
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_APPLIANCES_KEPT, MAX_DAYS, MAX_DISHES, MAX_REPEATS, MIN_DAYS, MIN_DISHES, MIN_REPEATS,
};
use crate::error::ConfigurationError;
use crate::plan::{GoalKind, SpeedMode};

/// Host accessibility setting. Informational only; generation ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    #[default]
    Full,
    Items,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathLinkBehavior {
    #[default]
    ResetRun,
    ResetDay,
}

impl DeathLinkBehavior {
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::ResetRun => 0,
            Self::ResetDay => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerOptions {
    #[serde(default)]
    pub goal: GoalKind,
    #[serde(default = "PlayerOptions::default_franchise_count")]
    pub franchise_count: u32,
    #[serde(default = "PlayerOptions::default_day_count")]
    pub day_count: u32,
    #[serde(default = "PlayerOptions::default_dish_count")]
    pub dish_count: u32,
    #[serde(default)]
    pub appliance_speed_mode: SpeedMode,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub death_link: bool,
    #[serde(default)]
    pub death_link_behavior: DeathLinkBehavior,
    #[serde(default)]
    pub appliances_kept: u32,
}

impl PlayerOptions {
    const fn default_franchise_count() -> u32 {
        1
    }

    const fn default_day_count() -> u32 {
        15
    }

    const fn default_dish_count() -> u32 {
        3
    }

    /// Parse an option block from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an unknown variant.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check every bounded field, reporting the first violation.
    ///
    /// Both goal counts are checked regardless of which goal is active, since
    /// the host passes both through to the client.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_range("franchise_count", self.franchise_count, MIN_REPEATS, MAX_REPEATS)?;
        check_range("day_count", self.day_count, MIN_DAYS, MAX_DAYS)?;
        check_range("dish_count", self.dish_count, MIN_DISHES, MAX_DISHES)?;
        check_range("appliances_kept", self.appliances_kept, 0, MAX_APPLIANCES_KEPT)?;
        Ok(())
    }
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            goal: GoalKind::default(),
            franchise_count: Self::default_franchise_count(),
            day_count: Self::default_day_count(),
            dish_count: Self::default_dish_count(),
            appliance_speed_mode: SpeedMode::default(),
            accessibility: Accessibility::default(),
            death_link: false,
            death_link_behavior: DeathLinkBehavior::default(),
            appliances_kept: 0,
        }
    }
}

pub(crate) fn check_range(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), ConfigurationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError {
            field,
            min,
            max,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PlayerOptions::default().validate().is_ok());
    }

    #[test]
    fn json_fills_missing_fields() {
        let options =
            PlayerOptions::from_json(r#"{"goal": "days", "day_count": 7, "dish_count": 2}"#)
                .unwrap();
        assert_eq!(options.goal, GoalKind::DayCount);
        assert_eq!(options.day_count, 7);
        assert_eq!(options.dish_count, 2);
        assert_eq!(options.franchise_count, 1);
        assert_eq!(options.appliance_speed_mode, SpeedMode::ApplianceSplit);
        assert_eq!(options.accessibility, Accessibility::Full);
    }

    #[test]
    fn json_accepts_canonical_variant_names() {
        let options = PlayerOptions::from_json(
            r#"{"goal": "repeat_count", "appliance_speed_mode": "role_split", "accessibility": "minimal"}"#,
        )
        .unwrap();
        assert_eq!(options.goal, GoalKind::RepeatCount);
        assert_eq!(options.appliance_speed_mode, SpeedMode::RoleSplit);
        assert_eq!(options.accessibility, Accessibility::Minimal);
    }

    #[test]
    fn rejects_out_of_bound_counts() {
        let options = PlayerOptions {
            franchise_count: 11,
            ..PlayerOptions::default()
        };
        assert_eq!(
            options.validate(),
            Err(ConfigurationError {
                field: "franchise_count",
                min: 1,
                max: 10,
                value: 11,
            })
        );

        let options = PlayerOptions {
            day_count: 0,
            ..PlayerOptions::default()
        };
        assert_eq!(options.validate().unwrap_err().field, "day_count");

        let options = PlayerOptions {
            dish_count: 16,
            ..PlayerOptions::default()
        };
        assert_eq!(options.validate().unwrap_err().field, "dish_count");
    }

    #[test]
    fn boundary_values_are_accepted() {
        let options = PlayerOptions {
            franchise_count: 10,
            day_count: 100,
            dish_count: 15,
            appliances_kept: 20,
            ..PlayerOptions::default()
        };
        assert!(options.validate().is_ok());
    }
}
