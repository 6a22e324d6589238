//! Values handed through to the game client. Not interpreted here.
use serde::{Deserialize, Serialize};

use crate::options::PlayerOptions;
use crate::plan::GenerationPlan;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotData {
    pub goal: u8,
    pub franchise_count: u32,
    pub day_count: u32,
    pub selected_dishes: Vec<String>,
    pub death_link: bool,
    pub death_link_behavior: u8,
    pub items_kept: u32,
    pub appliance_speed_mode: u8,
}

impl SlotData {
    #[must_use]
    pub fn new(plan: &GenerationPlan, options: &PlayerOptions) -> Self {
        Self {
            goal: plan.goal_kind.value(),
            franchise_count: plan.required_repeats,
            day_count: plan.required_days,
            selected_dishes: plan
                .dish_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            death_link: options.death_link,
            death_link_behavior: options.death_link_behavior.value(),
            items_kept: options.appliances_kept,
            appliance_speed_mode: plan.speed_mode.value(),
        }
    }

    /// Serialize for the host's slot-data channel.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
