//! Configuration resolver: turns a validated option block into a plan.
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::Dish;
use crate::constants::LOG_TARGET;
use crate::error::ConfigurationError;
use crate::options::PlayerOptions;

/// Which completion goal the slot plays towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Franchise a restaurant `required_repeats` times.
    #[default]
    #[serde(alias = "franchise")]
    RepeatCount,
    /// Survive `required_days` days in a single run.
    #[serde(alias = "days")]
    DayCount,
}

impl GoalKind {
    /// Numeric value handed to the client.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::RepeatCount => 0,
            Self::DayCount => 1,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RepeatCount => "franchise",
            Self::DayCount => "days",
        }
    }
}

/// How speed upgrades are split across the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMode {
    /// One shared appliance speed upgrade.
    #[default]
    #[serde(alias = "appliance")]
    ApplianceSplit,
    /// Separate cook, clean and chop upgrades.
    #[serde(alias = "roles")]
    RoleSplit,
}

impl SpeedMode {
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::ApplianceSplit => 0,
            Self::RoleSplit => 1,
        }
    }
}

/// Selected dishes, kept in catalog order. Always fits inline.
pub type DishSubset = SmallVec<[Dish; 15]>;

/// Concrete per-player generation plan. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPlan {
    pub goal_kind: GoalKind,
    pub required_repeats: u32,
    pub required_days: u32,
    pub dish_subset: DishSubset,
    pub speed_mode: SpeedMode,
}

impl GenerationPlan {
    /// The count that matters for the active goal.
    #[must_use]
    pub const fn required_count(&self) -> u32 {
        match self.goal_kind {
            GoalKind::RepeatCount => self.required_repeats,
            GoalKind::DayCount => self.required_days,
        }
    }

    #[must_use]
    pub fn contains_dish(&self, dish: Dish) -> bool {
        self.dish_subset.contains(&dish)
    }

    #[must_use]
    pub fn dish_names(&self) -> Vec<&'static str> {
        self.dish_subset.iter().map(|dish| dish.name()).collect()
    }
}

/// Resolve options into a plan, sampling the dish subset without replacement.
///
/// Draws from `rng` exactly once per call (a single subset sample), so a
/// fixed seed always reproduces the same plan.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if any option is out of bounds or the
/// dish count exceeds the catalog.
pub fn resolve<R>(options: &PlayerOptions, rng: &mut R) -> Result<GenerationPlan, ConfigurationError>
where
    R: Rng + ?Sized,
{
    options.validate()?;
    let dish_subset = sample_dishes(options.dish_count, rng)?;
    let plan = GenerationPlan {
        goal_kind: options.goal,
        required_repeats: options.franchise_count,
        required_days: options.day_count,
        dish_subset,
        speed_mode: options.appliance_speed_mode,
    };
    debug!(
        target: LOG_TARGET,
        "resolved plan goal={} count={} dishes={:?} speed={:?}",
        plan.goal_kind.label(),
        plan.required_count(),
        plan.dish_names(),
        plan.speed_mode
    );
    Ok(plan)
}

fn sample_dishes<R>(dish_count: u32, rng: &mut R) -> Result<DishSubset, ConfigurationError>
where
    R: Rng + ?Sized,
{
    let available = Dish::ALL.len();
    let requested = usize::try_from(dish_count).unwrap_or(usize::MAX);
    if requested > available {
        return Err(ConfigurationError {
            field: "dish_count",
            min: 1,
            max: u32::try_from(available).unwrap_or(u32::MAX),
            value: dish_count,
        });
    }
    let mut subset: DishSubset = Dish::ALL.choose_multiple(rng, requested).copied().collect();
    subset.sort_unstable();
    Ok(subset)
}
