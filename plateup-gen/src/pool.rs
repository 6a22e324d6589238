//! Pool balancer: sizes the reward pool to exactly one reward per location.
//!
//! Composition order is mandatory progression, then the gate-group top-up,
//! then filler. Mandatory quantities never shrink to fit a small graph; a
//! graph too small for them is reported instead. Placement is the host's job,
//! so nothing here shuffles.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::{Catalog, ItemClassification, ItemRecord};
use crate::constants::{
    APPLIANCE_SPEED_COUNT, DAYS_PER_STAR, DISH_DAYS, GATES_PER_GROUP, ITEM_APPLIANCE_SPEED,
    ITEM_CHOP_SPEED, ITEM_CLEAN_SPEED, ITEM_COOK_SPEED, ITEM_CUSTOMER_CARD, ITEM_PLAYER_SPEED,
    ITEM_STAR_TOKEN, PLAYER_SPEED_COUNT, ROLE_SPEED_COUNT, TRAP_COUNT,
};
use crate::error::{GenerationError, PlanInconsistencyError, PoolExhaustionError};
use crate::graph::LocationGraph;
use crate::options::PlayerOptions;
use crate::plan::{GenerationPlan, GoalKind, SpeedMode};

/// Where a reward came from during balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardSource {
    Mandatory,
    TopUp,
    Filler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub item: ItemRecord,
    pub source: RewardSource,
}

/// Correctly sized reward multiset for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardPool {
    rewards: Vec<Reward>,
}

impl RewardPool {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemRecord> + '_ {
        self.rewards.iter().map(|reward| &reward.item)
    }

    #[must_use]
    pub fn count_of(&self, name: &str) -> usize {
        self.items().filter(|item| item.name == name).count()
    }

    #[must_use]
    pub fn count_from(&self, source: RewardSource) -> usize {
        self.rewards
            .iter()
            .filter(|reward| reward.source == source)
            .count()
    }

    #[must_use]
    pub fn summary(&self) -> PoolSummary {
        let mut counts = BTreeMap::new();
        for item in self.items() {
            *counts.entry(item.name).or_insert(0) += 1;
        }
        PoolSummary {
            total: self.len(),
            mandatory: self.count_from(RewardSource::Mandatory),
            top_up: self.count_from(RewardSource::TopUp),
            filler: self.count_from(RewardSource::Filler),
            counts,
        }
    }
}

/// Per-item breakdown used by reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSummary {
    pub total: usize,
    pub mandatory: usize,
    pub top_up: usize,
    pub filler: usize,
    pub counts: BTreeMap<&'static str, usize>,
}

/// Item names and quantities that every pool for `speed_mode` must carry.
#[must_use]
pub fn mandatory_quantities(speed_mode: SpeedMode) -> Vec<(&'static str, usize)> {
    let mut quantities = vec![(ITEM_PLAYER_SPEED, PLAYER_SPEED_COUNT)];
    match speed_mode {
        SpeedMode::ApplianceSplit => {
            quantities.push((ITEM_APPLIANCE_SPEED, APPLIANCE_SPEED_COUNT));
        }
        SpeedMode::RoleSplit => {
            quantities.push((ITEM_COOK_SPEED, ROLE_SPEED_COUNT));
            quantities.push((ITEM_CLEAN_SPEED, ROLE_SPEED_COUNT));
            quantities.push((ITEM_CHOP_SPEED, ROLE_SPEED_COUNT));
        }
    }
    quantities.push((ITEM_CUSTOMER_CARD, TRAP_COUNT));
    quantities
}

/// One gating item per group of three gates on the progression chain.
#[must_use]
pub const fn top_up_count(plan: &GenerationPlan) -> usize {
    gate_groups(plan.goal_kind, plan.required_repeats, plan.required_days)
}

const fn gate_groups(goal: GoalKind, repeats: u32, days: u32) -> usize {
    let groups = match goal {
        GoalKind::DayCount => days.div_ceil(DAYS_PER_STAR),
        GoalKind::RepeatCount => repeats.div_ceil(GATES_PER_GROUP),
    };
    groups as usize
}

/// Number of active locations the standard catalog yields for `options`.
#[must_use]
pub const fn planned_location_count(options: &PlayerOptions) -> usize {
    let progression = match options.goal {
        GoalKind::RepeatCount => options.franchise_count,
        GoalKind::DayCount => options.day_count + options.day_count.div_ceil(DAYS_PER_STAR),
    };
    (progression + options.dish_count * DISH_DAYS) as usize
}

/// Reject option blocks whose mandatory and top-up rewards can never fit.
///
/// Runs on options alone, before any draw or graph work, and agrees with the
/// overflow check in [`balance_to`] for the standard catalog.
///
/// # Errors
///
/// Returns [`PlanInconsistencyError::MandatoryExceedsLocations`] when the
/// required rewards outnumber the locations the options activate.
pub fn check_capacity(options: &PlayerOptions) -> Result<(), PlanInconsistencyError> {
    let mandatory = mandatory_quantities(options.appliance_speed_mode)
        .iter()
        .map(|(_, quantity)| quantity)
        .sum::<usize>()
        + gate_groups(options.goal, options.franchise_count, options.day_count);
    let locations = planned_location_count(options);
    if mandatory > locations {
        return Err(PlanInconsistencyError::MandatoryExceedsLocations {
            mandatory,
            locations,
        });
    }
    Ok(())
}

/// Balance the pool against the active locations of `graph`.
///
/// # Errors
///
/// See [`balance_to`].
pub fn balance<R>(
    graph: &LocationGraph,
    plan: &GenerationPlan,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<RewardPool, GenerationError>
where
    R: Rng + ?Sized,
{
    balance_to(graph.len(), plan, catalog, rng)
}

/// Build a pool of exactly `location_count` rewards.
///
/// # Errors
///
/// Returns [`PlanInconsistencyError::MandatoryExceedsLocations`] when the
/// mandatory and top-up rewards alone outnumber the locations, and
/// [`PoolExhaustionError`] when a required item is missing from the catalog
/// or filler is needed but none exists.
pub fn balance_to<R>(
    location_count: usize,
    plan: &GenerationPlan,
    catalog: &Catalog,
    rng: &mut R,
) -> Result<RewardPool, GenerationError>
where
    R: Rng + ?Sized,
{
    let mut rewards = Vec::with_capacity(location_count);

    for (name, quantity) in mandatory_quantities(plan.speed_mode) {
        let item = lookup(catalog, name)?;
        rewards.extend(std::iter::repeat_n(
            Reward {
                item,
                source: RewardSource::Mandatory,
            },
            quantity,
        ));
    }

    let gating = lookup(catalog, ITEM_STAR_TOKEN)?;
    rewards.extend(std::iter::repeat_n(
        Reward {
            item: gating,
            source: RewardSource::TopUp,
        },
        top_up_count(plan),
    ));

    if rewards.len() > location_count {
        return Err(PlanInconsistencyError::MandatoryExceedsLocations {
            mandatory: rewards.len(),
            locations: location_count,
        }
        .into());
    }

    let missing = location_count - rewards.len();
    if missing > 0 {
        let fillers: Vec<&ItemRecord> = catalog.items_of(ItemClassification::Filler).collect();
        if fillers.is_empty() {
            return Err(PoolExhaustionError::NoFiller { missing }.into());
        }
        rewards.extend((0..missing).filter_map(|_| fillers.choose(rng)).map(|item| Reward {
            item: **item,
            source: RewardSource::Filler,
        }));
    }

    Ok(RewardPool { rewards })
}

fn lookup(catalog: &Catalog, name: &'static str) -> Result<ItemRecord, PoolExhaustionError> {
    catalog
        .item_by_name(name)
        .copied()
        .ok_or(PoolExhaustionError::MissingItem { name })
}
