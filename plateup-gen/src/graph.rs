//! Graph builder: active location set plus the access chains over it.
//!
//! Locations are split into one progression chain (milestones and stars for a
//! day goal, repeat gates for a franchise goal) and one independent chain per
//! selected dish. Inside a chain every entry requires only its predecessor;
//! chain heads are unconditional. Chains never reference each other.
//!
//! The category filter and the ids it excluded are returned with the graph,
//! so nothing about one player's exclusions outlives that player's build.
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{Catalog, Dish, LocationCategory, LocationId, LocationRecord};
use crate::constants::{
    DAYS_PER_STAR, LOG_TARGET, REGION_DISH_CHECKS, REGION_MENU, REGION_PROGRESSION,
};
use crate::error::PlanInconsistencyError;
use crate::plan::{GenerationPlan, GoalKind};

/// Access requirement attached to a location or entrance.
///
/// The host evaluates these against its own collection state; this crate only
/// describes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum Predicate {
    Always,
    CanReach(LocationId),
}

impl Predicate {
    /// The location this predicate waits on, if any.
    #[must_use]
    pub const fn prerequisite(self) -> Option<LocationId> {
        match self {
            Self::Always => None,
            Self::CanReach(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Menu,
    Progression,
    DishChecks,
}

impl Region {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Menu => REGION_MENU,
            Self::Progression => REGION_PROGRESSION,
            Self::DishChecks => REGION_DISH_CHECKS,
        }
    }

    const fn for_category(category: LocationCategory) -> Self {
        match category {
            LocationCategory::DishDay => Self::DishChecks,
            LocationCategory::Milestone | LocationCategory::Star | LocationCategory::RepeatGate => {
                Self::Progression
            }
        }
    }
}

/// One-way connection between regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrance {
    pub from: Region,
    pub to: Region,
    pub predicate: Predicate,
}

const ENTRANCES: [Entrance; 2] = [
    Entrance {
        from: Region::Menu,
        to: Region::Progression,
        predicate: Predicate::Always,
    },
    Entrance {
        from: Region::Progression,
        to: Region::DishChecks,
        predicate: Predicate::Always,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLocation {
    pub record: LocationRecord,
    pub region: Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainKind {
    Progression,
    Dish(Dish),
}

/// Strict total order of prerequisites inside one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessChain {
    pub kind: ChainKind,
    pub members: Vec<LocationId>,
}

impl AccessChain {
    #[must_use]
    pub fn head(&self) -> Option<LocationId> {
        self.members.first().copied()
    }

    #[must_use]
    pub fn tail(&self) -> Option<LocationId> {
        self.members.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adjacent `(predecessor, successor)` pairs in chain order.
    pub fn pairs(&self) -> impl Iterator<Item = (LocationId, LocationId)> + '_ {
        self.members.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Category filter applied for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// Repeat gates `1..=up_to`; no milestones or stars.
    RepeatGates { up_to: u32 },
    /// Milestones `1..=days` and stars `1..=stars`; no repeat gates.
    Days { days: u32, stars: u32 },
}

impl CategoryFilter {
    #[must_use]
    pub const fn for_plan(plan: &GenerationPlan) -> Self {
        match plan.goal_kind {
            GoalKind::RepeatCount => Self::RepeatGates {
                up_to: plan.required_repeats,
            },
            GoalKind::DayCount => Self::Days {
                days: plan.required_days,
                stars: plan.required_days.div_ceil(DAYS_PER_STAR),
            },
        }
    }

    /// Whether a non-dish record survives the filter. Bounds are inclusive.
    #[must_use]
    pub fn admits(self, record: &LocationRecord) -> bool {
        match (self, record.category) {
            (Self::RepeatGates { up_to }, LocationCategory::RepeatGate) => {
                record.repeat_index <= up_to
            }
            (Self::Days { days, .. }, LocationCategory::Milestone) => {
                record.day_or_dish_index <= days
            }
            (Self::Days { stars, .. }, LocationCategory::Star) => {
                record.day_or_dish_index <= stars
            }
            _ => false,
        }
    }
}

/// Catalog entries left out of this player's graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedLocations {
    pub filter: CategoryFilter,
    pub ids: BTreeSet<LocationId>,
}

impl ExcludedLocations {
    #[must_use]
    pub fn contains(&self, id: LocationId) -> bool {
        self.ids.contains(&id)
    }
}

/// Per-player location graph handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationGraph {
    locations: Vec<ActiveLocation>,
    access: BTreeMap<LocationId, Predicate>,
    chains: Vec<AccessChain>,
    excluded: ExcludedLocations,
}

impl LocationGraph {
    /// Active locations, progression chain first, then each dish chain.
    #[must_use]
    pub fn locations(&self) -> &[ActiveLocation] {
        &self.locations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: LocationId) -> bool {
        self.access.contains_key(&id)
    }

    #[must_use]
    pub fn location(&self, id: LocationId) -> Option<&ActiveLocation> {
        self.locations.iter().find(|loc| loc.record.id == id)
    }

    #[must_use]
    pub fn access_of(&self, id: LocationId) -> Option<Predicate> {
        self.access.get(&id).copied()
    }

    #[must_use]
    pub const fn access_rules(&self) -> &BTreeMap<LocationId, Predicate> {
        &self.access
    }

    #[must_use]
    pub fn chains(&self) -> &[AccessChain] {
        &self.chains
    }

    #[must_use]
    pub fn progression_chain(&self) -> Option<&AccessChain> {
        self.chains
            .iter()
            .find(|chain| chain.kind == ChainKind::Progression)
    }

    #[must_use]
    pub fn dish_chain(&self, dish: Dish) -> Option<&AccessChain> {
        self.chains
            .iter()
            .find(|chain| chain.kind == ChainKind::Dish(dish))
    }

    #[must_use]
    pub const fn excluded(&self) -> &ExcludedLocations {
        &self.excluded
    }

    #[must_use]
    pub fn entrances(&self) -> &'static [Entrance] {
        &ENTRANCES
    }

    #[must_use]
    pub fn count_in(&self, category: LocationCategory) -> usize {
        self.locations
            .iter()
            .filter(|loc| loc.record.category == category)
            .count()
    }
}

/// Materialize the active location set for `plan` and wire its chains.
///
/// # Errors
///
/// Returns [`PlanInconsistencyError::ChainOverlap`] if a location would land
/// in two chains, which only happens for a plan listing a dish twice.
pub fn build(
    plan: &GenerationPlan,
    catalog: &Catalog,
) -> Result<LocationGraph, PlanInconsistencyError> {
    let filter = CategoryFilter::for_plan(plan);
    let mut progression: Vec<&LocationRecord> = Vec::new();
    let mut excluded = BTreeSet::new();

    for record in catalog.locations() {
        let active = match (record.category, record.dish) {
            (LocationCategory::DishDay, Some(dish)) => plan.contains_dish(dish),
            (LocationCategory::DishDay, None) => false,
            _ => {
                let admitted = filter.admits(record);
                if admitted {
                    progression.push(record);
                }
                admitted
            }
        };
        if !active {
            excluded.insert(record.id);
        }
    }
    progression.sort_by_key(|record| (record.sequence, record.id));

    let mut builder = ChainBuilder::default();
    builder.push_chain(ChainKind::Progression, &progression)?;
    for &dish in &plan.dish_subset {
        let mut days: Vec<&LocationRecord> = catalog
            .locations_in(LocationCategory::DishDay)
            .filter(|record| record.dish == Some(dish))
            .collect();
        days.sort_by_key(|record| (record.sequence, record.id));
        builder.push_chain(ChainKind::Dish(dish), &days)?;
    }

    let graph = LocationGraph {
        locations: builder.locations,
        access: builder.access,
        chains: builder.chains,
        excluded: ExcludedLocations {
            filter,
            ids: excluded,
        },
    };
    debug!(
        target: LOG_TARGET,
        "built graph: {} active, {} excluded, {} chains",
        graph.len(),
        graph.excluded.ids.len(),
        graph.chains.len()
    );
    Ok(graph)
}

#[derive(Default)]
struct ChainBuilder {
    locations: Vec<ActiveLocation>,
    access: BTreeMap<LocationId, Predicate>,
    chains: Vec<AccessChain>,
}

impl ChainBuilder {
    fn push_chain(
        &mut self,
        kind: ChainKind,
        records: &[&LocationRecord],
    ) -> Result<(), PlanInconsistencyError> {
        if records.is_empty() {
            return Ok(());
        }
        let mut members = Vec::with_capacity(records.len());
        let mut predecessor: Option<LocationId> = None;
        for record in records {
            let predicate = predecessor.map_or(Predicate::Always, Predicate::CanReach);
            if self.access.insert(record.id, predicate).is_some() {
                return Err(PlanInconsistencyError::ChainOverlap { id: record.id });
            }
            self.locations.push(ActiveLocation {
                record: (*record).clone(),
                region: Region::for_category(record.category),
            });
            members.push(record.id);
            predecessor = Some(record.id);
        }
        debug!(
            target: LOG_TARGET,
            "chain {kind:?}: {} entries, head={:?} tail={:?}",
            members.len(),
            members.first(),
            members.last()
        );
        self.chains.push(AccessChain { kind, members });
        Ok(())
    }
}
