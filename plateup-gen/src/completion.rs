//! Completion oracle: names the single location whose reachability ends the slot.
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, LocationCategory, LocationId};
use crate::error::PlanInconsistencyError;
use crate::graph::{LocationGraph, Predicate};
use crate::plan::{GenerationPlan, GoalKind};

/// Goal reached once `terminal` is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionCondition {
    pub terminal: LocationId,
}

impl CompletionCondition {
    #[must_use]
    pub const fn predicate(self) -> Predicate {
        Predicate::CanReach(self.terminal)
    }
}

/// Pick the terminal location for `plan`.
///
/// A franchise goal ends on the gate whose repeat index equals the required
/// count; a day goal ends on the milestone for the required day. The result is
/// checked against `graph` so a terminal outside the active set never reaches
/// the host.
///
/// # Errors
///
/// [`PlanInconsistencyError::TerminalMissing`] when the catalog has no such
/// entry, [`PlanInconsistencyError::TerminalInactive`] when the graph left it out.
pub fn terminal(
    plan: &GenerationPlan,
    catalog: &Catalog,
    graph: &LocationGraph,
) -> Result<CompletionCondition, PlanInconsistencyError> {
    let (category, count) = match plan.goal_kind {
        GoalKind::RepeatCount => (LocationCategory::RepeatGate, plan.required_repeats),
        GoalKind::DayCount => (LocationCategory::Milestone, plan.required_days),
    };
    let record = catalog
        .locations_in(category)
        .find(|record| match category {
            LocationCategory::RepeatGate => record.repeat_index == count,
            _ => record.day_or_dish_index == count,
        })
        .ok_or(PlanInconsistencyError::TerminalMissing {
            goal: plan.goal_kind.label(),
            count,
        })?;
    if !graph.contains(record.id) {
        return Err(PlanInconsistencyError::TerminalInactive { id: record.id });
    }
    Ok(CompletionCondition {
        terminal: record.id,
    })
}
