use anyhow::{Context, Result};
use plateup_gen::{
    ChainKind, GoalKind, LocationCategory, PlayerGeneration, PlayerOptions, Predicate,
};
use std::collections::HashSet;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Every structural property a generation must satisfy. Returns one message
/// per violation.
#[must_use]
pub fn check_generation(generation: &PlayerGeneration, options: &PlayerOptions) -> Vec<String> {
    let mut failures = Vec::new();
    let graph = generation.graph();
    let plan = generation.plan();

    if generation.pool().len() != graph.len() {
        failures.push(format!(
            "pool has {} rewards for {} locations",
            generation.pool().len(),
            graph.len()
        ));
    }

    match plan.goal_kind {
        GoalKind::RepeatCount => {
            let gates = graph.count_in(LocationCategory::RepeatGate);
            if gates != options.franchise_count as usize {
                failures.push(format!(
                    "{gates} repeat gates active, expected {}",
                    options.franchise_count
                ));
            }
        }
        GoalKind::DayCount => {
            let milestones = graph.count_in(LocationCategory::Milestone);
            let stars = graph.count_in(LocationCategory::Star);
            let expected_stars = options.day_count.div_ceil(3) as usize;
            if milestones != options.day_count as usize {
                failures.push(format!(
                    "{milestones} milestones active, expected {}",
                    options.day_count
                ));
            }
            if stars != expected_stars {
                failures.push(format!("{stars} stars active, expected {expected_stars}"));
            }
        }
    }

    let terminal = generation.completion().terminal;
    if !graph.contains(terminal) {
        failures.push(format!("terminal {terminal} is not active"));
    }

    let unique: HashSet<_> = plan.dish_subset.iter().collect();
    if plan.dish_subset.len() != options.dish_count as usize || unique.len() != plan.dish_subset.len()
    {
        failures.push(format!("dish subset {:?} is malformed", plan.dish_names()));
    }

    for chain in graph.chains() {
        let label = match chain.kind {
            ChainKind::Progression => "progression".to_string(),
            ChainKind::Dish(dish) => dish.to_string(),
        };
        if chain.head().and_then(|head| graph.access_of(head)) != Some(Predicate::Always) {
            failures.push(format!("{label} chain head is gated"));
        }
        for (prev, next) in chain.pairs() {
            if graph.access_of(next) != Some(Predicate::CanReach(prev)) {
                failures.push(format!("{label} chain: {next} does not wait on {prev}"));
            }
        }
    }

    failures
}

/// Stable hash of everything a generation hands to the host.
///
/// # Errors
///
/// Returns an error if the generation cannot be serialized.
pub fn fingerprint(generation: &PlayerGeneration) -> Result<u64> {
    let bytes = serde_json::to_vec(generation).context("serializing generation")?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    Ok(hasher.finish())
}
