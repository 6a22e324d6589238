use plateup_gen::catalog::{Dish, LocationCategory};
use plateup_gen::constants::{MAX_DAYS, MAX_DISHES, MAX_REPEATS};
use plateup_gen::pool::{mandatory_quantities, top_up_count};
use plateup_gen::{
    GenerationError, GoalKind, ItemClassification, PlanInconsistencyError, PlayerGeneration,
    PlayerOptions, Predicate, SpeedMode, generate,
};
use std::collections::{BTreeMap, HashSet};

fn every_option_block() -> Vec<PlayerOptions> {
    let mut blocks = Vec::new();
    for speed in [SpeedMode::ApplianceSplit, SpeedMode::RoleSplit] {
        for dish_count in 1..=MAX_DISHES {
            for franchise_count in 1..=MAX_REPEATS {
                blocks.push(PlayerOptions {
                    goal: GoalKind::RepeatCount,
                    franchise_count,
                    dish_count,
                    appliance_speed_mode: speed,
                    ..PlayerOptions::default()
                });
            }
            for day_count in 1..=MAX_DAYS {
                blocks.push(PlayerOptions {
                    goal: GoalKind::DayCount,
                    day_count,
                    dish_count,
                    appliance_speed_mode: speed,
                    ..PlayerOptions::default()
                });
            }
        }
    }
    blocks
}

fn expected_locations(options: &PlayerOptions) -> usize {
    let dish_days = options.dish_count as usize * 15;
    match options.goal {
        GoalKind::RepeatCount => options.franchise_count as usize + dish_days,
        GoalKind::DayCount => {
            let days = options.day_count as usize;
            days + days.div_ceil(3) + dish_days
        }
    }
}

fn assert_invariants(generation: &PlayerGeneration, options: &PlayerOptions) {
    let graph = generation.graph();
    let plan = generation.plan();

    assert_eq!(generation.pool().len(), graph.len(), "parity for {options:?}");
    assert_eq!(graph.len(), expected_locations(options));

    match plan.goal_kind {
        GoalKind::RepeatCount => {
            assert_eq!(
                graph.count_in(LocationCategory::RepeatGate),
                options.franchise_count as usize
            );
            assert_eq!(graph.count_in(LocationCategory::Milestone), 0);
            let tail = graph.progression_chain().and_then(|chain| chain.tail());
            assert_eq!(tail, Some(generation.completion().terminal));
        }
        GoalKind::DayCount => {
            assert_eq!(
                graph.count_in(LocationCategory::Milestone),
                options.day_count as usize
            );
            assert_eq!(
                graph.count_in(LocationCategory::Star),
                options.day_count.div_ceil(3) as usize
            );
            assert_eq!(graph.count_in(LocationCategory::RepeatGate), 0);
        }
    }
    assert!(graph.contains(generation.completion().terminal));

    let distinct: HashSet<Dish> = plan.dish_subset.iter().copied().collect();
    assert_eq!(distinct.len(), options.dish_count as usize);
    assert_eq!(plan.dish_subset.len(), options.dish_count as usize);

    let mut seen = HashSet::new();
    for chain in graph.chains() {
        let position: BTreeMap<_, _> = chain
            .members
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx))
            .collect();
        for (idx, id) in chain.members.iter().enumerate() {
            assert!(seen.insert(*id), "{id} sits in two chains");
            match graph.access_of(*id) {
                Some(Predicate::Always) => assert_eq!(idx, 0),
                Some(Predicate::CanReach(prev)) => assert_eq!(position.get(&prev), Some(&(idx - 1))),
                None => panic!("{id} has no access rule"),
            }
        }
    }
    assert_eq!(seen.len(), graph.len());

    let gating = generation
        .pool()
        .items()
        .filter(|item| item.classification.gates_access())
        .count();
    let quantities: usize = mandatory_quantities(plan.speed_mode)
        .iter()
        .map(|(_, quantity)| quantity)
        .sum();
    let traps = generation
        .pool()
        .items()
        .filter(|item| item.classification == ItemClassification::Trap)
        .count();
    assert_eq!(gating + traps, quantities + top_up_count(plan));
}

#[test]
fn every_option_combination_holds_invariants_or_reports_overflow() {
    let mut generated = 0;
    let mut overflowed = 0;
    for (idx, options) in every_option_block().iter().enumerate() {
        let player = u32::try_from(idx % 16).unwrap() + 1;
        match generate(player, 0xD1CE, options) {
            Ok(generation) => {
                assert_invariants(&generation, options);
                generated += 1;
            }
            Err(GenerationError::PlanInconsistency(
                PlanInconsistencyError::MandatoryExceedsLocations {
                    mandatory,
                    locations,
                },
            )) => {
                assert!(mandatory > locations);
                assert_eq!(locations, expected_locations(options));
                overflowed += 1;
            }
            Err(other) => panic!("unexpected error for {options:?}: {other}"),
        }
    }
    assert!(generated > 0);
    assert!(overflowed > 0, "role split with one dish and day one overflows");
}

#[test]
fn out_of_bound_options_are_rejected_before_generation() {
    let cases = [
        ("franchise_count", PlayerOptions { franchise_count: 0, ..PlayerOptions::default() }),
        ("franchise_count", PlayerOptions { franchise_count: 11, ..PlayerOptions::default() }),
        ("day_count", PlayerOptions { day_count: 101, ..PlayerOptions::default() }),
        ("dish_count", PlayerOptions { dish_count: 16, ..PlayerOptions::default() }),
        ("appliances_kept", PlayerOptions { appliances_kept: 21, ..PlayerOptions::default() }),
    ];
    for (field, options) in cases {
        match generate(1, 1, &options) {
            Err(GenerationError::Configuration(err)) => assert_eq!(err.field, field),
            other => panic!("expected configuration error for {field}, got {other:?}"),
        }
    }
}
