use plateup_gen::{GoalKind, PlayerOptions, SpeedMode};

/// What a preset is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Every player generates and every invariant holds.
    Generates,
    /// Mandatory rewards outnumber the active locations.
    Overflows,
    /// Option validation rejects the block.
    Rejected,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub options: PlayerOptions,
    pub expectation: Expectation,
}

impl Scenario {
    const fn new(
        name: &'static str,
        description: &'static str,
        options: PlayerOptions,
        expectation: Expectation,
    ) -> Self {
        Self {
            name,
            description,
            options,
            expectation,
        }
    }
}

fn franchise(count: u32, dishes: u32, speed: SpeedMode) -> PlayerOptions {
    PlayerOptions {
        goal: GoalKind::RepeatCount,
        franchise_count: count,
        dish_count: dishes,
        appliance_speed_mode: speed,
        ..PlayerOptions::default()
    }
}

fn days(count: u32, dishes: u32, speed: SpeedMode) -> PlayerOptions {
    PlayerOptions {
        goal: GoalKind::DayCount,
        day_count: count,
        dish_count: dishes,
        appliance_speed_mode: speed,
        ..PlayerOptions::default()
    }
}

#[must_use]
pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "smoke",
            "Default options",
            PlayerOptions::default(),
            Expectation::Generates,
        ),
        Scenario::new(
            "franchise-three",
            "Franchise goal with three repeat gates",
            franchise(3, 1, SpeedMode::ApplianceSplit),
            Expectation::Generates,
        ),
        Scenario::new(
            "franchise-max",
            "Franchise goal at the repeat ceiling with role upgrades",
            franchise(10, 4, SpeedMode::RoleSplit),
            Expectation::Generates,
        ),
        Scenario::new(
            "seven-days-two-dishes",
            "Day goal of seven days over two dishes",
            days(7, 2, SpeedMode::ApplianceSplit),
            Expectation::Generates,
        ),
        Scenario::new(
            "all-dishes",
            "Every dish in the catalog",
            days(15, 15, SpeedMode::ApplianceSplit),
            Expectation::Generates,
        ),
        Scenario::new(
            "hundred-days",
            "Longest day goal, every star active",
            days(100, 3, SpeedMode::RoleSplit),
            Expectation::Generates,
        ),
        Scenario::new(
            "role-split-single-dish",
            "Role upgrades do not fit one dish and one day",
            days(1, 1, SpeedMode::RoleSplit),
            Expectation::Overflows,
        ),
        Scenario::new(
            "dish-count-too-large",
            "More dishes than the catalog holds",
            PlayerOptions {
                dish_count: 16,
                ..PlayerOptions::default()
            },
            Expectation::Rejected,
        ),
    ]
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    all_scenarios()
        .into_iter()
        .map(|scenario| (scenario.name, scenario.description))
        .collect()
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<Scenario> {
    all_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

/// Expand the `--scenarios` argument; `all` stands for every preset.
#[must_use]
pub fn expand_scenarios(names: &[String]) -> Vec<String> {
    let mut scenarios: Vec<String> = names.iter().filter(|s| *s != "all").cloned().collect();
    if names.iter().any(|s| s == "all") {
        for (name, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == name) {
                scenarios.push(name.to_string());
            }
        }
    }
    scenarios
}
