use colored::Colorize;
use log::{debug, info};
use plateup_gen::{
    EngineError, GenerationEngine, GenerationError, PlanInconsistencyError, PlayerGeneration,
    PlayerId, PlayerOptions, PoolSummary,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::time::{Duration, Instant};

use crate::checks::{check_generation, fingerprint};
use crate::scenarios::{Expectation, Scenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub players_run: usize,
    pub successful_players: usize,
    pub failures: Vec<String>,
    /// Hex fingerprints per player, in player order.
    pub fingerprints: Vec<String>,
    /// Reward counts by item name, summed over successful players.
    #[serde(default)]
    pub reward_counts: BTreeMap<String, usize>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct SweepTester {
    verbose: bool,
}

impl SweepTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &Scenario,
        seeds: &[u64],
        players: u32,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed}, players: {players})",
                        scenario.name.bright_white()
                    );
                }
                let result = self.run_single_scenario(scenario, seed, players);
                info!(
                    "scenario {} seed {seed}: {}/{} players ok",
                    scenario.name, result.successful_players, result.players_run
                );
                result
            })
            .collect()
    }

    fn run_single_scenario(&self, scenario: &Scenario, seed: u64, players: u32) -> ScenarioResult {
        let engine = GenerationEngine::new(scenario.options.clone());
        let player_ids: Vec<PlayerId> = (1..=players).collect();
        let mut failures = Vec::new();
        let mut fingerprints = Vec::new();
        let mut reward_counts = BTreeMap::new();
        let mut successes = 0;
        let mut durations = Vec::new();

        for &player in &player_ids {
            let start = Instant::now();
            let outcome = engine.generate_player(player, seed);
            durations.push(start.elapsed());
            match self.evaluate(scenario, &engine, player, seed, outcome) {
                Ok(generated) => {
                    successes += 1;
                    if let Some((print, summary)) = generated {
                        fingerprints.push(format!("{print:016x}"));
                        for (name, count) in summary.counts {
                            *reward_counts.entry(name.to_string()).or_insert(0) += count;
                        }
                    }
                }
                Err(message) => {
                    if self.verbose {
                        println!("  ❌ Player {player} failed: {}", message.clone().red());
                    }
                    failures.push(format!("Player {player} (seed {seed}): {message}"));
                }
            }
        }

        if scenario.expectation == Expectation::Generates {
            self.check_parallel_matches(&engine, &player_ids, seed, &fingerprints, &mut failures);
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            players_run: player_ids.len(),
            successful_players: successes,
            failures,
            fingerprints,
            reward_counts,
            average_duration,
        }
    }

    /// Check one player's outcome against the scenario's expectation.
    /// Returns the fingerprint and pool summary when a generation was expected.
    fn evaluate(
        &self,
        scenario: &Scenario,
        engine: &GenerationEngine<PlayerOptions>,
        player: PlayerId,
        seed: u64,
        outcome: Result<PlayerGeneration, EngineError<Infallible>>,
    ) -> Result<Option<(u64, PoolSummary)>, String> {
        match (scenario.expectation, outcome) {
            (Expectation::Generates, Ok(generation)) => {
                let problems = check_generation(&generation, &scenario.options);
                if !problems.is_empty() {
                    return Err(problems.join("; "));
                }
                let print = fingerprint(&generation).map_err(|err| format!("{err:#}"))?;
                let rerun = engine
                    .generate_player(player, seed)
                    .map_err(|err| format!("rerun failed: {err}"))
                    .and_then(|again| fingerprint(&again).map_err(|err| format!("{err:#}")))?;
                if rerun != print {
                    return Err(format!("rerun fingerprint {rerun:016x} != {print:016x}"));
                }
                let summary = generation.pool().summary();
                debug!(
                    "player {player}: {} mandatory, {} top-up, {} filler",
                    summary.mandatory, summary.top_up, summary.filler
                );
                if self.verbose {
                    println!(
                        "  ✅ Player {player}: {} locations, {} filler, terminal {}",
                        generation.graph().len(),
                        summary.filler,
                        generation.completion().terminal
                    );
                }
                Ok(Some((print, summary)))
            }
            (
                Expectation::Overflows,
                Err(EngineError::Generation {
                    source:
                        GenerationError::PlanInconsistency(
                            PlanInconsistencyError::MandatoryExceedsLocations { .. },
                        ),
                    ..
                }),
            )
            | (
                Expectation::Rejected,
                Err(EngineError::Generation {
                    source: GenerationError::Configuration(_),
                    ..
                }),
            ) => Ok(None),
            (expectation, Ok(_)) => Err(format!("expected {expectation:?} but generation succeeded")),
            (expectation, Err(err)) => Err(format!("expected {expectation:?}, got: {err}")),
        }
    }

    /// Generating all players at once must reproduce the one-at-a-time results.
    fn check_parallel_matches(
        &self,
        engine: &GenerationEngine<PlayerOptions>,
        players: &[PlayerId],
        seed: u64,
        sequential: &[String],
        failures: &mut Vec<String>,
    ) {
        let results = match engine.generate_players(players, seed) {
            Ok(results) => results,
            Err(err) => {
                failures.push(format!("parallel run aborted: {err}"));
                return;
            }
        };
        let parallel: Vec<String> = results
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
            .filter_map(|generation| fingerprint(generation).ok())
            .map(|print| format!("{print:016x}"))
            .collect();
        if parallel != sequential {
            failures.push("parallel generation diverged from sequential".to_string());
        } else if self.verbose {
            println!("  ✅ Parallel run matches {} sequential players", players.len());
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}
