//! PlateUp slot generation core
//!
//! Derives one player's active checks from their options, chains them into a
//! linear access order, and balances a reward pool to exactly one reward per
//! check. Placement and logic evaluation stay with the multiworld host, which
//! is reached through [`MultiworldHost`].

pub mod catalog;
pub mod completion;
pub mod constants;
pub mod error;
pub mod graph;
pub mod options;
pub mod plan;
pub mod pool;
pub mod rng;
pub mod slot_data;

// Re-export commonly used types
pub use catalog::{
    Catalog, Dish, ItemClassification, ItemId, ItemRecord, LocationCategory, LocationId,
    LocationRecord, catalog,
};
pub use completion::{CompletionCondition, terminal};
pub use error::{
    ConfigurationError, DuplicateIdentifierError, GenerationError, PlanInconsistencyError,
    PoolExhaustionError,
};
pub use graph::{
    AccessChain, ActiveLocation, CategoryFilter, ChainKind, ExcludedLocations, LocationGraph,
    Predicate, Region,
};
pub use options::{Accessibility, DeathLinkBehavior, PlayerOptions};
pub use plan::{DishSubset, GenerationPlan, GoalKind, SpeedMode, resolve};
pub use pool::{PoolSummary, Reward, RewardPool, RewardSource, balance, check_capacity};
pub use rng::{CountingRng, PlayerRng};
pub use slot_data::SlotData;

use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::convert::Infallible;
use thiserror::Error;

use crate::constants::LOG_TARGET;

/// Slot number assigned by the host.
pub type PlayerId = u32;

/// Where the engine gets a player's option block from.
pub trait OptionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Options for `player`.
    ///
    /// # Errors
    ///
    /// Returns an error if the player is unknown or the options cannot be read.
    fn options_for(&self, player: PlayerId) -> Result<PlayerOptions, Self::Error>;
}

/// A single option block shared by every player.
impl OptionSource for PlayerOptions {
    type Error = Infallible;

    fn options_for(&self, _player: PlayerId) -> Result<PlayerOptions, Self::Error> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no options registered for player {0}")]
pub struct UnknownPlayer(pub PlayerId);

impl OptionSource for BTreeMap<PlayerId, PlayerOptions> {
    type Error = UnknownPlayer;

    fn options_for(&self, player: PlayerId) -> Result<PlayerOptions, Self::Error> {
        self.get(&player).cloned().ok_or(UnknownPlayer(player))
    }
}

/// The host's registration surface. Placement and reachability evaluation
/// happen on the other side of this trait.
pub trait MultiworldHost {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Register an active location for `player`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the location.
    fn register_location(
        &mut self,
        player: PlayerId,
        location: &ActiveLocation,
    ) -> Result<(), Self::Error>;

    /// Add one reward to `player`'s pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the item.
    fn register_item(&mut self, player: PlayerId, item: &ItemRecord) -> Result<(), Self::Error>;

    /// Attach an access predicate to a registered location.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is unknown to the host.
    fn set_access_rule(
        &mut self,
        player: PlayerId,
        location: LocationId,
        predicate: Predicate,
    ) -> Result<(), Self::Error>;

    /// Set the goal for `player`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the condition.
    fn set_completion_condition(
        &mut self,
        player: PlayerId,
        condition: CompletionCondition,
    ) -> Result<(), Self::Error>;

    /// Store client pass-through data. Hosts without a slot-data channel can
    /// ignore it.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot store the data.
    fn set_slot_data(&mut self, _player: PlayerId, _data: &SlotData) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Everything generated for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerGeneration {
    player: PlayerId,
    plan: GenerationPlan,
    graph: LocationGraph,
    pool: RewardPool,
    completion: CompletionCondition,
    slot_data: SlotData,
}

impl PlayerGeneration {
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub const fn plan(&self) -> &GenerationPlan {
        &self.plan
    }

    #[must_use]
    pub const fn graph(&self) -> &LocationGraph {
        &self.graph
    }

    #[must_use]
    pub const fn pool(&self) -> &RewardPool {
        &self.pool
    }

    #[must_use]
    pub const fn completion(&self) -> CompletionCondition {
        self.completion
    }

    #[must_use]
    pub const fn slot_data(&self) -> &SlotData {
        &self.slot_data
    }

    /// Push locations, rules, rewards and the goal into `host`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error raised by the host.
    pub fn submit<H>(&self, host: &mut H) -> Result<(), H::Error>
    where
        H: MultiworldHost + ?Sized,
    {
        for location in self.graph.locations() {
            host.register_location(self.player, location)?;
        }
        for (&id, &predicate) in self.graph.access_rules() {
            host.set_access_rule(self.player, id, predicate)?;
        }
        for item in self.pool.items() {
            host.register_item(self.player, item)?;
        }
        host.set_completion_condition(self.player, self.completion)?;
        host.set_slot_data(self.player, &self.slot_data)
    }
}

/// Run the full pipeline for one player with already-fetched options.
///
/// # Errors
///
/// Returns the first [`GenerationError`] raised by validation, resolution,
/// graph building, balancing or terminal selection.
pub fn generate(
    player: PlayerId,
    seed: u64,
    options: &PlayerOptions,
) -> Result<PlayerGeneration, GenerationError> {
    let catalog = catalog::catalog()?;
    options.validate()?;
    pool::check_capacity(options)?;
    let mut rng = PlayerRng::for_player(seed, player);
    let plan = plan::resolve(options, rng.dishes())?;
    let graph = graph::build(&plan, catalog)?;
    let pool = pool::balance(&graph, &plan, catalog, rng.filler())?;
    let completion = completion::terminal(&plan, catalog, &graph)?;
    let slot_data = SlotData::new(&plan, options);
    info!(
        target: LOG_TARGET,
        "player {player}: {} locations, {} rewards, terminal {}",
        graph.len(),
        pool.len(),
        completion.terminal
    );
    Ok(PlayerGeneration {
        player,
        plan,
        graph,
        pool,
        completion,
        slot_data,
    })
}

/// Per-player failure surfaced by [`GenerationEngine`].
#[derive(Debug, Error)]
pub enum EngineError<E>
where
    E: std::error::Error + 'static,
{
    #[error("options unavailable for player {player}")]
    Options {
        player: PlayerId,
        #[source]
        source: E,
    },
    #[error("generation failed for player {player}: {source}")]
    Generation {
        player: PlayerId,
        #[source]
        source: GenerationError,
    },
}

impl<E> EngineError<E>
where
    E: std::error::Error + 'static,
{
    /// The underlying generation error, if this was not an option lookup failure.
    #[must_use]
    pub const fn generation(&self) -> Option<&GenerationError> {
        match self {
            Self::Options { .. } => None,
            Self::Generation { source, .. } => Some(source),
        }
    }
}

/// Result of generating every player in one multiworld.
pub type PlayerResults<E> = Vec<(PlayerId, Result<PlayerGeneration, EngineError<E>>)>;

/// Main generation engine for a multiworld's PlateUp slots
pub struct GenerationEngine<O>
where
    O: OptionSource,
{
    options: O,
}

impl<O> GenerationEngine<O>
where
    O: OptionSource,
{
    pub const fn new(options: O) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &O {
        &self.options
    }

    /// Generate one player's slot from the shared multiworld seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the options cannot be fetched or generation fails.
    pub fn generate_player(
        &self,
        player: PlayerId,
        seed: u64,
    ) -> Result<PlayerGeneration, EngineError<O::Error>> {
        let options = self
            .options
            .options_for(player)
            .map_err(|source| EngineError::Options { player, source })?;
        generate(player, seed, &options)
            .map_err(|source| EngineError::Generation { player, source })
    }

    /// Generate every listed player, each on its own thread.
    ///
    /// A failure for one player is reported in that player's slot and leaves
    /// the others untouched. Catalog defects abort the whole run.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::DuplicateIdentifier`] when the catalog fails
    /// validation.
    pub fn generate_players(
        &self,
        players: &[PlayerId],
        seed: u64,
    ) -> Result<PlayerResults<O::Error>, GenerationError>
    where
        O: Sync,
        O::Error: Send,
    {
        catalog::catalog()?;
        let results = std::thread::scope(|scope| {
            let handles: Vec<_> = players
                .iter()
                .map(|&player| (player, scope.spawn(move || self.generate_player(player, seed))))
                .collect();
            handles
                .into_iter()
                .map(|(player, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                    (player, result)
                })
                .collect::<Vec<_>>()
        });
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct RecordingHost {
        locations: Vec<(PlayerId, LocationId)>,
        items: Vec<(PlayerId, ItemId)>,
        rules: BTreeMap<LocationId, Predicate>,
        goal: Option<CompletionCondition>,
        slot_data: Option<SlotData>,
    }

    #[derive(Debug, Error)]
    #[error("rule for unregistered location {0}")]
    struct UnregisteredLocation(LocationId);

    impl MultiworldHost for RecordingHost {
        type Error = UnregisteredLocation;

        fn register_location(
            &mut self,
            player: PlayerId,
            location: &ActiveLocation,
        ) -> Result<(), Self::Error> {
            self.locations.push((player, location.record.id));
            Ok(())
        }

        fn register_item(&mut self, player: PlayerId, item: &ItemRecord) -> Result<(), Self::Error> {
            self.items.push((player, item.id));
            Ok(())
        }

        fn set_access_rule(
            &mut self,
            _player: PlayerId,
            location: LocationId,
            predicate: Predicate,
        ) -> Result<(), Self::Error> {
            if !self.locations.iter().any(|(_, id)| *id == location) {
                return Err(UnregisteredLocation(location));
            }
            self.rules.insert(location, predicate);
            Ok(())
        }

        fn set_completion_condition(
            &mut self,
            _player: PlayerId,
            condition: CompletionCondition,
        ) -> Result<(), Self::Error> {
            self.goal = Some(condition);
            Ok(())
        }

        fn set_slot_data(&mut self, _player: PlayerId, data: &SlotData) -> Result<(), Self::Error> {
            self.slot_data = Some(data.clone());
            Ok(())
        }
    }

    fn day_options(days: u32, dishes: u32) -> PlayerOptions {
        PlayerOptions {
            goal: GoalKind::DayCount,
            day_count: days,
            dish_count: dishes,
            ..PlayerOptions::default()
        }
    }

    #[test]
    fn engine_generates_and_submits() {
        let engine = GenerationEngine::new(day_options(9, 2));
        let generation = engine.generate_player(1, 0x5EED).unwrap();
        assert_eq!(generation.graph().len(), 9 + 3 + 30);
        assert_eq!(generation.pool().len(), generation.graph().len());
        assert_eq!(generation.completion().terminal, 100_009);

        let mut host = RecordingHost::default();
        generation.submit(&mut host).unwrap();
        assert_eq!(host.locations.len(), 42);
        assert_eq!(host.items.len(), 42);
        assert_eq!(host.rules.len(), 42);
        assert_eq!(host.goal, Some(generation.completion()));
        assert_eq!(
            host.slot_data.map(|data| data.selected_dishes.len()),
            Some(2)
        );
    }

    #[test]
    fn same_seed_and_player_is_reproducible() {
        let engine = GenerationEngine::new(day_options(30, 5));
        let first = engine.generate_player(4, 77).unwrap();
        let second = engine.generate_player(4, 77).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_player_is_an_option_error() {
        let mut players = BTreeMap::new();
        players.insert(1, PlayerOptions::default());
        let engine = GenerationEngine::new(players);
        let err = engine.generate_player(2, 1).unwrap_err();
        assert!(matches!(err, EngineError::Options { player: 2, .. }));
        assert!(err.generation().is_none());
    }

    #[test]
    fn invalid_options_fail_only_that_player() {
        let mut players = BTreeMap::new();
        players.insert(1, day_options(10, 3));
        players.insert(
            2,
            PlayerOptions {
                dish_count: 0,
                ..PlayerOptions::default()
            },
        );
        players.insert(3, PlayerOptions::default());
        let engine = GenerationEngine::new(players);
        let results = engine.generate_players(&[1, 2, 3], 2024).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(matches!(
            results[1].1.as_ref().unwrap_err().generation(),
            Some(GenerationError::Configuration(ConfigurationError {
                field: "dish_count",
                ..
            }))
        ));
        assert!(results[2].1.is_ok());
    }

    #[test]
    fn players_in_one_world_draw_independently() {
        let engine = GenerationEngine::new(day_options(15, 4));
        let results = engine.generate_players(&[1, 2, 3, 4, 5, 6], 9).unwrap();
        let subsets: HashSet<Vec<Dish>> = results
            .iter()
            .map(|(_, result)| result.as_ref().unwrap().plan().dish_subset.to_vec())
            .collect();
        assert!(subsets.len() > 1, "players should not share one dish draw");

        let alone = engine.generate_player(3, 9).unwrap();
        assert_eq!(results[2].1.as_ref().unwrap(), &alone);
    }

    #[test]
    fn unfillable_options_fail_before_resolution() {
        let options = PlayerOptions {
            goal: GoalKind::RepeatCount,
            franchise_count: 10,
            dish_count: 1,
            appliance_speed_mode: SpeedMode::RoleSplit,
            ..PlayerOptions::default()
        };
        assert_eq!(
            generate(1, 3, &options),
            Err(GenerationError::PlanInconsistency(
                PlanInconsistencyError::MandatoryExceedsLocations {
                    mandatory: 27,
                    locations: 25,
                }
            ))
        );

        let invalid_and_unfillable = PlayerOptions {
            day_count: 0,
            ..options
        };
        assert!(matches!(
            generate(1, 3, &invalid_and_unfillable),
            Err(GenerationError::Configuration(_))
        ));
    }

    #[test]
    fn host_errors_stop_submission() {
        struct RejectingHost;

        impl MultiworldHost for RejectingHost {
            type Error = UnregisteredLocation;

            fn register_location(
                &mut self,
                _player: PlayerId,
                location: &ActiveLocation,
            ) -> Result<(), Self::Error> {
                Err(UnregisteredLocation(location.record.id))
            }

            fn register_item(
                &mut self,
                _player: PlayerId,
                _item: &ItemRecord,
            ) -> Result<(), Self::Error> {
                Ok(())
            }

            fn set_access_rule(
                &mut self,
                _player: PlayerId,
                _location: LocationId,
                _predicate: Predicate,
            ) -> Result<(), Self::Error> {
                Ok(())
            }

            fn set_completion_condition(
                &mut self,
                _player: PlayerId,
                _condition: CompletionCondition,
            ) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let generation = generate(1, 1, &PlayerOptions::default()).unwrap();
        let err = generation.submit(&mut RejectingHost).unwrap_err();
        assert_eq!(err.0, 200_001);
    }
}
