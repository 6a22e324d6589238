//! Centralized catalog extents, option bounds and pool quantities.
//!
//! Option ranges and mandatory reward counts live here so a balance change is
//! a reviewed code change rather than something a settings file can drift.

// Catalog extents ----------------------------------------------------------
pub const MAX_DAYS: u32 = 100;
pub const MAX_STARS: u32 = MAX_DAYS.div_ceil(DAYS_PER_STAR);
pub const MAX_REPEATS: u32 = 10;
pub const DISH_DAYS: u32 = 15;
pub const DAYS_PER_STAR: u32 = 3;
pub const GATES_PER_GROUP: u32 = 3;

// Option bounds ------------------------------------------------------------
pub const MIN_REPEATS: u32 = 1;
pub const MIN_DAYS: u32 = 1;
pub const MIN_DISHES: u32 = 1;
pub const MAX_DISHES: u32 = 15;
pub const MAX_APPLIANCES_KEPT: u32 = 20;

// Item names ---------------------------------------------------------------
pub const ITEM_PLAYER_SPEED: &str = "Speed Upgrade Player";
pub const ITEM_APPLIANCE_SPEED: &str = "Speed Upgrade Appliance";
pub const ITEM_COOK_SPEED: &str = "Speed Upgrade Cook";
pub const ITEM_CLEAN_SPEED: &str = "Speed Upgrade Clean";
pub const ITEM_CHOP_SPEED: &str = "Speed Upgrade Chop";
pub const ITEM_STAR_TOKEN: &str = "Star Token";
pub const ITEM_CUSTOMER_CARD: &str = "Random Customer Card";

// Mandatory pool quantities ------------------------------------------------
pub const PLAYER_SPEED_COUNT: usize = 5;
pub const APPLIANCE_SPEED_COUNT: usize = 5;
pub const ROLE_SPEED_COUNT: usize = 5;
pub const TRAP_COUNT: usize = 3;

// Region names -------------------------------------------------------------
pub const REGION_MENU: &str = "Menu";
pub const REGION_PROGRESSION: &str = "Progression";
pub const REGION_DISH_CHECKS: &str = "Dish Checks";

// Logging ------------------------------------------------------------------
pub(crate) const LOG_TARGET: &str = "plateup_gen";
