//! Static location and item tables.
//!
//! Every location category owns a disjoint numeric id range, so collisions
//! across categories cannot happen as long as each record stays inside its
//! range. [`Catalog::validate`] checks that, plus uniqueness of ids and names,
//! once per process through [`catalog`].

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use crate::constants::{
    DISH_DAYS, ITEM_APPLIANCE_SPEED, ITEM_CHOP_SPEED, ITEM_CLEAN_SPEED, ITEM_COOK_SPEED,
    ITEM_CUSTOMER_CARD, ITEM_PLAYER_SPEED, ITEM_STAR_TOKEN, MAX_DAYS, MAX_REPEATS, MAX_STARS,
};
use crate::error::DuplicateIdentifierError;

pub type LocationId = u32;
pub type ItemId = u32;

/// Location category; each one maps onto its own id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocationCategory {
    Milestone,
    Star,
    RepeatGate,
    DishDay,
}

impl LocationCategory {
    pub const ALL: [Self; 4] = [Self::Milestone, Self::Star, Self::RepeatGate, Self::DishDay];

    /// Inclusive id range reserved for this category.
    #[must_use]
    pub const fn id_range(self) -> RangeInclusive<LocationId> {
        match self {
            Self::Milestone => RangeInclusive::new(100_001, 100_100),
            Self::DishDay => RangeInclusive::new(101_001, 115_015),
            Self::Star => RangeInclusive::new(150_001, 150_034),
            Self::RepeatGate => RangeInclusive::new(200_001, 200_010),
        }
    }
}

/// The fixed set of dishes a slot can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dish {
    Salad,
    Steak,
    Burger,
    Coffee,
    Pizza,
    Dumplings,
    Turkey,
    Pie,
    Cakes,
    Spaghetti,
    Fish,
    Tacos,
    HotDogs,
    Breakfast,
    StirFry,
}

impl Dish {
    pub const ALL: [Self; 15] = [
        Self::Salad,
        Self::Steak,
        Self::Burger,
        Self::Coffee,
        Self::Pizza,
        Self::Dumplings,
        Self::Turkey,
        Self::Pie,
        Self::Cakes,
        Self::Spaghetti,
        Self::Fish,
        Self::Tacos,
        Self::HotDogs,
        Self::Breakfast,
        Self::StirFry,
    ];

    /// Stable three-digit dish code; dish-day ids are `code * 1000 + day`.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Salad => 101,
            Self::Steak => 102,
            Self::Burger => 103,
            Self::Coffee => 104,
            Self::Pizza => 105,
            Self::Dumplings => 106,
            Self::Turkey => 107,
            Self::Pie => 108,
            Self::Cakes => 109,
            Self::Spaghetti => 110,
            Self::Fish => 111,
            Self::Tacos => 112,
            Self::HotDogs => 113,
            Self::Breakfast => 114,
            Self::StirFry => 115,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Salad => "Salad",
            Self::Steak => "Steak",
            Self::Burger => "Burger",
            Self::Coffee => "Coffee",
            Self::Pizza => "Pizza",
            Self::Dumplings => "Dumplings",
            Self::Turkey => "Turkey",
            Self::Pie => "Pie",
            Self::Cakes => "Cakes",
            Self::Spaghetti => "Spaghetti",
            Self::Fish => "Fish",
            Self::Tacos => "Tacos",
            Self::HotDogs => "Hot Dogs",
            Self::Breakfast => "Breakfast",
            Self::StirFry => "Stir Fry",
        }
    }
}

impl fmt::Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single check the host can place a reward behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    pub id: LocationId,
    pub category: LocationCategory,
    /// Franchise count for repeat gates, zero elsewhere.
    pub repeat_index: u32,
    /// Day number for milestones and dish days, star number for stars.
    pub day_or_dish_index: u32,
    #[serde(default)]
    pub dish: Option<Dish>,
    /// Position in the catalog-defined chain order of the category.
    pub sequence: u32,
}

impl LocationRecord {
    #[must_use]
    pub fn milestone(day: u32) -> Self {
        Self {
            name: format!("Complete Day {day}"),
            id: 100_000 + day,
            category: LocationCategory::Milestone,
            repeat_index: 0,
            day_or_dish_index: day,
            dish: None,
            sequence: day * 10,
        }
    }

    /// Star `k` follows the third day of its group.
    #[must_use]
    pub fn star(star: u32) -> Self {
        Self {
            name: format!("Star {star}"),
            id: 150_000 + star,
            category: LocationCategory::Star,
            repeat_index: 0,
            day_or_dish_index: star,
            dish: None,
            sequence: star * 30 + 5,
        }
    }

    #[must_use]
    pub fn repeat_gate(repeat: u32) -> Self {
        Self {
            name: format!("Franchise {repeat} times"),
            id: 200_000 + repeat,
            category: LocationCategory::RepeatGate,
            repeat_index: repeat,
            day_or_dish_index: 0,
            dish: None,
            sequence: repeat,
        }
    }

    #[must_use]
    pub fn dish_day(dish: Dish, day: u32) -> Self {
        Self {
            name: format!("{} - Day {day}", dish.name()),
            id: dish.code() * 1000 + day,
            category: LocationCategory::DishDay,
            repeat_index: 0,
            day_or_dish_index: day,
            dish: Some(dish),
            sequence: day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemClassification {
    Progression,
    Useful,
    Filler,
    Trap,
}

impl ItemClassification {
    /// Progression items are the only ones that may gate access.
    #[must_use]
    pub const fn gates_access(self) -> bool {
        matches!(self, Self::Progression)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemRecord {
    pub name: &'static str,
    pub id: ItemId,
    pub classification: ItemClassification,
}

impl ItemRecord {
    const fn new(name: &'static str, id: ItemId, classification: ItemClassification) -> Self {
        Self {
            name,
            id,
            classification,
        }
    }
}

const STANDARD_ITEMS: [ItemRecord; 11] = [
    ItemRecord::new(ITEM_PLAYER_SPEED, 2001, ItemClassification::Progression),
    ItemRecord::new(ITEM_APPLIANCE_SPEED, 2002, ItemClassification::Progression),
    ItemRecord::new(ITEM_COOK_SPEED, 2003, ItemClassification::Progression),
    ItemRecord::new(ITEM_CLEAN_SPEED, 2004, ItemClassification::Progression),
    ItemRecord::new(ITEM_CHOP_SPEED, 2005, ItemClassification::Progression),
    ItemRecord::new(ITEM_STAR_TOKEN, 2010, ItemClassification::Progression),
    ItemRecord::new(ITEM_CUSTOMER_CARD, 3001, ItemClassification::Trap),
    ItemRecord::new("Hob", 1001, ItemClassification::Filler),
    ItemRecord::new("Sink", 1002, ItemClassification::Filler),
    ItemRecord::new("Counter", 1003, ItemClassification::Filler),
    ItemRecord::new("Dining Table", 1004, ItemClassification::Filler),
];

/// Immutable location and item tables.
#[derive(Debug, Clone)]
pub struct Catalog {
    locations: Vec<LocationRecord>,
    items: Vec<ItemRecord>,
    location_index: HashMap<LocationId, usize>,
}

impl Catalog {
    /// Assemble a catalog from explicit tables. Call [`Catalog::validate`]
    /// before handing it to the generator.
    #[must_use]
    pub fn from_parts(locations: Vec<LocationRecord>, items: Vec<ItemRecord>) -> Self {
        let mut location_index = HashMap::with_capacity(locations.len());
        for (idx, record) in locations.iter().enumerate() {
            location_index.entry(record.id).or_insert(idx);
        }
        Self {
            locations,
            items,
            location_index,
        }
    }

    /// The shipped PlateUp tables.
    #[must_use]
    pub fn standard() -> Self {
        let mut locations = Vec::new();
        locations.extend((1..=MAX_DAYS).map(LocationRecord::milestone));
        locations.extend((1..=MAX_STARS).map(LocationRecord::star));
        locations.extend((1..=MAX_REPEATS).map(LocationRecord::repeat_gate));
        for dish in Dish::ALL {
            locations.extend((1..=DISH_DAYS).map(|day| LocationRecord::dish_day(dish, day)));
        }
        Self::from_parts(locations, STANDARD_ITEMS.to_vec())
    }

    /// Check range partitioning and uniqueness of every id and name.
    ///
    /// # Errors
    ///
    /// Returns the first collision or out-of-range id found.
    pub fn validate(&self) -> Result<(), DuplicateIdentifierError> {
        for (idx, first) in LocationCategory::ALL.iter().enumerate() {
            for second in &LocationCategory::ALL[idx + 1..] {
                let (a, b) = (first.id_range(), second.id_range());
                if a.start() <= b.end() && b.start() <= a.end() {
                    return Err(DuplicateIdentifierError::RangeOverlap {
                        first: *first,
                        second: *second,
                    });
                }
            }
        }

        let mut ids: HashMap<LocationId, &str> = HashMap::with_capacity(self.locations.len());
        let mut names: HashSet<&str> = HashSet::with_capacity(self.locations.len());
        for record in &self.locations {
            if !record.category.id_range().contains(&record.id) {
                return Err(DuplicateIdentifierError::OutOfRange {
                    name: record.name.clone(),
                    id: record.id,
                    category: record.category,
                });
            }
            if let Some(first) = ids.insert(record.id, record.name.as_str()) {
                return Err(DuplicateIdentifierError::LocationId {
                    id: record.id,
                    first: first.to_string(),
                    second: record.name.clone(),
                });
            }
            if !names.insert(record.name.as_str()) {
                return Err(DuplicateIdentifierError::LocationName {
                    name: record.name.clone(),
                });
            }
        }

        let mut item_ids: HashMap<ItemId, &'static str> = HashMap::with_capacity(self.items.len());
        let mut item_names: HashSet<&'static str> = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if let Some(first) = item_ids.insert(item.id, item.name) {
                return Err(DuplicateIdentifierError::ItemId {
                    id: item.id,
                    first,
                    second: item.name,
                });
            }
            if !item_names.insert(item.name) {
                return Err(DuplicateIdentifierError::ItemName { name: item.name });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn locations(&self) -> &[LocationRecord] {
        &self.locations
    }

    pub fn locations_in(
        &self,
        category: LocationCategory,
    ) -> impl Iterator<Item = &LocationRecord> + '_ {
        self.locations
            .iter()
            .filter(move |record| record.category == category)
    }

    #[must_use]
    pub fn location(&self, id: LocationId) -> Option<&LocationRecord> {
        self.location_index
            .get(&id)
            .and_then(|&idx| self.locations.get(idx))
    }

    #[must_use]
    pub fn location_by_name(&self, name: &str) -> Option<&LocationRecord> {
        self.locations.iter().find(|record| record.name == name)
    }

    #[must_use]
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    #[must_use]
    pub fn item_by_name(&self, name: &str) -> Option<&ItemRecord> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn items_of(
        &self,
        classification: ItemClassification,
    ) -> impl Iterator<Item = &ItemRecord> + '_ {
        self.items
            .iter()
            .filter(move |item| item.classification == classification)
    }
}

/// Process-wide validated catalog. Validation runs on first access only.
///
/// # Errors
///
/// Returns the catalog defect found during the one-time validation pass.
pub fn catalog() -> Result<&'static Catalog, DuplicateIdentifierError> {
    static CATALOG: OnceLock<Result<Catalog, DuplicateIdentifierError>> = OnceLock::new();
    CATALOG
        .get_or_init(|| {
            let catalog = Catalog::standard();
            catalog.validate().map(|()| catalog)
        })
        .as_ref()
        .map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_validates() {
        let catalog = Catalog::standard();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.locations_in(LocationCategory::Milestone).count(), 100);
        assert_eq!(catalog.locations_in(LocationCategory::Star).count(), 34);
        assert_eq!(catalog.locations_in(LocationCategory::RepeatGate).count(), 10);
        assert_eq!(catalog.locations_in(LocationCategory::DishDay).count(), 225);
    }

    #[test]
    fn records_stay_inside_their_ranges() {
        for record in Catalog::standard().locations() {
            assert!(
                record.category.id_range().contains(&record.id),
                "{} out of range",
                record.name
            );
        }
    }

    #[test]
    fn duplicate_location_id_is_reported() {
        let mut locations = vec![LocationRecord::milestone(1), LocationRecord::milestone(2)];
        locations[1].id = locations[0].id;
        let catalog = Catalog::from_parts(locations, STANDARD_ITEMS.to_vec());
        assert!(matches!(
            catalog.validate(),
            Err(DuplicateIdentifierError::LocationId { id: 100_001, .. })
        ));
    }

    #[test]
    fn duplicate_location_name_is_reported() {
        let mut locations = vec![LocationRecord::milestone(1), LocationRecord::milestone(2)];
        locations[1].name = locations[0].name.clone();
        let catalog = Catalog::from_parts(locations, STANDARD_ITEMS.to_vec());
        assert_eq!(
            catalog.validate(),
            Err(DuplicateIdentifierError::LocationName {
                name: "Complete Day 1".to_string()
            })
        );
    }

    #[test]
    fn out_of_range_location_is_reported() {
        let mut gate = LocationRecord::repeat_gate(1);
        gate.id = 100_050;
        let catalog = Catalog::from_parts(vec![gate], STANDARD_ITEMS.to_vec());
        assert!(matches!(
            catalog.validate(),
            Err(DuplicateIdentifierError::OutOfRange {
                category: LocationCategory::RepeatGate,
                ..
            })
        ));
    }

    #[test]
    fn duplicate_item_id_is_reported() {
        let mut items = STANDARD_ITEMS.to_vec();
        items.push(ItemRecord::new("Mixer", 1001, ItemClassification::Filler));
        let catalog = Catalog::from_parts(Vec::new(), items);
        assert_eq!(
            catalog.validate(),
            Err(DuplicateIdentifierError::ItemId {
                id: 1001,
                first: "Hob",
                second: "Mixer"
            })
        );
    }

    #[test]
    fn duplicate_item_name_is_reported() {
        let mut items = STANDARD_ITEMS.to_vec();
        items.push(ItemRecord::new("Hob", 1999, ItemClassification::Filler));
        let catalog = Catalog::from_parts(Vec::new(), items);
        assert_eq!(
            catalog.validate(),
            Err(DuplicateIdentifierError::ItemName { name: "Hob" })
        );
    }

    #[test]
    fn dish_day_ids_follow_dish_codes() {
        let record = LocationRecord::dish_day(Dish::HotDogs, 7);
        assert_eq!(record.id, 113_007);
        assert_eq!(record.name, "Hot Dogs - Day 7");
        assert_eq!(record.dish, Some(Dish::HotDogs));
    }

    #[test]
    fn stars_sort_after_third_day_of_group() {
        let star = LocationRecord::star(1);
        assert!(star.sequence > LocationRecord::milestone(3).sequence);
        assert!(star.sequence < LocationRecord::milestone(4).sequence);
    }

    #[test]
    fn global_catalog_is_shared() {
        let first = catalog().unwrap();
        let second = catalog().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.location_by_name("Franchise 3 times").is_some());
        assert_eq!(first.location(115_015).map(|r| r.dish), Some(Some(Dish::StirFry)));
    }
}
