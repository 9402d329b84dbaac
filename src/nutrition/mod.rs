//! Food calorie estimation.
//!
//! Looks a free-text food name up in a static reference table and scales the
//! reference calories to the requested quantity. Lookup is deliberately
//! permissive: see [`MatchKind`] for the order in which candidates are tried.

mod table;

pub use table::FOODS;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quantity granularity of a reference entry or of a logged meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseUnit {
    #[serde(rename = "100g", alias = "g", alias = "grams")]
    Per100g,
    #[serde(rename = "100ml", alias = "ml")]
    Per100ml,
    #[serde(rename = "1 unit", alias = "unit", alias = "units", alias = "piece")]
    PerUnit,
}

/// Units that can be scaled into each other linearly. Mass and volume share a
/// class (1 g ≈ 1 ml).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClass {
    Bulk,
    Discrete,
}

/// Base-units one discrete item is assumed to weigh when the caller's unit class
/// does not match the reference entry. A rough approximation.
const UNIT_FALLBACK_SIZE: f64 = 100.0;

impl BaseUnit {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Per100g => "100g",
            Self::Per100ml => "100ml",
            Self::PerUnit => "1 unit",
        }
    }

    #[must_use]
    pub const fn class(&self) -> UnitClass {
        match self {
            Self::Per100g | Self::Per100ml => UnitClass::Bulk,
            Self::PerUnit => UnitClass::Discrete,
        }
    }

    #[must_use]
    pub const fn base_size(&self) -> f64 {
        match self {
            Self::Per100g | Self::Per100ml => 100.0,
            Self::PerUnit => 1.0,
        }
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "100g" | "g" | "grams" => Ok(Self::Per100g),
            "100ml" | "ml" => Ok(Self::Per100ml),
            "1 unit" | "unit" | "units" | "piece" => Ok(Self::PerUnit),
            other => Err(format!("Unknown unit: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoodReference {
    pub name: &'static str,
    /// Calories per `base`.
    pub calories: f64,
    pub base: BaseUnit,
}

/// How a query matched a reference entry, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Byte-for-byte equal names.
    Exact,
    /// Equal ignoring case.
    CaseInsensitive,
    /// First table entry whose lowercased name contains the lowercased query.
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodMatch<'a> {
    pub food: &'a FoodReference,
    pub kind: MatchKind,
}

/// Finds `query` in `table` using the exact → case-insensitive → substring policy.
/// Blank queries never match.
#[must_use]
pub fn find_food_in<'a>(table: &'a [FoodReference], query: &str) -> Option<FoodMatch<'a>> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(food) = table.iter().find(|f| f.name == query) {
        return Some(FoodMatch {
            food,
            kind: MatchKind::Exact,
        });
    }

    let lowered = query.to_lowercase();

    if let Some(food) = table.iter().find(|f| f.name.to_lowercase() == lowered) {
        return Some(FoodMatch {
            food,
            kind: MatchKind::CaseInsensitive,
        });
    }

    table
        .iter()
        .find(|f| f.name.to_lowercase().contains(&lowered))
        .map(|food| FoodMatch {
            food,
            kind: MatchKind::Substring,
        })
}

#[must_use]
pub fn find_food(query: &str) -> Option<FoodMatch<'static>> {
    find_food_in(FOODS, query)
}

/// Scales a reference entry to `quantity` of `unit`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
pub fn calories_for(food: &FoodReference, quantity: f64, unit: BaseUnit) -> u32 {
    if !quantity.is_finite() || quantity <= 0.0 {
        return 0;
    }

    let raw = if unit.class() == food.base.class() {
        food.calories * quantity / food.base.base_size()
    } else {
        match unit.class() {
            // Asking for items of a per-100 food: one item ≈ 100 g/ml.
            UnitClass::Discrete => {
                food.calories * quantity * UNIT_FALLBACK_SIZE / food.base.base_size()
            }
            // Asking for grams of a per-item food: 100 g/ml ≈ one item.
            UnitClass::Bulk => food.calories * quantity / UNIT_FALLBACK_SIZE,
        }
    };

    if raw <= 0.0 {
        0
    } else {
        raw.round().min(f64::from(u32::MAX)) as u32
    }
}

/// Estimated calories for a free-text food. Unknown foods resolve to 0.
#[must_use]
pub fn resolve_calories(food_name: &str, quantity: f64, unit: BaseUnit) -> u32 {
    find_food(food_name).map_or(0, |m| calories_for(m.food, quantity, unit))
}

/// Reference entries whose name contains `query`, best match kind first.
#[must_use]
pub fn search_foods(query: &str, limit: usize) -> Vec<&'static FoodReference> {
    let lowered = query.trim().to_lowercase();
    if lowered.is_empty() {
        return FOODS.iter().take(limit).collect();
    }

    let mut hits: Vec<&'static FoodReference> = Vec::new();
    if let Some(best) = find_food(query) {
        hits.push(best.food);
    }

    for food in FOODS {
        if hits.len() >= limit {
            break;
        }
        if food.name.to_lowercase().contains(&lowered) && !hits.iter().any(|h| h.name == food.name)
        {
            hits.push(food);
        }
    }

    hits.truncate(limit);
    hits
}
