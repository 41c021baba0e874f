//! Food-name resolution against a food composition table.
//!
//! [`MatchCascade`] maps a free-form food phrase ("生卵", "ご飯") to one
//! canonical table entry ("鶏卵　全卵　生") or, failing that, to a short list
//! of suggestions. The [`meal`] module builds per-meal nutrient totals on top.

pub mod assist;
pub mod cascade;
pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod meal;
pub mod normalize;
pub mod nutrients;
pub mod similarity;

pub use assist::{matcher_from_env, AssistError, AssistedMatcher, LlmAssistedMatcher, NoAssist};
pub use cascade::{MatchCascade, MatchMethod, MatchResult, MatchScore, Resolution};
pub use catalog::{Catalog, FoodEntry, NAME_FIELD};
pub use config::{CascadeConfig, ConfigError};
pub use error::{CatalogError, ResolutionMiss};
pub use food_aliases::AliasTable;
pub use meal::{calculate_meal, parse_meal, MealBreakdown, MealError, MealItem};
pub use normalize::normalize;
pub use nutrients::{parse_numeric, NutrientKey, NutrientProfile, NutrientValues, RawValue};
pub use similarity::ratio;
