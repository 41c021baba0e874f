//! Meal lines: "納豆45g、ご飯160g、生卵60g" to per-item nutrient breakdowns.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

use crate::cascade::{MatchCascade, MatchMethod};
use crate::error::ResolutionMiss;
use crate::nutrients::NutrientProfile;

/// Items are separated by the ideographic comma.
pub const ITEM_SEPARATOR: char = '、';

/// Name (no ASCII digits), then a weight in grams.
static ITEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^0-9]+)([\d.]+)\s*g").expect("valid meal item regex"));

#[derive(Debug, Error)]
pub enum MealError {
    #[error("No food items found; expected a line like \"納豆45g、ご飯160g\"")]
    NoItems,

    #[error(transparent)]
    Unresolved(#[from] ResolutionMiss),
}

/// One parsed item of a meal line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealItem {
    pub name: String,
    pub grams: f64,
}

/// Split a meal line into items.
///
/// Pieces without a recognizable `<name><number>g` part are skipped.
pub fn parse_meal(input: &str) -> Result<Vec<MealItem>, MealError> {
    let items: Vec<MealItem> = input
        .split(ITEM_SEPARATOR)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .filter_map(parse_item)
        .collect();

    if items.is_empty() {
        return Err(MealError::NoItems);
    }
    Ok(items)
}

fn parse_item(piece: &str) -> Option<MealItem> {
    let caps = ITEM_PATTERN.captures(piece)?;
    let name = caps.get(1)?.as_str().trim();
    let grams: f64 = caps.get(2)?.as_str().parse().ok()?;

    if name.is_empty() || !grams.is_finite() {
        tracing::debug!(piece, "Skipping unparsable meal item");
        return None;
    }
    Some(MealItem {
        name: name.to_string(),
        grams,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemBreakdown {
    pub input_name: String,
    pub matched_name: String,
    pub method: MatchMethod,
    pub grams: f64,
    pub nutrients: NutrientProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealBreakdown {
    pub items: Vec<ItemBreakdown>,
    pub totals: NutrientProfile,
}

impl MealBreakdown {
    /// Percentage of the daily targets covered by the whole meal.
    pub fn fulfillment_rates(&self) -> NutrientProfile {
        self.totals.fulfillment_rates()
    }
}

/// Resolve every item of a meal line and scale its nutrients by weight.
///
/// Stops at the first item that cannot be resolved.
pub async fn calculate_meal(
    cascade: &MatchCascade,
    input: &str,
    allow_assisted: bool,
) -> Result<MealBreakdown, MealError> {
    let parsed = parse_meal(input)?;
    let hint_limit = cascade.config().hint_limit;

    let mut items = Vec::with_capacity(parsed.len());
    let mut totals = NutrientProfile::default();

    for item in parsed {
        let resolution = cascade
            .resolve(&item.name, allow_assisted)
            .await
            .into_resolution(&item.name, hint_limit)?;

        let entry = cascade
            .catalog()
            .lookup(&resolution.name)
            .ok_or_else(|| ResolutionMiss {
                phrase: item.name.clone(),
                suggestions: Vec::new(),
            })?;

        let nutrients = entry.profile_for(item.grams);
        totals += &nutrients;

        items.push(ItemBreakdown {
            input_name: item.name,
            matched_name: resolution.name,
            method: resolution.method,
            grams: item.grams,
            nutrients,
        });
    }

    Ok(MealBreakdown { items, totals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, FoodEntry};
    use crate::nutrients::{NutrientKey, RawValue};
    use food_aliases::AliasTable;

    fn item(name: &str, grams: f64) -> MealItem {
        MealItem {
            name: name.to_string(),
            grams,
        }
    }

    #[test]
    fn test_parse_meal() {
        let items = parse_meal("納豆45g、ご飯160g、生卵60g").unwrap();
        assert_eq!(
            items,
            vec![item("納豆", 45.0), item("ご飯", 160.0), item("生卵", 60.0)]
        );
    }

    #[test]
    fn test_parse_meal_spacing_and_decimals() {
        let items = parse_meal(" 鶏卵 全卵 生 52.5 g 、、ほうれん草80g ").unwrap();
        assert_eq!(items, vec![item("鶏卵 全卵 生", 52.5), item("ほうれん草", 80.0)]);
    }

    #[test]
    fn test_parse_meal_skips_bad_items() {
        let items = parse_meal("納豆、ご飯160g、みそ汁1杯、卵1.2.3g").unwrap();
        assert_eq!(items, vec![item("ご飯", 160.0)]);
    }

    #[test]
    fn test_parse_meal_no_items() {
        assert!(matches!(parse_meal("なにもない"), Err(MealError::NoItems)));
        assert!(matches!(parse_meal(""), Err(MealError::NoItems)));
        assert!(matches!(parse_meal("160g"), Err(MealError::NoItems)));
    }

    fn test_cascade() -> MatchCascade {
        let catalog: Catalog = [
            FoodEntry::new("鶏卵　全卵　生")
                .with_nutrient(NutrientKey::Energy, RawValue::Number(142.0))
                .with_nutrient(NutrientKey::Protein, RawValue::Text("12.2".into())),
            FoodEntry::new("だいず　［納豆類］　糸引き納豆")
                .with_nutrient(NutrientKey::Energy, RawValue::Number(184.0))
                .with_nutrient(NutrientKey::VitaminK, RawValue::Text("(600)".into())),
        ]
        .into_iter()
        .collect();
        MatchCascade::new(catalog, AliasTable::builtin())
    }

    #[tokio::test]
    async fn test_calculate_meal() {
        let meal = calculate_meal(&test_cascade(), "生卵60g、納豆50g", false)
            .await
            .unwrap();

        assert_eq!(meal.items.len(), 2);
        let egg = &meal.items[0];
        assert_eq!(egg.input_name, "生卵");
        assert_eq!(egg.matched_name, "鶏卵　全卵　生");
        assert_eq!(egg.method, MatchMethod::Keyword);
        assert!((egg.nutrients.get(NutrientKey::Energy) - 85.2).abs() < 1e-9);

        let natto = &meal.items[1];
        assert_eq!(natto.matched_name, "だいず　［納豆類］　糸引き納豆");
        assert!((natto.nutrients.get(NutrientKey::VitaminK) - 300.0).abs() < 1e-9);

        assert!((meal.totals.get(NutrientKey::Energy) - (85.2 + 92.0)).abs() < 1e-9);
        assert_eq!(meal.totals.get(NutrientKey::Iron), 0.0);
    }

    #[tokio::test]
    async fn test_calculate_meal_reports_unresolved_item() {
        let err = calculate_meal(&test_cascade(), "生卵60g、ドラゴンフルーツ100g", false)
            .await
            .unwrap_err();
        match err {
            MealError::Unresolved(miss) => assert_eq!(miss.phrase, "ドラゴンフルーツ"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
