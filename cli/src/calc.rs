//! `eiyo calc`: nutrient totals for a meal line.

use anyhow::Result;
use eiyo_core::{calculate_meal, MatchCascade, MealBreakdown, NutrientProfile};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    #[serde(flatten)]
    meal: &'a MealBreakdown,
    /// Percent of the daily targets.
    fulfillment: NutrientProfile,
}

pub async fn run(cascade: &MatchCascade, meal: &str, assist: bool, json: bool) -> Result<()> {
    let breakdown = calculate_meal(cascade, meal, assist).await?;
    let rates = breakdown.fulfillment_rates();

    if json {
        let report = Report {
            meal: &breakdown,
            fulfillment: rates,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for item in &breakdown.items {
        println!(
            "{} {}g -> {} [{}]",
            item.input_name, item.grams, item.matched_name, item.method
        );
    }

    println!();
    for (key, amount) in breakdown.totals.iter() {
        println!(
            "{}\t{:.2} {}\t{:.1}%",
            key.label(),
            amount,
            key.unit(),
            rates.get(key)
        );
    }

    Ok(())
}
