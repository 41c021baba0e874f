//! `eiyo resolve`: look up a single food name.

use anyhow::Result;
use eiyo_core::MatchCascade;

pub async fn run(cascade: &MatchCascade, phrase: &str, assist: bool, json: bool) -> Result<()> {
    let result = cascade.resolve(phrase, assist).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let resolution = result.into_resolution(phrase, cascade.config().hint_limit)?;
    match resolution.score {
        Some(score) => println!("{}\t{} ({})", resolution.name, resolution.method, score),
        None => println!("{}\t{}", resolution.name, resolution.method),
    }

    Ok(())
}
