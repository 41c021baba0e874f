//! Prompt and reply handling for assisted food matching.

use serde::Deserialize;

use super::AssistError;

/// Render the prompt asking the model to pick one candidate for `query`.
pub fn render_food_match_prompt(query: &str, candidates: &[&str]) -> String {
    let candidate_list = candidates.join("\n");

    format!(
        r#"Pick the food composition table entry that best matches the food a user typed.

User input: {query}

Candidate entries (one per line):
{candidate_list}

Rules:
1. Choose exactly one entry from the candidates, copied character for character.
2. If nothing matches exactly, choose the closest food.
3. Take the preparation into account (raw, boiled, grilled, ...).

Respond with JSON only, no other text: {{"matched_food": "<entry name>"}}"#
    )
}

#[derive(Debug, Deserialize)]
struct MatchedFoodReply {
    matched_food: String,
}

/// Extract the echoed entry name from a model reply.
///
/// Markdown code fences are stripped. A reply that looks like JSON must be a
/// `{"matched_food": ...}` object; anything else is taken as the bare name.
pub fn parse_matched_food(reply: &str) -> Result<String, AssistError> {
    let cleaned = reply.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let name = if cleaned.starts_with('{') {
        serde_json::from_str::<MatchedFoodReply>(cleaned)
            .map(|r| r.matched_food)
            .map_err(|_| AssistError::UnexpectedReply(cleaned.to_string()))?
    } else {
        cleaned.to_string()
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(AssistError::EmptyReply);
    }
    Ok(name.to_string())
}
