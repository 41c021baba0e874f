//! The food-name resolution cascade.
//!
//! Levels run in a fixed order and the first one that produces a match wins:
//!
//! 1. exact: the raw input equals a canonical name byte for byte
//! 2. normalized: equal after [`normalize`] on both sides
//! 3. keyword: alias-expanded keywords counted as substrings of each name
//! 4. similarity: best [`ratio`] over the whole catalog, above a threshold
//! 5. assisted: an optional [`AssistedMatcher`] picks from a candidate pool
//!
//! If nothing matches, names sharing a raw token with the input are offered
//! as suggestions. Levels 1-4 and the suggestion pass are pure functions of
//! the input and the loaded data. Ties at levels 3 and 4 go to the entry that
//! comes first in catalog order.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use food_aliases::AliasTable;

use crate::assist::{AssistError, AssistedMatcher, NoAssist};
use crate::catalog::{Catalog, FoodEntry};
use crate::config::CascadeConfig;
use crate::error::ResolutionMiss;
use crate::normalize::normalize;
use crate::similarity::ratio;

/// The cascade level that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Normalized,
    Keyword,
    Similarity,
    Assisted,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Normalized => "normalized",
            MatchMethod::Keyword => "keyword",
            MatchMethod::Similarity => "similarity",
            MatchMethod::Assisted => "assisted",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence attached to a keyword or similarity match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScore {
    /// Number of expanded keywords found in the name.
    Keywords(usize),
    /// Similarity ratio in `[0, 1]`.
    Ratio(f64),
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchScore::Keywords(n) => write!(f, "{n} keywords"),
            MatchScore::Ratio(r) => write!(f, "{r:.3}"),
        }
    }
}

/// A resolved canonical name. `name` always exists verbatim in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub name: String,
    pub method: MatchMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<MatchScore>,
}

impl Resolution {
    fn new(entry: &FoodEntry, method: MatchMethod, score: Option<MatchScore>) -> Self {
        Self {
            name: entry.name.clone(),
            method,
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    Resolved(Resolution),
    /// Closest catalog names, best first.
    Suggestions { names: Vec<String> },
    NotFound,
}

impl MatchResult {
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            MatchResult::Resolved(resolution) => Some(resolution),
            _ => None,
        }
    }

    /// Turn a miss into the user-facing error, keeping at most `hint_limit`
    /// suggestions.
    pub fn into_resolution(
        self,
        phrase: &str,
        hint_limit: usize,
    ) -> Result<Resolution, ResolutionMiss> {
        let suggestions = match self {
            MatchResult::Resolved(resolution) => return Ok(resolution),
            MatchResult::Suggestions { names } => names.into_iter().take(hint_limit).collect(),
            MatchResult::NotFound => Vec::new(),
        };
        Err(ResolutionMiss {
            phrase: phrase.to_string(),
            suggestions,
        })
    }
}

/// Resolves free-form food names against one catalog.
///
/// Owns its catalog, alias table and assisted matcher; nothing is mutated
/// after construction, so a shared reference can serve concurrent lookups.
#[derive(Debug)]
pub struct MatchCascade {
    catalog: Catalog,
    /// `normalize(name)` for every entry, index-aligned with the catalog.
    normalized_names: Vec<String>,
    aliases: AliasTable,
    assist: Arc<dyn AssistedMatcher>,
    config: CascadeConfig,
}

impl MatchCascade {
    /// A cascade with default configuration and no assisted matcher.
    pub fn new(catalog: Catalog, aliases: AliasTable) -> Self {
        let normalized_names = catalog.scan().iter().map(|e| normalize(&e.name)).collect();
        Self {
            catalog,
            normalized_names,
            aliases,
            assist: Arc::new(NoAssist),
            config: CascadeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CascadeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_assist(mut self, assist: Arc<dyn AssistedMatcher>) -> Self {
        self.assist = assist;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Run the full cascade. Level 5 runs only when `allow_assisted` is set
    /// and a matcher is available; its failures are logged and count as a
    /// miss.
    pub async fn resolve(&self, raw: &str, allow_assisted: bool) -> MatchResult {
        if let Some(resolution) = self.match_deterministic(raw) {
            return MatchResult::Resolved(resolution);
        }

        if allow_assisted {
            if let Some(resolution) = self.assisted_match(raw).await {
                return MatchResult::Resolved(resolution);
            }
        }

        self.suggestions(raw)
    }

    /// Levels 1-4 and suggestions, without the assisted level.
    pub fn resolve_deterministic(&self, raw: &str) -> MatchResult {
        match self.match_deterministic(raw) {
            Some(resolution) => MatchResult::Resolved(resolution),
            None => self.suggestions(raw),
        }
    }

    /// Up to `limit` catalog names containing any whitespace-separated token
    /// of `raw`, most similar first. Repeated names are listed once.
    pub fn suggest(&self, raw: &str, limit: usize) -> Vec<String> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.is_empty() || limit == 0 {
            return Vec::new();
        }

        let normalized = normalize(raw);
        let mut seen = HashSet::new();
        let mut scored: Vec<(&str, f64)> = self
            .catalog
            .scan()
            .iter()
            .zip(&self.normalized_names)
            .filter(|(entry, _)| tokens.iter().any(|t| entry.name.contains(t)))
            .filter(|(entry, _)| seen.insert(entry.name.as_str()))
            .map(|(entry, name)| (entry.name.as_str(), ratio(&normalized, name)))
            .collect();

        // stable: equal ratios stay in catalog order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .take(limit)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn suggestions(&self, raw: &str) -> MatchResult {
        let names = self.suggest(raw, self.config.suggestion_limit);
        if names.is_empty() {
            MatchResult::NotFound
        } else {
            MatchResult::Suggestions { names }
        }
    }

    fn match_deterministic(&self, raw: &str) -> Option<Resolution> {
        let normalized = normalize(raw);

        let resolution = self
            .exact_match(raw)
            .or_else(|| self.normalized_match(&normalized))
            .or_else(|| self.keyword_match(&normalized))
            .or_else(|| self.similarity_match(&normalized));

        if let Some(resolution) = &resolution {
            tracing::debug!(
                phrase = raw,
                matched = %resolution.name,
                method = %resolution.method,
                "Resolved food name"
            );
        }
        resolution
    }

    fn exact_match(&self, raw: &str) -> Option<Resolution> {
        self.catalog
            .lookup(raw)
            .map(|entry| Resolution::new(entry, MatchMethod::Exact, None))
    }

    fn normalized_match(&self, normalized: &str) -> Option<Resolution> {
        self.normalized_names
            .iter()
            .position(|name| name == normalized)
            .map(|i| Resolution::new(&self.catalog.scan()[i], MatchMethod::Normalized, None))
    }

    fn keyword_match(&self, normalized: &str) -> Option<Resolution> {
        // alias fragments are appended after their term, so a mapped term
        // weighs more than an unmapped one
        let keywords: Vec<&str> = normalized
            .split_whitespace()
            .flat_map(|term| self.aliases.expand(term))
            .collect();
        if keywords.is_empty() {
            return None;
        }

        let mut best: Option<(&FoodEntry, usize)> = None;
        for entry in self.catalog.scan() {
            let score = keywords.iter().filter(|k| entry.name.contains(**k)).count();
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((entry, score));
            }
        }

        best.map(|(entry, score)| {
            Resolution::new(entry, MatchMethod::Keyword, Some(MatchScore::Keywords(score)))
        })
    }

    fn similarity_match(&self, normalized: &str) -> Option<Resolution> {
        let mut best: Option<(usize, f64)> = None;
        for (i, name) in self.normalized_names.iter().enumerate() {
            let r = ratio(normalized, name);
            if r > best.map_or(0.0, |(_, b)| b) {
                best = Some((i, r));
            }
        }

        let (i, best_ratio) = best?;
        if best_ratio < self.config.similarity_threshold {
            tracing::debug!(
                phrase = normalized,
                best_ratio,
                threshold = self.config.similarity_threshold,
                "Best similarity below threshold"
            );
            return None;
        }

        Some(Resolution::new(
            &self.catalog.scan()[i],
            MatchMethod::Similarity,
            Some(MatchScore::Ratio(best_ratio)),
        ))
    }

    async fn assisted_match(&self, raw: &str) -> Option<Resolution> {
        if raw.trim().is_empty() {
            return None;
        }
        if !self.assist.is_available() {
            tracing::debug!(phrase = raw, "No assisted matcher configured, skipping");
            return None;
        }

        let pool = self.assist_candidates(raw);
        let presented: Vec<&str> = pool
            .into_iter()
            .take(self.config.assist_prompt_limit)
            .collect();

        let timeout = self.config.assist_timeout;
        let picked = match tokio::time::timeout(timeout, self.assist.pick(raw, &presented)).await
        {
            Ok(result) => result,
            Err(_) => Err(AssistError::TimedOut(timeout)),
        };

        let reply = match picked {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(phrase = raw, error = %e, "Assisted matching failed");
                return None;
            }
        };

        match self.accept_assisted(&reply) {
            Some(entry) => {
                tracing::info!(phrase = raw, matched = %entry.name, "Assisted match");
                Some(Resolution::new(entry, MatchMethod::Assisted, None))
            }
            None => {
                tracing::warn!(
                    phrase = raw,
                    reply = %reply,
                    "Assisted reply names no catalog entry"
                );
                None
            }
        }
    }

    /// Entries sharing a raw token with the query, or the head of the catalog
    /// when none do.
    fn assist_candidates(&self, raw: &str) -> Vec<&str> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let sharing: Vec<&str> = self
            .catalog
            .scan()
            .iter()
            .filter(|e| tokens.iter().any(|t| e.name.contains(t)))
            .map(|e| e.name.as_str())
            .collect();

        if !sharing.is_empty() {
            return sharing;
        }
        self.catalog
            .scan()
            .iter()
            .take(self.config.assist_pool_size)
            .map(|e| e.name.as_str())
            .collect()
    }

    /// The entry a reply refers to: an exact name, else the first entry that
    /// contains the reply or is contained in it.
    fn accept_assisted(&self, reply: &str) -> Option<&FoodEntry> {
        let reply = reply.trim();
        if reply.is_empty() {
            return None;
        }

        self.catalog.lookup(reply).or_else(|| {
            self.catalog.scan().iter().find(|e| {
                !e.name.is_empty() && (e.name.contains(reply) || reply.contains(e.name.as_str()))
            })
        })
    }
}
