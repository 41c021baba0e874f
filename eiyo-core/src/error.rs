use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Catalog record {index} has no \"{field}\" string field")]
    MalformedEntry { index: usize, field: &'static str },
}

/// The one user-visible failure: no entry could be found for a phrase.
///
/// Carries the few closest names, if any, as hints.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("No match for \"{phrase}\"{}", hint_suffix(.suggestions))]
pub struct ResolutionMiss {
    pub phrase: String,
    pub suggestions: Vec<String>,
}

fn hint_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}
