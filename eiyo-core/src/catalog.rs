//! In-memory food composition table.
//!
//! The catalog is loaded once and never mutated. Entries keep their load order;
//! every scan and every tie-break in the matcher depends on it.

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::CatalogError;
use crate::nutrients::{NutrientKey, NutrientProfile, NutrientValues, RawValue};

/// Field holding the canonical name in catalog records.
pub const NAME_FIELD: &str = "食品名";

/// One row of the composition table. Nutrient values are per 100 g.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodEntry {
    pub name: String,
    pub nutrients: NutrientValues,
}

impl FoodEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nutrients: NutrientValues::default(),
        }
    }

    pub fn with_nutrient(mut self, key: NutrientKey, value: RawValue) -> Self {
        self.nutrients.set(key, value);
        self
    }

    /// Nutrient amounts for `grams` of this food.
    pub fn profile_for(&self, grams: f64) -> NutrientProfile {
        NutrientProfile::per_weight(&self.nutrients, grams)
    }

    fn from_record(index: usize, record: &Map<String, Value>) -> Result<Self, CatalogError> {
        let name = record
            .get(NAME_FIELD)
            .and_then(Value::as_str)
            .ok_or(CatalogError::MalformedEntry {
                index,
                field: NAME_FIELD,
            })?;

        let mut nutrients = NutrientValues::default();
        for (field, value) in record {
            if let Some(key) = NutrientKey::from_label(field) {
                nutrients.set(key, RawValue::from(value));
            }
        }

        Ok(Self {
            name: name.to_string(),
            nutrients,
        })
    }
}

/// Ordered, read-only sequence of [`FoodEntry`].
///
/// Duplicate names are allowed; [`Catalog::lookup`] returns the first.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<FoodEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<FoodEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of flat records.
    ///
    /// Every record needs a string [`NAME_FIELD`]; a record without one makes
    /// the whole catalog invalid. Unknown fields are ignored and absent
    /// nutrient fields load as [`RawValue::Missing`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<Map<String, Value>> = serde_json::from_str(json)?;

        let entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| FoodEntry::from_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Load a catalog file (see [`Catalog::from_json`]).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            entries = catalog.len(),
            incomplete = catalog.incomplete_entries(),
            "Loaded food catalog"
        );
        Ok(catalog)
    }

    /// Number of entries with at least one nutrient field absent. Absent
    /// fields count as 0 in every calculation.
    pub fn incomplete_entries(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.nutrients.missing_keys().next().is_some())
            .count()
    }

    /// All entries in load order.
    pub fn scan(&self) -> &[FoodEntry] {
        &self.entries
    }

    /// First entry whose name equals `name` exactly.
    pub fn lookup(&self, name: &str) -> Option<&FoodEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<FoodEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = FoodEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
