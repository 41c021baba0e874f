//! Nutrient keys, raw table values and parsed nutrient profiles.
//!
//! The composition table stores values per 100 g as loosely typed cells: plain
//! numbers, blanks, "-", "Tr" (trace) and parenthesized estimates such as
//! "(12.3)". [`RawValue`] keeps the cell as loaded; [`parse_numeric`] turns it
//! into a number without ever failing.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::ops::AddAssign;

pub const NUTRIENT_COUNT: usize = 30;

/// One of the fixed set of tracked nutrients.
///
/// Declaration order is the canonical column order shared by storage and
/// computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientKey {
    Energy,
    Protein,
    Fat,
    Fiber,
    Potassium,
    Calcium,
    Magnesium,
    Phosphorus,
    Iron,
    Zinc,
    Copper,
    Manganese,
    Iodine,
    Selenium,
    Chromium,
    Molybdenum,
    VitaminA,
    VitaminD,
    VitaminE,
    VitaminK,
    VitaminB1,
    VitaminB2,
    Niacin,
    VitaminB6,
    VitaminB12,
    Folate,
    PantothenicAcid,
    Biotin,
    VitaminC,
    Salt,
}

impl NutrientKey {
    pub const ALL: [NutrientKey; NUTRIENT_COUNT] = [
        NutrientKey::Energy,
        NutrientKey::Protein,
        NutrientKey::Fat,
        NutrientKey::Fiber,
        NutrientKey::Potassium,
        NutrientKey::Calcium,
        NutrientKey::Magnesium,
        NutrientKey::Phosphorus,
        NutrientKey::Iron,
        NutrientKey::Zinc,
        NutrientKey::Copper,
        NutrientKey::Manganese,
        NutrientKey::Iodine,
        NutrientKey::Selenium,
        NutrientKey::Chromium,
        NutrientKey::Molybdenum,
        NutrientKey::VitaminA,
        NutrientKey::VitaminD,
        NutrientKey::VitaminE,
        NutrientKey::VitaminK,
        NutrientKey::VitaminB1,
        NutrientKey::VitaminB2,
        NutrientKey::Niacin,
        NutrientKey::VitaminB6,
        NutrientKey::VitaminB12,
        NutrientKey::Folate,
        NutrientKey::PantothenicAcid,
        NutrientKey::Biotin,
        NutrientKey::VitaminC,
        NutrientKey::Salt,
    ];

    /// Position in [`NutrientKey::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Field name used for this nutrient in the composition table records.
    pub fn label(self) -> &'static str {
        match self {
            NutrientKey::Energy => "エネルギー",
            NutrientKey::Protein => "たんぱく質",
            NutrientKey::Fat => "脂質",
            NutrientKey::Fiber => "食物繊維総量",
            NutrientKey::Potassium => "カリウム",
            NutrientKey::Calcium => "カルシウム",
            NutrientKey::Magnesium => "マグネシウム",
            NutrientKey::Phosphorus => "リン",
            NutrientKey::Iron => "鉄",
            NutrientKey::Zinc => "亜鉛",
            NutrientKey::Copper => "銅",
            NutrientKey::Manganese => "マンガン",
            NutrientKey::Iodine => "ヨウ素",
            NutrientKey::Selenium => "セレン",
            NutrientKey::Chromium => "クロム",
            NutrientKey::Molybdenum => "モリブデン",
            NutrientKey::VitaminA => "ビタミンA",
            NutrientKey::VitaminD => "ビタミンD",
            NutrientKey::VitaminE => "ビタミンE",
            NutrientKey::VitaminK => "ビタミンK",
            NutrientKey::VitaminB1 => "ビタミンB1",
            NutrientKey::VitaminB2 => "ビタミンB2",
            NutrientKey::Niacin => "ナイアシン",
            NutrientKey::VitaminB6 => "ビタミンB6",
            NutrientKey::VitaminB12 => "ビタミンB12",
            NutrientKey::Folate => "葉酸",
            NutrientKey::PantothenicAcid => "パントテン酸",
            NutrientKey::Biotin => "ビオチン",
            NutrientKey::VitaminC => "ビタミンC",
            NutrientKey::Salt => "食塩相当量",
        }
    }

    /// Stable snake_case identifier (matches the serialized form).
    pub fn id(self) -> &'static str {
        match self {
            NutrientKey::Energy => "energy",
            NutrientKey::Protein => "protein",
            NutrientKey::Fat => "fat",
            NutrientKey::Fiber => "fiber",
            NutrientKey::Potassium => "potassium",
            NutrientKey::Calcium => "calcium",
            NutrientKey::Magnesium => "magnesium",
            NutrientKey::Phosphorus => "phosphorus",
            NutrientKey::Iron => "iron",
            NutrientKey::Zinc => "zinc",
            NutrientKey::Copper => "copper",
            NutrientKey::Manganese => "manganese",
            NutrientKey::Iodine => "iodine",
            NutrientKey::Selenium => "selenium",
            NutrientKey::Chromium => "chromium",
            NutrientKey::Molybdenum => "molybdenum",
            NutrientKey::VitaminA => "vitamin_a",
            NutrientKey::VitaminD => "vitamin_d",
            NutrientKey::VitaminE => "vitamin_e",
            NutrientKey::VitaminK => "vitamin_k",
            NutrientKey::VitaminB1 => "vitamin_b1",
            NutrientKey::VitaminB2 => "vitamin_b2",
            NutrientKey::Niacin => "niacin",
            NutrientKey::VitaminB6 => "vitamin_b6",
            NutrientKey::VitaminB12 => "vitamin_b12",
            NutrientKey::Folate => "folate",
            NutrientKey::PantothenicAcid => "pantothenic_acid",
            NutrientKey::Biotin => "biotin",
            NutrientKey::VitaminC => "vitamin_c",
            NutrientKey::Salt => "salt",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            NutrientKey::Energy => "kcal",
            NutrientKey::Protein | NutrientKey::Fat | NutrientKey::Fiber | NutrientKey::Salt => {
                "g"
            }
            NutrientKey::Iodine
            | NutrientKey::Selenium
            | NutrientKey::Chromium
            | NutrientKey::Molybdenum
            | NutrientKey::VitaminA
            | NutrientKey::VitaminD
            | NutrientKey::VitaminK
            | NutrientKey::VitaminB12
            | NutrientKey::Folate
            | NutrientKey::Biotin => "µg",
            _ => "mg",
        }
    }

    /// Daily intake target, in [`NutrientKey::unit`].
    pub fn daily_target(self) -> f64 {
        match self {
            NutrientKey::Energy => 2700.0,
            NutrientKey::Protein => 70.0,
            NutrientKey::Fat => 62.0,
            NutrientKey::Fiber => 22.0,
            NutrientKey::Potassium => 2500.0,
            NutrientKey::Calcium => 750.0,
            NutrientKey::Magnesium => 370.0,
            NutrientKey::Phosphorus => 1000.0,
            NutrientKey::Iron => 7.5,
            NutrientKey::Zinc => 11.0,
            NutrientKey::Copper => 0.9,
            NutrientKey::Manganese => 4.0,
            NutrientKey::Iodine => 130.0,
            NutrientKey::Selenium => 30.0,
            NutrientKey::Chromium => 10.0,
            NutrientKey::Molybdenum => 30.0,
            NutrientKey::VitaminA => 600.0,
            NutrientKey::VitaminD => 8.5,
            NutrientKey::VitaminE => 7.0,
            NutrientKey::VitaminK => 150.0,
            NutrientKey::VitaminB1 => 1.4,
            NutrientKey::VitaminB2 => 1.6,
            NutrientKey::Niacin => 17.0,
            NutrientKey::VitaminB6 => 1.4,
            NutrientKey::VitaminB12 => 2.4,
            NutrientKey::Folate => 240.0,
            NutrientKey::PantothenicAcid => 5.0,
            NutrientKey::Biotin => 50.0,
            NutrientKey::VitaminC => 100.0,
            NutrientKey::Salt => 1.5,
        }
    }

    /// Look up a key by its table field label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }
}

// =============================================================================
// Raw values
// =============================================================================

/// A nutrient cell as it appears in the composition table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    /// The record has no field for this nutrient.
    #[default]
    Missing,
    /// The field is present but null.
    Empty,
    Number(f64),
    Text(String),
}

impl From<&serde_json::Value> for RawValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Empty,
            serde_json::Value::Number(n) => RawValue::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => RawValue::Text(s.clone()),
            other => RawValue::Text(other.to_string()),
        }
    }
}

/// Parse a raw cell to a number. Total: anything unparseable is 0.0.
///
/// Rules, in order: missing, null, `""` and `"-"` are 0; `"tr"`, `"trace"` and
/// `"(tr)"` (any case) are 0; otherwise parentheses are removed and the rest is
/// parsed as a float. Non-finite results are 0.
pub fn parse_numeric(raw: &RawValue) -> f64 {
    match raw {
        RawValue::Missing | RawValue::Empty => 0.0,
        RawValue::Number(n) => finite_or_zero(*n),
        RawValue::Text(s) => parse_text(s),
    }
}

fn parse_text(s: &str) -> f64 {
    if s.is_empty() || s == "-" {
        return 0.0;
    }

    let lower = s.to_lowercase();
    if matches!(lower.as_str(), "tr" | "trace" | "(tr)") {
        return 0.0;
    }

    let stripped: String = s.chars().filter(|c| !matches!(c, '(' | ')')).collect();
    stripped
        .trim()
        .parse::<f64>()
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

// =============================================================================
// Per-entry values and parsed profiles
// =============================================================================

/// Raw nutrient cells of one table entry, one per [`NutrientKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientValues {
    cells: [RawValue; NUTRIENT_COUNT],
}

impl Default for NutrientValues {
    fn default() -> Self {
        Self {
            cells: std::array::from_fn(|_| RawValue::Missing),
        }
    }
}

impl NutrientValues {
    pub fn get(&self, key: NutrientKey) -> &RawValue {
        &self.cells[key.index()]
    }

    pub fn set(&mut self, key: NutrientKey, value: RawValue) {
        self.cells[key.index()] = value;
    }

    /// Builder-style [`NutrientValues::set`].
    pub fn with(mut self, key: NutrientKey, value: RawValue) -> Self {
        self.set(key, value);
        self
    }

    /// Parsed value per 100 g.
    pub fn amount(&self, key: NutrientKey) -> f64 {
        parse_numeric(self.get(key))
    }

    /// Keys whose field was absent from the source record.
    pub fn missing_keys(&self) -> impl Iterator<Item = NutrientKey> + '_ {
        NutrientKey::ALL
            .into_iter()
            .filter(|k| matches!(self.get(*k), RawValue::Missing))
    }
}

/// Parsed nutrient amounts, one per [`NutrientKey`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientProfile {
    amounts: [f64; NUTRIENT_COUNT],
}

impl Default for NutrientProfile {
    fn default() -> Self {
        Self {
            amounts: [0.0; NUTRIENT_COUNT],
        }
    }
}

impl NutrientProfile {
    /// Amounts for `grams` of a food whose table values are per 100 g.
    pub fn per_weight(values: &NutrientValues, grams: f64) -> Self {
        let factor = grams / 100.0;
        Self {
            amounts: std::array::from_fn(|i| values.amount(NutrientKey::ALL[i]) * factor),
        }
    }

    pub fn get(&self, key: NutrientKey) -> f64 {
        self.amounts[key.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        NutrientKey::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    /// Percentage of each daily target covered, rounded to one decimal.
    pub fn fulfillment_rates(&self) -> NutrientProfile {
        Self {
            amounts: std::array::from_fn(|i| {
                let target = NutrientKey::ALL[i].daily_target();
                if target > 0.0 {
                    (self.amounts[i] / target * 1000.0).round() / 10.0
                } else {
                    0.0
                }
            }),
        }
    }
}

impl AddAssign<&NutrientProfile> for NutrientProfile {
    fn add_assign(&mut self, other: &NutrientProfile) {
        for (total, amount) in self.amounts.iter_mut().zip(other.amounts) {
            *total += amount;
        }
    }
}

impl Serialize for NutrientProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUTRIENT_COUNT))?;
        for (key, amount) in self.iter() {
            map.serialize_entry(key.id(), &amount)?;
        }
        map.end()
    }
}
