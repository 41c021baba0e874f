//! Curated aliases from everyday food words to food composition table keywords.
//!
//! People write "納豆" or "ご飯"; the reference table calls those entries
//! "だいず　［納豆類］　糸引き納豆" and "こめ　［水稲めし］　精白米　うるち米".
//! This crate holds the hand-maintained bridge between the two vocabularies.
//!
//! # Example
//!
//! ```
//! use food_aliases::AliasTable;
//!
//! let aliases = AliasTable::builtin();
//! assert_eq!(aliases.expand("ご飯"), vec!["ご飯", "めし", "精白米", "うるち米"]);
//! assert_eq!(aliases.expand("unknown"), vec!["unknown"]);
//! ```

mod alias_table;

pub use alias_table::{AliasError, AliasTable};
