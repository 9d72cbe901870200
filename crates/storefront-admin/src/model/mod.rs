//! # Storefront Model
//!
//! Typed mirrors of the backend's records. JSON field names are camelCase
//! on the wire.
//!
//! ## Optional references
//!
//! Forms submit an unset `<select>` as `""`, and some backend records carry
//! `""` where `null` was meant. Every optional foreign key is therefore
//! handled the same way:
//!
//! - form input goes through `XxxId::parse_optional`, which maps blank to `None`
//! - responses are read with [`empty_as_none`], which maps `""` to `None`
//! - create payloads always send the key, as `null` when unset
//! - update payloads use `Option<Option<Id>>`: `None` leaves the reference
//!   alone, `Some(None)` clears it

pub mod brand;
pub mod category;
pub mod order;
pub mod post;
pub mod product;
pub mod settings;
pub mod tag;
pub mod user;

pub use brand::*;
pub use category::*;
pub use order::*;
pub use post::*;
pub use product::*;
pub use settings::*;
pub use tag::*;
pub use user::*;

use serde::{Deserialize, Deserializer};
use std::num::ParseIntError;

/// Declares `<Name>Id` newtypes over `u64`.
macro_rules! resource_ids {
    ($($name:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Type-safe identifier for ", stringify!($name), " records.")]
                #[derive(
                    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
                    serde::Serialize, serde::Deserialize,
                )]
                #[serde(transparent)]
                pub struct [<$name Id>](pub u64);

                impl [<$name Id>] {
                    /// Parses form input. Blank input means "no reference".
                    pub fn parse_optional(input: &str) -> Result<Option<Self>, ParseIntError> {
                        let input = input.trim();
                        if input.is_empty() {
                            return Ok(None);
                        }
                        input.parse().map(|id| Some(Self(id)))
                    }
                }

                impl From<u64> for [<$name Id>] {
                    fn from(id: u64) -> Self {
                        Self(id)
                    }
                }

                impl std::str::FromStr for [<$name Id>] {
                    type Err = ParseIntError;

                    fn from_str(s: &str) -> Result<Self, Self::Err> {
                        s.trim().parse().map(Self)
                    }
                }

                impl std::fmt::Display for [<$name Id>] {
                    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        write!(f, "{}", self.0)
                    }
                }
            )*
        }
    };
}

resource_ids!(Product, Post, Order, User, Brand, Category, Tag);

/// Reads an optional id that may arrive as `null`, `""`, a number or a
/// numeric string.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<u64>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(id)) => Ok(Some(T::from(id))),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text
            .trim()
            .parse::<u64>()
            .map(|id| Some(T::from(id)))
            .map_err(serde::de::Error::custom),
    }
}

/// URL slug: lowercase ASCII alphanumerics separated by single dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "empty_as_none")]
        parent_id: Option<CategoryId>,
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(CategoryId::parse_optional(""), Ok(None));
        assert_eq!(CategoryId::parse_optional("   "), Ok(None));
        assert_eq!(CategoryId::parse_optional(" 12 "), Ok(Some(CategoryId(12))));
        assert!(CategoryId::parse_optional("abc").is_err());
    }

    #[test]
    fn test_empty_string_reads_as_none() {
        let row: Row = serde_json::from_value(json!({ "parent_id": "" })).unwrap();
        assert_eq!(row.parent_id, None);
        let row: Row = serde_json::from_value(json!({ "parent_id": null })).unwrap();
        assert_eq!(row.parent_id, None);
        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.parent_id, None);
        let row: Row = serde_json::from_value(json!({ "parent_id": 4 })).unwrap();
        assert_eq!(row.parent_id, Some(CategoryId(4)));
        let row: Row = serde_json::from_value(json!({ "parent_id": "7" })).unwrap();
        assert_eq!(row.parent_id, Some(CategoryId(7)));
        assert!(serde_json::from_value::<Row>(json!({ "parent_id": "x" })).is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Summer Sale 2024!"), "summer-sale-2024");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify("***"), "");
    }
}
