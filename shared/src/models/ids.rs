//! Record identifiers
//!
//! The backend is loose about id encodings: the same id may arrive as `12`,
//! `12.0` or `"12"`, and legacy rows carry non-numeric placeholders. Ids are
//! therefore kept as their string form and checked with `is_numeric()` before
//! they are used in a mutating request.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether this id may be sent to a mutating endpoint
            pub fn is_numeric(&self) -> bool {
                crate::util::is_numeric_id(&self.0)
            }

            /// Integral value of a numeric id
            pub fn as_number(&self) -> Option<i64> {
                self.0.trim().parse().ok()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.trim())
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor).map(Self)
            }
        }
    };
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or numeric id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        if v.fract() == 0.0 && v.abs() < 9.007_199_254_740_992e15 {
            Ok(format!("{}", v as i64))
        } else {
            Ok(v.to_string())
        }
    }
}

string_id!(
    /// Product identity (`Product.id`)
    ProductId
);
string_id!(
    /// Backend image identity, as returned by the upload endpoint
    ImageId
);
string_id!(
    /// User identity (`/api/users`)
    UserId
);
string_id!(
    /// Category identity
    CategoryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_number_or_string() {
        let ids: Vec<ProductId> = serde_json::from_str(r#"[1, "2", 3.0, "legacy-x"]"#).unwrap();
        assert_eq!(
            ids,
            vec![
                ProductId::from("1"),
                ProductId::from("2"),
                ProductId::from("3"),
                ProductId::from("legacy-x"),
            ]
        );
        assert!(ids[2].is_numeric());
        assert!(!ids[3].is_numeric());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&ImageId::from(42)).unwrap();
        assert_eq!(json, r#""42""#);
    }
}
