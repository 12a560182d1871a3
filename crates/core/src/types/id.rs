//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_string_id!` macro to create type-safe ID wrappers that
//! prevent accidentally mixing IDs from different entity types. Catalog and
//! account identifiers are opaque strings assigned by the backend, so the
//! wrappers hold a `String` rather than a numeric key.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use rouse_core::define_string_id;
/// define_string_id!(ProductId);
/// define_string_id!(AccountId);
///
/// let product_id = ProductId::new("concha-vainilla");
/// let account_id = AccountId::new("acct_123");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = account_id;
/// ```
#[macro_export]
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

define_string_id!(ProductId);
define_string_id!(AccountId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_string_wrappers() {
        let product_id = ProductId::new("croissant");
        assert_eq!(product_id.as_str(), "croissant");
        assert_eq!(product_id.to_string(), "croissant");

        let account_id = AccountId::from("acct_42");
        assert_eq!(account_id.into_inner(), "acct_42");
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = ProductId::new("pastel-tres-leches");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"pastel-tres-leches\"");

        let back: ProductId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
