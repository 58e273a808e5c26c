//! Identifier management using string interning for efficient storage and comparison
//!
//! This module provides the [`Id`] type with an efficient string-interner based approach.
//! Node identifiers are compared constantly during clustering, so they intern once and
//! compare as symbols afterwards.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> &'static Mutex<DefaultStringInterner> {
    INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()))
}

/// Efficient identifier type using string interning
///
/// Row labels, column labels, and node identifiers are all [`Id`] values.
/// Interning makes equality and hashing cheap while keeping the original
/// string reachable for display and substring matching.
///
/// # Examples
///
/// ```
/// use trellis_core::identifier::Id;
///
/// let gene = Id::new("ENSMUSG00000017146");
/// let phenotype = Id::new("body_weight");
///
/// assert_eq!(gene, Id::new("ENSMUSG00000017146"));
/// assert!(gene.contains("ENSMUSG"));
/// assert!(phenotype == "body_weight");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        let mut interner = interner().lock().expect("Failed to acquire interner lock");
        let symbol = interner.get_or_intern(name);
        Self(symbol)
    }

    /// Returns true if the identifier's string form contains `needle` as a substring.
    ///
    /// This is the primitive behind marker-based cluster joining: identifiers
    /// carry no semantics beyond the substrings configuration points at.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::identifier::Id;
    ///
    /// let id = Id::new("g__Bacteroides");
    /// assert!(id.contains("g__"));
    /// assert!(!id.contains("ENSMUSG"));
    /// ```
    pub fn contains(&self, needle: &str) -> bool {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        interner
            .resolve(self.0)
            .map(|s| s.contains(needle))
            .unwrap_or(false)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl std::error::Error for Id {}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner().lock().expect("Failed to acquire interner lock");
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    /// Allows direct comparison with string references: `id == &string`
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl serde::Serialize for Id {
    /// Serializes as the identifier's string form.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("body_weight");
        let id2 = Id::new("body_weight");
        let id3 = Id::new("liver_weight");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "body_weight");
    }

    #[test]
    fn test_contains() {
        let id = Id::new("ENSMUSG00000017146");

        assert!(id.contains("ENSMUSG"));
        assert!(id.contains("17146"));
        assert!(!id.contains("g__"));
        assert!(id.contains(""));
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("g__Lactobacillus");
        assert_eq!(format!("{}", id), "g__Lactobacillus");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "p1".into();
        let id2 = Id::new("p1");

        assert_eq!(id1, id2);
        assert_eq!(id1, "p1");
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("metabolite_x");

        assert!(id == "metabolite_x");
        assert!(id != "metabolite_y");

        let empty = Id::new("");
        assert!(empty == "");
        assert!(empty != "non-empty");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_copy_trait() {
        let id1 = Id::new("copy_test");
        let id2 = id1;
        let id3 = id1;

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id3, "copy_test");
    }
}
