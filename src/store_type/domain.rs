//! Core store domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A validated, non-empty store name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct StoreName(String);

impl StoreName {
    /// Create a store name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyStoreName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyStoreName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a store name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for StoreName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for StoreName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreName::new(s)
    }
}

impl Display for StoreName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a store.
pub type StoreId = i64;

/// A kind of store an item may be bought at.
///
/// Two stores are the same store only if their IDs match, names are display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct StoreType {
    /// The ID of the store.
    pub id: StoreId,
    /// The unique name of the store.
    pub name: StoreName,
}
