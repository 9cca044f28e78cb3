//! Entity identifiers backed by a global string interner.
//!
//! Relationship graphs refer to the same entity from many places (node map,
//! edge endpoints, cluster membership, position map). [`Id`] keeps those
//! references `Copy` and cheap to hash while still resolving back to the
//! original string for display and serialization.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for entity identifiers.
///
/// # Thread Safety
///
/// Access is serialized through a `Mutex`; the interner is append-only, so a
/// symbol handed out once stays valid for the life of the process.
///
/// # Memory
///
/// Strings are never freed. A long-running host that lays out many graphs
/// with changing ids keeps every distinct id string it has ever seen; watch
/// [`Id::interned_count`] if that matters.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned identifier of a graph entity.
///
/// Two ids compare equal exactly when their strings are equal. Ordering of
/// ids is never used for layout decisions; anything order-sensitive iterates
/// in input order instead.
///
/// # Examples
///
/// ```
/// use constellation_core::identifier::Id;
///
/// let a = Id::new("notes/alpha.md");
/// let b: Id = "notes/alpha.md".into();
/// assert_eq!(a, b);
/// assert_eq!(a, "notes/alpha.md");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string, interning it if needed.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Number of distinct strings interned so far in this process.
    ///
    /// Never decreases.
    pub fn interned_count() -> usize {
        interner().len()
    }

    /// Returns the identifier's string as an owned `String`.
    pub fn to_owned_string(self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let value = interner.resolve(self.0).unwrap_or_default();
        f.write_str(value)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_owned_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}
