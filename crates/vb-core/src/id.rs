//! Element identifiers.
//!
//! Every id that ever reaches a store passes through one process-wide
//! interner, so an id string the interner has never seen cannot collide
//! with any element anywhere. `ElementId::mint` relies on that.

use lasso::{Spur, ThreadedRodeo};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static IDS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Suffix counter shared by all kinds; ids read `text_0`, `shape_1`, ...
static NEXT_SUFFIX: AtomicU64 = AtomicU64::new(0);

/// Interned element identifier: 4 bytes, `Copy`, O(1) compare and hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(Spur);

impl ElementId {
    /// The id for `s`, interning it on first use.
    pub fn intern(s: &str) -> Self {
        ElementId(IDS.get_or_intern(s))
    }

    /// The id for `s` only if something already interned it.
    pub fn existing(s: &str) -> Option<Self> {
        IDS.get(s).map(ElementId)
    }

    pub fn as_str(&self) -> &str {
        IDS.resolve(&self.0)
    }

    /// Mint `{prefix}_{n}` for the first `n` whose string was never
    /// interned, so the result is absent from every store.
    pub fn mint(prefix: &str) -> Self {
        loop {
            let n = NEXT_SUFFIX.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            if !IDS.contains(&candidate) {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct ElementIdVisitor;

impl Visitor<'_> for ElementIdVisitor {
    type Value = ElementId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-empty element id string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ElementId, E> {
        if v.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(ElementId::intern(v))
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ElementIdVisitor)
    }
}
