//! Untouchable / touchable bookkeeping for one double type.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::double::classifier::is_magic_name;
use crate::object::STRUCTURAL_ATTRIBUTES;

/// Attribute policy of a double type.
///
/// Invariant: no name is both untouchable and explicitly touchable. Every
/// mutation removes the name from the opposite set before inserting it.
/// The structural attributes start out untouchable and stay that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStore {
    untouchable: BTreeSet<String>,
    touchable: BTreeSet<String>,
}

impl PolicyStore {
    /// Creates a policy protecting only the structural attributes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            untouchable: STRUCTURAL_ATTRIBUTES.iter().map(ToString::to_string).collect(),
            touchable: BTreeSet::new(),
        }
    }

    /// Preserves `name` on future instances.
    pub fn declare_untouchable(&mut self, name: &str) {
        self.touchable.remove(name);
        self.untouchable.insert(name.to_string());
    }

    /// Nullifies `name` on future instances, overriding the magic-name
    /// default.
    ///
    /// Ignored for structural attributes.
    pub fn declare_touchable(&mut self, name: &str) {
        if Self::is_required(name) {
            warn!(attribute = name, "ignoring request to make a structural attribute touchable");
            return;
        }
        self.untouchable.remove(name);
        self.touchable.insert(name.to_string());
    }

    /// Marks every magic name in `names` untouchable unless it was explicitly
    /// declared touchable. Returns how many names became newly protected.
    pub fn protect_magic_names<'a, I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut protected = 0;
        for name in names {
            if is_magic_name(name) && !self.touchable.contains(name) && !self.untouchable.contains(name) {
                self.declare_untouchable(name);
                protected += 1;
            }
        }
        protected
    }

    #[must_use]
    pub fn is_untouchable(&self, name: &str) -> bool {
        self.untouchable.contains(name)
    }

    #[must_use]
    pub fn is_explicitly_touchable(&self, name: &str) -> bool {
        self.touchable.contains(name)
    }

    /// Returns true for names that can never be made touchable.
    #[must_use]
    pub fn is_required(name: &str) -> bool {
        STRUCTURAL_ATTRIBUTES.contains(&name)
    }

    pub fn untouchable_names(&self) -> impl Iterator<Item = &str> {
        self.untouchable.iter().map(String::as_str)
    }

    pub fn touchable_names(&self) -> impl Iterator<Item = &str> {
        self.touchable.iter().map(String::as_str)
    }

    /// Point-in-time copy of both sets.
    #[must_use]
    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            untouchable: self.untouchable.iter().cloned().collect(),
            touchable: self.touchable.iter().cloned().collect(),
        }
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted copy of a [`PolicyStore`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub untouchable: Vec<String>,
    pub touchable: Vec<String>,
}
