//! Per-attribute nullify/preserve decisions.

use crate::double::policy::PolicyStore;

/// What the generator does with one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Keep the real value.
    Preserve,
    /// Replace with the strategy's sentinel.
    Nullify,
}

/// Decides the fate of attribute `name` under `policy`.
///
/// Only the untouchable set is consulted. Magic names are protected earlier,
/// when the generator folds them into the policy.
#[must_use]
pub fn classify(name: &str, policy: &PolicyStore) -> Disposition {
    if policy.is_untouchable(name) {
        Disposition::Preserve
    } else {
        Disposition::Nullify
    }
}

/// Returns true for structurally special names such as `__init__`.
///
/// A name is magic iff it starts with exactly two underscores followed by a
/// non-underscore and ends with exactly two underscores preceded by a
/// non-underscore.
#[must_use]
pub fn is_magic_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let len = bytes.len();
    if len < 4 || !name.starts_with("__") || !name.ends_with("__") {
        return false;
    }
    bytes[2] != b'_' && bytes[len - 3] != b'_'
}
