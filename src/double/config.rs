//! Declarative double configuration.

use serde::{Deserialize, Serialize};

use crate::double::generator::Nullification;
use crate::double::policy::PolicyStore;
use crate::error::DoubleResult;

/// Strategy and policy declarations for one double type.
///
/// ```
/// use doppelganger::{DoubleConfig, Nullification};
///
/// let config = DoubleConfig::from_json(
///     r#"{"strategy": "no_op_callable", "untouchable": ["member"]}"#,
/// ).unwrap();
/// assert_eq!(config.strategy, Nullification::NoOpCallable);
/// assert_eq!(config.untouchable, vec!["member".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoubleConfig {
    /// How nullified attributes are replaced.
    pub strategy: Nullification,
    /// Names to preserve.
    pub untouchable: Vec<String>,
    /// Names to nullify even when magic.
    pub touchable: Vec<String>,
}

impl DoubleConfig {
    /// Creates an empty configuration for `strategy`.
    #[must_use]
    pub fn new(strategy: Nullification) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> DoubleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds an untouchable name.
    #[must_use]
    pub fn untouchable(mut self, name: impl Into<String>) -> Self {
        self.untouchable.push(name.into());
        self
    }

    /// Adds an explicitly touchable name.
    #[must_use]
    pub fn touchable(mut self, name: impl Into<String>) -> Self {
        self.touchable.push(name.into());
        self
    }

    /// Applies the declarations to `policy`. Touchable names go first, so a
    /// name listed in both ends up untouchable.
    pub(crate) fn apply(&self, policy: &mut PolicyStore) {
        for name in &self.touchable {
            policy.declare_touchable(name);
        }
        for name in &self.untouchable {
            policy.declare_untouchable(name);
        }
    }
}
