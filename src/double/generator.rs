//! Double generation.
//!
//! A [`DoubleClass`] pairs a generated class with the [`DoubleConstruction`]
//! strategy that builds its instances: construct through the base's chain,
//! enumerate the result, fold magic names into the policy, then overwrite
//! every attribute the policy does not protect.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::class::Class;
use crate::construction::{resolve_chain, ConstructionStrategy};
use crate::double::classifier::{classify, Disposition};
use crate::double::config::DoubleConfig;
use crate::double::policy::{PolicySnapshot, PolicyStore};
use crate::error::{DoubleError, DoubleResult};
use crate::object::ObjectRef;
use crate::reflect;
use crate::value::{Function, Value};

/// How nullified attributes are replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullification {
    /// Plain null field; reading yields `Value::Null`, calling fails.
    #[default]
    NullValue,
    /// Bound method accepting any arguments and returning `Value::Null`.
    NoOpCallable,
}

impl Nullification {
    fn sentinel(self, instance: &ObjectRef, name: &str) -> Value {
        match self {
            Self::NullValue => Value::Null,
            Self::NoOpCallable => {
                Value::Method(Function::new(name, |_, _| Ok(Value::Null)).bind(instance))
            }
        }
    }
}

/// Construction strategy of a generated double class.
#[derive(Debug)]
pub struct DoubleConstruction {
    base_chain: Arc<dyn ConstructionStrategy>,
    strategy: Nullification,
    policy: RwLock<PolicyStore>,
}

impl DoubleConstruction {
    fn new(base_chain: Arc<dyn ConstructionStrategy>, strategy: Nullification) -> Self {
        Self {
            base_chain,
            strategy,
            policy: RwLock::new(PolicyStore::new()),
        }
    }

    fn policy(&self) -> DoubleResult<RwLockReadGuard<'_, PolicyStore>> {
        self.policy.read().map_err(|_| DoubleError::internal("poisoned lock: double policy"))
    }

    fn policy_mut(&self) -> DoubleResult<RwLockWriteGuard<'_, PolicyStore>> {
        self.policy.write().map_err(|_| DoubleError::internal("poisoned lock: double policy"))
    }
}

impl ConstructionStrategy for DoubleConstruction {
    fn construct(&self, class: &Arc<Class>, args: &[Value]) -> DoubleResult<ObjectRef> {
        let instance = self.base_chain.construct(class, args)?;
        let names = reflect::list_attribute_names(&instance)?;

        let doomed: Vec<&str> = {
            let mut policy = self.policy_mut()?;
            policy.protect_magic_names(names.iter().map(String::as_str));
            names
                .iter()
                .map(String::as_str)
                .filter(|name| classify(name, &policy) == Disposition::Nullify)
                .collect()
        };

        for name in &doomed {
            trace!(class = class.name(), attribute = *name, "nullify");
            reflect::set_attribute(&instance, name, self.strategy.sentinel(&instance, name))?;
        }

        debug!(
            class = class.name(),
            object = %instance.id(),
            strategy = ?self.strategy,
            nullified = doomed.len(),
            preserved = names.len() - doomed.len(),
            "instantiated double"
        );

        Ok(instance)
    }
}

/// A generated double type.
///
/// # Examples
///
/// ```
/// use doppelganger::{Class, DoubleClass, Value};
///
/// let real = Class::builder("TrueClass")
///     .member("member", 0)
///     .method("method", |_this, _args| Ok(Value::from("lol")))
///     .build();
///
/// let double = DoubleClass::doppel(&real);
/// double.declare_untouchable("method").unwrap();
///
/// let fake = double.instantiate(&[]).unwrap();
/// assert!(fake.get("member").unwrap().is_null());
/// assert_eq!(fake.call("method", &[]).unwrap(), Value::from("lol"));
/// ```
#[derive(Debug, Clone)]
pub struct DoubleClass {
    base: Arc<Class>,
    class: Arc<Class>,
    construction: Arc<DoubleConstruction>,
}

impl DoubleClass {
    /// Generates a double of `base` using `strategy`.
    #[must_use]
    pub fn new(base: &Arc<Class>, strategy: Nullification) -> Self {
        let construction = Arc::new(DoubleConstruction::new(resolve_chain(base), strategy));
        let class = Class::builder(base.name())
            .extends(base)
            .construction(Arc::clone(&construction) as Arc<dyn ConstructionStrategy>)
            .build();

        Self {
            base: Arc::clone(base),
            class,
            construction,
        }
    }

    /// Generates a null-value double of `base`.
    #[must_use]
    pub fn doppel(base: &Arc<Class>) -> Self {
        Self::new(base, Nullification::NullValue)
    }

    /// Generates a no-op-callable double of `base`.
    #[must_use]
    pub fn mock(base: &Arc<Class>) -> Self {
        Self::new(base, Nullification::NoOpCallable)
    }

    /// Generates a double of `base` and applies `config`'s declarations.
    pub fn from_config(base: &Arc<Class>, config: &DoubleConfig) -> DoubleResult<Self> {
        let double = Self::new(base, config.strategy);
        config.apply(&mut *double.construction.policy_mut()?);
        Ok(double)
    }

    /// The class being doubled.
    #[must_use]
    pub const fn base(&self) -> &Arc<Class> {
        &self.base
    }

    /// The generated class. Instantiating it (directly or through a
    /// subclass) runs the double pipeline.
    #[must_use]
    pub const fn class(&self) -> &Arc<Class> {
        &self.class
    }

    #[must_use]
    pub fn strategy(&self) -> Nullification {
        self.construction.strategy
    }

    /// Preserves `name` on instances built from now on.
    pub fn declare_untouchable(&self, name: &str) -> DoubleResult<()> {
        self.construction.policy_mut()?.declare_untouchable(name);
        Ok(())
    }

    /// Nullifies `name` on instances built from now on, even if it is magic.
    pub fn declare_touchable(&self, name: &str) -> DoubleResult<()> {
        self.construction.policy_mut()?.declare_touchable(name);
        Ok(())
    }

    /// Current policy.
    pub fn policy(&self) -> DoubleResult<PolicySnapshot> {
        Ok(self.construction.policy()?.snapshot())
    }

    /// Builds a double instance.
    pub fn instantiate(&self, args: &[Value]) -> DoubleResult<ObjectRef> {
        Class::instantiate(&self.class, args)
    }
}

/// Generates a double of `base` using `strategy`.
#[must_use]
pub fn make_double_type(base: &Arc<Class>, strategy: Nullification) -> DoubleClass {
    DoubleClass::new(base, strategy)
}
