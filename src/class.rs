//! Classes: named member tables with single inheritance.
//!
//! A class owns its class-level members (data values and [`Function`]s) and
//! optionally a customized [`ConstructionStrategy`]. Instances created from a
//! class see every member along the parent chain.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::construction::{self, ConstructionStrategy};
use crate::error::DoubleResult;
use crate::object::ObjectRef;
use crate::value::{Function, Value};

/// Name of the member run by plain construction.
pub const INITIALIZER: &str = "__init__";

/// A class definition.
///
/// # Examples
///
/// ```
/// use doppelganger::{Class, Value};
///
/// let class = Class::builder("TrueClass")
///     .member("member", 0)
///     .method("method", |_this, _args| Ok(Value::from("lol")))
///     .build();
///
/// let instance = Class::instantiate(&class, &[]).unwrap();
/// assert_eq!(instance.call("method", &[]).unwrap(), Value::from("lol"));
/// ```
pub struct Class {
    name: String,
    parent: Option<Arc<Class>>,
    members: BTreeMap<String, Value>,
    construction: Option<Arc<dyn ConstructionStrategy>>,
}

impl Class {
    /// Starts building a class called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// Members defined directly on this class.
    pub fn own_members(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves `name` along the class chain, nearest definition first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.ancestry().find_map(|class| class.members.get(name))
    }

    /// Names of every member visible through this class, inherited included.
    #[must_use]
    pub fn member_names(&self) -> BTreeSet<String> {
        self.ancestry()
            .flat_map(|class| class.members.keys().cloned())
            .collect()
    }

    /// The nearest customized construction strategy along the class chain.
    ///
    /// Subclasses inherit their parent's strategy, so a class derived from a
    /// double is built the way the double is.
    #[must_use]
    pub fn customized_construction(&self) -> Option<&Arc<dyn ConstructionStrategy>> {
        self.ancestry().find_map(|class| class.construction.as_ref())
    }

    /// Returns true if `self` is `other` or derives from it.
    #[must_use]
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestry().any(|class| std::ptr::eq(class, other))
    }

    /// Builds a new instance of `class` through its construction chain.
    pub fn instantiate(class: &Arc<Class>, args: &[Value]) -> DoubleResult<ObjectRef> {
        construction::resolve_chain(class).construct(class, args)
    }

    fn ancestry(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |class| class.parent.as_deref())
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .field("construction", &self.construction)
            .finish()
    }
}

/// Builder for [`Class`].
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    parent: Option<Arc<Class>>,
    members: BTreeMap<String, Value>,
    construction: Option<Arc<dyn ConstructionStrategy>>,
}

impl ClassBuilder {
    /// Creates a builder for a class with no members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            members: BTreeMap::new(),
            construction: None,
        }
    }

    /// Sets the parent class.
    #[must_use]
    pub fn extends(mut self, parent: &Arc<Class>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Adds a class-level member.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> DoubleResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let function = Function::new(name.clone(), body);
        self.member(name, function)
    }

    /// Adds the `__init__` method run by plain construction.
    #[must_use]
    pub fn initializer<F>(self, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> DoubleResult<Value> + Send + Sync + 'static,
    {
        self.method(INITIALIZER, body)
    }

    /// Declares a customized construction strategy.
    #[must_use]
    pub fn construction(mut self, strategy: Arc<dyn ConstructionStrategy>) -> Self {
        self.construction = Some(strategy);
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<Class> {
        Arc::new(Class {
            name: self.name,
            parent: self.parent,
            members: self.members,
            construction: self.construction,
        })
    }
}
