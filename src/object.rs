//! Instances and attribute dispatch.
//!
//! An [`ObjectRef`] is a shared handle to one instance: a stable
//! [`ObjectId`], the class it was built from, and its own attribute
//! dictionary. Attribute reads check the instance dictionary before the class
//! chain, so anything written on the instance (a nullified member, a patched
//! method) overrides the class definition.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::class::Class;
use crate::error::{AttributeError, DoubleError, DoubleResult};
use crate::value::Value;

/// Attribute exposing the instance's class.
pub const CLASS_ATTRIBUTE: &str = "__class__";

/// Attribute exposing the names held in the instance's own dictionary.
pub const DICT_ATTRIBUTE: &str = "__dict__";

/// Attributes every instance carries regardless of its class.
pub const STRUCTURAL_ATTRIBUTES: [&str; 2] = [CLASS_ATTRIBUTE, DICT_ATTRIBUTE];

/// Stable identity of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Creates a new random object ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn lock_err(context: &'static str) -> DoubleError {
    DoubleError::internal(format!("poisoned lock: {context}"))
}

struct ObjectCell {
    id: ObjectId,
    class: Arc<Class>,
    attributes: RwLock<BTreeMap<String, Value>>,
}

/// Shared handle to an instance.
///
/// Cloning the handle does not copy the instance. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectCell>);

impl ObjectRef {
    /// Allocates an instance of `class` with an empty attribute dictionary.
    ///
    /// No initializer runs; see [`crate::PlainConstruction`].
    #[must_use]
    pub fn allocate(class: &Arc<Class>) -> Self {
        Self(Arc::new(ObjectCell {
            id: ObjectId::new(),
            class: Arc::clone(class),
            attributes: RwLock::new(BTreeMap::new()),
        }))
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    #[must_use]
    pub fn class(&self) -> &Arc<Class> {
        &self.0.class
    }

    /// Returns true if this instance's class is `class` or derives from it.
    #[must_use]
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.0.class.is_subclass_of(class)
    }

    /// Resolves an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::NoSuchAttribute`] when neither the instance
    /// nor its class chain defines `name`.
    pub fn get(&self, name: &str) -> DoubleResult<Value> {
        match name {
            CLASS_ATTRIBUTE => return Ok(Value::Class(Arc::clone(&self.0.class))),
            DICT_ATTRIBUTE => {
                let names = self.own_attribute_names()?;
                return Ok(Value::List(names.into_iter().map(Value::String).collect()));
            }
            _ => {}
        }

        {
            let guard = self.0.attributes.read().map_err(|_| lock_err("object attributes"))?;
            if let Some(value) = guard.get(name) {
                return Ok(value.clone());
            }
        }

        match self.0.class.lookup(name) {
            Some(Value::Function(function)) => Ok(Value::Method(function.bind(self))),
            Some(value) => Ok(value.clone()),
            None => Err(AttributeError::NoSuchAttribute {
                class: self.0.class.name().to_string(),
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Returns true if `name` resolves on this instance.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Writes `value` into the instance's own dictionary.
    ///
    /// # Errors
    ///
    /// Structural attributes are read-only.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> DoubleResult<()> {
        if STRUCTURAL_ATTRIBUTES.contains(&name) {
            return Err(AttributeError::ReadOnly {
                class: self.0.class.name().to_string(),
                name: name.to_string(),
            }
            .into());
        }

        let mut guard = self.0.attributes.write().map_err(|_| lock_err("object attributes"))?;
        guard.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Resolves `name` and calls it with `args`.
    ///
    /// The attribute is cloned out before the call, so the callee may freely
    /// read or write attributes of this instance.
    pub fn call(&self, name: &str, args: &[Value]) -> DoubleResult<Value> {
        self.get(name)?.call(args)
    }

    /// Names held in the instance's own dictionary.
    pub fn own_attribute_names(&self) -> DoubleResult<Vec<String>> {
        let guard = self.0.attributes.read().map_err(|_| lock_err("object attributes"))?;
        Ok(guard.keys().cloned().collect())
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakObjectRef {
        WeakObjectRef(Arc::downgrade(&self.0))
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &self.0.id)
            .field("class", &self.0.class.name())
            .finish()
    }
}

/// Non-owning handle to an instance.
#[derive(Clone)]
pub struct WeakObjectRef(Weak<ObjectCell>);

impl WeakObjectRef {
    #[must_use]
    pub fn upgrade(&self) -> Option<ObjectRef> {
        self.0.upgrade().map(ObjectRef)
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl fmt::Debug for WeakObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakObjectRef")
            .field(&self.upgrade().map(|r| r.id()))
            .finish()
    }
}
