//! Construction chains.
//!
//! A [`ConstructionStrategy`] is what actually builds an instance of a class.
//! Most classes use [`PlainConstruction`]; a class that declares its own
//! strategy (every generated double does) is built through it, and so is any
//! class deriving from it. Double strategies wrap the strategy of the class
//! they double, so nested doubles compose instead of flattening.

use std::fmt;
use std::sync::Arc;

use crate::class::{Class, INITIALIZER};
use crate::error::{DoubleError, DoubleResult};
use crate::object::ObjectRef;
use crate::value::Value;

/// Builds instances of a class.
pub trait ConstructionStrategy: fmt::Debug + Send + Sync {
    /// Builds a new instance of `class` from constructor `args`.
    ///
    /// `class` is the class being instantiated, which may be a subclass of
    /// the class that declared this strategy.
    fn construct(&self, class: &Arc<Class>, args: &[Value]) -> DoubleResult<ObjectRef>;
}

/// Default construction: allocate, then run `__init__` if the class chain
/// defines one.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainConstruction;

impl ConstructionStrategy for PlainConstruction {
    fn construct(&self, class: &Arc<Class>, args: &[Value]) -> DoubleResult<ObjectRef> {
        let instance = ObjectRef::allocate(class);

        match class.lookup(INITIALIZER) {
            Some(Value::Function(init)) => {
                init.invoke(&instance, args)
                    .map_err(|e| DoubleError::construction(class.name(), e.to_string()))?;
            }
            Some(other) => {
                return Err(DoubleError::construction(
                    class.name(),
                    format!("{INITIALIZER} is a {} value, not a function", other.type_name()),
                ));
            }
            None if !args.is_empty() => {
                return Err(DoubleError::construction(
                    class.name(),
                    format!("takes no arguments ({} given)", args.len()),
                ));
            }
            None => {}
        }

        Ok(instance)
    }
}

/// Returns the strategy that builds instances of `class`.
///
/// This is the class's customized strategy when it (or an ancestor) declares
/// one, otherwise [`PlainConstruction`].
#[must_use]
pub fn resolve_chain(class: &Class) -> Arc<dyn ConstructionStrategy> {
    class
        .customized_construction()
        .map_or_else(|| Arc::new(PlainConstruction) as Arc<dyn ConstructionStrategy>, Arc::clone)
}
