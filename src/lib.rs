//! # doppelganger - structural test doubles
//!
//! doppelganger generates test doubles from classes of a small dynamic object
//! model. A double instance exposes exactly the attribute surface of a real
//! instance, but every attribute not declared untouchable is neutralized:
//! either replaced by `null` or by a method that accepts anything and returns
//! `null`. Individual instances can then be patched with constant returns or
//! delegates.
//!
//! ## Core Concepts
//!
//! - **Class / ObjectRef**: classes with inherited members, and instances
//!   whose own attribute dictionary overrides the class
//! - **DoubleClass**: a generated class whose construction nullifies attributes
//! - **PolicyStore**: untouchable / explicitly touchable names per double type
//! - **Magic names**: `__dunder__` names, preserved unless declared touchable
//! - **Patch primitives**: per-instance method overrides
//!
//! ## Usage
//!
//! ```rust
//! use doppelganger::{bind_constant_return, Class, DoubleClass, Value};
//!
//! let real = Class::builder("TrueClass")
//!     .member("member", 0)
//!     .method("method", |_this, _args| Ok(Value::from("lol")))
//!     .build();
//!
//! let mock = DoubleClass::mock(&real);
//! mock.declare_untouchable("member")?;
//!
//! let double = mock.instantiate(&[])?;
//! assert_eq!(double.get("member")?, Value::Int(0));
//! assert!(double.call("method", &[Value::Int(1)])?.is_null());
//!
//! bind_constant_return(&double, "method", 42)?;
//! assert_eq!(double.call("method", &[])?, Value::Int(42));
//! # Ok::<(), doppelganger::DoubleError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Object model
pub mod class;
pub mod construction;
pub mod error;
pub mod object;
pub mod reflect;
pub mod value;

// Double generation and patching
pub mod double;
pub mod patch;

// Re-export primary types at crate root for convenience
pub use class::{Class, ClassBuilder, INITIALIZER};
pub use construction::{resolve_chain, ConstructionStrategy, PlainConstruction};
pub use error::{AttributeError, CallError, DoubleError, DoubleResult};
pub use object::{ObjectId, ObjectRef, WeakObjectRef, CLASS_ATTRIBUTE, DICT_ATTRIBUTE, STRUCTURAL_ATTRIBUTES};
pub use value::{BoundMethod, Callable, Function, Value};

pub use double::{
    classify, is_magic_name, make_double_type, Disposition, DoubleClass, DoubleConfig,
    DoubleConstruction, Nullification, PolicySnapshot, PolicyStore,
};
pub use patch::{
    bind_behavior, bind_constant_return, bind_delegate, bind_delegate_with, bind_function,
    delegate, fixed_return, DelegateArgs,
};
