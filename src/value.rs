//! Dynamic values held by attributes.
//!
//! Every attribute of a class or an instance holds a `Value`. Besides plain
//! data (null, booleans, numbers, strings, lists) a value can reference an
//! object or a class, or carry behavior: an unbound [`Function`] defined on a
//! class, a [`BoundMethod`] already attached to a receiver, or a free
//! [`Callable`].

use std::fmt;
use std::sync::Arc;

use crate::class::Class;
use crate::error::{CallError, DoubleResult};
use crate::object::{ObjectRef, WeakObjectRef};

type MethodBody = dyn Fn(&ObjectRef, &[Value]) -> DoubleResult<Value> + Send + Sync;
type CallableBody = dyn Fn(&[Value]) -> DoubleResult<Value> + Send + Sync;

/// A function that expects a receiver, i.e. a method body.
///
/// Functions stored as class members are bound to the instance when they are
/// looked up through it, mirroring ordinary method dispatch.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    body: Arc<MethodBody>,
}

impl Function {
    /// Creates a named function from a closure receiving `(self, args)`.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> DoubleResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            body: Arc::new(body),
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the function with an explicit receiver.
    pub fn invoke(&self, receiver: &ObjectRef, args: &[Value]) -> DoubleResult<Value> {
        (self.body)(receiver, args)
    }

    /// Binds the function to `receiver`.
    #[must_use]
    pub fn bind(&self, receiver: &ObjectRef) -> BoundMethod {
        BoundMethod {
            receiver: receiver.downgrade(),
            function: self.clone(),
        }
    }

    fn same_body(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A function attached to a receiver.
///
/// The receiver is held weakly: instances store bound methods in their own
/// attribute dictionary, and a strong reference would keep them alive forever.
#[derive(Clone)]
pub struct BoundMethod {
    receiver: WeakObjectRef,
    function: Function,
}

impl BoundMethod {
    /// Returns the underlying function.
    #[must_use]
    pub const fn function(&self) -> &Function {
        &self.function
    }

    /// Returns the receiver if it is still alive.
    #[must_use]
    pub fn receiver(&self) -> Option<ObjectRef> {
        self.receiver.upgrade()
    }

    /// Calls the method, supplying the receiver implicitly.
    pub fn call(&self, args: &[Value]) -> DoubleResult<Value> {
        let receiver = self.receiver.upgrade().ok_or_else(|| CallError::ReceiverDropped {
            method: self.function.name().to_string(),
        })?;
        self.function.invoke(&receiver, args)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("function", &self.function.name)
            .field("receiver", &self.receiver.upgrade().map(|r| r.id()))
            .finish()
    }
}

/// A free function with no receiver.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    body: Arc<CallableBody>,
}

impl Callable {
    /// Creates a named callable from a closure receiving the call arguments.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> DoubleResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            body: Arc::new(body),
        }
    }

    /// Returns the callable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the function.
    pub fn call(&self, args: &[Value]) -> DoubleResult<Value> {
        (self.body)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Possible values an attribute can hold.
///
/// # Examples
///
/// ```
/// use doppelganger::Value;
///
/// let int_val = Value::from(42);
/// let string_val = Value::from("hello");
///
/// assert!(int_val.is_int());
/// assert!(string_val.is_string());
/// assert!(Value::default().is_null());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object(ObjectRef),
    Class(Arc<Class>),
    Function(Function),
    Method(BoundMethod),
    Callable(Callable),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns true if calling this value can succeed.
    pub const fn is_callable(&self) -> bool {
        matches!(
            self,
            Self::Class(_) | Self::Function(_) | Self::Method(_) | Self::Callable(_)
        )
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_class(&self) -> Option<&Arc<Class>> {
        match self {
            Self::Class(v) => Some(v),
            _ => None,
        }
    }

    /// Calls this value with `args`.
    ///
    /// Unbound functions take their receiver from the first argument, and
    /// calling a class instantiates it.
    pub fn call(&self, args: &[Value]) -> DoubleResult<Value> {
        match self {
            Self::Method(method) => method.call(args),
            Self::Callable(callable) => callable.call(args),
            Self::Function(function) => match args.split_first() {
                Some((Self::Object(receiver), rest)) => function.invoke(receiver, rest),
                _ => Err(CallError::MissingReceiver {
                    function: function.name().to_string(),
                }
                .into()),
            },
            Self::Class(class) => Class::instantiate(class, args).map(Self::Object),
            other => Err(CallError::NotCallable {
                type_name: other.type_name(),
            }
            .into()),
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Object(_) => "object",
            Self::Class(_) => "class",
            Self::Function(_) => "function",
            Self::Method(_) => "method",
            Self::Callable(_) => "callable",
        }
    }
}

// Behavioral values compare by identity, objects by id.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Class(a), Self::Class(b)) => Arc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => a.same_body(b),
            (Self::Method(a), Self::Method(b)) => {
                a.function.same_body(&b.function) && a.receiver.ptr_eq(&b.receiver)
            }
            (Self::Callable(a), Self::Callable(b)) => Arc::ptr_eq(&a.body, &b.body),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::List(v) => write!(f, "list[{}]", v.len()),
            Self::Object(v) => write!(f, "<{} object {}>", v.class().name(), v.id()),
            Self::Class(v) => write!(f, "<class {}>", v.name()),
            Self::Function(v) => write!(f, "<function {}>", v.name()),
            Self::Method(v) => write!(f, "<bound method {}>", v.function.name()),
            Self::Callable(v) => write!(f, "<callable {}>", v.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl From<Arc<Class>> for Value {
    fn from(v: Arc<Class>) -> Self {
        Self::Class(v)
    }
}

impl From<Function> for Value {
    fn from(v: Function) -> Self {
        Self::Function(v)
    }
}

impl From<Callable> for Value {
    fn from(v: Callable) -> Self {
        Self::Callable(v)
    }
}
