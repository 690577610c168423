//! Per-instance behavior overrides.
//!
//! Each primitive writes a bound method into one instance's attribute
//! dictionary. The class and every other instance are left alone.

use tracing::trace;

use crate::error::DoubleResult;
use crate::object::ObjectRef;
use crate::reflect;
use crate::value::{Callable, Function, Value};

/// How a delegate combines its pre-bound arguments with call-time arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DelegateArgs {
    /// Pre-bound arguments first, then the call-time arguments.
    #[default]
    Prepend,
    /// Only the pre-bound arguments; call-time arguments are discarded.
    Replace,
}

/// Binds `behavior` as method `name` of `instance`.
///
/// `behavior` receives the instance as its first argument. Any previous
/// value of `name` on the instance is overwritten.
pub fn bind_behavior<F>(instance: &ObjectRef, name: &str, behavior: F) -> DoubleResult<()>
where
    F: Fn(&ObjectRef, &[Value]) -> DoubleResult<Value> + Send + Sync + 'static,
{
    bind_function(instance, &Function::new(name, behavior), name)
}

/// Binds an existing function as method `name` of `instance`.
pub fn bind_function(instance: &ObjectRef, function: &Function, name: &str) -> DoubleResult<()> {
    trace!(object = %instance.id(), attribute = name, function = function.name(), "patch");
    reflect::set_attribute(instance, name, Value::Method(function.bind(instance)))
}

/// A callable ignoring its arguments and always returning `value`.
#[must_use]
pub fn fixed_return(value: impl Into<Value>) -> Callable {
    let value = value.into();
    Callable::new("fixed_return", move |_| Ok(value.clone()))
}

/// Makes method `name` of `instance` return `value` whatever it is passed.
pub fn bind_constant_return(instance: &ObjectRef, name: &str, value: impl Into<Value>) -> DoubleResult<()> {
    let returner = fixed_return(value);
    bind_behavior(instance, name, move |_, args| returner.call(args))
}

/// A callable forwarding to `target` with `partial_args` bound per `mode`.
#[must_use]
pub fn delegate(target: Callable, partial_args: Vec<Value>, mode: DelegateArgs) -> Callable {
    let name = format!("delegate:{}", target.name());
    Callable::new(name, move |args| match mode {
        DelegateArgs::Prepend => {
            let mut full = Vec::with_capacity(partial_args.len() + args.len());
            full.extend_from_slice(&partial_args);
            full.extend_from_slice(args);
            target.call(&full)
        }
        DelegateArgs::Replace => target.call(&partial_args),
    })
}

/// Redirects method `name` of `instance` to `target`, prepending
/// `partial_args` to the arguments of every call.
pub fn bind_delegate<I>(instance: &ObjectRef, name: &str, target: Callable, partial_args: I) -> DoubleResult<()>
where
    I: IntoIterator<Item = Value>,
{
    bind_delegate_with(instance, name, target, partial_args, DelegateArgs::Prepend)
}

/// Like [`bind_delegate`] with an explicit argument mode.
pub fn bind_delegate_with<I>(
    instance: &ObjectRef,
    name: &str,
    target: Callable,
    partial_args: I,
    mode: DelegateArgs,
) -> DoubleResult<()>
where
    I: IntoIterator<Item = Value>,
{
    let forward = delegate(target, partial_args.into_iter().collect(), mode);
    bind_behavior(instance, name, move |_, args| forward.call(args))
}
