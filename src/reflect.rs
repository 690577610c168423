//! Introspection over instances.
//!
//! The double generator walks and rewrites instances exclusively through
//! these functions.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::error::DoubleResult;
use crate::object::{ObjectRef, STRUCTURAL_ATTRIBUTES};
use crate::value::Value;

/// Every attribute name resolvable on `instance`: structural names, the
/// instance's own dictionary, and members of its whole class chain.
pub fn list_attribute_names(instance: &ObjectRef) -> DoubleResult<BTreeSet<String>> {
    let mut names: BTreeSet<String> = STRUCTURAL_ATTRIBUTES.iter().map(ToString::to_string).collect();
    names.extend(instance.own_attribute_names()?);
    names.extend(instance.class().member_names());
    Ok(names)
}

/// Resolves every attribute of `instance` into a name-to-value map.
pub fn attribute_dictionary(instance: &ObjectRef) -> DoubleResult<BTreeMap<String, Value>> {
    list_attribute_names(instance)?
        .into_iter()
        .map(|name| {
            let value = instance.get(&name)?;
            Ok((name, value))
        })
        .collect()
}

/// Overwrites attribute `name` on `instance` only.
pub fn set_attribute(instance: &ObjectRef, name: &str, value: Value) -> DoubleResult<()> {
    trace!(object = %instance.id(), attribute = name, kind = value.type_name(), "set attribute");
    instance.set(name, value)
}
