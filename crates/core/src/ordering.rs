//! Deterministic ordering of property and parameter lists.
//!
//! Both orderings are two independent stable sorts. The first pass sorts by a
//! lexical key, the second pass re-sorts by flags and is the final order; the
//! lexical key only breaks ties the second comparator leaves equal.

use std::cmp::Ordering;

use crate::model::{ParameterDescriptor, PropertyDescriptor, SchemaNode};

/// Sort by name, then non-nullable first, then no-default first.
pub fn order_properties(properties: &mut [PropertyDescriptor]) {
    properties.sort_by(|a, b| a.name.cmp(&b.name));
    properties.sort_by(|a, b| by_nullable(a, b).then_with(|| by_default_value(a, b)));
}

/// Sort by data type, then required first, then no-default first.
pub fn order_parameters(parameters: &mut [ParameterDescriptor]) {
    parameters.sort_by(|a, b| a.data_type.cmp(&b.data_type));
    parameters.sort_by(|a, b| {
        b.required
            .cmp(&a.required)
            .then_with(|| a.has_default_value().cmp(&b.has_default_value()))
    });
}

/// Apply [`order_properties`] to every categorized list of a node.
pub fn order_schema(node: &mut SchemaNode) {
    for list in node.categorized_lists_mut() {
        order_properties(list);
    }
}

fn by_nullable(a: &PropertyDescriptor, b: &PropertyDescriptor) -> Ordering {
    a.is_nullable.cmp(&b.is_nullable)
}

fn by_default_value(a: &PropertyDescriptor, b: &PropertyDescriptor) -> Ordering {
    a.has_default_value().cmp(&b.has_default_value())
}
