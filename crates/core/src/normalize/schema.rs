use std::collections::BTreeSet;

use modelir_common::{GeneratorConfig, NamingConvention};
use tracing::{debug, warn};

use crate::model::{CompositionKind, ModelImport, PropertyDescriptor, SchemaNode};
use crate::ordering::order_schema;
use crate::registry::SchemaRegistry;
use crate::utils::model_filename;

/// Normalize one node against the registry.
///
/// Parents and allOf targets must already be normalized: their `all_vars`
/// is what the node inherits or flattens. The result is derived from the authored fields only, so running
/// it on its own output changes nothing.
pub fn normalize_schema(
    node: &SchemaNode,
    registry: &SchemaRegistry,
    config: &GeneratorConfig,
) -> SchemaNode {
    let tagged_union = config.profile.is_tagged_union();
    let mut out = clear_derived(node);

    if config.strip_nullable_variants || tagged_union {
        strip_null_variants(&mut out);
    }

    let mut own = node.properties.clone();
    let mut parent_vars = Vec::new();

    if let Some(parent) = registry.resolve_parent(node) {
        let inherited = parent.all_vars.as_slice();

        if node.has_enums() && inherited.iter().any(|p| p.is_enum) {
            reconcile_enums(&node.name, &mut own, inherited);
        }
        if let Some(discriminator) = parent.discriminator_property() {
            inject_discriminator_default(&node.name, &mut own, discriminator);
        }

        for property in inherited {
            if !own.iter().any(|p| p.name == property.name) {
                debug!(schema = %node.name, property = %property.name, "Adding parent variable.");
                parent_vars.push(inherited_copy(property));
            }
        }

        if !tagged_union {
            out.extends = Some(parent.name.clone());
        }
    }

    let flattened = flatten_all_of(node, registry, &own);
    own.extend(flattened);

    let (read_only, read_write): (Vec<_>, Vec<_>) = own.into_iter().partition(|p| p.is_read_only);
    let mut members = strip_duplicates(read_write);
    members.extend(read_only);
    let members = unique_by_name(&node.name, members);

    out.read_write_vars = members.iter().filter(|p| !p.is_read_only).cloned().collect();
    out.read_only_vars = members.iter().filter(|p| p.is_read_only).cloned().collect();

    let mut vars = members;
    if tagged_union {
        vars.extend(parent_vars.iter().cloned());
    }
    out.vars = unique_by_name(&node.name, vars);
    out.required_vars = out.vars.iter().filter(|p| p.is_required).cloned().collect();
    out.optional_vars = out.vars.iter().filter(|p| !p.is_required).cloned().collect();
    out.all_vars = unique_by_name(
        &node.name,
        out.vars.iter().chain(parent_vars.iter()).cloned().collect(),
    );
    out.parent_vars = parent_vars;

    remove_composed_properties(&mut out, registry);
    out.imports = collect_imports(&out, tagged_union);
    order_schema(&mut out);

    out
}

/// Drop every later occurrence of a descriptor that already appears earlier in the list.
pub fn strip_duplicates(properties: Vec<PropertyDescriptor>) -> Vec<PropertyDescriptor> {
    let mut kept: Vec<PropertyDescriptor> = Vec::with_capacity(properties.len());
    for property in properties {
        if kept.contains(&property) {
            debug!(property = %property.name, "Removing duplicate read-write property.");
        } else {
            kept.push(property);
        }
    }
    kept
}

/// Fill `model_imports` from `imports` with file names for the naming convention.
pub fn assign_model_imports(node: &mut SchemaNode, naming: NamingConvention) {
    node.model_imports = node
        .imports
        .iter()
        .map(|name| ModelImport {
            classname: name.clone(),
            filename: model_filename(name, naming),
        })
        .collect();
}

fn clear_derived(node: &SchemaNode) -> SchemaNode {
    SchemaNode {
        extends: None,
        vars: Vec::new(),
        all_vars: Vec::new(),
        required_vars: Vec::new(),
        optional_vars: Vec::new(),
        read_only_vars: Vec::new(),
        read_write_vars: Vec::new(),
        parent_vars: Vec::new(),
        imports: BTreeSet::new(),
        model_imports: Vec::new(),
        ..node.clone()
    }
}

fn inherited_copy(property: &PropertyDescriptor) -> PropertyDescriptor {
    PropertyDescriptor {
        is_inherited: true,
        discriminator_value: None,
        ..property.clone()
    }
}

fn strip_null_variants(node: &mut SchemaNode) {
    let before = node.composed_from.len();
    node.composed_from
        .retain(|c| !(c.is_null_variant() && c.kind != CompositionKind::AllOf));
    if node.composed_from.len() != before {
        debug!(schema = %node.name, "Stripped null variant, marking schema nullable.");
        node.is_nullable = true;
    }
}

/// Remove child enums that repeat a parent enum; the child reaches them through the parent.
fn reconcile_enums(
    schema: &str,
    own: &mut Vec<PropertyDescriptor>,
    inherited: &[PropertyDescriptor],
) {
    own.retain(|property| {
        let duplicate = inherited
            .iter()
            .any(|parent| parent.is_enum && property.is_enum_equal(parent));
        if duplicate {
            debug!(
                schema = %schema,
                property = %property.name,
                "Removing enum redeclared from parent."
            );
        }
        !duplicate
    });
}

fn inject_discriminator_default(schema: &str, own: &mut [PropertyDescriptor], discriminator: &str) {
    for property in own
        .iter_mut()
        .filter(|p| !p.is_read_only && p.default_value.is_none() && p.is_named(discriminator))
    {
        property.default_value = Some(schema.to_string());
    }
}

/// Normalized members of allOf references, minus the ones declared directly.
fn flatten_all_of(
    node: &SchemaNode,
    registry: &SchemaRegistry,
    own: &[PropertyDescriptor],
) -> Vec<PropertyDescriptor> {
    let mut flattened = Vec::new();
    for composed in &node.composed_from {
        if composed.kind != CompositionKind::AllOf || composed.name == node.name {
            continue;
        }
        let Some(referenced) = registry.get(&composed.name) else {
            warn!(
                schema = %node.name,
                composed = %composed.name,
                "Composed schema not found, skipping."
            );
            continue;
        };
        flattened.extend(
            referenced
                .all_vars
                .iter()
                .filter(|p| !own.iter().any(|o| o.name == p.name))
                .map(inherited_copy),
        );
    }
    flattened
}

/// First occurrence of each name wins; conflicting definitions are logged.
fn unique_by_name(schema: &str, properties: Vec<PropertyDescriptor>) -> Vec<PropertyDescriptor> {
    let mut kept: Vec<PropertyDescriptor> = Vec::with_capacity(properties.len());
    for property in properties {
        match kept.iter().find(|k| k.name == property.name) {
            None => kept.push(property),
            Some(first) if *first != property => {
                warn!(
                    schema = %schema,
                    property = %property.name,
                    "Conflicting definitions for property, keeping the first one."
                );
            }
            Some(_) => {}
        }
    }
    kept
}

/// Properties of oneOf/anyOf alternatives are not members of the composite,
/// except for the discriminator.
fn remove_composed_properties(node: &mut SchemaNode, registry: &SchemaRegistry) {
    let discriminator = node.discriminator_property();
    let mut removed: Vec<String> = Vec::new();

    for composed in &node.composed_from {
        if composed.kind == CompositionKind::AllOf
            || composed.is_null_variant()
            || composed.name == node.name
        {
            continue;
        }
        let Some(referenced) = registry.get(&composed.name) else {
            warn!(
                schema = %node.name,
                composed = %composed.name,
                "Composed schema not found, skipping."
            );
            continue;
        };
        removed.extend(
            referenced
                .properties
                .iter()
                .filter(|p| discriminator.is_none_or(|d| !p.is_named(d)))
                .map(|p| p.name.clone()),
        );
    }

    if removed.is_empty() {
        return;
    }
    debug!(
        schema = %node.name,
        removed = ?removed,
        "Removing properties declared in composed types."
    );
    for list in [
        &mut node.vars,
        &mut node.all_vars,
        &mut node.required_vars,
        &mut node.optional_vars,
        &mut node.read_only_vars,
        &mut node.read_write_vars,
    ] {
        list.retain(|p| !removed.contains(&p.name));
    }
}

/// Referenced schema names, never including the node itself.
fn collect_imports(node: &SchemaNode, tagged_union: bool) -> BTreeSet<String> {
    let mut imports: BTreeSet<String> = node
        .composed_from
        .iter()
        .filter(|c| !c.is_null_variant())
        .map(|c| c.name.clone())
        .collect();
    imports.extend(node.extends.clone());
    if tagged_union && let Some(parent) = &node.parent {
        imports.remove(parent);
    }
    imports.extend(node.all_vars.iter().filter_map(|p| p.complex_type.clone()));
    imports.remove(&node.name);
    imports
}
