use modelir_common::GeneratorConfig;
use tracing::{debug, warn};

use crate::registry::SchemaRegistry;

struct ChildTag {
    child: String,
    property: String,
    tag: String,
}

/// Assign discriminator tags to children and make each base import its children.
///
/// Only the tagged-union profile needs this; classical children extend their
/// base and carry no literal tag. Runs after every node has been normalized.
pub fn resolve_discriminators(
    registry: &mut SchemaRegistry,
    order: &[String],
    config: &GeneratorConfig,
) {
    if !config.profile.is_tagged_union() {
        return;
    }

    let mut tags: Vec<ChildTag> = Vec::new();
    let mut child_imports: Vec<(String, Vec<String>)> = Vec::new();

    for name in order {
        let Some(parent) = registry.get(name) else {
            continue;
        };
        let Some(discriminator) = parent.discriminator.as_ref() else {
            continue;
        };

        let mut imported = Vec::new();
        for child_name in registry.children_of(name) {
            let Some(child) = registry.get(&child_name) else {
                warn!(
                    schema = %name,
                    child = %child_name,
                    "Discriminator child not found, skipping."
                );
                continue;
            };
            imported.push(child_name.clone());

            let tag = child.x_discriminator_value.clone().or_else(|| {
                discriminator
                    .tag_for(&child_name)
                    .or_else(|| {
                        parent
                            .composed_from
                            .iter()
                            .find(|c| c.name == child_name)
                            .and_then(|c| c.mapping_tag.as_deref())
                    })
                    .map(str::to_string)
            });
            match tag {
                Some(tag) => tags.push(ChildTag {
                    child: child_name,
                    property: discriminator.property_name.clone(),
                    tag,
                }),
                None => warn!(
                    schema = %name,
                    child = %child_name,
                    "No discriminator mapping for child, leaving its tag unset."
                ),
            }
        }
        child_imports.push((name.clone(), imported));
    }

    for ChildTag { child, property, tag } in tags {
        let Some(node) = registry.get_mut(&child) else {
            continue;
        };
        debug!(schema = %child, tag = %tag, "Assigning discriminator tag.");
        for list in node.categorized_lists_mut() {
            for p in list.iter_mut().filter(|p| p.is_named(&property)) {
                p.discriminator_value = Some(tag.clone());
            }
        }
    }

    for (parent, children) in child_imports {
        if let Some(node) = registry.get_mut(&parent) {
            node.imports.extend(children.into_iter().filter(|c| *c != parent));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{ComposedRef, CompositionKind, PropertyDescriptor, SchemaNode};
    use crate::normalize::normalize_schema;
    use modelir_common::TargetProfile;

    fn shapes() -> SchemaRegistry {
        let kind = PropertyDescriptor::new("kind", "kind", "string").required();
        SchemaRegistry::from_nodes([
            SchemaNode::new("Shape")
                .with_properties(vec![kind])
                .with_discriminator("kind", &[("circle", "Circle"), ("square", "Square")]),
            SchemaNode::new("Circle")
                .with_parent("Shape")
                .with_properties(vec![PropertyDescriptor::new("radius", "radius", "number")]),
            SchemaNode::new("Square")
                .with_parent("Shape")
                .with_properties(vec![PropertyDescriptor::new("side", "side", "number")]),
            SchemaNode::new("Blob").with_parent("Shape"),
        ])
        .unwrap()
    }

    fn run(registry: &mut SchemaRegistry, profile: TargetProfile) {
        let config = GeneratorConfig {
            profile,
            ..GeneratorConfig::default()
        };
        let order = registry.inheritance_order().unwrap();
        for name in &order {
            let normalized = normalize_schema(registry.get(name).unwrap(), registry, &config);
            registry.replace(normalized);
        }
        resolve_discriminators(registry, &order, &config);
    }

    fn kind_tag(node: &SchemaNode) -> Option<&str> {
        node.vars
            .iter()
            .find(|p| p.name == "kind")
            .and_then(|p| p.discriminator_value.as_deref())
    }

    #[test]
    fn test_tagged_union_child_gets_mapped_tag() {
        let mut registry = shapes();
        run(&mut registry, TargetProfile::TaggedUnion);

        let circle = registry.get("Circle").unwrap();
        assert!(circle.extends.is_none());
        assert_eq!(kind_tag(circle), Some("circle"));
        assert_eq!(
            circle.all_vars.iter().find(|p| p.name == "kind").unwrap().discriminator_value.as_deref(),
            Some("circle")
        );
        assert_eq!(kind_tag(registry.get("Square").unwrap()), Some("square"));
    }

    #[test]
    fn test_unmapped_child_left_untagged() {
        let mut registry = shapes();
        run(&mut registry, TargetProfile::TaggedUnion);

        let blob = registry.get("Blob").unwrap();
        assert!(blob.vars.iter().any(|p| p.name == "kind"));
        assert_eq!(kind_tag(blob), None);
    }

    #[test]
    fn test_explicit_tag_wins_over_mapping() {
        let mut registry = shapes();
        let mut circle = registry.get("Circle").unwrap().clone();
        circle.x_discriminator_value = Some("round".to_string());
        registry.replace(circle);

        run(&mut registry, TargetProfile::TaggedUnion);

        assert_eq!(kind_tag(registry.get("Circle").unwrap()), Some("round"));
    }

    #[test]
    fn test_composition_tag_used_without_mapping() {
        let mut circle_ref = ComposedRef::new(CompositionKind::OneOf, "Circle");
        circle_ref.mapping_tag = Some("circle".to_string());
        let mut shape = SchemaNode::new("Shape")
            .with_properties(vec![PropertyDescriptor::new("kind", "kind", "string").required()])
            .with_discriminator("kind", &[]);
        shape.composed_from.push(circle_ref);

        let mut registry = SchemaRegistry::from_nodes([
            shape,
            SchemaNode::new("Circle")
                .with_parent("Shape")
                .with_properties(vec![PropertyDescriptor::new("radius", "radius", "number")]),
        ])
        .unwrap();
        run(&mut registry, TargetProfile::TaggedUnion);

        assert_eq!(kind_tag(registry.get("Circle").unwrap()), Some("circle"));
    }

    #[test]
    fn test_mapping_wins_over_composition_tag() {
        let mut registry = shapes();
        let mut shape = registry.get("Shape").unwrap().clone();
        let mut square_ref = ComposedRef::new(CompositionKind::OneOf, "Square");
        square_ref.mapping_tag = Some("box".to_string());
        shape.composed_from.push(square_ref);
        registry.replace(shape);

        run(&mut registry, TargetProfile::TaggedUnion);

        assert_eq!(kind_tag(registry.get("Square").unwrap()), Some("square"));
    }

    #[test]
    fn test_base_imports_children() {
        let mut registry = shapes();
        run(&mut registry, TargetProfile::TaggedUnion);

        let shape = registry.get("Shape").unwrap();
        assert_eq!(
            shape.imports.iter().collect::<Vec<_>>(),
            vec!["Blob", "Circle", "Square"]
        );
        assert!(!registry.get("Circle").unwrap().imports.contains("Shape"));
    }

    #[test]
    fn test_classical_profile_leaves_tags_alone() {
        let mut registry = shapes();
        run(&mut registry, TargetProfile::Classical);

        let circle = registry.get("Circle").unwrap();
        assert_eq!(circle.extends.as_deref(), Some("Shape"));
        assert!(circle.all_vars.iter().all(|p| p.discriminator_value.is_none()));
        assert!(registry.get("Shape").unwrap().imports.is_empty());
    }
}
