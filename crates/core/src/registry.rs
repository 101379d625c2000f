//! Name-keyed arena of schema nodes.
//!
//! Parent, child and composition links are plain names resolved through the
//! registry, so a dangling reference is just a lookup miss.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::error::NormalizeError;
use crate::model::{CompositionKind, SchemaNode};

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    nodes: BTreeMap<String, SchemaNode>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = SchemaNode>) -> Result<Self, NormalizeError> {
        let mut registry = Self::new();
        for node in nodes {
            registry.insert(node)?;
        }
        Ok(registry)
    }

    /// Add a node, rejecting duplicate schema names and property name collisions.
    pub fn insert(&mut self, node: SchemaNode) -> Result<(), NormalizeError> {
        check_name_collisions(&node)?;
        if self.nodes.contains_key(&node.name) {
            return Err(NormalizeError::DuplicateSchema { name: node.name });
        }
        self.nodes.insert(node.name.clone(), node);
        Ok(())
    }

    /// Swap in the normalized version of an existing node.
    pub(crate) fn replace(&mut self, node: SchemaNode) {
        self.nodes.insert(node.name.clone(), node);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.nodes.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut SchemaNode> {
        self.nodes.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve `node.parent`; a dangling name is logged and treated as no parent.
    pub fn resolve_parent(&self, node: &SchemaNode) -> Option<&SchemaNode> {
        let parent_name = node.parent.as_deref()?;
        let parent = self.nodes.get(parent_name);
        if parent.is_none() {
            warn!(
                schema = %node.name,
                parent = %parent_name,
                "Parent schema not found, treating schema as having no parent."
            );
        }
        parent
    }

    /// Names ordered dependencies-first (by depth, then name).
    ///
    /// A node depends on its parent and on every allOf target it flattens,
    /// so both are normalized before it. Dangling links are ignored.
    pub fn inheritance_order(&self) -> Result<Vec<String>, NormalizeError> {
        let mut depths: HashMap<&str, usize> = HashMap::new();
        for name in self.nodes.keys() {
            self.depth_of(name, &mut depths, &mut Vec::new())?;
        }
        let mut order: Vec<(usize, &str)> = depths.into_iter().map(|(name, d)| (d, name)).collect();
        order.sort();
        Ok(order.into_iter().map(|(_, name)| name.to_string()).collect())
    }

    /// Longest chain of resolvable dependencies below `name`; errors on a cycle.
    fn depth_of<'a>(
        &'a self,
        name: &'a str,
        depths: &mut HashMap<&'a str, usize>,
        visiting: &mut Vec<&'a str>,
    ) -> Result<usize, NormalizeError> {
        if let Some(depth) = depths.get(name) {
            return Ok(*depth);
        }
        if let Some(start) = visiting.iter().position(|seen| *seen == name) {
            let mut chain: Vec<String> = visiting[start..].iter().map(|s| s.to_string()).collect();
            chain.push(name.to_string());
            return Err(NormalizeError::CyclicInheritance { chain });
        }
        let Some(node) = self.nodes.get(name) else {
            return Ok(0);
        };

        visiting.push(name);
        let mut depth = 0;
        for dependency in dependencies(node) {
            if let Some((key, _)) = self.nodes.get_key_value(dependency) {
                depth = depth.max(self.depth_of(key, depths, visiting)? + 1);
            }
        }
        visiting.pop();

        depths.insert(name, depth);
        Ok(depth)
    }

    /// Declared children plus every node whose parent link names `name`.
    pub fn children_of(&self, name: &str) -> Vec<String> {
        let mut children: Vec<String> = self
            .nodes
            .get(name)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        children.extend(
            self.nodes
                .values()
                .filter(|n| n.parent.as_deref() == Some(name))
                .map(|n| n.name.clone()),
        );
        children.sort();
        children.dedup();
        children
    }

    /// Consume the registry, yielding nodes sorted by name.
    pub fn into_nodes(self) -> Vec<SchemaNode> {
        self.nodes.into_values().collect()
    }
}

fn dependencies(node: &SchemaNode) -> Vec<&str> {
    let mut dependencies: Vec<&str> = node.parent.as_deref().into_iter().collect();
    dependencies.extend(
        node.composed_from
            .iter()
            .filter(|c| c.kind == CompositionKind::AllOf && c.name != node.name)
            .map(|c| c.name.as_str()),
    );
    dependencies
}

/// Two authored properties may not share a target identifier.
fn check_name_collisions(node: &SchemaNode) -> Result<(), NormalizeError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for property in &node.properties {
        if let Some(first) = seen.insert(&property.name, &property.base_name) {
            return Err(NormalizeError::NameCollision {
                schema: node.name.clone(),
                name: property.name.clone(),
                first: first.to_string(),
                second: property.base_name.clone(),
            });
        }
    }
    Ok(())
}
