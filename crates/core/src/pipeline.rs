//! Whole-document normalization.

use std::collections::HashSet;

use modelir_common::GeneratorConfig;
use tracing::{debug, info};

use crate::error::NormalizeError;
use crate::model::{ModelDocument, NormalizedModel, OperationDescriptor};
use crate::normalize::{assign_model_imports, normalize_schema, resolve_discriminators};
use crate::operation::normalize_operation;
use crate::registry::SchemaRegistry;

/// Parse a JSON model document and normalize it.
pub fn normalize_json(
    json: &str,
    config: &GeneratorConfig,
) -> Result<NormalizedModel, NormalizeError> {
    let document = ModelDocument::from_json(json)?;
    normalize_document(document, config)
}

/// Normalize every schema and annotate every operation of a document.
pub fn normalize_document(
    document: ModelDocument,
    config: &GeneratorConfig,
) -> Result<NormalizedModel, NormalizeError> {
    debug!(
        profile = %config.profile,
        schemas = document.schemas.len(),
        operations = document.operations.len(),
        "Normalizing model document."
    );

    let mut registry = SchemaRegistry::from_nodes(document.schemas)?;
    normalize_schemas(&mut registry, config)?;
    let operations = normalize_operations(&document.operations, config)?;

    let has_encodable_params = operations.iter().any(|op| !op.consumed_params.is_empty());
    let has_form_params = operations.iter().any(OperationDescriptor::has_form_params);
    let schemas = registry.into_nodes();

    info!(
        schemas = schemas.len(),
        operations = operations.len(),
        "Model normalized."
    );

    Ok(NormalizedModel {
        schemas,
        operations,
        has_encodable_params,
        has_form_params,
    })
}

/// Normalize all nodes in the registry, parents before children.
pub fn normalize_schemas(
    registry: &mut SchemaRegistry,
    config: &GeneratorConfig,
) -> Result<(), NormalizeError> {
    let order = registry.inheritance_order()?;

    for name in &order {
        let Some(node) = registry.get(name) else {
            continue;
        };
        let normalized = normalize_schema(node, registry, config);
        registry.replace(normalized);
    }

    resolve_discriminators(registry, &order, config);

    for name in &order {
        if let Some(node) = registry.get_mut(name) {
            assign_model_imports(node, config.naming);
        }
    }
    Ok(())
}

/// Annotate operations in declaration order; operation ids must be unique.
pub fn normalize_operations(
    operations: &[OperationDescriptor],
    config: &GeneratorConfig,
) -> Result<Vec<OperationDescriptor>, NormalizeError> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut normalized = Vec::with_capacity(operations.len());

    for op in operations {
        let op = normalize_operation(op, config)?;
        if !seen_ids.insert(op.operation_id.clone()) {
            return Err(NormalizeError::DuplicateOperation {
                operation_id: op.operation_id,
            });
        }
        normalized.push(op);
    }
    Ok(normalized)
}
