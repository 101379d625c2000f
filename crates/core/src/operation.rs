//! Operation annotation: identifiers, parameter categories, path and success shape.

use modelir_common::GeneratorConfig;
use tracing::warn;

use crate::error::NormalizeError;
use crate::model::{HttpMethod, OperationDescriptor, ParamLocation, ParameterDescriptor};
use crate::ordering::order_parameters;
use crate::path::expand_path;
use crate::response::classify_responses;
use crate::utils::sanitize_identifier;

/// Annotate one operation. Authored fields are copied, derived ones recomputed.
pub fn normalize_operation(
    op: &OperationDescriptor,
    config: &GeneratorConfig,
) -> Result<OperationDescriptor, NormalizeError> {
    let mut out = OperationDescriptor {
        operation_id: op.operation_id.clone(),
        method: op.method,
        path: op.path.clone(),
        parameters: op.parameters.clone(),
        responses: op.responses.clone(),
        ..OperationDescriptor::default()
    };

    if out.operation_id.is_empty() {
        out.operation_id = derive_operation_id(&op.path, op.method);
        warn!(
            method = %op.method.as_str(),
            path = %op.path,
            operation_id = %out.operation_id,
            "Operation has no operationId, using a derived one."
        );
    }

    for param in &mut out.parameters {
        if param.param_name.is_empty() {
            param.param_name = sanitize_identifier(&param.name);
        }
    }

    categorize_parameters(&mut out);

    let expanded = expand_path(&out.path, &out.parameters, config.path_dialect)?;
    out.rendered_path = expanded.rendered;
    out.consumed_params = expanded.consumed;

    let success = classify_responses(&out.responses);
    out.success_shape = success.shape;
    out.success_status = success.status_code;
    out.success_message = success.message;

    Ok(out)
}

/// Identifier built from the method and the static path segments.
pub fn derive_operation_id(path: &str, method: HttpMethod) -> String {
    let path_parts: Vec<_> = path
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .collect();

    let base = path_parts.join("_");
    sanitize_identifier(&format!("{}_{}", method.as_str().to_lowercase(), base))
}

fn categorize_parameters(op: &mut OperationDescriptor) {
    let parameters = op.parameters.clone();
    let by_location = |location: ParamLocation| -> Vec<ParameterDescriptor> {
        parameters
            .iter()
            .filter(|p| p.location == location)
            .cloned()
            .collect()
    };

    op.path_params = by_location(ParamLocation::Path);
    op.query_params = by_location(ParamLocation::Query);
    op.header_params = by_location(ParamLocation::Header);
    op.cookie_params = by_location(ParamLocation::Cookie);
    op.body_params = by_location(ParamLocation::Body);
    op.form_params = by_location(ParamLocation::Form);
    op.required_params = parameters.iter().filter(|p| p.required).cloned().collect();
    op.optional_params = parameters.iter().filter(|p| !p.required).cloned().collect();
    op.all_params = parameters;

    for list in [
        &mut op.all_params,
        &mut op.path_params,
        &mut op.query_params,
        &mut op.header_params,
        &mut op.cookie_params,
        &mut op.body_params,
        &mut op.form_params,
        &mut op.required_params,
        &mut op.optional_params,
    ] {
        order_parameters(list);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{ResponseDescriptor, SuccessShape};
    use modelir_common::PathDialect;

    fn plain() -> GeneratorConfig {
        GeneratorConfig {
            path_dialect: PathDialect::TypeScriptPlain,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_derive_operation_id() {
        assert_eq!(derive_operation_id("/pets/{petId}/photos", HttpMethod::Get), "getPetsPhotos");
        assert_eq!(derive_operation_id("/", HttpMethod::Get), "get");
        assert_eq!(derive_operation_id("/", HttpMethod::Delete), "_delete");
    }

    #[test]
    fn test_missing_operation_id_is_derived() {
        let op = OperationDescriptor::new("", HttpMethod::Post, "/pets");
        let out = normalize_operation(&op, &plain()).unwrap();
        assert_eq!(out.operation_id, "postPets");
    }

    #[test]
    fn test_parameters_categorized_and_ordered() {
        let mut op = OperationDescriptor::new("listPhotos", HttpMethod::Get, "/pets/{pet_id}/photos");
        let mut limit = ParameterDescriptor::new("limit", ParamLocation::Query, "number");
        limit.default_value = Some("20".to_string());
        op.parameters = vec![
            limit,
            ParameterDescriptor::new("X-Trace-Id", ParamLocation::Header, "string"),
            ParameterDescriptor::new("pet_id", ParamLocation::Path, "number"),
            ParameterDescriptor::new("tag", ParamLocation::Query, "string"),
        ];

        let out = normalize_operation(&op, &plain()).unwrap();

        let names = |list: &[ParameterDescriptor]| -> Vec<String> {
            list.iter().map(|p| p.name.clone()).collect()
        };
        assert_eq!(names(&out.path_params), vec!["pet_id"]);
        assert_eq!(names(&out.query_params), vec!["tag", "limit"]);
        assert_eq!(names(&out.header_params), vec!["X-Trace-Id"]);
        assert_eq!(names(&out.required_params), vec!["pet_id"]);
        assert_eq!(names(&out.all_params), vec!["pet_id", "X-Trace-Id", "tag", "limit"]);
        assert_eq!(out.path_params[0].param_name, "petId");
        assert_eq!(out.header_params[0].param_name, "xTraceId");
        assert_eq!(out.rendered_path, "/pets/${petId}/photos");
        assert_eq!(out.consumed_params, vec!["pet_id"]);
        assert!(!out.has_form_params());
    }

    #[test]
    fn test_success_response_recorded() {
        let mut op = OperationDescriptor::new("getPet", HttpMethod::Get, "/pets");
        let mut ok = ResponseDescriptor::new("200").with_data_type("Pet");
        ok.message = Some("A pet".to_string());
        op.responses = vec![ResponseDescriptor::new("404"), ok];

        let out = normalize_operation(&op, &plain()).unwrap();

        assert_eq!(out.success_shape, SuccessShape::Object("Pet".to_string()));
        assert_eq!(out.success_status.as_deref(), Some("200"));
        assert_eq!(out.success_message.as_deref(), Some("A pet"));
    }

    #[test]
    fn test_raw_path_survives_normalization() {
        let mut op = OperationDescriptor::new("getPet", HttpMethod::Get, "/pets/{petId}");
        op.parameters = vec![ParameterDescriptor::new("petId", ParamLocation::Path, "number")];

        let once = normalize_operation(&op, &plain()).unwrap();
        let twice = normalize_operation(&once, &plain()).unwrap();

        assert_eq!(once.path, "/pets/{petId}");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bad_path_is_fatal() {
        let op = OperationDescriptor::new("broken", HttpMethod::Get, "/pets/{bad");
        assert!(matches!(
            normalize_operation(&op, &plain()),
            Err(NormalizeError::UnbalancedBraces { .. })
        ));
    }
}
