//! Path template expansion.
//!
//! A template such as `/pets/{petId}/photos/{photoId}` is scanned once, left to
//! right. Static text is escaped for the dialect's string syntax and every
//! placeholder is replaced by an interpolation fragment.

use modelir_common::PathDialect;
use tracing::debug;

use crate::error::NormalizeError;
use crate::model::{ParamLocation, ParameterDescriptor};
use crate::utils::{escape_string_literal, sanitize_identifier, to_snake_case};

/// Part of a scanned path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Static(String),
    /// Target identifier of the interpolated parameter
    Param(String),
}

/// Result of expanding one path template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedPath {
    pub segments: Vec<PathSegment>,
    /// Template rewritten in the dialect's interpolation syntax
    pub rendered: String,
    /// Source names of the interpolated parameters, in order of first use
    pub consumed: Vec<String>,
}

impl ExpandedPath {
    /// Whether any parameter value has to be encoded into the path.
    pub fn has_encodable_params(&self) -> bool {
        !self.consumed.is_empty()
    }
}

/// Expand `path` against the operation's parameters.
///
/// Fails on unbalanced or nested braces and on placeholders that match no
/// declared parameter.
pub fn expand_path(
    path: &str,
    params: &[ParameterDescriptor],
    dialect: PathDialect,
) -> Result<ExpandedPath, NormalizeError> {
    let unbalanced = || NormalizeError::UnbalancedBraces {
        path: path.to_string(),
    };

    let mut expanded = ExpandedPath::default();
    let mut current = String::new();
    let mut placeholder = String::new();
    let mut depth = 0usize;

    for c in path.chars() {
        match c {
            '{' => {
                if depth > 0 {
                    return Err(unbalanced());
                }
                depth += 1;
                if !current.is_empty() {
                    expanded.segments.push(PathSegment::Static(current.clone()));
                    current.clear();
                }
                placeholder.clear();
            }
            '}' => {
                if depth == 0 {
                    return Err(unbalanced());
                }
                depth -= 1;
                let param = find_matching_param(&placeholder, params).ok_or_else(|| {
                    NormalizeError::UnknownPathParameter {
                        path: path.to_string(),
                        placeholder: placeholder.clone(),
                    }
                })?;
                let identifier = target_identifier(param);
                expanded
                    .rendered
                    .push_str(&interpolation(param, &identifier, dialect));
                expanded.segments.push(PathSegment::Param(identifier));
                if !expanded.consumed.contains(&param.name) {
                    expanded.consumed.push(param.name.clone());
                }
            }
            _ if depth > 0 => placeholder.push(c),
            _ => {
                push_static(&mut expanded.rendered, c, dialect);
                current.push(c);
            }
        }
    }

    if depth != 0 {
        return Err(unbalanced());
    }
    if !current.is_empty() {
        expanded.segments.push(PathSegment::Static(current));
    }

    debug!(path = %path, rendered = %expanded.rendered, "Expanded path template.");
    Ok(expanded)
}

/// Find the parameter a placeholder refers to.
/// - exact source name, path parameters first
/// - then snake_case equivalence (`item_id` matches `itemId`)
pub fn find_matching_param<'a>(
    placeholder: &str,
    params: &'a [ParameterDescriptor],
) -> Option<&'a ParameterDescriptor> {
    let exact = |p: &&ParameterDescriptor| p.name == placeholder;
    if let Some(p) = params
        .iter()
        .filter(|p| p.location == ParamLocation::Path)
        .find(exact)
        .or_else(|| params.iter().find(exact))
    {
        return Some(p);
    }

    let placeholder_snake = to_snake_case(placeholder);
    params
        .iter()
        .find(|p| to_snake_case(&p.name) == placeholder_snake)
}

fn target_identifier(param: &ParameterDescriptor) -> String {
    if param.param_name.is_empty() {
        sanitize_identifier(&param.name)
    } else {
        param.param_name.clone()
    }
}

fn push_static(rendered: &mut String, c: char, dialect: PathDialect) {
    let escaped = match dialect {
        PathDialect::TypeScript | PathDialect::TypeScriptPlain => matches!(c, '\\' | '`' | '$'),
        PathDialect::CSharp => matches!(c, '\\' | '"'),
    };
    if escaped {
        rendered.push('\\');
    }
    rendered.push(c);
}

fn interpolation(param: &ParameterDescriptor, identifier: &str, dialect: PathDialect) -> String {
    match dialect {
        PathDialect::TypeScript => {
            let data_format = param
                .data_format
                .as_deref()
                .map(|f| format!("\"{}\"", escape_string_literal(f)))
                .unwrap_or_else(|| "undefined".to_string());
            format!(
                "${{encodeParam({{name: \"{name}\", value: {identifier}, in: \"path\", style: \"{style}\", explode: {explode}, dataType: \"{data_type}\", dataFormat: {data_format}}})}}",
                name = escape_string_literal(&param.name),
                style = param.style.as_deref().unwrap_or("simple"),
                explode = param.explode.unwrap_or(false),
                data_type = escape_string_literal(&param.data_type),
            )
        }
        PathDialect::TypeScriptPlain => format!("${{{identifier}}}"),
        PathDialect::CSharp => format!("{{Uri.EscapeDataString({identifier}.ToString())}}"),
    }
}
