//! Schema and operation model consumed and produced by the normalizer.
//!
//! Authored fields come from the API description parser. Derived fields (the
//! categorized property and parameter lists, imports, rendered path, success
//! shape) are recomputed from the authored ones on every normalization pass,
//! which keeps the pass idempotent.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Name of the sentinel alternative that stands for `null` in a composition.
pub const NULL_VARIANT: &str = "Null";

/// One property of a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Target identifier ("petId")
    pub name: String,
    /// Wire name ("pet_id")
    pub base_name: String,
    /// Declared data type ("string", "Pet", "Array<Tag>")
    pub data_type: String,
    /// Schema this property refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complex_type: Option<String>,
    pub is_enum: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    pub is_required: bool,
    pub is_read_only: bool,
    pub is_nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Contributed by an ancestor and not overridden
    pub is_inherited: bool,
    /// Literal discriminant tag (tagged-union profile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,
}

impl PropertyDescriptor {
    pub fn new(name: &str, base_name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            base_name: base_name.to_string(),
            data_type: data_type.to_string(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn with_enum(mut self, values: &[&str]) -> Self {
        self.is_enum = true;
        self.enum_values = values.iter().map(|v| (*v).to_string()).collect();
        self
    }

    pub fn referencing(mut self, schema: &str) -> Self {
        self.complex_type = Some(schema.to_string());
        self
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    /// Matches either the target identifier or the wire name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.base_name == name
    }

    /// Same name and same ordered literal set, both enums.
    pub fn is_enum_equal(&self, other: &PropertyDescriptor) -> bool {
        self.is_enum
            && other.is_enum
            && self.name == other.name
            && self.enum_values == other.enum_values
    }
}

/// Discriminator declared on a polymorphic base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
    /// Wire tag -> schema name
    pub mapping: BTreeMap<String, String>,
}

impl Discriminator {
    /// Wire tag mapped to `schema`. When several tags map to the same schema
    /// the last one in tag order wins.
    pub fn tag_for(&self, schema: &str) -> Option<&str> {
        self.mapping
            .iter()
            .filter(|(_, model)| model.as_str() == schema)
            .map(|(tag, _)| tag.as_str())
            .last()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositionKind {
    #[default]
    #[serde(rename = "oneOf")]
    OneOf,
    #[serde(rename = "anyOf")]
    AnyOf,
    #[serde(rename = "allOf")]
    AllOf,
}

/// Reference to a schema this node is composed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposedRef {
    pub kind: CompositionKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_tag: Option<String>,
}

impl ComposedRef {
    pub fn new(kind: CompositionKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            mapping_tag: None,
        }
    }

    pub fn is_null_variant(&self) -> bool {
        self.name == NULL_VARIANT
    }
}

/// Import of another model, with its file name under the active naming convention.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelImport {
    pub classname: String,
    pub filename: String,
}

/// One named data shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaNode {
    pub name: String,
    /// Authored properties, never mutated by normalization
    pub properties: Vec<PropertyDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    pub children: Vec<String>,
    pub composed_from: Vec<ComposedRef>,
    pub is_map_type: bool,
    pub is_nullable: bool,
    /// Explicit tag; suppresses the mapping lookup for this child
    #[serde(rename = "x-discriminator-value", skip_serializing_if = "Option::is_none")]
    pub x_discriminator_value: Option<String>,

    // --- derived ---
    /// Structural base type (always `None` in the tagged-union profile)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub vars: Vec<PropertyDescriptor>,
    pub all_vars: Vec<PropertyDescriptor>,
    pub required_vars: Vec<PropertyDescriptor>,
    pub optional_vars: Vec<PropertyDescriptor>,
    pub read_only_vars: Vec<PropertyDescriptor>,
    pub read_write_vars: Vec<PropertyDescriptor>,
    pub parent_vars: Vec<PropertyDescriptor>,
    pub imports: BTreeSet<String>,
    pub model_imports: Vec<ModelImport>,
}

impl SchemaNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: Vec<PropertyDescriptor>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn with_discriminator(mut self, property_name: &str, mapping: &[(&str, &str)]) -> Self {
        self.discriminator = Some(Discriminator {
            property_name: property_name.to_string(),
            mapping: mapping
                .iter()
                .map(|(tag, model)| ((*tag).to_string(), (*model).to_string()))
                .collect(),
        });
        self
    }

    pub fn composed_of(mut self, kind: CompositionKind, names: &[&str]) -> Self {
        self.composed_from
            .extend(names.iter().map(|name| ComposedRef::new(kind, name)));
        self
    }

    pub fn has_enums(&self) -> bool {
        self.properties.iter().any(|p| p.is_enum)
    }

    pub fn discriminator_property(&self) -> Option<&str> {
        self.discriminator.as_ref().map(|d| d.property_name.as_str())
    }

    /// Every categorized list, for passes that touch all of them alike.
    pub fn categorized_lists_mut(&mut self) -> [&mut Vec<PropertyDescriptor>; 7] {
        [
            &mut self.vars,
            &mut self.all_vars,
            &mut self.required_vars,
            &mut self.optional_vars,
            &mut self.read_only_vars,
            &mut self.read_write_vars,
            &mut self.parent_vars,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    #[default]
    Query,
    Header,
    Cookie,
    Body,
    Form,
}

/// One operation parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterDescriptor {
    /// Source name as written in the path template or on the wire
    pub name: String,
    /// Target identifier; derived from `name` when empty
    pub param_name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<String>,
    pub required: bool,
    pub is_nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
}

impl ParameterDescriptor {
    pub fn new(name: &str, location: ParamLocation, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            location,
            data_type: data_type.to_string(),
            required: location == ParamLocation::Path,
            ..Self::default()
        }
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }
}

/// One declared response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseDescriptor {
    /// "200", "2XX", "default", ...
    pub status_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    pub is_array: bool,
    pub is_map: bool,
    /// Element type when `is_array`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Value type when `is_map`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseDescriptor {
    pub fn new(status_code: &str) -> Self {
        Self {
            status_code: status_code.to_string(),
            ..Self::default()
        }
    }

    pub fn with_data_type(mut self, data_type: &str) -> Self {
        self.data_type = Some(data_type.to_string());
        self
    }
}

/// Canonical shape of an operation's success payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type")]
pub enum SuccessShape {
    #[default]
    None,
    Object(String),
    Array(Option<String>),
    Map(Option<String>),
}

/// One API operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationDescriptor {
    pub operation_id: String,
    pub method: HttpMethod,
    /// Raw template ("/pets/{petId}/owner"), never rewritten
    pub path: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub responses: Vec<ResponseDescriptor>,

    // --- derived ---
    pub all_params: Vec<ParameterDescriptor>,
    pub path_params: Vec<ParameterDescriptor>,
    pub query_params: Vec<ParameterDescriptor>,
    pub header_params: Vec<ParameterDescriptor>,
    pub cookie_params: Vec<ParameterDescriptor>,
    pub body_params: Vec<ParameterDescriptor>,
    pub form_params: Vec<ParameterDescriptor>,
    pub required_params: Vec<ParameterDescriptor>,
    pub optional_params: Vec<ParameterDescriptor>,
    /// Path in the target interpolation syntax
    pub rendered_path: String,
    /// Source names of the parameters interpolated into the path, in order
    pub consumed_params: Vec<String>,
    pub success_shape: SuccessShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

impl OperationDescriptor {
    pub fn new(operation_id: &str, method: HttpMethod, path: &str) -> Self {
        Self {
            operation_id: operation_id.to_string(),
            method,
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn has_form_params(&self) -> bool {
        self.parameters
            .iter()
            .any(|p| p.location == ParamLocation::Form)
    }
}

/// Parsed API description handed to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDocument {
    pub schemas: Vec<SchemaNode>,
    pub operations: Vec<OperationDescriptor>,
}

impl ModelDocument {
    pub fn from_json(json: &str) -> Result<Self, NormalizeError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Output of one normalization run, consumed by template rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizedModel {
    /// Sorted by name
    pub schemas: Vec<SchemaNode>,
    pub operations: Vec<OperationDescriptor>,
    /// Any operation interpolated a path parameter
    pub has_encodable_params: bool,
    pub has_form_params: bool,
}

impl NormalizedModel {
    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub fn operation(&self, operation_id: &str) -> Option<&OperationDescriptor> {
        self.operations
            .iter()
            .find(|op| op.operation_id == operation_id)
    }

    pub fn to_json_pretty(&self) -> Result<String, NormalizeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Feed the normalized output back in as a document.
    pub fn into_document(self) -> ModelDocument {
        ModelDocument {
            schemas: self.schemas,
            operations: self.operations,
        }
    }
}
