//! API model normalization
//!
//! Turns a parsed API description (schemas and operations) into a normalized,
//! deterministic model ready for template rendering:
//!
//! - `registry` - name-keyed arena of schema nodes
//! - `normalize` - inheritance, composition and discriminator reconciliation
//! - `ordering` - deterministic ordering of property and parameter lists
//! - `path` - path template expansion
//! - `response` - success response classification
//! - `operation` - per-operation annotation
//! - `pipeline` - whole-document entry points

pub mod error;
pub mod model;
pub mod normalize;
pub mod operation;
pub mod ordering;
pub mod path;
pub mod pipeline;
pub mod registry;
pub mod response;
pub mod utils;

// Re-export commonly used types
pub use error::NormalizeError;
pub use model::{
    ModelDocument, NormalizedModel, OperationDescriptor, ParameterDescriptor, PropertyDescriptor,
    ResponseDescriptor, SchemaNode, SuccessShape,
};
pub use pipeline::{normalize_document, normalize_json};
pub use registry::SchemaRegistry;
