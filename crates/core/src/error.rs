use thiserror::Error;

/// Fatal normalization failures. Recoverable degradations are logged instead.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Unbalanced braces in path template '{path}'")]
    UnbalancedBraces { path: String },

    #[error("Path template '{path}' references '{{{placeholder}}}' but no such parameter is declared")]
    UnknownPathParameter { path: String, placeholder: String },

    #[error("Cyclic inheritance chain: {}", chain.join(" -> "))]
    CyclicInheritance { chain: Vec<String> },

    #[error("Duplicate schema '{name}'. Each schema must have a unique name.")]
    DuplicateSchema { name: String },

    #[error("Property name '{name}' on schema '{schema}' is produced by both '{first}' and '{second}'")]
    NameCollision {
        schema: String,
        name: String,
        first: String,
        second: String,
    },

    #[error(
        "Duplicate operationId '{operation_id}' detected. Each operation must have a unique identifier."
    )]
    DuplicateOperation { operation_id: String },

    #[error("Failed to parse model document: {0}")]
    Parse(#[from] serde_json::Error),
}
