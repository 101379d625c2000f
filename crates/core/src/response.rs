//! Success response selection and payload shape classification.

use tracing::debug;

use crate::model::{ResponseDescriptor, SuccessShape};

/// Type name used when the success response carries no payload.
pub const EMPTY_RESPONSE: &str = "EmptyResponse";

/// Classification of an operation's responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessClassification {
    pub shape: SuccessShape,
    /// Status code of the selected response
    pub status_code: Option<String>,
    pub message: Option<String>,
}

/// 2xx family, including wildcard forms like `2XX`.
pub fn is_success_code(code: &str) -> bool {
    matches!(code, "200" | "201" | "202" | "204") || code.starts_with('2')
}

/// First success response, else the first response declared.
pub fn select_success_response(responses: &[ResponseDescriptor]) -> Option<&ResponseDescriptor> {
    responses
        .iter()
        .find(|r| is_success_code(&r.status_code))
        .or_else(|| responses.first())
}

/// Shape of one response's payload.
pub fn classify_shape(response: &ResponseDescriptor) -> SuccessShape {
    let named = [
        &response.data_type,
        &response.base_type,
        &response.container_type,
    ]
    .into_iter()
    .find_map(non_empty);

    if let Some(name) = named {
        SuccessShape::Object(name.to_string())
    } else if response.is_array {
        SuccessShape::Array(non_empty(&response.item_type).map(str::to_string))
    } else if response.is_map {
        SuccessShape::Map(non_empty(&response.value_type).map(str::to_string))
    } else {
        SuccessShape::Object(EMPTY_RESPONSE.to_string())
    }
}

/// Select the success response and classify it. Never fails.
pub fn classify_responses(responses: &[ResponseDescriptor]) -> SuccessClassification {
    let Some(response) = select_success_response(responses) else {
        debug!("No responses declared, success shape is None.");
        return SuccessClassification::default();
    };

    SuccessClassification {
        shape: classify_shape(response),
        status_code: Some(response.status_code.clone()),
        message: response.message.clone(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_code_family() {
        assert!(is_success_code("200"));
        assert!(is_success_code("204"));
        assert!(is_success_code("2XX"));
        assert!(is_success_code("206"));
        assert!(!is_success_code("404"));
        assert!(!is_success_code("default"));
    }

    #[test]
    fn test_success_response_preferred_over_earlier_error() {
        let responses = vec![
            ResponseDescriptor::new("404"),
            ResponseDescriptor::new("200").with_data_type("Pet"),
        ];

        let classification = classify_responses(&responses);

        assert_eq!(classification.shape, SuccessShape::Object("Pet".to_string()));
        assert_eq!(classification.status_code.as_deref(), Some("200"));
    }

    #[test]
    fn test_no_content_is_empty_response() {
        let classification = classify_responses(&[ResponseDescriptor::new("204")]);
        assert_eq!(
            classification.shape,
            SuccessShape::Object(EMPTY_RESPONSE.to_string())
        );
    }

    #[test]
    fn test_no_responses_is_none() {
        let classification = classify_responses(&[]);
        assert_eq!(classification.shape, SuccessShape::None);
        assert!(classification.status_code.is_none());
    }

    #[test]
    fn test_falls_back_to_first_response() {
        let mut error = ResponseDescriptor::new("default").with_data_type("Error");
        error.message = Some("unexpected error".to_string());
        let responses = vec![error, ResponseDescriptor::new("500")];

        let classification = classify_responses(&responses);

        assert_eq!(classification.shape, SuccessShape::Object("Error".to_string()));
        assert_eq!(classification.message.as_deref(), Some("unexpected error"));
    }

    #[test]
    fn test_type_name_precedence() {
        let mut response = ResponseDescriptor::new("200");
        response.base_type = Some("Pet".to_string());
        response.container_type = Some("array".to_string());
        assert_eq!(classify_shape(&response), SuccessShape::Object("Pet".to_string()));

        response.data_type = Some(String::new());
        response.base_type = None;
        assert_eq!(classify_shape(&response), SuccessShape::Object("array".to_string()));
    }

    #[test]
    fn test_array_and_map_shapes() {
        let mut array = ResponseDescriptor::new("200");
        array.is_array = true;
        array.item_type = Some("Pet".to_string());
        assert_eq!(classify_shape(&array), SuccessShape::Array(Some("Pet".to_string())));

        let mut map = ResponseDescriptor::new("200");
        map.is_map = true;
        assert_eq!(classify_shape(&map), SuccessShape::Map(None));
    }
}
