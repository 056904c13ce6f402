use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /generate-text`, accepted as JSON or URL-encoded form.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateTextRequest {
    #[validate(
        required(message = "Prompt is required in request body"),
        length(min = 1, message = "Prompt is required in request body")
    )]
    pub prompt: Option<String>,
}

/// Success body shared by every generation endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub result: String,
}

/// A file part read from a multipart upload, held in memory for the
/// lifetime of the request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_prompt_fails_validation() {
        let request = GenerateTextRequest::default();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_prompt_fails_validation() {
        let request = GenerateTextRequest {
            prompt: Some(String::new()),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_prompt_passes_validation() {
        let request = GenerateTextRequest {
            prompt: Some("hello".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}
