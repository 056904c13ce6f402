use crate::dtos::{GenerateResponse, GenerateTextRequest};
use crate::handlers::upload::read_upload_form;
use crate::services::generation;
use crate::services::providers::PromptPart;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, rejection::BytesRejection, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

pub const IMAGE_FIELD: &str = "image";
pub const DOCUMENT_FIELD: &str = "document";

const PROMPT_PREVIEW_CHARS: usize = 50;

/// `POST /generate-text`
pub async fn generate_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let body = body.map_err(body_error)?;
    let request = parse_text_request(&headers, &body)?;
    request.validate()?;
    let prompt = request.prompt.unwrap_or_default();

    tracing::info!(prompt = %preview(&prompt), "Generating text");

    let parts = [PromptPart::text(prompt)];
    let result = generation::generate(state.provider.as_ref(), "generate-text", &parts).await?;

    tracing::info!("Text generated successfully");
    Ok(Json(GenerateResponse { result }))
}

/// `POST /generate-image`
pub async fn generate_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let form = read_upload_form(
        multipart,
        IMAGE_FIELD,
        state.config.uploads.max_upload_bytes,
    )
    .await?;

    let file = form.file.ok_or_else(|| {
        AppError::bad_request(
            "No image file uploaded. Use 'image' as the field name in form-data",
        )
    })?;
    let prompt = form
        .prompt
        .ok_or_else(|| AppError::bad_request("Prompt is required in form-data"))?;

    if !file.mime_type.starts_with("image/") {
        return Err(AppError::bad_request(format!(
            "Unsupported image type '{}'. Upload an image file",
            file.mime_type
        )));
    }

    tracing::info!(
        file_name = %file.file_name,
        mime_type = %file.mime_type,
        size = file.data.len(),
        "Analyzing image"
    );

    let parts = [
        PromptPart::text(prompt),
        PromptPart::inline_bytes(&file.mime_type, &file.data),
    ];
    let result = generation::generate(state.provider.as_ref(), "generate-image", &parts).await?;

    tracing::info!("Image analyzed successfully");
    Ok(Json(GenerateResponse { result }))
}

/// `POST /generate-from-document`
pub async fn generate_from_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let form = read_upload_form(
        multipart,
        DOCUMENT_FIELD,
        state.config.uploads.max_upload_bytes,
    )
    .await?;

    let file = form.file.ok_or_else(|| {
        AppError::bad_request(
            "No document file uploaded. Use 'document' as the field name in form-data",
        )
    })?;
    let prompt = form
        .prompt
        .unwrap_or_else(|| state.config.uploads.default_document_prompt.clone());

    tracing::info!(
        file_name = %file.file_name,
        mime_type = %file.mime_type,
        size = file.data.len(),
        "Processing document"
    );

    let parts = [
        PromptPart::text(prompt),
        PromptPart::inline_bytes(&file.mime_type, &file.data),
    ];
    let result =
        generation::generate(state.provider.as_ref(), "generate-from-document", &parts).await?;

    tracing::info!("Document processed successfully");
    Ok(Json(GenerateResponse { result }))
}

/// Decode the text request by content type. Bodies that are empty, of an
/// unknown type, or JSON values other than objects decode to an empty
/// request, which then fails validation as a missing prompt.
fn parse_text_request(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<GenerateTextRequest, AppError> {
    if body.is_empty() {
        return Ok(GenerateTextRequest::default());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))?;
        if !value.is_object() {
            return Ok(GenerateTextRequest::default());
        }
        serde_json::from_value(value)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))
    } else if mime == "application/x-www-form-urlencoded" {
        serde_urlencoded::from_bytes(body)
            .map_err(|e| AppError::bad_request(format!("Invalid form body: {}", e)))
    } else {
        Ok(GenerateTextRequest::default())
    }
}

fn body_error(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(anyhow::anyhow!("Request body too large"))
    } else {
        AppError::BadRequest(anyhow::anyhow!(
            "Failed to read request body: {}",
            rejection.body_text()
        ))
    }
}

fn preview(prompt: &str) -> String {
    let mut preview: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
    if prompt.chars().count() > PROMPT_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}
