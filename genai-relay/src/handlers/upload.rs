//! Multipart form reading for the upload endpoints.

use crate::dtos::UploadedFile;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use service_core::error::AppError;

/// Fields of interest from an upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub prompt: Option<String>,
}

/// Read the file part named `file_field` and the `prompt` text part.
///
/// A request that is not multipart yields an empty form so the caller reports
/// the missing file. Only parts carrying a filename count as files; an empty
/// prompt counts as absent. Other fields are ignored, as is any repeat of the
/// file field.
pub async fn read_upload_form(
    multipart: Result<Multipart, MultipartRejection>,
    file_field: &str,
    max_upload_bytes: usize,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Request body is not multipart");
            return Ok(form);
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == file_field && form.file.is_none() {
            let Some(file_name) = field.file_name().map(str::to_owned) else {
                continue;
            };
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(multipart_error)?;

            if data.len() > max_upload_bytes {
                return Err(AppError::PayloadTooLarge(anyhow::anyhow!(
                    "File too large (max {} bytes)",
                    max_upload_bytes
                )));
            }

            form.file = Some(UploadedFile {
                file_name,
                mime_type,
                data: data.to_vec(),
            });
        } else if name == "prompt" {
            let text = field.text().await.map_err(multipart_error)?;
            if !text.is_empty() {
                form.prompt = Some(text);
            }
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(anyhow::anyhow!(err.body_text()))
    } else {
        AppError::BadRequest(anyhow::anyhow!(
            "Failed to read multipart body: {}",
            err.body_text()
        ))
    }
}
