//! Multipart upload of the selected xlsx file.

use gloo_net::http::Request;
use web_sys::{File, FormData};

use super::error_text;
use crate::types::{AppError, AppResult, UploadResponse};

/// Send the file to `/api/upload` and wait for the pipeline to finish.
pub async fn upload_xlsx(file: File, backend_url: &str) -> AppResult<UploadResponse> {
    let form_data = FormData::new()
        .map_err(|e| AppError::Network(format!("Failed to create FormData: {:?}", e)))?;

    form_data
        .append_with_blob_and_filename("file", &file, &file.name())
        .map_err(|e| AppError::Network(format!("Failed to append file: {:?}", e)))?;

    let url = format!("{}/api/upload", backend_url);
    let request = Request::post(&url)
        .body(form_data)
        .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    if !response.ok() {
        return Err(AppError::Upload(error_text(response).await));
    }

    response
        .json::<UploadResponse>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use crate::types::ErrorBody;

    #[test]
    fn test_error_body_deserialization() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"status":"error","error":"Please select a valid .xlsx file"}"#)
                .unwrap();
        assert_eq!(body.error, "Please select a valid .xlsx file");
    }
}
