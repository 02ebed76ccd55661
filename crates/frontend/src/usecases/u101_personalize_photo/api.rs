//! API client for the personalization service.

use contracts::usecases::u101_personalize_photo::{ApiErrorDetail, PERSONALIZE_PATH, UPLOAD_FIELD};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Shown when neither a structured detail nor a usable body is available
pub const FALLBACK_ERROR: &str = "Failed to process image";

/// Personalized image returned by the service
pub struct PersonalizedImage {
    pub bytes: Vec<u8>,
    /// Content type reported by the service; the endpoint answers with PNG
    pub mime: String,
}

/// Submits the photo as a single-field multipart POST and awaits the binary
/// result. Errors are human-readable and ready for inline display.
pub async fn personalize(file: &web_sys::File) -> Result<PersonalizedImage, String> {
    let form = web_sys::FormData::new().map_err(|e| format!("{:?}", e))?;
    form.append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
        .map_err(|e| format!("{:?}", e))?;

    // The browser derives the multipart boundary from the FormData body;
    // no explicit Content-Type header here.
    let response = Request::post(&api_url(PERSONALIZE_PATH))
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(error_from_body(status, &body));
    }

    let mime = response
        .headers()
        .get("content-type")
        .unwrap_or_else(|| "image/png".to_string());
    let bytes = response.binary().await.map_err(|e| e.to_string())?;

    Ok(PersonalizedImage { bytes, mime })
}

/// Picks the best available message out of a failure response: the structured
/// `detail` field if the body parses, else the raw body text, else a generic
/// fallback.
fn error_from_body(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorDetail>(body) {
        if !parsed.detail.trim().is_empty() {
            return parsed.detail;
        }
    }

    let body = body.trim();
    if body.is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        format!("HTTP {}: {}", status, body)
    }
}
