//! Wire contract of the personalization endpoint.
//!
//! The service accepts `POST {base-url}/api/personalize` as `multipart/form-data`
//! with a single field carrying the image bytes and answers with a binary image
//! body on success, or a JSON error body with a human-readable `detail` field.

use serde::{Deserialize, Serialize};

/// Endpoint path, relative to the configured service base URL
pub const PERSONALIZE_PATH: &str = "/api/personalize";

/// Name of the multipart field carrying the uploaded image
pub const UPLOAD_FIELD: &str = "file";

/// Filename used for the client-side download of the personalized result
pub const RESULT_FILENAME: &str = "personalized-illustration.png";

/// Structured error body returned by the service on failure.
///
/// Any fields besides `detail` are ignored; an error body that does not parse
/// into this shape is treated as unstructured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub detail: String,
}
