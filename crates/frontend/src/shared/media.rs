//! Binary image helpers: reading browser files and turning byte buffers into
//! displayable references (data URIs and object URLs).

use base64::Engine;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Url};

/// Reads a browser `File` fully into memory.
pub async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let array_buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?;

    let uint8_array = js_sys::Uint8Array::new(&array_buffer);
    let mut bytes = vec![0; uint8_array.length() as usize];
    uint8_array.copy_to(&mut bytes);
    Ok(bytes)
}

/// Encodes bytes as a `data:` URI suitable for an `<img src=...>` attribute.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, payload)
}

/// Wraps bytes in a `Blob` of the given MIME type.
pub fn binary_blob(bytes: &[u8], mime: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime);

    Blob::new_with_u8_array_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Creates an ephemeral object URL resolving to the given bytes.
///
/// The returned URL holds browser resources until passed to
/// [`revoke_object_url`]; callers must revoke it once superseded.
pub fn object_url_for_bytes(bytes: &[u8], mime: &str) -> Result<String, String> {
    let blob = binary_blob(bytes, mime)?;
    Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))
}

/// Releases an object URL previously created by [`object_url_for_bytes`].
pub fn revoke_object_url(url: &str) {
    if Url::revoke_object_url(url).is_err() {
        log::warn!("failed to revoke object URL {}", url);
    }
}
