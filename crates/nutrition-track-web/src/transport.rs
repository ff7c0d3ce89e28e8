//! `fetch` transport and file reading.

use nutrition_track_core::{FileSource, PendingFile};
use nutrition_track_upload::{AnalysisRequest, AnalysisTransport, TransportError, TransportResponse};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, FormData, Request, RequestInit, Response};

/// Posts analysis requests as `multipart/form-data` with `window.fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl AnalysisTransport for FetchTransport {
    async fn send(&self, request: &AnalysisRequest) -> Result<TransportResponse, TransportError> {
        post_multipart(request)
            .await
            .map_err(|error| TransportError(describe(&error)))
    }
}

async fn post_multipart(request: &AnalysisRequest) -> Result<TransportResponse, JsValue> {
    let bytes = js_sys::Uint8Array::from(request.bytes.as_ref());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&request.media_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename(request.field_name, &blob, &request.file_name)?;

    // The browser sets the multipart boundary header from the body.
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&form.into());
    let fetch_request = Request::new_with_str_and_init(&request.endpoint, &init)?;

    let window = web_sys::window().ok_or("window not available")?;
    let response: Response = JsFuture::from(window.fetch_with_request(&fetch_request))
        .await?
        .dyn_into()?;
    let body = JsFuture::from(response.text()?).await?;

    Ok(TransportResponse {
        status: response.status(),
        body: body.as_string().unwrap_or_default(),
    })
}

/// Reads a picked or dropped file into memory.
///
/// # Errors
/// Returns the browser's error when the file cannot be read.
pub async fn read_file(file: File, source: FileSource) -> Result<PendingFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|error| describe(&error))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(PendingFile::new(file.name(), file.type_(), bytes, source))
}

fn describe(error: &JsValue) -> String {
    error
        .as_string()
        .or_else(|| {
            error
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{error:?}"))
}
