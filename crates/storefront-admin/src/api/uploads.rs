use super::http::transport;
use super::ApiClient;
use admin_framework::envelope::item;
use admin_framework::{ApiError, MultipartPayload, ProgressEvent, ProgressFn, UploadFn};
use bytes::Bytes;
use futures::{stream, FutureExt, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const UPLOAD_PATH: &str = "uploads";
const CHUNK_SIZE: usize = 64 * 1024;

/// What the server returns for a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Splits `bytes` into a body stream that reports each chunk as it is
/// handed to the connection.
fn counting_body(bytes: Bytes, on_progress: ProgressFn) -> Body {
    let total = bytes.len() as u64;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < bytes.len() {
        let end = (start + CHUNK_SIZE).min(bytes.len());
        chunks.push((bytes.slice(start..end), end as u64));
        start = end;
    }

    let body = stream::iter(chunks).map(move |(chunk, loaded)| {
        on_progress(ProgressEvent::new(loaded, Some(total)));
        Ok::<Bytes, std::io::Error>(chunk)
    });
    Body::wrap_stream(body)
}

fn multipart_form(payload: MultipartPayload, on_progress: ProgressFn) -> Result<Form, ApiError> {
    let file = payload.file;
    let length = file.size();
    let part = Part::stream_with_length(counting_body(file.bytes, on_progress), length)
        .file_name(file.file_name)
        .mime_str(&file.content_type)
        .map_err(transport)?;

    let form = payload
        .fields
        .into_iter()
        .fold(Form::new(), |form, (key, value)| form.text(key, value));
    Ok(form.part(MultipartPayload::FILE_FIELD, part))
}

/// `POST /uploads` as an [`UploadFn`] for [`admin_framework::UseUpload`].
pub fn upload_fn(client: ApiClient) -> UploadFn<UploadedFile> {
    Arc::new(move |payload: MultipartPayload, on_progress: ProgressFn| {
        let client = client.clone();
        async move {
            let form = multipart_form(payload, on_progress)?;
            let body = client.post_multipart(UPLOAD_PATH, form).await?;
            item(body)
        }
        .boxed()
    })
}
