//! # Upload Hook
//!
//! [`UseUpload`] wraps a multipart upload. The upload function receives the
//! payload plus a progress callback; every [`ProgressEvent`] recomputes the
//! percentage from the byte counters and publishes it.
//!
//! Only one upload is tracked. Starting another while one is running just
//! overwrites the state of the first.

use crate::error::ApiError;
use bytes::Bytes;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// A file selected for upload.
#[derive(Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Keep file contents out of logs.
impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// A file plus extra text fields, sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPayload {
    pub file: UploadFile,
    pub fields: Vec<(String, String)>,
}

impl MultipartPayload {
    /// Form field name the file part is sent under.
    pub const FILE_FIELD: &'static str = "file";

    pub fn new<K, V>(file: UploadFile, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            file,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Byte counters reported while a body is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub loaded: u64,
    /// Unknown when the body length could not be determined.
    pub total: Option<u64>,
}

impl ProgressEvent {
    pub fn new(loaded: u64, total: Option<u64>) -> Self {
        Self { loaded, total }
    }

    /// Rounded percentage, capped at 100. `None` when the total is unknown or zero.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total.filter(|t| *t > 0)?;
        let pct = (self.loaded.min(total) as f64 * 100.0 / total as f64).round();
        Some(pct as u8)
    }
}

pub type ProgressFn = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Boxed async upload call; `R` is whatever the server returns for the stored file.
pub type UploadFn<R> =
    Arc<dyn Fn(MultipartPayload, ProgressFn) -> BoxFuture<'static, Result<R, ApiError>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct UploadState<R> {
    pub uploading: bool,
    /// 0..=100
    pub progress: u8,
    pub error: Option<String>,
    pub uploaded_file: Option<R>,
}

impl<R> Default for UploadState<R> {
    fn default() -> Self {
        Self {
            uploading: false,
            progress: 0,
            error: None,
            uploaded_file: None,
        }
    }
}

pub struct UseUpload<R> {
    upload_fn: UploadFn<R>,
    state: Arc<watch::Sender<UploadState<R>>>,
}

impl<R> UseUpload<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub fn new(upload_fn: UploadFn<R>) -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            upload_fn,
            state: Arc::new(state),
        }
    }

    /// Uploads `file` with optional extra form fields.
    pub async fn upload<K, V>(
        &self,
        file: UploadFile,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<R, ApiError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let payload = MultipartPayload::new(file, fields);
        debug!(file = ?payload.file, fields = payload.fields.len(), "Upload started");
        self.state.send_modify(|s| {
            s.uploading = true;
            s.progress = 0;
            s.error = None;
        });

        let state = self.state.clone();
        let on_progress: ProgressFn = Arc::new(move |event: ProgressEvent| {
            if let Some(progress) = event.percent() {
                state.send_if_modified(|s| {
                    let changed = s.progress != progress;
                    s.progress = progress;
                    changed
                });
            }
        });

        let result = (self.upload_fn)(payload, on_progress).await;
        match &result {
            Ok(uploaded) => {
                info!("Upload finished");
                self.state.send_modify(|s| {
                    s.uploading = false;
                    s.progress = 100;
                    s.uploaded_file = Some(uploaded.clone());
                });
            }
            Err(e) => {
                let message = e.display_message();
                warn!(error = %message, "Upload failed");
                self.state.send_modify(|s| {
                    s.uploading = false;
                    s.error = Some(message);
                });
            }
        }
        result
    }

    /// Zeroes every field.
    pub fn reset(&self) {
        self.state.send_replace(UploadState::default());
    }

    pub fn snapshot(&self) -> UploadState<R> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState<R>> {
        self.state.subscribe()
    }
}
