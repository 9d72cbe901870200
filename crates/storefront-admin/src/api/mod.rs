//! HTTP implementations of the framework's remote seams.

pub mod auth;
pub mod http;
pub mod resource;
pub mod settings;
pub mod uploads;

pub use auth::HttpAuthApi;
pub use http::ApiClient;
pub use resource::HttpResource;
pub use settings::SettingsApi;
pub use uploads::{upload_fn, UploadedFile};
