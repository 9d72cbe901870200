use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Store-wide settings. A singleton, so not a `Resource`.
///
/// Keys this crate does not model are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_currency() -> String {
    "USD".to_string()
}
