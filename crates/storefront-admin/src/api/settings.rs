use super::ApiClient;
use crate::model::SiteSettings;
use admin_framework::envelope::item;
use admin_framework::ApiError;

/// The `/settings` singleton.
#[derive(Clone, Debug)]
pub struct SettingsApi {
    client: ApiClient,
}

impl SettingsApi {
    const PATH: &'static str = "settings";

    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn load(&self) -> Result<SiteSettings, ApiError> {
        let body = self.client.get(Self::PATH, &[]).await?;
        item(body)
    }

    /// Writes the whole settings object and returns what the server stored.
    pub async fn save(&self, settings: &SiteSettings) -> Result<SiteSettings, ApiError> {
        let body = self.client.put_json(Self::PATH, settings).await?;
        item(body)
    }
}
