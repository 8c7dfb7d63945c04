use crate::shared::infrastructure::groupware_api::{
    DashboardEndpoint, DashboardEnvelope, GroupwareApi, GroupwareApiError,
};
use reqwest::Client;
use tracing::{debug, warn};

pub struct HttpGroupwareApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGroupwareApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

#[async_trait::async_trait]
impl GroupwareApi for HttpGroupwareApi {
    async fn get_dashboard(
        &self,
        endpoint: DashboardEndpoint,
        month: Option<&str>,
    ) -> Result<DashboardEnvelope, GroupwareApiError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        debug!(%url, ?month, "groupware request");

        let mut request = self.client.get(&url);
        if let Some(month) = month {
            request = request.query(&[("month", month)]);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GroupwareApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "groupware request failed");
            return Err(GroupwareApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<DashboardEnvelope>()
            .await
            .map_err(|e| GroupwareApiError::Decode(e.to_string()))
    }
}
