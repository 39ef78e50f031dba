//! Reqwest-based EMR backend client

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::types::{CreatedRecord, PatientSummary, SessionAggregate, Subrecord};
use crate::api::EmrBackend;
use crate::config::ApiConfig;
use crate::session::AuthSession;
use crate::workflow::registry::WorkflowKind;

const USER_AGENT: &str = concat!("clinicflow/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the EMR backend
pub struct EmrClient {
    base_url: String,
    session: AuthSession,
    client: reqwest::Client,
}

impl EmrClient {
    /// Create a new client with an established session
    pub fn new(config: &ApiConfig, session: AuthSession) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            client,
        })
    }

    /// Create a client from config plus the `CLINICFLOW_API_TOKEN`
    /// environment variable. Returns `NotConfigured` when no token is set.
    pub fn from_env(config: &ApiConfig) -> Result<Self, ApiError> {
        let session = AuthSession::from_env().ok_or(ApiError::NotConfigured)?;
        Self::new(config, session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::network(format!("Failed to parse response: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(self.session.token())
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        Self::parse(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &Value,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(self.session.token())
            .json(payload)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        Self::parse(response).await
    }
}

#[async_trait]
impl EmrBackend for EmrClient {
    fn name(&self) -> &str {
        "emr"
    }

    async fn create_initial(
        &self,
        kind: WorkflowKind,
        payload: &Value,
    ) -> Result<CreatedRecord, ApiError> {
        self.post_json(kind.resource(), payload).await
    }

    async fn create_subrecord(
        &self,
        kind: WorkflowKind,
        parent_id: &str,
        slot: &str,
        payload: &Value,
    ) -> Result<Subrecord, ApiError> {
        let path = format!("{}/{}/{}", kind.resource(), parent_id, slot);
        self.post_json(&path, payload).await
    }

    async fn get_complete(
        &self,
        kind: WorkflowKind,
        parent_id: &str,
    ) -> Result<SessionAggregate, ApiError> {
        let path = format!("{}/{}/complete", kind.resource(), parent_id);
        self.get_json(&path).await
    }

    async fn get_patient(&self, patient_id: &str) -> Result<PatientSummary, ApiError> {
        let path = format!("patients/{}", patient_id);
        self.get_json(&path).await
    }
}
