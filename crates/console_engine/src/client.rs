use std::time::Duration;

use reqwest::header::ACCEPT;

use crate::error::{map_reqwest_error, RemoteError};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub jobs_status_url: String,
    pub vm_list_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// When false, certificate validation is skipped (self-signed cluster
    /// certificates).
    pub verify_tls: bool,
}

impl ApiSettings {
    /// Settings for the conventional endpoint layout under `base`.
    pub fn for_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            jobs_status_url: format!("{base}/api/jobs"),
            vm_list_url: format!("{base}/api/vms"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            verify_tls: true,
        }
    }
}

/// A raw response: status plus body, with no interpretation applied. Every
/// caller routes this through the session guard before reading the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait::async_trait]
pub trait ManagementApi: Send + Sync {
    async fn jobs_status(&self) -> Result<HttpReply, RemoteError>;
    async fn vm_list(&self) -> Result<HttpReply, RemoteError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(|err| RemoteError::ClientSetup(err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn get(&self, url: &str) -> Result<HttpReply, RemoteError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| RemoteError::InvalidUrl(err.to_string()))?;
        let response = self
            .client
            .get(parsed)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(map_reqwest_error)?
            .to_vec();
        Ok(HttpReply { status, body })
    }
}

#[async_trait::async_trait]
impl ManagementApi for ReqwestApi {
    async fn jobs_status(&self) -> Result<HttpReply, RemoteError> {
        self.get(&self.settings.jobs_status_url).await
    }

    async fn vm_list(&self) -> Result<HttpReply, RemoteError> {
        self.get(&self.settings.vm_list_url).await
    }
}
