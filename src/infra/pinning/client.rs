// Responsible for all communication with the pinning service.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::multipart;
use reqwest::StatusCode;
use serde_json::Value;

use crate::domain::types::Cid;
use crate::infra::config;

/// Client for the pinning service's file-pinning API.
///
/// Holds the bearer credential, so it lives on the relay side only.
/// Failures are surfaced to the caller unmodified; nothing here retries.
pub struct PinningClient {
    http: reqwest::Client,
    api_url: String,
    jwt: String,
}

impl PinningClient {
    pub fn new(api_url: impl Into<String>, jwt: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config::http_timeout())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            jwt: jwt.into(),
        })
    }

    pub fn from_config() -> Result<Self> {
        Self::new(config::pinata_api_url(), config::pinata_jwt())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Uploads a file and returns the upstream status and JSON body as-is.
    /// The relay passes both through verbatim.
    ///
    /// A non-JSON upstream body (some gateway errors) is wrapped in an
    /// `{"error": ...}` object so the response stays JSON.
    pub async fn pin_file_raw(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        display_name: Option<&str>,
    ) -> Result<(StatusCode, Value)> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let mut form = multipart::Form::new().part("file", part);
        if let Some(name) = display_name {
            form = form.text(
                "pinataMetadata",
                serde_json::json!({ "name": name }).to_string(),
            );
        }

        let resp = self
            .http
            .post(self.endpoint("pinning/pinFileToIPFS"))
            .header("Authorization", format!("Bearer {}", self.jwt))
            .multipart(form)
            .send()
            .await
            .context("pinning upload request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("failed to read pinning response body")?;
        let body = serde_json::from_str(&text)
            .unwrap_or_else(|_| serde_json::json!({ "error": text }));
        Ok((status, body))
    }

    /// Uploads a file and returns its CID. The display name, when given,
    /// is attached as pinning metadata alongside the multipart file name.
    pub async fn pin_file(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        display_name: Option<&str>,
    ) -> Result<Cid> {
        let (status, body) = self.pin_file_raw(bytes, file_name, display_name).await?;
        if !status.is_success() {
            bail!("pinning service returned {}: {}", status, body);
        }
        let cid = body
            .get("IpfsHash")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("no IpfsHash in pinning response: {}", body))?;
        Ok(Cid(cid.to_string()))
    }

    /// Removes a pin. Only called by the upload compensation step.
    pub async fn unpin(&self, cid: &Cid) -> Result<()> {
        let resp = self
            .http
            .delete(self.endpoint(&format!("pinning/unpin/{}", cid)))
            .header("Authorization", format!("Bearer {}", self.jwt))
            .send()
            .await
            .context("unpin request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("unpin of {} returned {}: {}", cid, status, body);
        }
        Ok(())
    }
}
