use super::AssetStore;
use crate::config::CloudinaryConfig;
use crate::error::AssetError;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, warn};

/// Cloudinary upload api client
///
/// Uploads are signed with the api secret and always overwrite the asset with
/// the same public id, so the returned delivery url never changes for a pot.
pub struct CloudinaryAssetStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryAssetStore {
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> Result<Self, AssetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(CloudinaryAssetStore { client, config })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Unversioned delivery url, stays valid across overwrites
    pub fn delivery_url(&self, public_id: &str) -> String {
        format!(
            "{}/{}/image/upload/{}",
            self.config.delivery_base.trim_end_matches('/'),
            self.config.cloud_name,
            public_id
        )
    }
}

/// Signs upload parameters: sorted `key=value` pairs joined by `&`, followed by the secret
pub fn sign_params(params: &[(&'static str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    async fn upload(&self, public_id: &str, bytes: Bytes) -> Result<String, AssetError> {
        let params = vec![
            ("invalidate", "true".to_owned()),
            ("overwrite", "true".to_owned()),
            ("public_id", public_id.to_owned()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];
        let signature = sign_params(&params, &self.config.api_secret);

        let mut form = Form::new();
        for (key, value) in params {
            form = form.text(key, value);
        }
        let form = form
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .part(
                "file",
                Part::bytes(bytes.to_vec()).file_name(public_id.to_owned()),
            );

        let resp = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssetError::Rejected(
                public_id.to_owned(),
                status.as_u16(),
                body,
            ));
        }

        debug!("Uploaded asset {}", public_id);
        Ok(self.delivery_url(public_id))
    }

    async fn fetch(&self, url: &str) -> Result<Option<Bytes>, AssetError> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            warn!("Fetching {} answered {}", url, resp.status());
            return Ok(None);
        }
        Ok(Some(resp.bytes().await?))
    }
}
