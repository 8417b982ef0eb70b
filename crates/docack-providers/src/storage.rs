//! Typed client for the managed object storage.
//!
//! A single document bucket with three operations: `put`, `public_url`,
//! and `remove`. Removal is best-effort at the call site — the document
//! directory logs a failed removal and proceeds with the row delete.
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|-----------------------------------------------|-----------|
//! | POST   | `/storage/v1/object/{bucket}/{name}`          | Upload    |
//! | DELETE | `/storage/v1/object/{bucket}/{name}`          | Remove    |
//! |        | `/storage/v1/object/public/{bucket}/{name}`   | Public URL|

use url::Url;
use zeroize::Zeroizing;

use crate::error::ProviderError;
use crate::retry::retry_send;

/// Storage API path prefix on the managed backend.
const STORAGE_PREFIX: &str = "storage/v1";

/// Client for the managed object storage.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: Url,
    bucket: String,
    secret_key: Zeroizing<String>,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl StorageClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        bucket: String,
        secret_key: Zeroizing<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            bucket,
            secret_key,
        }
    }

    /// Store `bytes` under `name` in the document bucket.
    ///
    /// Calls `POST {base_url}/storage/v1/object/{bucket}/{name}`.
    pub async fn put(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ProviderError> {
        let endpoint = format!("POST /object/{}/{name}", self.bucket);
        let url = crate::endpoint_url(
            &self.base_url,
            &format!("{STORAGE_PREFIX}/object/{}/{name}", self.bucket),
            &endpoint,
        )?;
        let content_type = content_type.to_string();

        let resp = retry_send(|| {
            self.http
                .post(url.clone())
                .bearer_auth(self.secret_key.as_str())
                .header(reqwest::header::CONTENT_TYPE, content_type.clone())
                .body(bytes.clone())
                .send()
        })
        .await
        .map_err(|e| ProviderError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint,
                status,
                body,
            });
        }

        Ok(())
    }

    /// The durable public URL for an object in the document bucket.
    ///
    /// Pure URL construction — no request is issued.
    pub fn public_url(&self, name: &str) -> String {
        let path = format!("{STORAGE_PREFIX}/object/public/{}/{name}", self.bucket);
        match self.base_url.join(&path) {
            Ok(url) => url.into(),
            Err(_) => format!("{}{path}", self.base_url),
        }
    }

    /// Remove an object from the document bucket.
    ///
    /// Calls `DELETE {base_url}/storage/v1/object/{bucket}/{name}`.
    pub async fn remove(&self, name: &str) -> Result<(), ProviderError> {
        let endpoint = format!("DELETE /object/{}/{name}", self.bucket);
        let url = crate::endpoint_url(
            &self.base_url,
            &format!("{STORAGE_PREFIX}/object/{}/{name}", self.bucket),
            &endpoint,
        )?;

        let resp = retry_send(|| {
            self.http
                .delete(url.clone())
                .bearer_auth(self.secret_key.as_str())
                .send()
        })
        .await
        .map_err(|e| ProviderError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint,
                status,
                body,
            });
        }

        Ok(())
    }
}
