//! Typed client for the email delivery service.
//!
//! One operation: `send {to, subject, html}`. The from address is fixed by
//! configuration.

use serde::Serialize;
use url::Url;
use zeroize::Zeroizing;

use crate::error::ProviderError;

/// An outgoing message.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

/// Client for the email delivery service.
#[derive(Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Zeroizing<String>,
    from: String,
}

impl std::fmt::Debug for EmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

impl EmailClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        api_key: Zeroizing<String>,
        from: String,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            from,
        }
    }

    /// Send one message.
    ///
    /// Calls `POST {base_url}/emails`. Issues a single attempt: delivery
    /// is not idempotent, and a transport failure after the service has
    /// accepted the message would duplicate it on retry.
    pub async fn send(&self, message: &OutgoingEmail) -> Result<(), ProviderError> {
        let endpoint = "POST /emails";
        let url = crate::endpoint_url(&self.base_url, "emails", endpoint)?;

        let body = serde_json::json!({
            "from": self.from,
            "to": message.to,
            "subject": message.subject,
            "html": message.html,
        });

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        Ok(())
    }
}
