//! SendGrid v3 mail-send binding.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::{EmailTransport, TransportError, TransportResponse};
use crate::config::TransportConfig;
use crate::notifier::ComposedMessage;

/// HTTP client for the SendGrid v3 mail-send endpoint
pub struct SendGridTransport {
    client: Client,
    endpoint: String,
}

impl SendGridTransport {
    /// Build a transport from the `[transport]` configuration section.
    ///
    /// The base URL is configurable so the client can be pointed at a stub
    /// server or a regional endpoint.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let endpoint = format!("{}/v3/mail/send", config.base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint })
    }
}

/// Build the mail-send JSON payload for a composed message.
///
/// Wire shape: `{personalizations: [{to: [...]}], from: {email}, subject,
/// content: [{type, value}]}`, plain text only.
fn build_payload(message: &ComposedMessage) -> Value {
    json!({
        "personalizations": [{
            "to": message
                .recipients
                .iter()
                .map(|email| json!({ "email": email }))
                .collect::<Vec<_>>(),
        }],
        "from": { "email": message.from },
        "subject": message.subject,
        "content": [{ "type": "text/plain", "value": message.body }],
    })
}

#[async_trait]
impl EmailTransport for SendGridTransport {
    async fn send(
        &self,
        api_key: &str,
        message: &ComposedMessage,
    ) -> Result<TransportResponse, TransportError> {
        let payload = build_payload(message);
        debug!(endpoint = %self.endpoint, "Posting mail-send request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let headers: std::collections::HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
            headers,
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
