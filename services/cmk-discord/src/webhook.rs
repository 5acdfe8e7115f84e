//! Discord webhook delivery

use std::sync::Arc;

use crate::io::HttpClient;
use crate::message::WebhookMessage;
use crate::NotifyError;

/// Status Discord answers a successful webhook execution with
const NO_CONTENT: u16 = 204;

/// Posts rendered messages to a single Discord webhook
pub struct DiscordWebhook {
    url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for DiscordWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the webhook URL embeds its secret token
        f.debug_struct("DiscordWebhook").finish_non_exhaustive()
    }
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    /// Send the message once. Anything but 204 No Content is a failure.
    pub async fn deliver(&self, message: &WebhookMessage) -> crate::Result<()> {
        let body = serde_json::to_value(message)?;

        tracing::debug!("Sending Discord notification with {} embed(s)", message.embeds.len());

        let response = self.http.post_json(&self.url, &body).await?;

        if response.status != NO_CONTENT {
            return Err(NotifyError::Delivery {
                status: response.status,
                body: response.body,
            });
        }

        tracing::debug!("Discord notification sent successfully");
        Ok(())
    }
}
