//! BDD test world for cmk-discord

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use cucumber::World;
use cmk_discord::io::{HttpClient, HttpResponse};

/// Webhook stand-in that records every request and answers with a fixed response
#[derive(Debug)]
pub struct RecordingWebhook {
    pub status: u16,
    pub body: String,
    pub requests: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingWebhook {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for RecordingWebhook {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> cmk_discord::Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        Ok(HttpResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

#[derive(Debug, Default, World)]
pub struct NotifyWorld {
    /// Process environment handed to the plugin
    pub env: BTreeMap<String, String>,
    pub webhook: Option<Arc<RecordingWebhook>>,
    pub result: Option<cmk_discord::Result<()>>,
}

impl NotifyWorld {
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.env
            .insert(format!("NOTIFY_{}", name), value.to_string());
    }

    pub fn requests(&self) -> Vec<(String, serde_json::Value)> {
        self.webhook
            .as_ref()
            .map(|w| w.requests.lock().unwrap().clone())
            .unwrap_or_default()
    }

    /// The single embed of the single request that was sent
    pub fn embed(&self) -> serde_json::Value {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        let embeds = requests[0].1["embeds"].as_array().expect("no embeds array");
        assert_eq!(embeds.len(), 1, "expected exactly one embed");
        embeds[0].clone()
    }
}
