//! cmk-discord - Checkmk notification plugin for Discord
//!
//! Reads a host or service notification from the `NOTIFY_*` environment,
//! renders it as a Discord embed and posts it to a webhook.

pub mod config;
pub mod context;
pub mod error;
pub mod io;
pub mod message;
pub mod render;
pub mod webhook;

pub use config::Config;
pub use context::{extract_context, lossy_vars, NotificationEvent};
pub use error::{NotifyError, Result};

use std::sync::Arc;

use crate::io::HttpClient;
use crate::webhook::DiscordWebhook;

/// Environment variable that turns on the JSON dump of event and payload
pub const DEBUG_ENV: &str = "DEBUG";

/// Handle one notification from the given environment listing.
///
/// Fails fast: nothing is posted unless the required fields and both URL
/// parameters check out and the event renders.
pub async fn run<I>(vars: I, http: Arc<dyn HttpClient>) -> Result<()>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut debug = None;
    let vars = vars.into_iter().inspect(|(key, value)| {
        if key == DEBUG_ENV {
            debug = Some(value.clone());
        }
    });
    let ctx = extract_context(vars);
    let config = Config::from_context(&ctx, config::debug_enabled(debug.as_deref()));

    let event = NotificationEvent::from_context(&ctx)?;
    config.validate()?;

    if config.debug {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }

    let message = render::render(&event, config.site_url.as_deref())?;

    if config.debug {
        println!("{}", serde_json::to_string_pretty(&message)?);
    }

    tracing::info!(
        "Sending {} notification for '{}'",
        event.notification_type,
        message.embeds[0].title
    );

    DiscordWebhook::new(config.webhook_url, http)
        .deliver(&message)
        .await
}
