//! Plugin parameters and their validation

use crate::context::RawAttributes;
use crate::NotifyError;

/// Webhook URL prefixes Discord hands out; both are still in use
pub const WEBHOOK_URL_PREFIXES: [&str; 2] = ["https://discord.com", "https://discordapp.com"];

/// Runtime configuration for one notification run
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Discord webhook URL (`NOTIFY_PARAMETER_1`)
    pub webhook_url: String,
    /// Base URL of the Checkmk site used to build embed links (`NOTIFY_PARAMETER_2`)
    pub site_url: Option<String>,
    /// Dump the event and payload to stdout before delivery
    pub debug: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // the webhook URL embeds its secret token
        f.debug_struct("Config")
            .field("site_url", &self.site_url)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_context(ctx: &RawAttributes, debug: bool) -> Self {
        let webhook_url = ctx.get("PARAMETER_1").cloned().unwrap_or_default();
        let site_url = ctx
            .get("PARAMETER_2")
            .filter(|url| !url.is_empty())
            .cloned();

        Self {
            webhook_url,
            site_url,
            debug,
        }
    }

    /// Reject parameters that cannot possibly work before anything is rendered.
    pub fn validate(&self) -> crate::Result<()> {
        if self.webhook_url.is_empty() {
            return Err(NotifyError::Config(
                "Empty webhook url given as parameter 1".to_string(),
            ));
        }

        if !WEBHOOK_URL_PREFIXES
            .iter()
            .any(|prefix| self.webhook_url.starts_with(prefix))
        {
            return Err(NotifyError::Config(format!(
                "Invalid Discord webhook url given as first parameter (not starting with {})",
                WEBHOOK_URL_PREFIXES.join(" or ")
            )));
        }

        if let Some(site_url) = &self.site_url {
            if !site_url.starts_with("http") {
                return Err(NotifyError::Config(format!(
                    "Invalid site url given as second parameter (not starting with http): {}",
                    site_url
                )));
            }
        }

        Ok(())
    }
}

/// Interpret the `DEBUG` environment variable.
pub fn debug_enabled(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) => !matches!(
            v.to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
    }
}
