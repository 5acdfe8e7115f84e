//! Rendering of notification events into Discord embeds

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::context::{EventKind, NotificationEvent};
use crate::message::{Embed, EmbedField, EmbedFooter, WebhookMessage};
use crate::NotifyError;

/// Discord caps embed descriptions at this many characters
pub const DESCRIPTION_LIMIT: usize = 1024;

const ELLIPSIS: &str = "...";

pub const SENDER_PREFIX: &str = "Checkmk - ";
pub const AVATAR_URL: &str = "https://checkmk.com/android-chrome-192x192.png";

pub const GREEN: u32 = 5763719;
pub const ORANGE: u32 = 15105570;
pub const RED: u32 = 15548997;
pub const DARK_GREY: u32 = 9936031;
pub const YELLOW: u32 = 16776960;

/// Notification type prefixes and their icons, first match wins
const NOTIFICATION_EMOJIS: [(&str, &str); 8] = [
    ("PROBLEM", "\u{1F6A8}"),
    ("RECOVERY", "\u{2705}"),
    ("ACKNOWLEDGEMENT", "\u{2611}\u{FE0F}"),
    ("FLAPPINGSTART", "\u{203D}"),
    ("FLAPPINGSTOP", "\u{2705}"),
    ("DOWNTIMESTART", "\u{23F0}"),
    ("DOWNTIMEEND", "\u{2705}"),
    ("DOWNTIMECANCELLED", "\u{2611}\u{FE0F}"),
];

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Monitoring states Checkmk reports for hosts and services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Down,
    Warning,
    Ok,
    Up,
    Unknown,
    Unreachable,
}

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::Critical,
        Severity::Down,
        Severity::Warning,
        Severity::Ok,
        Severity::Up,
        Severity::Unknown,
        Severity::Unreachable,
    ];

    /// Embed color bar for this state
    pub fn color(self) -> u32 {
        match self {
            Severity::Critical | Severity::Down => RED,
            Severity::Warning => YELLOW,
            Severity::Ok | Severity::Up => GREEN,
            Severity::Unknown => ORANGE,
            Severity::Unreachable => DARK_GREY,
        }
    }

    /// Comma separated list of every state name
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Down => write!(f, "DOWN"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Ok => write!(f, "OK"),
            Severity::Up => write!(f, "UP"),
            Severity::Unknown => write!(f, "UNKNOWN"),
            Severity::Unreachable => write!(f, "UNREACHABLE"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = NotifyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CRITICAL" => Ok(Severity::Critical),
            "DOWN" => Ok(Severity::Down),
            "WARNING" => Ok(Severity::Warning),
            "OK" => Ok(Severity::Ok),
            "UP" => Ok(Severity::Up),
            "UNKNOWN" => Ok(Severity::Unknown),
            "UNREACHABLE" => Ok(Severity::Unreachable),
            _ => Err(NotifyError::UnknownSeverity(s.to_string())),
        }
    }
}

/// Icon for a notification type, or an empty string if none applies.
pub fn emoji_for(notification_type: &str) -> &'static str {
    NOTIFICATION_EMOJIS
        .iter()
        .find(|(prefix, _)| notification_type.starts_with(prefix))
        .map(|(_, emoji)| *emoji)
        .unwrap_or("")
}

/// Parse the Checkmk timestamp, falling back to the current time.
///
/// Values without an offset are taken as local time. A value that cannot be
/// parsed never fails the notification.
pub fn resolve_timestamp(raw: &str) -> DateTime<Local> {
    match parse_timestamp(raw.trim()) {
        Some(ts) => ts,
        None => {
            tracing::warn!("Could not parse timestamp '{}', using current time", raw);
            Local::now()
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Local));
    }

    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::<FixedOffset>::parse_from_str(raw, fmt).ok())
    {
        return Some(ts.with_timezone(&Local));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Local.from_local_datetime(&naive).earliest()
}

/// Shorten `text` to at most `max_len` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Build the embed description.
///
/// When the state line, output and comment together exceed the Discord
/// limit, only the (truncated) plugin output is kept.
pub fn describe(last_state: &str, state: &str, output: &str, comment: &str) -> String {
    let mut description = format!("**{} -> {}**\n\n{}", last_state, state, output);
    if !comment.is_empty() {
        description.push_str("\n\n");
        description.push_str(comment);
    }

    if description.chars().count() > DESCRIPTION_LIMIT {
        tracing::debug!(
            "Description exceeds {} characters, keeping output only",
            DESCRIPTION_LIMIT
        );
        return truncate(output, DESCRIPTION_LIMIT);
    }
    description
}

/// Render a notification event into a webhook payload.
pub fn render(
    event: &NotificationEvent,
    site_url: Option<&str>,
) -> crate::Result<WebhookMessage> {
    let color = event.state.parse::<Severity>()?.color();
    let emoji = emoji_for(&event.notification_type);

    let (title, fields) = match event.kind {
        EventKind::Service => (
            format!("{}{}: {}", emoji, event.notification_type, event.service_desc),
            Some(vec![
                EmbedField {
                    name: "Host".to_string(),
                    value: event.host_name.clone(),
                    inline: true,
                },
                EmbedField {
                    name: "Service".to_string(),
                    value: event.service_desc.clone(),
                    inline: true,
                },
            ]),
        ),
        EventKind::Host => (
            format!("{}{}: Host: {}", emoji, event.notification_type, event.host_name),
            None,
        ),
    };

    let url = site_url
        .filter(|base| !base.is_empty())
        .map(|base| format!("{}{}", base, event.url_suffix));

    let embed = Embed {
        title,
        description: describe(&event.last_state, &event.state, &event.output, &event.comment),
        color,
        fields,
        footer: EmbedFooter {
            text: event.check_command.clone(),
        },
        timestamp: resolve_timestamp(&event.timestamp_raw).to_rfc3339(),
        url,
    };

    tracing::debug!("Rendered embed '{}' with color {}", embed.title, embed.color);

    Ok(WebhookMessage {
        username: format!("{}{}", SENDER_PREFIX, event.site_name),
        avatar_url: AVATAR_URL.to_string(),
        embeds: vec![embed],
    })
}
