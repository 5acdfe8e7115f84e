//! Notification context extracted from the Checkmk environment

use std::collections::BTreeMap;
use std::ffi::OsString;

use serde::Serialize;

use crate::NotifyError;

/// Prefix Checkmk puts in front of every notification variable
pub const ENV_PREFIX: &str = "NOTIFY_";

/// Fields that must be present, checked in this order
pub const REQUIRED_FIELDS: [&str; 4] = [
    "NOTIFICATIONTYPE",
    "HOSTNAME",
    "SERVICESTATE",
    "SERVICEDESC",
];

/// Notification variables with the `NOTIFY_` prefix stripped
pub type RawAttributes = BTreeMap<String, String>;

/// Collect the `NOTIFY_*` variables from an environment listing.
pub fn extract_context<I, K, V>(vars: I) -> RawAttributes
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            key.as_ref()
                .strip_prefix(ENV_PREFIX)
                .map(|field| (field.to_string(), value.into()))
        })
        .collect()
}

/// Convert an OS environment listing to strings.
///
/// Plugin output may carry bytes that are not UTF-8; those are replaced
/// rather than aborting the notification.
pub fn lossy_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().map(|(key, value)| {
        (
            key.to_string_lossy().into_owned(),
            value.to_string_lossy().into_owned(),
        )
    })
}

/// Which object the notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Service,
    Host,
}

impl EventKind {
    /// Anything other than an exact `SERVICE` is treated as a host notification.
    pub fn from_what(what: &str) -> Self {
        if what == "SERVICE" {
            EventKind::Service
        } else {
            EventKind::Host
        }
    }
}

/// A single host or service notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    pub kind: EventKind,
    pub notification_type: String,
    pub state: String,
    pub last_state: String,
    pub host_name: String,
    pub service_desc: String,
    pub output: String,
    pub comment: String,
    pub check_command: String,
    pub url_suffix: String,
    pub timestamp_raw: String,
    pub site_name: String,
}

impl NotificationEvent {
    /// Build the event, picking the host or service flavour of each field.
    pub fn from_context(ctx: &RawAttributes) -> crate::Result<Self> {
        if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !ctx.contains_key(**f)) {
            return Err(NotifyError::MissingField { field: *field });
        }

        let get = |key: &str| ctx.get(key).cloned().unwrap_or_default();
        let kind = EventKind::from_what(&get("WHAT"));

        let event = match kind {
            EventKind::Service => Self {
                kind,
                notification_type: get("NOTIFICATIONTYPE"),
                state: get("SERVICESTATE"),
                last_state: get("LASTSERVICESTATE"),
                host_name: get("HOSTNAME"),
                service_desc: get("SERVICEDESC"),
                output: get("SERVICEOUTPUT"),
                comment: get("NOTIFICATIONCOMMENT"),
                check_command: get("SERVICECHECKCOMMAND"),
                url_suffix: get("SERVICEURL"),
                timestamp_raw: get("SHORTDATETIME"),
                site_name: get("OMD_SITE"),
            },
            EventKind::Host => Self {
                kind,
                notification_type: get("NOTIFICATIONTYPE"),
                state: get("HOSTSTATE"),
                last_state: get("LASTHOSTSTATE"),
                host_name: get("HOSTNAME"),
                service_desc: String::new(),
                output: get("HOSTOUTPUT"),
                comment: get("NOTIFICATIONCOMMENT"),
                check_command: get("HOSTCHECKCOMMAND"),
                url_suffix: get("HOSTURL"),
                timestamp_raw: get("SHORTDATETIME"),
                site_name: get("OMD_SITE"),
            },
        };

        tracing::debug!(
            "Built {:?} event '{}' for host '{}'",
            event.kind,
            event.notification_type,
            event.host_name
        );
        Ok(event)
    }
}
