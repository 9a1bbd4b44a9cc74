use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration data returned by an RDAP domain lookup.
///
/// Only the fields this service consumes are modeled; every field is
/// default-tolerant because registries differ in what they populate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapResponse {
    #[serde(default)]
    pub object_class_name: Option<String>,

    #[serde(default)]
    pub handle: Option<String>,

    #[serde(default)]
    pub ldh_name: Option<String>,

    #[serde(default)]
    pub status: Vec<String>,

    #[serde(default)]
    pub events: Vec<RdapEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapEvent {
    pub event_action: String,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub event_actor: Option<String>,
}

impl RdapEvent {
    #[must_use]
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        self.event_date.as_ref()?.parse().ok()
    }
}

impl RdapResponse {
    /// Date of the registry `expiration` event, if present and parsable.
    #[must_use]
    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.events
            .iter()
            .find(|e| e.event_action == "expiration")
            .and_then(RdapEvent::parsed_date)
    }

    /// Date of the registry `registration` event, if present and parsable.
    #[must_use]
    pub fn registration_date(&self) -> Option<DateTime<Utc>> {
        self.events
            .iter()
            .find(|e| e.event_action == "registration")
            .and_then(RdapEvent::parsed_date)
    }
}
