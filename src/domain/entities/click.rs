//! Click entity representing a single redirect event.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device category derived from the visitor's User-Agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
        }
    }

    /// Classifies a User-Agent string.
    ///
    /// Matching is case-insensitive and ordered: phone markers win over
    /// tablet markers, anything else is a desktop.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();

        if ["mobile", "android", "iphone"].iter().any(|m| ua.contains(m)) {
            DeviceType::Mobile
        } else if ["tablet", "ipad"].iter().any(|m| ua.contains(m)) {
            DeviceType::Tablet
        } else {
            DeviceType::Desktop
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(DeviceType::Mobile),
            "tablet" => Ok(DeviceType::Tablet),
            "desktop" => Ok(DeviceType::Desktop),
            other => Err(format!("unknown device type: {other}")),
        }
    }
}

/// A recorded click on a short link. Never updated once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip_address: String,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<DeviceType>,
    pub country_code: Option<String>,
}

impl Click {
    /// UTC calendar day this click counts towards in the daily aggregates.
    pub fn aggregate_date(&self) -> NaiveDate {
        self.clicked_at.date_naive()
    }
}

/// Input data for recording a click. `id` and `clicked_at` come from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub link_id: i64,
    pub ip_address: String,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<DeviceType>,
    pub country_code: Option<String>,
}
