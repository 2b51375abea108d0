use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact-form submission surfaced to the back office.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Lead {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct LeadStats {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub unread: i64,
    #[serde(default)]
    pub today: i64,
    #[serde(default)]
    pub this_week: i64,
    #[serde(default)]
    pub this_month: i64,
}

/// Time window filter for the lead list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadPeriod {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl LeadPeriod {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            LeadPeriod::All => "all",
            LeadPeriod::Today => "today",
            LeadPeriod::Week => "week",
            LeadPeriod::Month => "month",
        }
    }
}
