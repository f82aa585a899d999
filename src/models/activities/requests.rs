use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct CreateActivityRequest {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    // 为 true 时清除截止时间，优先于 due_date
    #[serde(default)]
    pub clear_due_date: bool,
}
