use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::errors::{PeerGroupsError, Result};
use crate::storage::record::{de_loose_opt_string, de_loose_string};
use crate::storage::{Collection, StoredEntity};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "activity.ts")]
pub struct Activity {
    pub id: String,
    pub course_id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Activity {
    /// 截止时间已过
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }
}

/// 解析截止时间：RFC 3339、无时区的 ISO 时间（按 UTC）或 `YYYY-MM-DD`
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| PeerGroupsError::date_parse(format!("invalid date: {value}")))
}

#[derive(Deserialize)]
struct ActivityRecord {
    #[serde(rename = "_id", deserialize_with = "de_loose_string")]
    id: String,
    #[serde(deserialize_with = "de_loose_string")]
    course_id: String,
    #[serde(default, deserialize_with = "de_loose_opt_string")]
    category_id: Option<String>,
    #[serde(deserialize_with = "de_loose_string")]
    title: String,
    #[serde(default, deserialize_with = "de_loose_opt_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "de_loose_opt_string")]
    due_date: Option<String>,
}

impl<'de> Deserialize<'de> for Activity {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = ActivityRecord::deserialize(deserializer)?;
        // 无法解析的截止时间视为没有截止时间
        let due_date = record
            .due_date
            .as_deref()
            .and_then(|raw| match parse_due_date(raw) {
                Ok(due) => Some(due),
                Err(e) => {
                    debug!("Ignoring due date '{}' of activity {}: {}", raw, record.id, e);
                    None
                }
            });

        Ok(Activity {
            id: record.id,
            course_id: record.course_id,
            category_id: record.category_id,
            title: record.title,
            description: record.description,
            due_date,
        })
    }
}

impl StoredEntity for Activity {
    const COLLECTION: Collection = Collection::Activities;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    pub course_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// 活动的部分更新；`due_date: Some(None)` 写入 null 以清除截止时间
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl ActivityPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.due_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::record::{decode, encode};
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_due_date_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2025-03-01").unwrap(), expected);
        assert_eq!(parse_due_date("2025-03-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_due_date("2025-03-01T00:00:00.000").unwrap(), expected);
        assert_eq!(
            parse_due_date("2025-03-01T02:00:00+02:00").unwrap(),
            expected
        );
        assert_eq!(parse_due_date("next friday").unwrap_err().code(), "E011");
    }

    #[test]
    fn test_unparsable_due_date_reads_as_none() {
        let record = json!({
            "_id": "a1",
            "course_id": "c",
            "title": "Essay",
            "due_date": "someday"
        });
        let activity: Activity = decode(record.as_object().unwrap()).unwrap();
        assert!(activity.due_date.is_none());
        assert!(!activity.is_overdue(Utc::now()));
    }

    #[test]
    fn test_patch_can_clear_due_date() {
        let patch = ActivityPatch {
            due_date: Some(None),
            ..Default::default()
        };
        let record = encode(&patch).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["due_date"], json!(null));
    }
}
