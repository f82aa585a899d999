use tracing::info;

use super::ActivityService;
use crate::errors::{PeerGroupsError, Result};
use crate::models::activities::entities::{Activity, NewActivity};
use crate::models::activities::requests::CreateActivityRequest;
use crate::models::categories::entities::Category;
use crate::storage::{find_by_id, insert_one};
use crate::utils::validate::{optional_text, require_text};

/// 活动引用的分类必须存在
pub(crate) async fn ensure_category(service: &ActivityService, category_id: &str) -> Result<()> {
    match find_by_id::<Category>(service.storage(), category_id).await? {
        Some(_) => Ok(()),
        None => Err(PeerGroupsError::not_found(format!(
            "Category {category_id} not found"
        ))),
    }
}

pub async fn create_activity(
    service: &ActivityService,
    course_id: &str,
    request: CreateActivityRequest,
) -> Result<Activity> {
    let course_id = require_text(course_id, "course_id")?;
    let title = require_text(&request.title, "title")?;
    let category_id = optional_text(request.category_id);
    if let Some(category_id) = &category_id {
        ensure_category(service, category_id).await?;
    }

    let activity: Activity = insert_one(
        service.storage(),
        &NewActivity {
            course_id,
            category_id,
            title,
            description: optional_text(request.description),
            due_date: request.due_date,
        },
    )
    .await?;
    info!(
        "Created activity {} ({}) in course {}",
        activity.title, activity.id, activity.course_id
    );
    Ok(activity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_activity() {
        let service = ActivityService::new(Arc::new(MemoryStorage::new()));
        let due = Utc.with_ymd_and_hms(2030, 1, 15, 12, 0, 0).unwrap();
        let activity = service
            .create(
                "c1",
                CreateActivityRequest {
                    title: " Peer review ".into(),
                    description: None,
                    category_id: None,
                    due_date: Some(due),
                },
            )
            .await
            .unwrap();
        assert_eq!(activity.title, "Peer review");
        assert_eq!(activity.due_date, Some(due));

        let fetched = service.get(&activity.id).await.unwrap().unwrap();
        assert_eq!(fetched.due_date, Some(due));
    }

    #[tokio::test]
    async fn test_create_activity_requires_known_category() {
        let service = ActivityService::new(Arc::new(MemoryStorage::new()));
        let err = service
            .create(
                "c1",
                CreateActivityRequest {
                    title: "Essay".into(),
                    description: None,
                    category_id: Some("ghost".into()),
                    due_date: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");
    }
}
