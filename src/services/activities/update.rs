use tracing::info;

use super::{ActivityService, create::ensure_category};
use crate::errors::{PeerGroupsError, Result};
use crate::models::activities::entities::{Activity, ActivityPatch};
use crate::models::activities::requests::UpdateActivityRequest;
use crate::storage::{Collection, find_by_id, update_fields};
use crate::utils::validate::{optional_text, require_text};

pub async fn update_activity(
    service: &ActivityService,
    activity_id: &str,
    request: UpdateActivityRequest,
) -> Result<Activity> {
    let not_found = || PeerGroupsError::not_found(format!("Activity {activity_id} not found"));
    let activity = find_by_id::<Activity>(service.storage(), activity_id)
        .await?
        .ok_or_else(not_found)?;

    let category_id = optional_text(request.category_id);
    if let Some(category_id) = &category_id {
        ensure_category(service, category_id).await?;
    }

    let due_date = if request.clear_due_date {
        Some(None)
    } else {
        request.due_date.map(Some)
    };

    let patch = ActivityPatch {
        title: request
            .title
            .map(|title| require_text(&title, "title"))
            .transpose()?,
        description: request.description.map(|d| d.trim().to_string()),
        category_id,
        due_date,
    };
    if patch.is_empty() {
        return Ok(activity);
    }

    update_fields(service.storage(), Collection::Activities, activity_id, &patch).await?;
    info!("Updated activity {}", activity_id);

    find_by_id::<Activity>(service.storage(), activity_id)
        .await?
        .ok_or_else(not_found)
}
