use tracing::info;

use super::GroupService;
use crate::errors::{PeerGroupsError, Result};
use crate::models::groups::entities::{Group, GroupPatch};
use crate::models::groups::requests::UpdateGroupRequest;
use crate::storage::{Collection, find_by_id, update_fields};
use crate::utils::validate::require_text;

pub async fn update_group(
    service: &GroupService,
    group_id: &str,
    request: UpdateGroupRequest,
) -> Result<Group> {
    let not_found = || PeerGroupsError::not_found(format!("Group {group_id} not found"));
    let group = find_by_id::<Group>(service.storage(), group_id)
        .await?
        .ok_or_else(not_found)?;

    let patch = GroupPatch {
        name: request
            .name
            .map(|name| require_text(&name, "name"))
            .transpose()?,
        description: request.description.map(|d| d.trim().to_string()),
    };
    if patch.name.is_none() && patch.description.is_none() {
        return Ok(group);
    }

    update_fields(service.storage(), Collection::Groups, group_id, &patch).await?;
    info!("Updated group {}", group_id);

    find_by_id::<Group>(service.storage(), group_id)
        .await?
        .ok_or_else(not_found)
}
