use tracing::{info, warn};

use super::GroupService;
use crate::errors::{PeerGroupsError, Result};
use crate::models::groups::entities::{Group, GroupMembership};
use crate::storage::{Collection, find_by_id, load_all};
use crate::utils::WriteGate;

pub async fn delete_group(service: &GroupService, group_id: &str) -> Result<()> {
    let group = find_by_id::<Group>(service.storage(), group_id)
        .await?
        .ok_or_else(|| PeerGroupsError::not_found(format!("Group {group_id} not found")))?;

    let _guard = WriteGate::global()
        .acquire(WriteGate::category_key(&group.category_id))
        .await;

    let memberships: Vec<GroupMembership> = load_all(service.storage()).await?;
    let failures = delete_group_cascade(service, &group, &memberships).await;
    if !failures.is_empty() {
        return Err(PeerGroupsError::partial_failure(format!(
            "Group {} was not deleted: {}",
            group.id,
            failures.join("; ")
        )));
    }
    Ok(())
}

/// 先删成员关系再删小组；任一成员关系删除失败时保留小组记录
///
/// 返回失败步骤的描述，空表示全部完成。
pub(crate) async fn delete_group_cascade(
    service: &GroupService,
    group: &Group,
    memberships: &[GroupMembership],
) -> Vec<String> {
    let mut failures = Vec::new();

    for membership in memberships.iter().filter(|m| m.group_id == group.id) {
        if let Err(e) = service
            .storage()
            .delete(Collection::GroupMembers, &membership.id)
            .await
        {
            warn!(
                "Failed to delete membership {} of group {}: {}",
                membership.id, group.id, e
            );
            failures.push(format!("delete membership {}: {e}", membership.id));
        }
    }

    if !failures.is_empty() {
        warn!(
            "Keeping group {} after {} failed membership delete(s)",
            group.id,
            failures.len()
        );
        return failures;
    }

    match service.storage().delete(Collection::Groups, &group.id).await {
        Ok(()) => info!("Deleted group {} ({})", group.name, group.id),
        Err(e) => {
            warn!("Failed to delete group {}: {}", group.id, e);
            failures.push(format!("delete group {}: {e}", group.id));
        }
    }
    failures
}
