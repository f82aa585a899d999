//! 成员关系：容量与“每个分类只能加入一个小组”的约束在加入时检查

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use super::GroupService;
use crate::errors::{PeerGroupsError, Result};
use crate::models::categories::entities::{Category, DEFAULT_CAPACITY};
use crate::models::groups::entities::{Group, GroupMembership, NewGroupMembership};
use crate::models::groups::responses::JoinOutcome;
use crate::storage::{Collection, find_by_id, insert_one, load_all};
use crate::utils::WriteGate;
use crate::utils::validate::require_text;

pub(crate) async fn insert_membership(
    service: &GroupService,
    group_id: &str,
    student_id: &str,
) -> Result<GroupMembership> {
    let membership: GroupMembership = insert_one(
        service.storage(),
        &NewGroupMembership {
            group_id: group_id.to_string(),
            student_id: student_id.to_string(),
        },
    )
    .await?;
    debug!("Added student {} to group {}", student_id, group_id);
    Ok(membership)
}

pub(crate) async fn category_capacity(service: &GroupService, category_id: &str) -> Result<u32> {
    // 分类缺失时按缺省容量处理
    Ok(find_by_id::<Category>(service.storage(), category_id)
        .await?
        .map(|category| category.capacity)
        .unwrap_or(DEFAULT_CAPACITY))
}

/// 分类下所有小组的成员关系（每次重新读取）
pub(crate) async fn category_memberships(
    service: &GroupService,
    category_id: &str,
) -> Result<Vec<GroupMembership>> {
    let groups: Vec<Group> = load_all(service.storage()).await?;
    let group_ids: HashSet<String> = groups
        .into_iter()
        .filter(|group| group.category_id == category_id)
        .map(|group| group.id)
        .collect();

    let memberships: Vec<GroupMembership> = load_all(service.storage()).await?;
    Ok(memberships
        .into_iter()
        .filter(|membership| group_ids.contains(&membership.group_id))
        .collect())
}

pub async fn join(service: &GroupService, group_id: &str, student_id: &str) -> Result<JoinOutcome> {
    let student_id = require_text(student_id, "student_id")?;
    let Some(group) = find_by_id::<Group>(service.storage(), group_id).await? else {
        return Ok(JoinOutcome::GroupNotFound);
    };

    let _guard = WriteGate::global()
        .acquire(WriteGate::category_key(&group.category_id))
        .await;
    join_locked(service, &group, &student_id).await
}

// 调用方需持有分类锁
async fn join_locked(service: &GroupService, group: &Group, student_id: &str) -> Result<JoinOutcome> {
    let capacity = category_capacity(service, &group.category_id).await?;
    let memberships = category_memberships(service, &group.category_id).await?;

    if let Some(existing) = memberships.iter().find(|m| m.student_id == student_id) {
        debug!(
            "Student {} already belongs to group {} in category {}",
            student_id, existing.group_id, group.category_id
        );
        return Ok(JoinOutcome::AlreadyInCategory {
            group_id: existing.group_id.clone(),
        });
    }

    let member_count = memberships.iter().filter(|m| m.group_id == group.id).count();
    if member_count >= capacity as usize {
        debug!(
            "Group {} is full ({}/{}), rejecting student {}",
            group.id, member_count, capacity, student_id
        );
        return Ok(JoinOutcome::GroupFull {
            capacity,
            member_count,
        });
    }

    let membership = insert_membership(service, &group.id, student_id).await?;
    info!("Student {} joined group {} ({})", student_id, group.name, group.id);
    Ok(JoinOutcome::Joined(membership))
}

pub async fn leave(service: &GroupService, group_id: &str, student_id: &str) -> Result<()> {
    let student_id = require_text(student_id, "student_id")?;
    let group = find_by_id::<Group>(service.storage(), group_id).await?;
    let _guard = match &group {
        Some(group) => Some(
            WriteGate::global()
                .acquire(WriteGate::category_key(&group.category_id))
                .await,
        ),
        None => None,
    };
    leave_locked(service, group_id, &student_id).await
}

async fn leave_locked(service: &GroupService, group_id: &str, student_id: &str) -> Result<()> {
    let memberships: Vec<GroupMembership> = load_all(service.storage()).await?;
    let matching: Vec<&GroupMembership> = memberships
        .iter()
        .filter(|m| m.group_id == group_id && m.student_id == student_id)
        .collect();

    if matching.is_empty() {
        return Err(PeerGroupsError::not_found(format!(
            "Student {student_id} is not a member of group {group_id}"
        )));
    }

    // 正常只有一条；并发写入留下的重复记录一并清理
    for membership in matching {
        service
            .storage()
            .delete(Collection::GroupMembers, &membership.id)
            .await?;
    }
    info!("Student {} left group {}", student_id, group_id);
    Ok(())
}

pub async fn transfer(
    service: &GroupService,
    from_group_id: &str,
    to_group_id: &str,
    student_id: &str,
) -> Result<JoinOutcome> {
    let student_id = require_text(student_id, "student_id")?;
    if from_group_id == to_group_id {
        return Err(PeerGroupsError::validation(
            "Source and target group must differ",
        ));
    }

    let from_group = find_by_id::<Group>(service.storage(), from_group_id)
        .await?
        .ok_or_else(|| PeerGroupsError::not_found(format!("Group {from_group_id} not found")))?;
    let Some(to_group) = find_by_id::<Group>(service.storage(), to_group_id).await? else {
        return Ok(JoinOutcome::GroupNotFound);
    };
    if from_group.category_id != to_group.category_id {
        return Err(PeerGroupsError::validation(format!(
            "Groups {from_group_id} and {to_group_id} belong to different categories"
        )));
    }

    let _guard = WriteGate::global()
        .acquire(WriteGate::category_key(&from_group.category_id))
        .await;

    leave_locked(service, &from_group.id, &student_id).await?;
    let outcome = join_locked(service, &to_group, &student_id).await;
    match outcome {
        Ok(JoinOutcome::Joined(membership)) => {
            info!(
                "Moved student {} from group {} to {}",
                student_id, from_group.id, to_group.id
            );
            Ok(JoinOutcome::Joined(membership))
        }
        Ok(rejected) => {
            restore_membership(service, &from_group, &student_id).await?;
            Ok(rejected)
        }
        Err(e) => {
            restore_membership(service, &from_group, &student_id).await?;
            Err(e)
        }
    }
}

// 换组失败后回到原小组；回不去时学生已不在任何小组中
async fn restore_membership(service: &GroupService, group: &Group, student_id: &str) -> Result<()> {
    match insert_membership(service, &group.id, student_id).await {
        Ok(_) => {
            warn!(
                "Transfer of student {} rejected, restored membership in group {}",
                student_id, group.id
            );
            Ok(())
        }
        Err(e) => {
            error!(
                "Transfer of student {} rejected and rejoining group {} failed, student has no group: {}",
                student_id, group.id, e
            );
            Err(PeerGroupsError::partial_failure(format!(
                "Student {student_id} left group {} but could not be moved or restored: {e}",
                group.id
            )))
        }
    }
}

pub async fn remove_student_from_category(
    service: &GroupService,
    category_id: &str,
    student_id: &str,
) -> Result<bool> {
    let student_id = student_id.trim();
    let _guard = WriteGate::global()
        .acquire(WriteGate::category_key(category_id))
        .await;

    let memberships = category_memberships(service, category_id).await?;
    let mut removed = false;
    for membership in memberships.iter().filter(|m| m.student_id == student_id) {
        service
            .storage()
            .delete(Collection::GroupMembers, &membership.id)
            .await?;
        removed = true;
    }

    if removed {
        info!("Removed student {} from category {}", student_id, category_id);
    }
    Ok(removed)
}

pub async fn student_group_in_category(
    service: &GroupService,
    student_id: &str,
    category_id: &str,
) -> Result<Option<GroupMembership>> {
    let student_id = student_id.trim();
    let memberships = category_memberships(service, category_id).await?;
    Ok(memberships.into_iter().find(|m| m.student_id == student_id))
}

pub async fn list_members(service: &GroupService, group_id: &str) -> Result<Vec<GroupMembership>> {
    if find_by_id::<Group>(service.storage(), group_id).await?.is_none() {
        return Err(PeerGroupsError::not_found(format!(
            "Group {group_id} not found"
        )));
    }
    let memberships: Vec<GroupMembership> = load_all(service.storage()).await?;
    Ok(memberships
        .into_iter()
        .filter(|m| m.group_id == group_id)
        .collect())
}
