use std::collections::HashSet;

use super::{GroupService, membership};
use crate::errors::{PeerGroupsError, Result};
use crate::models::categories::entities::Category;
use crate::models::groups::entities::{Group, GroupMembership};
use crate::models::groups::responses::GroupDetail;
use crate::storage::{find_by_id, load_all};

pub async fn list_groups_in_category(
    service: &GroupService,
    category_id: &str,
) -> Result<Vec<GroupDetail>> {
    let category = find_by_id::<Category>(service.storage(), category_id)
        .await?
        .ok_or_else(|| PeerGroupsError::not_found(format!("Category {category_id} not found")))?;

    let groups: Vec<Group> = load_all(service.storage()).await?;
    let memberships: Vec<GroupMembership> = load_all(service.storage()).await?;

    let mut details: Vec<GroupDetail> = groups
        .into_iter()
        .filter(|group| group.category_id == category.id)
        .map(|group| {
            let members = memberships
                .iter()
                .filter(|m| m.group_id == group.id)
                .cloned()
                .collect();
            GroupDetail::new(group, members, category.capacity)
        })
        .collect();
    details.sort_by_cached_key(|detail| detail.group.name.to_lowercase());

    Ok(details)
}

pub async fn available_students(
    service: &GroupService,
    category_id: &str,
    course_id: &str,
) -> Result<Vec<String>> {
    let roster = service.enrollments().course_students(course_id).await?;
    let occupied: HashSet<String> = membership::category_memberships(service, category_id)
        .await?
        .into_iter()
        .map(|m| m.student_id)
        .collect();

    Ok(roster
        .into_iter()
        .filter(|student| !occupied.contains(student))
        .collect())
}
