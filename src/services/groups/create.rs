use std::collections::HashSet;

use tracing::{info, warn};

use super::{GroupService, membership};
use crate::errors::{PeerGroupsError, Result};
use crate::models::categories::entities::{AssignmentMode, Category};
use crate::models::groups::entities::{Group, GroupMembership, NewGroup};
use crate::models::groups::requests::CreateGroupRequest;
use crate::models::groups::responses::{GroupCreated, GroupDetail};
use crate::storage::{find_by_id, insert_one};
use crate::utils::WriteGate;
use crate::utils::validate::{optional_text, require_text};

pub async fn create_group(
    service: &GroupService,
    category_id: &str,
    request: CreateGroupRequest,
) -> Result<GroupCreated> {
    let name = require_text(&request.name, "name")?;
    let category = find_by_id::<Category>(service.storage(), category_id)
        .await?
        .ok_or_else(|| PeerGroupsError::not_found(format!("Category {category_id} not found")))?;

    let group: Group = insert_one(
        service.storage(),
        &NewGroup {
            category_id: category.id.clone(),
            name,
            description: optional_text(request.description),
        },
    )
    .await?;
    info!(
        "Created group {} ({}) in category {}",
        group.name, group.id, category.id
    );

    let (members, fill_failures) = match category.mode {
        AssignmentMode::Random => fill_group(service, &category, &group).await,
        AssignmentMode::Choice => (Vec::new(), Vec::new()),
    };
    if !fill_failures.is_empty() {
        warn!(
            "Group {} created with an incomplete fill: {}",
            group.id,
            fill_failures.join("; ")
        );
    }

    Ok(GroupCreated {
        detail: GroupDetail::new(group, members, category.capacity),
        fill_failures,
    })
}

/// 随机分类的新小组：用尚未分组的学生填满
///
/// 返回加入的成员与失败步骤的描述；小组本身保留。
async fn fill_group(
    service: &GroupService,
    category: &Category,
    group: &Group,
) -> (Vec<GroupMembership>, Vec<String>) {
    let _guard = WriteGate::global()
        .acquire(WriteGate::category_key(&category.id))
        .await;

    let roster = match service.enrollments().course_students(&category.course_id).await {
        Ok(roster) => roster,
        Err(e) => {
            warn!("Group {} left empty, roster unavailable: {}", group.id, e);
            return (Vec::new(), vec![format!("read roster: {e}")]);
        }
    };
    let occupied: HashSet<String> =
        match membership::category_memberships(service, &category.id).await {
            Ok(memberships) => memberships.into_iter().map(|m| m.student_id).collect(),
            Err(e) => {
                warn!("Group {} left empty, memberships unavailable: {}", group.id, e);
                return (Vec::new(), vec![format!("read memberships: {e}")]);
            }
        };

    let mut members = Vec::new();
    let mut failures = Vec::new();
    for student_id in roster
        .iter()
        .filter(|s| !occupied.contains(*s))
        .take(category.capacity as usize)
    {
        match membership::insert_membership(service, &group.id, student_id).await {
            Ok(membership) => members.push(membership),
            Err(e) => {
                warn!(
                    "Failed to add student {} to new group {}: {}",
                    student_id, group.id, e
                );
                failures.push(format!("assign {student_id}: {e}"));
            }
        }
    }
    info!("Filled group {} with {} student(s)", group.id, members.len());
    (members, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Collection;
    use crate::storage::memory_storage::MemoryStorage;
    use crate::storage::testing::{FlakyStorage, seed};
    use serde_json::json;
    use std::sync::Arc;

    async fn store_with_roster(mode: &str) -> (Arc<MemoryStorage>, String) {
        let store = Arc::new(MemoryStorage::new());
        seed(
            store.as_ref(),
            Collection::Enrollments,
            ["a", "b", "c", "d"]
                .iter()
                .map(|s| json!({"course_id": "c1", "student_id": s, "role": "student"}))
                .collect(),
        )
        .await;
        let category_id = seed(
            store.as_ref(),
            Collection::Categories,
            vec![json!({"course_id": "c1", "name": "Labs", "type": mode, "capacity": 3})],
        )
        .await
        .remove(0);
        (store, category_id)
    }

    #[tokio::test]
    async fn test_random_group_is_filled_with_unassigned_students() {
        let (store, category_id) = store_with_roster("random").await;
        let service = GroupService::new(store.clone());
        let group_id = seed(
            store.as_ref(),
            Collection::Groups,
            vec![json!({"category_id": category_id, "name": "Group 1"})],
        )
        .await
        .remove(0);
        service.join(&group_id, "a").await.unwrap();

        let created = service
            .create_group(
                &category_id,
                CreateGroupRequest {
                    name: " Late group ".into(),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert!(created.is_complete());
        let detail = created.detail;
        assert_eq!(detail.group.name, "Late group");
        let students: Vec<&str> = detail.members.iter().map(|m| m.student_id.as_str()).collect();
        assert_eq!(students, vec!["b", "c", "d"]);
        assert_eq!(detail.capacity_percentage, 100);
    }

    async fn flaky_random_category() -> (Arc<FlakyStorage>, String) {
        let store = Arc::new(FlakyStorage::new(MemoryStorage::new()));
        seed(
            &store.inner,
            Collection::Enrollments,
            ["a", "b", "c"]
                .iter()
                .map(|s| json!({"course_id": "c1", "student_id": s, "role": "student"}))
                .collect(),
        )
        .await;
        let category_id = seed(
            &store.inner,
            Collection::Categories,
            vec![json!({"course_id": "c1", "name": "Labs", "type": "random", "capacity": 3})],
        )
        .await
        .remove(0);
        (store, category_id)
    }

    fn team(name: &str) -> CreateGroupRequest {
        CreateGroupRequest {
            name: name.into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_unreadable_roster_is_reported() {
        let (store, category_id) = flaky_random_category().await;
        store.fail_read(Collection::Enrollments);
        let service = GroupService::new(store.clone());

        let created = service.create_group(&category_id, team("Team A")).await.unwrap();
        assert!(!created.is_complete());
        assert!(created.fill_failures[0].contains("roster"));
        assert!(created.detail.members.is_empty());
        // 小组本身保留
        assert_eq!(store.inner.count(Collection::Groups), 1);
    }

    #[tokio::test]
    async fn test_failed_member_insert_is_reported() {
        let (store, category_id) = flaky_random_category().await;
        store.fail_insert(Collection::GroupMembers, 2);
        let service = GroupService::new(store.clone());

        let created = service.create_group(&category_id, team("Team A")).await.unwrap();
        assert_eq!(created.fill_failures.len(), 1);
        assert!(created.fill_failures[0].starts_with("assign b"));
        let students: Vec<&str> = created
            .detail
            .members
            .iter()
            .map(|m| m.student_id.as_str())
            .collect();
        assert_eq!(students, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_choice_group_starts_empty() {
        let (store, category_id) = store_with_roster("choice").await;
        let service = GroupService::new(store.clone());
        let created = service
            .create_group(
                &category_id,
                CreateGroupRequest {
                    name: "Team A".into(),
                    description: Some("  ".into()),
                },
            )
            .await
            .unwrap();
        assert!(created.is_complete());
        assert!(created.detail.members.is_empty());
        assert_eq!(created.detail.group.description, None);
        assert_eq!(store.count(Collection::GroupMembers), 0);
    }

    #[tokio::test]
    async fn test_create_group_validates_input() {
        let (store, category_id) = store_with_roster("choice").await;
        let service = GroupService::new(store);
        let blank = service
            .create_group(
                &category_id,
                CreateGroupRequest {
                    name: " ".into(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(blank.code(), "E007");

        let missing = service
            .create_group(
                "nope",
                CreateGroupRequest {
                    name: "Team".into(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(missing.code(), "E008");
    }
}
