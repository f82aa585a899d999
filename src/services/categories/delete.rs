use tracing::{info, warn};

use super::CategoryService;
use crate::errors::{PeerGroupsError, Result};
use crate::models::categories::entities::Category;
use crate::models::groups::entities::{Group, GroupMembership};
use crate::services::groups::delete::delete_group_cascade;
use crate::storage::{Collection, find_by_id, load_all};
use crate::utils::WriteGate;

/// 删除分类：依次删除每个小组（先删其成员关系），最后删除分类记录
///
/// 任何一步失败都会继续处理其余小组，最终返回 `PartialFailure` 并保留分类记录，
/// 以便重试。
pub async fn delete_category(service: &CategoryService, category_id: &str) -> Result<()> {
    let category = find_by_id::<Category>(service.storage(), category_id)
        .await?
        .ok_or_else(|| PeerGroupsError::not_found(format!("Category {category_id} not found")))?;

    let _guard = WriteGate::global()
        .acquire(WriteGate::category_key(&category.id))
        .await;

    let groups: Vec<Group> = load_all(service.storage()).await?;
    let memberships: Vec<GroupMembership> = load_all(service.storage()).await?;
    let group_service = service.groups();

    let mut failures = Vec::new();
    for group in groups.iter().filter(|g| g.category_id == category.id) {
        failures.extend(delete_group_cascade(&group_service, group, &memberships).await);
    }

    if !failures.is_empty() {
        warn!(
            "Category {} kept after {} failed cascade step(s)",
            category.id,
            failures.len()
        );
        return Err(PeerGroupsError::partial_failure(format!(
            "Category {} was not deleted: {}",
            category.id,
            failures.join("; ")
        )));
    }

    service
        .storage()
        .delete(Collection::Categories, &category.id)
        .await?;
    info!("Deleted category {} ({})", category.name, category.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;
    use crate::storage::testing::{FlakyStorage, seed};
    use serde_json::json;
    use std::sync::Arc;

    // 2 个小组、3 条成员关系，另有一个无关分类
    async fn seed_category(store: &MemoryStorage) -> (String, Vec<String>) {
        let categories = seed(
            store,
            Collection::Categories,
            vec![
                json!({"course_id": "c1", "name": "Labs", "type": "random", "capacity": 2}),
                json!({"course_id": "c1", "name": "Keep", "type": "choice", "capacity": 2}),
            ],
        )
        .await;
        let groups = seed(
            store,
            Collection::Groups,
            vec![
                json!({"category_id": categories[0], "name": "Group 1"}),
                json!({"category_id": categories[0], "name": "Group 2"}),
                json!({"category_id": categories[1], "name": "Group 1"}),
            ],
        )
        .await;
        let memberships = seed(
            store,
            Collection::GroupMembers,
            vec![
                json!({"group_id": groups[0], "student_id": "s1"}),
                json!({"group_id": groups[0], "student_id": "s2"}),
                json!({"group_id": groups[1], "student_id": "s3"}),
                json!({"group_id": groups[2], "student_id": "s1"}),
            ],
        )
        .await;
        (categories[0].clone(), memberships)
    }

    #[tokio::test]
    async fn test_delete_category_cascades() {
        let store = Arc::new(MemoryStorage::new());
        let (category_id, _) = seed_category(&store).await;
        let service = CategoryService::new(store.clone());

        service.delete(&category_id).await.unwrap();
        assert_eq!(store.count(Collection::Categories), 1);
        assert_eq!(store.count(Collection::Groups), 1);
        assert_eq!(store.count(Collection::GroupMembers), 1);
        assert_eq!(service.delete(&category_id).await.unwrap_err().code(), "E008");
    }

    #[tokio::test]
    async fn test_partial_cascade_keeps_category() {
        let store = Arc::new(FlakyStorage::new(MemoryStorage::new()));
        let (category_id, memberships) = seed_category(&store.inner).await;
        store.fail_delete(&memberships[2]);
        let service = CategoryService::new(store.clone());

        let err = service.delete(&category_id).await.unwrap_err();
        assert_eq!(err.code(), "E010");

        // 第一个小组删除完成，第二个小组因成员关系删除失败而保留
        assert_eq!(store.inner.count(Collection::Categories), 2);
        assert_eq!(store.inner.count(Collection::Groups), 2);
        assert_eq!(store.inner.count(Collection::GroupMembers), 2);
    }
}
